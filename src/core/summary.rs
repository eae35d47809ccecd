//! Budget and cart totals.
//!
//! Pure functions over prices and quantities; the database-facing modules load
//! rows, turn them into [`LineItem`]s and call [`compute_summary`]. All arithmetic
//! is `Decimal`, so repeated additions of two-place prices stay exact.

use crate::core::money::to_money;
use rust_decimal::Decimal;
use serde::Serialize;

/// Which rows count as spending against the budget.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SpendPolicy {
    /// Budget selections plus everything in the cart
    #[default]
    SelectionsAndCart,
    /// Budget selections only; the cart is reported but not counted
    SelectionsOnly,
}

/// One priced line: a unit price times a quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineItem {
    /// Price of one unit
    pub unit_price: Decimal,
    /// Number of units
    pub quantity: i32,
}

impl LineItem {
    /// Creates a line item
    #[must_use]
    pub const fn new(unit_price: Decimal, quantity: i32) -> Self {
        Self {
            unit_price,
            quantity,
        }
    }

    /// `unit_price × quantity`
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

/// Derived values shown next to a budget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BudgetSummary {
    /// The user's spending ceiling
    pub budget_total: Decimal,
    /// Sum over budget selections
    pub selected_total: Decimal,
    /// Sum over cart items
    pub cart_total: Decimal,
    /// What counts against the budget under the active policy
    pub total_spent: Decimal,
    /// `budget_total - total_spent`, negative when over
    pub remaining: Decimal,
    /// Spent as a percentage of the budget, 0 when the budget is 0
    pub percentage: Decimal,
    /// `total_spent > budget_total`
    pub is_over_budget: bool,
    /// Budget is positive and more than 90% of it is spent
    pub is_near_budget: bool,
    /// How far over the budget, 0 when not over
    pub over_budget_amount: Decimal,
}

/// Sum of `unit_price × quantity` over all lines, at two places.
#[must_use]
pub fn sum_lines(lines: &[LineItem]) -> Decimal {
    to_money(lines.iter().map(LineItem::line_total).sum())
}

/// Spent as a percentage of total, rounded to two places. Zero when total is not positive.
#[must_use]
pub fn budget_percentage(spent: Decimal, total: Decimal) -> Decimal {
    if total <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    (spent / total * Decimal::ONE_HUNDRED).round_dp(2)
}

fn near_budget_ratio() -> Decimal {
    Decimal::new(9, 1)
}

/// Computes every derived budget value from the budget total and the priced lines.
#[must_use]
pub fn compute_summary(
    budget_total: Decimal,
    selected: &[LineItem],
    cart: &[LineItem],
    policy: SpendPolicy,
) -> BudgetSummary {
    let budget_total = to_money(budget_total);
    let selected_total = sum_lines(selected);
    let cart_total = sum_lines(cart);

    let total_spent = match policy {
        SpendPolicy::SelectionsAndCart => selected_total + cart_total,
        SpendPolicy::SelectionsOnly => selected_total,
    };

    let is_over_budget = total_spent > budget_total;
    let is_near_budget =
        budget_total > Decimal::ZERO && total_spent > budget_total * near_budget_ratio();

    BudgetSummary {
        budget_total,
        selected_total,
        cart_total,
        total_spent,
        remaining: to_money(budget_total - total_spent),
        percentage: budget_percentage(total_spent, budget_total),
        is_over_budget,
        is_near_budget,
        over_budget_amount: if is_over_budget {
            to_money(total_spent - budget_total)
        } else {
            to_money(Decimal::ZERO)
        },
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_total_spent_is_exact() {
        let selected = [LineItem::new(dec("99.99"), 2)];
        let cart = [LineItem::new(dec("199.99"), 1)];

        let summary = compute_summary(dec("500.00"), &selected, &cart, SpendPolicy::default());

        assert_eq!(summary.selected_total, dec("199.98"));
        assert_eq!(summary.cart_total, dec("199.99"));
        assert_eq!(summary.total_spent, dec("399.97"));
        assert_eq!(summary.total_spent.to_string(), "399.97");
        assert_eq!(summary.remaining, dec("100.03"));
        assert!(!summary.is_over_budget);
        assert!(!summary.is_near_budget);
    }

    #[test]
    fn test_selections_only_policy_ignores_cart() {
        let selected = [LineItem::new(dec("99.99"), 2)];
        let cart = [LineItem::new(dec("199.99"), 1)];

        let summary = compute_summary(dec("200"), &selected, &cart, SpendPolicy::SelectionsOnly);

        assert_eq!(summary.total_spent, dec("199.98"));
        assert_eq!(summary.cart_total, dec("199.99"));
        assert!(summary.is_near_budget);
        assert!(!summary.is_over_budget);
    }

    #[test]
    fn test_repeated_small_additions_do_not_drift() {
        let lines = vec![LineItem::new(dec("0.10"), 1); 1000];
        assert_eq!(sum_lines(&lines), dec("100.00"));
    }

    #[test]
    fn test_zero_budget() {
        let cart = [LineItem::new(dec("10.00"), 1)];
        let summary = compute_summary(Decimal::ZERO, &[], &cart, SpendPolicy::default());

        assert_eq!(summary.percentage, Decimal::ZERO);
        assert!(summary.is_over_budget);
        assert!(!summary.is_near_budget);
        assert_eq!(summary.remaining, dec("-10.00"));
        assert_eq!(summary.over_budget_amount, dec("10.00"));
    }

    #[test]
    fn test_empty_everything() {
        let summary = compute_summary(Decimal::ZERO, &[], &[], SpendPolicy::default());
        assert_eq!(summary.total_spent, Decimal::ZERO);
        assert!(!summary.is_over_budget);
        assert!(!summary.is_near_budget);
    }

    #[test]
    fn test_over_and_near_flags() {
        let total = dec("100.00");

        // Exactly 90% is not "near"
        let at_ninety = compute_summary(total, &[LineItem::new(dec("90.00"), 1)], &[], SpendPolicy::default());
        assert!(!at_ninety.is_near_budget);
        assert_eq!(at_ninety.percentage, dec("90"));

        let above_ninety =
            compute_summary(total, &[LineItem::new(dec("90.01"), 1)], &[], SpendPolicy::default());
        assert!(above_ninety.is_near_budget);
        assert!(!above_ninety.is_over_budget);

        // Exactly the budget is not "over"
        let at_budget = compute_summary(total, &[LineItem::new(dec("50.00"), 2)], &[], SpendPolicy::default());
        assert!(!at_budget.is_over_budget);
        assert!(at_budget.is_near_budget);
        assert_eq!(at_budget.remaining, Decimal::ZERO);

        let over = compute_summary(total, &[LineItem::new(dec("100.01"), 1)], &[], SpendPolicy::default());
        assert!(over.is_over_budget);
        assert!(over.is_near_budget);
        assert_eq!(over.over_budget_amount, dec("0.01"));
    }

    #[test]
    fn test_percentage_rounding() {
        assert_eq!(budget_percentage(dec("1"), dec("3")), dec("33.33"));
        assert_eq!(budget_percentage(dec("399.97"), dec("500")), dec("79.99"));
        assert_eq!(budget_percentage(dec("5"), dec("-1")), Decimal::ZERO);
    }

    #[test]
    fn test_money_values_keep_two_places() {
        let summary = compute_summary(dec("500"), &[LineItem::new(dec("12.5"), 3)], &[], SpendPolicy::default());
        assert_eq!(summary.budget_total.to_string(), "500.00");
        assert_eq!(summary.selected_total.to_string(), "37.50");
        assert_eq!(summary.remaining.to_string(), "462.50");
    }
}
