//! Rewrites stored amounts that no longer parse or have gone negative.
//!
//! Reads tolerate corrupt money text by treating it as zero; this pass makes that
//! permanent so the warnings stop. Budget totals, product prices and estimate costs
//! are checked. The whole pass is one transaction.

use crate::{
    core::money::{is_well_formed, to_stored},
    entities::{Budget, BudgetEstimate, Product, budget, budget_estimate, product},
    errors::Result,
};
use rust_decimal::Decimal;
use sea_orm::{Set, TransactionTrait, prelude::*};
use tracing::{info, warn};

/// Rows rewritten per table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RepairReport {
    /// Budget totals reset to zero
    pub budgets_fixed: u64,
    /// Product prices reset to zero
    pub products_fixed: u64,
    /// Estimate costs reset to zero
    pub estimates_fixed: u64,
}

impl RepairReport {
    /// Total rows rewritten
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.budgets_fixed + self.products_fixed + self.estimates_fixed
    }
}

/// Resets every unparsable or negative budget total, product price and estimate cost to `0.00`.
pub async fn repair_decimal_fields(db: &DatabaseConnection) -> Result<RepairReport> {
    let zero = to_stored(Decimal::ZERO);
    let txn = db.begin().await?;
    let mut report = RepairReport::default();

    for row in Budget::find().all(&txn).await? {
        if is_well_formed(&row.total) {
            continue;
        }
        warn!(budget_id = row.id, total = %row.total, "Resetting invalid budget total");
        let mut model: budget::ActiveModel = row.into();
        model.total = Set(zero.clone());
        model.update(&txn).await?;
        report.budgets_fixed += 1;
    }

    for row in Product::find().all(&txn).await? {
        if is_well_formed(&row.price) {
            continue;
        }
        warn!(product_id = row.id, price = %row.price, "Resetting invalid product price");
        let mut model: product::ActiveModel = row.into();
        model.price = Set(zero.clone());
        model.update(&txn).await?;
        report.products_fixed += 1;
    }

    for row in BudgetEstimate::find().all(&txn).await? {
        if is_well_formed(&row.estimated_cost) {
            continue;
        }
        warn!(estimate_id = row.id, cost = %row.estimated_cost, "Resetting invalid estimate cost");
        let mut model: budget_estimate::ActiveModel = row.into();
        model.estimated_cost = Set(zero.clone());
        model.update(&txn).await?;
        report.estimates_fixed += 1;
    }

    txn.commit().await?;

    info!(
        budgets = report.budgets_fixed,
        products = report.products_fixed,
        estimates = report.estimates_fixed,
        "Decimal repair finished"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{budget::set_budget_total, estimate::create_estimate};
    use crate::test_utils::*;

    async fn corrupt_price(db: &DatabaseConnection, row: product::Model, raw: &str) -> Result<()> {
        let mut model: product::ActiveModel = row.into();
        model.price = Set(raw.to_string());
        model.update(db).await?;
        Ok(())
    }

    #[tokio::test]
    async fn test_repair_resets_only_corrupt_rows() -> Result<()> {
        let (db, _classification, shop, broken) = setup_with_product().await?;
        let fine = create_custom_product(&db, "Fine", "45.00", shop.id).await?;
        let negative = create_custom_product(&db, "Negative", "5.00", shop.id).await?;
        corrupt_price(&db, broken.clone(), "ten dinars").await?;
        corrupt_price(&db, negative.clone(), "-5.00").await?;

        let user = create_test_user(&db, "hana").await?;
        let budget = set_budget_total(&db, user.id, "300").await?;
        let mut model: budget::ActiveModel = budget.into();
        model.total = Set("NaN".to_string());
        model.update(&db).await?;

        let estimate = create_estimate(&db, user.id, "80", None).await?;

        let report = repair_decimal_fields(&db).await?;
        assert_eq!(
            report,
            RepairReport {
                budgets_fixed: 1,
                products_fixed: 2,
                estimates_fixed: 0,
            }
        );
        assert_eq!(report.total(), 3);

        let repaired = Product::find_by_id(broken.id).one(&db).await?;
        assert_eq!(repaired.map(|p| p.price).as_deref(), Some("0.00"));
        let clamped = Product::find_by_id(negative.id).one(&db).await?;
        assert_eq!(clamped.map(|p| p.price).as_deref(), Some("0.00"));
        let untouched = Product::find_by_id(fine.id).one(&db).await?;
        assert_eq!(untouched.map(|p| p.price).as_deref(), Some("45.00"));
        let kept = BudgetEstimate::find_by_id(estimate.id).one(&db).await?;
        assert_eq!(kept.map(|e| e.estimated_cost).as_deref(), Some("80.00"));

        // Second pass has nothing left to do
        assert_eq!(repair_decimal_fields(&db).await?.total(), 0);
        Ok(())
    }
}
