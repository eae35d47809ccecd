//! Display helpers for amounts and budget progress.
//!
//! These are pure string builders used by whatever front end renders the budget and
//! cart pages. Currency code and display places come from the application settings.

use crate::core::summary::BudgetSummary;
use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};

/// Formats an amount with a currency code, e.g. `BHD 12.500`.
#[must_use]
pub fn format_currency(amount: Decimal, currency_code: &str, places: u32) -> String {
    let mut value = amount.round_dp_with_strategy(places, RoundingStrategy::MidpointAwayFromZero);
    value.rescale(places);
    if value.is_zero() {
        // Avoid "-0.000" after rounding tiny negatives
        value.set_sign_positive(true);
    }
    format!("{currency_code} {value}")
}

/// Generates a progress bar string for visual representation.
///
/// Creates a text-based progress bar like: `[████████░░] 80.0%`
///
/// # Arguments
/// * `percentage` - Share of the budget spent; may exceed 100
/// * `bar_length` - Length of the progress bar in characters (default 10)
#[must_use]
pub fn format_progress_bar(percentage: Decimal, bar_length: Option<usize>) -> String {
    let length = bar_length.unwrap_or(10);
    let clamped = percentage.clamp(Decimal::ZERO, Decimal::ONE_HUNDRED);

    let filled_cells = (clamped * Decimal::from(length) / Decimal::ONE_HUNDRED).round();
    let filled = filled_cells.to_usize().unwrap_or(length).min(length);
    let empty = length.saturating_sub(filled);

    let filled_str = "█".repeat(filled);
    let empty_str = "░".repeat(empty);
    let shown = percentage.round_dp(1);

    format!("[{filled_str}{empty_str}] {shown:.1}%")
}

/// One-line summary of a budget, e.g.
/// `BHD 399.970 of BHD 500.000 spent (79.99%), BHD 100.030 left`.
#[must_use]
pub fn format_summary_line(summary: &BudgetSummary, currency_code: &str, places: u32) -> String {
    let spent = format_currency(summary.total_spent, currency_code, places);
    let total = format_currency(summary.budget_total, currency_code, places);
    let percent = summary.percentage;

    if summary.is_over_budget {
        let over = format_currency(summary.over_budget_amount, currency_code, places);
        format!("{spent} of {total} spent ({percent}%), over budget by {over}")
    } else {
        let left = format_currency(summary.remaining, currency_code, places);
        let near = if summary.is_near_budget {
            ", nearly at limit"
        } else {
            ""
        };
        format!("{spent} of {total} spent ({percent}%), {left} left{near}")
    }
}
