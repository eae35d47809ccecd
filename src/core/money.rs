//! Money handling - strict parsing at the boundary, lenient reading from storage.
//!
//! All amounts are `Decimal` in memory and two-place text in the database. Input
//! from users goes through [`parse_decimal`] and [`validate_money`] exactly once;
//! values read back from storage go through [`stored_decimal`], which never fails.

use crate::errors::{Error, Result};
use rust_decimal::Decimal;
use tracing::warn;

/// Decimal places kept for every stored amount.
pub const MONEY_PLACES: u32 = 2;

/// Largest allowed amount has 8 integer digits (10 digits total with 2 places).
const MAX_INTEGER_DIGITS: u32 = 8;

/// Parses user-supplied text as a decimal number.
///
/// Accepts an optional sign, digits, and at most one decimal point, with
/// surrounding whitespace ignored. Exponents, separators, `NaN` and empty input
/// are rejected.
///
/// # Errors
/// Returns [`Error::InvalidDecimal`] when the text is not a plain decimal number.
pub fn parse_decimal(input: &str) -> Result<Decimal> {
    let invalid = || Error::InvalidDecimal {
        input: input.to_string(),
    };

    let trimmed = input.trim();
    let unsigned = trimmed.strip_prefix(['+', '-']).unwrap_or(trimmed);

    let mut digits = 0_usize;
    let mut points = 0_usize;
    for c in unsigned.chars() {
        match c {
            '0'..='9' => digits += 1,
            '.' => points += 1,
            _ => return Err(invalid()),
        }
    }
    if digits == 0 || points > 1 {
        return Err(invalid());
    }

    Decimal::from_str_exact(trimmed).map_err(|_| invalid())
}

/// Checks that an amount can be stored as money and returns it at two places.
///
/// # Errors
/// Returns [`Error::InvalidAmount`] if the amount is negative, has more than two
/// decimal places, or has more than eight integer digits.
pub fn validate_money(amount: Decimal) -> Result<Decimal> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(Error::InvalidAmount {
            amount,
            reason: "must not be negative",
        });
    }

    if amount.normalize().scale() > MONEY_PLACES {
        return Err(Error::InvalidAmount {
            amount,
            reason: "at most 2 decimal places",
        });
    }

    if amount.trunc() >= Decimal::from(10_i64.pow(MAX_INTEGER_DIGITS)) {
        return Err(Error::InvalidAmount {
            amount,
            reason: "at most 10 digits",
        });
    }

    Ok(to_money(amount))
}

/// Parses and validates user-supplied money text in one step.
///
/// # Errors
/// Returns [`Error::InvalidDecimal`] or [`Error::InvalidAmount`].
pub fn parse_money(input: &str) -> Result<Decimal> {
    validate_money(parse_decimal(input)?)
}

/// Rounds to two places and pins the scale so `99.9` displays as `99.90`.
#[must_use]
pub fn to_money(amount: Decimal) -> Decimal {
    let mut value = amount.round_dp(MONEY_PLACES);
    value.rescale(MONEY_PLACES);
    value
}

/// Canonical storage text for an amount.
#[must_use]
pub fn to_stored(amount: Decimal) -> String {
    to_money(amount).to_string()
}

/// Reads a stored amount, treating unparsable or negative text as zero.
///
/// `field` and `row_id` are only used for the warning so corrupt rows can be
/// found and repaired with [`crate::core::repair::repair_decimal_fields`].
#[must_use]
pub fn stored_decimal(raw: &str, field: &str, row_id: i64) -> Decimal {
    match parse_stored(raw) {
        Some(value) => to_money(value),
        None => {
            warn!(field, row_id, raw, "Corrupt stored decimal, treating as zero");
            to_money(Decimal::ZERO)
        }
    }
}

/// Whether a stored amount parses cleanly and is not negative.
#[must_use]
pub fn is_well_formed(raw: &str) -> bool {
    parse_stored(raw).is_some()
}

// Stored amounts are prices, totals and estimates, none of which may go below zero
fn parse_stored(raw: &str) -> Option<Decimal> {
    parse_decimal(raw).ok().filter(|value| *value >= Decimal::ZERO)
}
