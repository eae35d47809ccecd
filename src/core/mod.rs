//! Core business logic - framework-agnostic catalog, budgeting and review operations.
//!
//! Every operation takes a database connection plus already-typed inputs and returns
//! entity models or derived values; rendering and request handling live elsewhere.

/// Budget get-or-create, total updates and product selections
pub mod budget;
/// Cart add/remove/update and the cart overview
pub mod cart;
/// Classifications and slugs
pub mod classification;
/// Saved cost estimates
pub mod estimate;
/// Decimal parsing, validation and storage form
pub mod money;
/// Products
pub mod product;
/// Display helpers for amounts and progress
pub mod report;
/// Rewriting corrupt stored amounts
pub mod repair;
/// Reviews and average ratings
pub mod review;
/// Starter catalog seeding
pub mod seed;
/// Shops
pub mod shop;
/// Budget and cart totals
pub mod summary;
/// Users and profiles
pub mod user;
/// Wishlist add/remove/toggle
pub mod wishlist;

use crate::errors::{Error, Result};

/// Trims optional free text, mapping blank values to `None`.
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Trims a required name, rejecting blank input.
pub(crate) fn required_name(name: &str, kind: &str) -> Result<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(Error::Validation {
            message: format!("{kind} name cannot be empty"),
        });
    }
    Ok(trimmed.to_string())
}
