//! Unified error type for the catalog and budgeting data layer.
//!
//! Variants follow the failure classes callers need to tell apart: validation
//! failures (bad decimals, quantities, ratings, names), not-found lookups, and
//! uniqueness conflicts. Storage failures are wrapped from `DbErr`.

use rust_decimal::Decimal;
use thiserror::Error;

/// Every error the crate can surface.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration could not be loaded or is invalid
    #[error("Configuration error: {message}")]
    Config {
        /// Human-readable reason
        message: String,
    },

    /// Underlying database failure
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Input that was supposed to be a decimal number could not be parsed
    #[error("'{input}' is not a valid amount. Enter a number such as 250 or 99.99")]
    InvalidDecimal {
        /// The raw input as received
        input: String,
    },

    /// A decimal amount that parsed but is out of range (negative, too precise, too large)
    #[error("Invalid amount: {amount} ({reason})")]
    InvalidAmount {
        /// The offending amount
        amount: Decimal,
        /// Which rule it broke
        reason: &'static str,
    },

    /// Quantity below zero
    #[error("Invalid quantity: {quantity}")]
    InvalidQuantity {
        /// The offending quantity
        quantity: i32,
    },

    /// Review rating outside 1-5
    #[error("Rating must be between 1 and 5, got {rating}")]
    InvalidRating {
        /// The offending rating
        rating: i32,
    },

    /// Generic field validation (empty names, unusable slugs)
    #[error("Validation error: {message}")]
    Validation {
        /// Human-readable reason
        message: String,
    },

    /// Classification lookup failed
    #[error("Classification not found: {key}")]
    ClassificationNotFound {
        /// Id or slug that was looked up
        key: String,
    },

    /// Shop lookup failed
    #[error("Shop not found: {id}")]
    ShopNotFound {
        /// Shop id
        id: i64,
    },

    /// Product lookup failed
    #[error("Product not found: {id}")]
    ProductNotFound {
        /// Product id
        id: i64,
    },

    /// User lookup failed
    #[error("User not found: {id}")]
    UserNotFound {
        /// User id
        id: i64,
    },

    /// A user-scoped row (cart item, wishlist item, review, ...) does not exist for this user
    #[error("{kind} {id} not found for user {user_id}")]
    ItemNotFound {
        /// Row kind, e.g. `"cart item"`
        kind: &'static str,
        /// Row id
        id: i64,
        /// Owning user id that was checked
        user_id: i64,
    },

    /// Classification slug already taken
    #[error("Slug already in use: {slug}")]
    DuplicateSlug {
        /// The conflicting slug
        slug: String,
    },

    /// Username already taken
    #[error("Username already taken: {username}")]
    DuplicateUsername {
        /// The conflicting username
        username: String,
    },

    /// I/O failure (config file reads)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Environment variable failure
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
