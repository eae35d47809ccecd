//! Shared test utilities for `baytdesign`.
//!
//! This module provides common helper functions for setting up test databases
//! and creating catalog and user fixtures with sensible defaults.

use crate::{
    core::{
        classification::{self, NewClassification},
        product::{self, ProductDetails},
        shop::{self, ShopDetails},
        user::{self, NewUser},
    },
    entities,
    errors::Result,
};
use sea_orm::DatabaseConnection;
use std::path::{Path, PathBuf};

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Creates a file-backed `SQLite` database under the temp dir with all tables initialized.
///
/// Unlike the in-memory setup this one hands out several pooled connections, so
/// concurrent tasks really do race each other. `label` keeps file names readable.
/// Pair with [`remove_file_test_db`].
pub async fn setup_file_test_db(label: &str) -> Result<(DatabaseConnection, PathBuf)> {
    let stamp = chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default();
    let path = std::env::temp_dir().join(format!(
        "baytdesign-{label}-{}-{stamp}.sqlite",
        std::process::id()
    ));
    let url = format!("sqlite://{}?mode=rwc", path.display());

    let db = sea_orm::Database::connect(url.as_str()).await?;
    crate::config::database::create_tables(&db).await?;
    Ok((db, path))
}

/// Closes a database from [`setup_file_test_db`] and deletes its files.
pub async fn remove_file_test_db(db: DatabaseConnection, path: &Path) {
    let _ = db.close().await;
    for suffix in ["", "-wal", "-shm", "-journal"] {
        let mut file = path.as_os_str().to_owned();
        file.push(suffix);
        let _ = std::fs::remove_file(file);
    }
}

/// Creates a test user (with profile) named `username`.
pub async fn create_test_user(
    db: &DatabaseConnection,
    username: &str,
) -> Result<entities::user::Model> {
    user::create_user(db, NewUser::new(username, None, None, None)?).await
}

/// Creates a test classification; the slug is derived from the name.
pub async fn create_test_classification(
    db: &DatabaseConnection,
    name: &str,
) -> Result<entities::classification::Model> {
    classification::create_classification(db, NewClassification::new(name, None, None, None)?)
        .await
}

/// Creates a test shop with only a name.
pub async fn create_test_shop(
    db: &DatabaseConnection,
    name: &str,
    classification_id: i64,
) -> Result<entities::shop::Model> {
    shop::create_shop(db, classification_id, ShopDetails::named(name)?).await
}

/// Creates a test product with sensible defaults.
///
/// # Defaults
/// * price: 10.00
/// * available: true
pub async fn create_test_product(
    db: &DatabaseConnection,
    name: &str,
    shop_id: i64,
) -> Result<entities::product::Model> {
    create_custom_product(db, name, "10.00", shop_id).await
}

/// Creates an available test product with a custom price given as text.
pub async fn create_custom_product(
    db: &DatabaseConnection,
    name: &str,
    price: &str,
    shop_id: i64,
) -> Result<entities::product::Model> {
    product::create_product(db, shop_id, ProductDetails::parse(name, price, None, true)?).await
}

/// Sets up a test environment with one classification.
/// Returns (db, classification).
pub async fn setup_with_classification()
-> Result<(DatabaseConnection, entities::classification::Model)> {
    let db = setup_test_db().await?;
    let classification = create_test_classification(&db, "Test Classification").await?;
    Ok((db, classification))
}

/// Sets up a test environment with a classification and a shop.
/// Returns (db, classification, shop).
pub async fn setup_with_shop() -> Result<(
    DatabaseConnection,
    entities::classification::Model,
    entities::shop::Model,
)> {
    let (db, classification) = setup_with_classification().await?;
    let shop = create_test_shop(&db, "Test Shop", classification.id).await?;
    Ok((db, classification, shop))
}

/// Sets up a complete catalog chain down to one product.
/// Returns (db, classification, shop, product) for product-related tests.
pub async fn setup_with_product() -> Result<(
    DatabaseConnection,
    entities::classification::Model,
    entities::shop::Model,
    entities::product::Model,
)> {
    let (db, classification, shop) = setup_with_shop().await?;
    let product = create_test_product(&db, "Test Product", shop.id).await?;
    Ok((db, classification, shop, product))
}
