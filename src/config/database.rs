//! Database configuration module.
//!
//! This module handles `SQLite` database connection and table creation using `SeaORM`.
//! Tables are generated from the entity definitions with `Schema::create_table_from_entity`,
//! parents before children. The composite "one row per (user, product)" rules can't be
//! expressed as entity attributes, so they are added as explicit unique indexes; the
//! insert-or-update paths in `core` rely on them as their conflict targets.

use crate::entities::{
    Budget, BudgetEstimate, Cart, Classification, Product, ProductReview, SelectedProduct, Shop,
    User, UserProfile, Wishlist, cart, product_review, selected_product, wishlist,
};
use crate::errors::Result;
use sea_orm::sea_query::{Index, IndexCreateStatement};
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};
use std::path::Path;
use tracing::{debug, info};

const DEFAULT_DATABASE_URL: &str = "sqlite://data/baytdesign.sqlite?mode=rwc";

/// Gets the database URL from the `DATABASE_URL` environment variable or returns the default `SQLite` path.
#[must_use]
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string())
}

/// Establishes a connection to the database named by [`get_database_url`].
///
/// For file-backed `SQLite` URLs the parent directory is created first, since
/// `mode=rwc` creates the file but not its directory.
pub async fn create_connection() -> Result<DatabaseConnection> {
    let database_url = get_database_url();
    if let Some(dir) = sqlite_parent_dir(&database_url) {
        std::fs::create_dir_all(dir)?;
    }
    debug!(%database_url, "Connecting to database");
    Database::connect(&database_url).await.map_err(Into::into)
}

/// Directory holding the database file of a `sqlite://` URL, if it has one.
fn sqlite_parent_dir(database_url: &str) -> Option<&Path> {
    let file = database_url.strip_prefix("sqlite://")?;
    let file = file.split('?').next().unwrap_or(file);
    Path::new(file)
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
}

/// Creates all tables and unique indexes if they do not already exist.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    // Parents first so foreign keys always point at an existing table
    let mut tables = vec![
        schema.create_table_from_entity(User),
        schema.create_table_from_entity(UserProfile),
        schema.create_table_from_entity(Classification),
        schema.create_table_from_entity(Shop),
        schema.create_table_from_entity(Product),
        schema.create_table_from_entity(Budget),
        schema.create_table_from_entity(SelectedProduct),
        schema.create_table_from_entity(Cart),
        schema.create_table_from_entity(Wishlist),
        schema.create_table_from_entity(ProductReview),
        schema.create_table_from_entity(BudgetEstimate),
    ];

    for table in &mut tables {
        table.if_not_exists();
        db.execute(builder.build(&*table)).await?;
    }

    for index in pair_indexes() {
        db.execute(builder.build(&index)).await?;
    }

    info!("Database schema is ready");
    Ok(())
}

/// Unique (user, product) indexes for every user-scoped collection.
fn pair_indexes() -> Vec<IndexCreateStatement> {
    vec![
        Index::create()
            .name("idx_cart_user_product")
            .table(Cart)
            .col(cart::Column::UserId)
            .col(cart::Column::ProductId)
            .unique()
            .if_not_exists()
            .to_owned(),
        Index::create()
            .name("idx_wishlist_user_product")
            .table(Wishlist)
            .col(wishlist::Column::UserId)
            .col(wishlist::Column::ProductId)
            .unique()
            .if_not_exists()
            .to_owned(),
        Index::create()
            .name("idx_review_user_product")
            .table(ProductReview)
            .col(product_review::Column::UserId)
            .col(product_review::Column::ProductId)
            .unique()
            .if_not_exists()
            .to_owned(),
        Index::create()
            .name("idx_selected_user_product")
            .table(SelectedProduct)
            .col(selected_product::Column::UserId)
            .col(selected_product::Column::ProductId)
            .unique()
            .if_not_exists()
            .to_owned(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{
        budget::Model as BudgetModel, cart::Model as CartModel,
        classification::Model as ClassificationModel, product::Model as ProductModel,
        user::Model as UserModel,
    };
    use sea_orm::{EntityTrait, QuerySelect};

    #[tokio::test]
    async fn test_create_tables() -> Result<()> {
        let db = Database::connect("sqlite::memory:").await?;
        create_tables(&db).await?;

        // Test that tables exist by querying them
        let _: Vec<UserModel> = User::find().limit(1).all(&db).await?;
        let _: Vec<ClassificationModel> = Classification::find().limit(1).all(&db).await?;
        let _: Vec<ProductModel> = Product::find().limit(1).all(&db).await?;
        let _: Vec<BudgetModel> = Budget::find().limit(1).all(&db).await?;
        let _: Vec<CartModel> = Cart::find().limit(1).all(&db).await?;

        Ok(())
    }

    #[tokio::test]
    async fn test_create_tables_is_idempotent() -> Result<()> {
        let db = Database::connect("sqlite::memory:").await?;
        create_tables(&db).await?;
        create_tables(&db).await?;
        Ok(())
    }

    #[test]
    fn test_default_database_url_is_sqlite() {
        if std::env::var("DATABASE_URL").is_err() {
            assert!(get_database_url().starts_with("sqlite://"));
        }
    }

    #[test]
    fn test_sqlite_parent_dir() {
        assert_eq!(
            sqlite_parent_dir("sqlite://data/baytdesign.sqlite?mode=rwc"),
            Some(Path::new("data"))
        );
        assert_eq!(sqlite_parent_dir("sqlite://local.sqlite"), None);
        assert_eq!(sqlite_parent_dir("sqlite::memory:"), None);
    }
}
