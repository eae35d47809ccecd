//! Product business logic - Handles all product-related operations.
//!
//! This module provides functions for creating, retrieving, updating, and deleting products
//! within a shop. Prices are validated once when the product details are built and stored
//! in two-place form. Deleting a product also removes every cart, wishlist, budget
//! selection and review that referenced it.

use crate::{
    core::{
        money::{parse_decimal, to_stored, validate_money},
        non_blank, required_name,
        shop::get_shop_by_id,
    },
    entities::{
        Cart, Product, ProductReview, SelectedProduct, Wishlist, cart, product, product_review,
        selected_product, wishlist,
    },
    errors::{Error, Result},
};
use rust_decimal::Decimal;
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use tracing::info;

/// Validated product fields, used for both create and update.
#[derive(Debug, Clone)]
pub struct ProductDetails {
    name: String,
    price: Decimal,
    description: Option<String>,
    is_available: bool,
}

impl ProductDetails {
    /// Validates product fields.
    ///
    /// # Errors
    /// Returns an error if:
    /// - The product name is empty or whitespace-only
    /// - The price is negative, has more than two decimal places, or is too large
    pub fn new(
        name: &str,
        price: Decimal,
        description: Option<String>,
        is_available: bool,
    ) -> Result<Self> {
        Ok(Self {
            name: required_name(name, "Product")?,
            price: validate_money(price)?,
            description: non_blank(description),
            is_available,
        })
    }

    /// Like [`ProductDetails::new`] but with the price as submitted text.
    ///
    /// # Errors
    /// Also returns [`Error::InvalidDecimal`] when the price text is not a number.
    pub fn parse(
        name: &str,
        raw_price: &str,
        description: Option<String>,
        is_available: bool,
    ) -> Result<Self> {
        Self::new(name, parse_decimal(raw_price)?, description, is_available)
    }

    /// The validated price
    #[must_use]
    pub const fn price(&self) -> Decimal {
        self.price
    }
}

/// Retrieves a specific product by its unique ID.
pub async fn get_product_by_id<C>(db: &C, product_id: i64) -> Result<Option<product::Model>>
where
    C: ConnectionTrait,
{
    Product::find_by_id(product_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Retrieves a product or fails with [`Error::ProductNotFound`].
pub async fn require_product<C>(db: &C, product_id: i64) -> Result<product::Model>
where
    C: ConnectionTrait,
{
    get_product_by_id(db, product_id)
        .await?
        .ok_or(Error::ProductNotFound { id: product_id })
}

/// Lists every product of a shop, alphabetically.
pub async fn list_products_for_shop(
    db: &DatabaseConnection,
    shop_id: i64,
) -> Result<Vec<product::Model>> {
    Product::find()
        .filter(product::Column::ShopId.eq(shop_id))
        .order_by_asc(product::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Lists the products a shop currently offers, alphabetically.
pub async fn list_available_products_for_shop(
    db: &DatabaseConnection,
    shop_id: i64,
) -> Result<Vec<product::Model>> {
    Product::find()
        .filter(product::Column::ShopId.eq(shop_id))
        .filter(product::Column::IsAvailable.eq(true))
        .order_by_asc(product::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Creates a product in a shop.
///
/// # Errors
/// Returns [`Error::ShopNotFound`] if the shop does not exist, or a database error.
pub async fn create_product<C>(
    db: &C,
    shop_id: i64,
    details: ProductDetails,
) -> Result<product::Model>
where
    C: ConnectionTrait,
{
    get_shop_by_id(db, shop_id)
        .await?
        .ok_or(Error::ShopNotFound { id: shop_id })?;

    let created = product::ActiveModel {
        shop_id: Set(shop_id),
        name: Set(details.name),
        price: Set(to_stored(details.price)),
        description: Set(details.description),
        is_available: Set(details.is_available),
        ..Default::default()
    }
    .insert(db)
    .await?;

    info!(product_id = created.id, shop_id, price = %created.price, "Created product");
    Ok(created)
}

/// Replaces a product's name, price, description and availability.
///
/// # Errors
/// Returns [`Error::ProductNotFound`] if the product does not exist.
pub async fn update_product(
    db: &DatabaseConnection,
    product_id: i64,
    details: ProductDetails,
) -> Result<product::Model> {
    let mut model: product::ActiveModel = require_product(db, product_id).await?.into();

    model.name = Set(details.name);
    model.price = Set(to_stored(details.price));
    model.description = Set(details.description);
    model.is_available = Set(details.is_available);

    model.update(db).await.map_err(Into::into)
}

/// Marks a product as available or unavailable.
pub async fn set_product_availability(
    db: &DatabaseConnection,
    product_id: i64,
    is_available: bool,
) -> Result<product::Model> {
    let mut model: product::ActiveModel = require_product(db, product_id).await?.into();
    model.is_available = Set(is_available);
    model.update(db).await.map_err(Into::into)
}

/// Deletes a product and every row that referenced it.
///
/// # Errors
/// Returns [`Error::ProductNotFound`] if the product does not exist.
pub async fn delete_product(db: &DatabaseConnection, product_id: i64) -> Result<()> {
    let txn = db.begin().await?;
    require_product(&txn, product_id).await?;
    delete_products_cascade(&txn, &[product_id]).await?;
    txn.commit().await?;

    info!(product_id, "Deleted product");
    Ok(())
}

/// Deletes products along with their budget selections, cart and wishlist rows, and
/// reviews. Callers run this inside their own transaction. Returns products removed.
pub(crate) async fn delete_products_cascade<C>(db: &C, product_ids: &[i64]) -> Result<u64>
where
    C: ConnectionTrait,
{
    if product_ids.is_empty() {
        return Ok(0);
    }
    let ids = || product_ids.iter().copied();

    SelectedProduct::delete_many()
        .filter(selected_product::Column::ProductId.is_in(ids()))
        .exec(db)
        .await?;
    Cart::delete_many()
        .filter(cart::Column::ProductId.is_in(ids()))
        .exec(db)
        .await?;
    Wishlist::delete_many()
        .filter(wishlist::Column::ProductId.is_in(ids()))
        .exec(db)
        .await?;
    ProductReview::delete_many()
        .filter(product_review::Column::ProductId.is_in(ids()))
        .exec(db)
        .await?;

    let deleted = Product::delete_many()
        .filter(product::Column::Id.is_in(ids()))
        .exec(db)
        .await?;
    Ok(deleted.rows_affected)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::core::{budget, cart as cart_ops, review, wishlist as wishlist_ops};
    use crate::entities::shop;
    use crate::test_utils::*;
    use sea_orm::{DatabaseBackend, MockDatabase, PaginatorTrait};
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_product_details_validation() {
        // Test empty name validation
        let result = ProductDetails::new("", dec("10"), None, true);
        assert!(matches!(result.unwrap_err(), Error::Validation { message: _ }));

        // Test whitespace-only name validation
        let result = ProductDetails::new("   ", dec("10"), None, true);
        assert!(matches!(result.unwrap_err(), Error::Validation { message: _ }));

        // Test negative price validation
        let result = ProductDetails::new("Test Product", dec("-10"), None, true);
        assert!(matches!(result.unwrap_err(), Error::InvalidAmount { .. }));

        // Test sub-cent price validation
        let result = ProductDetails::new("Test Product", dec("9.999"), None, true);
        assert!(matches!(result.unwrap_err(), Error::InvalidAmount { .. }));

        // Test malformed price text
        let result = ProductDetails::parse("Test Product", "ten", None, true);
        assert!(matches!(result.unwrap_err(), Error::InvalidDecimal { .. }));

        let details = ProductDetails::parse("Test Chair", "99.9", None, true).unwrap();
        assert_eq!(details.price().to_string(), "99.90");
    }

    #[tokio::test]
    async fn test_create_product_unknown_shop() -> Result<()> {
        let db = MockDatabase::new(DatabaseBackend::Sqlite)
            .append_query_results([Vec::<shop::Model>::new()])
            .into_connection();

        let result = create_product(&db, 999, ProductDetails::new("Chair", dec("1"), None, true)?).await;
        assert!(matches!(result, Err(Error::ShopNotFound { id: 999 })));
        Ok(())
    }

    #[tokio::test]
    async fn test_create_product_integration() -> Result<()> {
        let (db, _classification, shop) = setup_with_shop().await?;

        let product = create_product(
            &db,
            shop.id,
            ProductDetails::new(
                "Test Chair",
                dec("99.99"),
                Some("A comfortable chair".to_string()),
                true,
            )?,
        )
        .await?;

        assert_eq!(product.name, "Test Chair");
        assert_eq!(product.price, "99.99");
        assert_eq!(product.unit_price(), dec("99.99"));
        assert_eq!(product.shop_id, shop.id);
        assert!(product.is_available);

        Ok(())
    }

    #[tokio::test]
    async fn test_whole_number_price_stored_with_two_places() -> Result<()> {
        let (db, _classification, shop) = setup_with_shop().await?;
        let product = create_custom_product(&db, "Primer", "25", shop.id).await?;
        assert_eq!(product.price, "25.00");

        let reloaded = require_product(&db, product.id).await?;
        assert_eq!(reloaded.unit_price().to_string(), "25.00");
        Ok(())
    }

    #[tokio::test]
    async fn test_list_products_for_shop() -> Result<()> {
        let (db, _classification, shop) = setup_with_shop().await?;

        let table = create_custom_product(&db, "Test Table", "199.99", shop.id).await?;
        let chair = create_custom_product(&db, "Test Chair", "99.99", shop.id).await?;
        set_product_availability(&db, table.id, false).await?;

        let all = list_products_for_shop(&db, shop.id).await?;
        assert_eq!(all.len(), 2);
        assert_eq!(all[0], chair);

        let available = list_available_products_for_shop(&db, shop.id).await?;
        assert_eq!(available, vec![chair]);
        Ok(())
    }

    #[tokio::test]
    async fn test_update_product_integration() -> Result<()> {
        let (db, _classification, _shop, product) = setup_with_product().await?;

        let updated = update_product(
            &db,
            product.id,
            ProductDetails::new("Updated Name", dec("15"), None, false)?,
        )
        .await?;

        assert_eq!(updated.name, "Updated Name");
        assert_eq!(updated.price, "15.00");
        assert!(!updated.is_available);

        // Verify the update persisted
        let retrieved = Product::find_by_id(product.id).one(&db).await?.unwrap();
        assert_eq!(retrieved, updated);

        let missing = update_product(&db, 999, ProductDetails::new("X", dec("1"), None, true)?).await;
        assert!(matches!(missing, Err(Error::ProductNotFound { id: 999 })));
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_product_removes_user_rows() -> Result<()> {
        let (db, _classification, shop, product) = setup_with_product().await?;
        let keep = create_test_product(&db, "Keep Me", shop.id).await?;
        let user = create_test_user(&db, "frank").await?;

        budget::add_to_budget(&db, user.id, product.id).await?;
        cart_ops::add_to_cart(&db, user.id, product.id).await?;
        cart_ops::add_to_cart(&db, user.id, keep.id).await?;
        wishlist_ops::add_to_wishlist(&db, user.id, product.id).await?;
        review::submit_review(&db, user.id, product.id, review::ReviewInput::new(3, None)?).await?;

        delete_product(&db, product.id).await?;

        assert!(get_product_by_id(&db, product.id).await?.is_none());
        assert_eq!(SelectedProduct::find().count(&db).await?, 0);
        assert_eq!(Wishlist::find().count(&db).await?, 0);
        assert_eq!(ProductReview::find().count(&db).await?, 0);
        let remaining_cart = Cart::find().all(&db).await?;
        assert_eq!(remaining_cart.len(), 1);
        assert_eq!(remaining_cart[0].product_id, keep.id);
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_product_not_found() -> Result<()> {
        let db = setup_test_db().await?;

        let result = delete_product(&db, 999).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::ProductNotFound { id: _ }
        ));

        Ok(())
    }
}
