//! Shop business logic - vendors listed under a classification.

use crate::{
    core::{
        classification::{get_classification_by_id, get_classification_by_slug},
        non_blank,
        product::delete_products_cascade,
        required_name,
    },
    entities::{Product, Shop, classification, product, shop},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, QuerySelect, Set, TransactionTrait, prelude::*};
use tracing::info;

/// Validated shop fields, used for both create and update.
#[derive(Debug, Clone)]
pub struct ShopDetails {
    name: String,
    description: Option<String>,
    phone: Option<String>,
    email: Option<String>,
    address: Option<String>,
}

impl ShopDetails {
    /// Validates shop fields.
    ///
    /// # Errors
    /// Returns [`Error::Validation`] if the name is empty or the email has no `@`.
    pub fn new(
        name: &str,
        description: Option<String>,
        phone: Option<String>,
        email: Option<String>,
        address: Option<String>,
    ) -> Result<Self> {
        let name = required_name(name, "Shop")?;
        let email = non_blank(email);
        if let Some(address) = &email
            && !address.contains('@')
        {
            return Err(Error::Validation {
                message: format!("'{address}' is not an email address"),
            });
        }

        Ok(Self {
            name,
            description: non_blank(description),
            phone: non_blank(phone),
            email,
            address: non_blank(address),
        })
    }

    /// Shop fields with only a name.
    ///
    /// # Errors
    /// Returns [`Error::Validation`] if the name is empty.
    pub fn named(name: &str) -> Result<Self> {
        Self::new(name, None, None, None, None)
    }
}

/// Creates a shop under a classification.
///
/// # Errors
/// Returns [`Error::ClassificationNotFound`] if the classification does not exist.
pub async fn create_shop<C>(db: &C, classification_id: i64, details: ShopDetails) -> Result<shop::Model>
where
    C: ConnectionTrait,
{
    get_classification_by_id(db, classification_id)
        .await?
        .ok_or_else(|| Error::ClassificationNotFound {
            key: classification_id.to_string(),
        })?;

    let created = shop::ActiveModel {
        classification_id: Set(classification_id),
        name: Set(details.name),
        description: Set(details.description),
        phone: Set(details.phone),
        email: Set(details.email),
        address: Set(details.address),
        ..Default::default()
    }
    .insert(db)
    .await?;

    info!(shop_id = created.id, classification_id, name = %created.name, "Created shop");
    Ok(created)
}

/// Retrieves a shop by id.
pub async fn get_shop_by_id<C>(db: &C, shop_id: i64) -> Result<Option<shop::Model>>
where
    C: ConnectionTrait,
{
    Shop::find_by_id(shop_id).one(db).await.map_err(Into::into)
}

/// Lists a classification's shops alphabetically.
pub async fn list_shops_for_classification(
    db: &DatabaseConnection,
    classification_id: i64,
) -> Result<Vec<shop::Model>> {
    Shop::find()
        .filter(shop::Column::ClassificationId.eq(classification_id))
        .order_by_asc(shop::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Looks a classification up by slug and lists its shops.
///
/// # Errors
/// Returns [`Error::ClassificationNotFound`] for an unknown slug.
pub async fn list_shops_for_classification_slug(
    db: &DatabaseConnection,
    slug: &str,
) -> Result<(classification::Model, Vec<shop::Model>)> {
    let classification = get_classification_by_slug(db, slug)
        .await?
        .ok_or_else(|| Error::ClassificationNotFound {
            key: slug.to_string(),
        })?;
    let shops = list_shops_for_classification(db, classification.id).await?;
    Ok((classification, shops))
}

/// Replaces a shop's fields. The owning classification does not change.
pub async fn update_shop(
    db: &DatabaseConnection,
    shop_id: i64,
    details: ShopDetails,
) -> Result<shop::Model> {
    let mut model: shop::ActiveModel = get_shop_by_id(db, shop_id)
        .await?
        .ok_or(Error::ShopNotFound { id: shop_id })?
        .into();

    model.name = Set(details.name);
    model.description = Set(details.description);
    model.phone = Set(details.phone);
    model.email = Set(details.email);
    model.address = Set(details.address);
    model.update(db).await.map_err(Into::into)
}

/// Deletes a shop, its products, and every user row that referenced them.
/// Returns the number of products removed.
///
/// # Errors
/// Returns [`Error::ShopNotFound`] if the shop does not exist.
pub async fn delete_shop(db: &DatabaseConnection, shop_id: i64) -> Result<u64> {
    let txn = db.begin().await?;

    let found = get_shop_by_id(&txn, shop_id)
        .await?
        .ok_or(Error::ShopNotFound { id: shop_id })?;

    let product_ids: Vec<i64> = Product::find()
        .select_only()
        .column(product::Column::Id)
        .filter(product::Column::ShopId.eq(shop_id))
        .into_tuple()
        .all(&txn)
        .await?;

    let products_deleted = delete_products_cascade(&txn, &product_ids).await?;
    found.delete(&txn).await?;

    txn.commit().await?;

    info!(shop_id, products_deleted, "Deleted shop");
    Ok(products_deleted)
}
