//! Classification business logic - the top level of the catalog.
//!
//! Provides slug derivation, creation with slug uniqueness, lookups by id and slug,
//! updates, and the cascading delete that removes the classification's shops and
//! their products.

use crate::{
    core::{non_blank, product::delete_products_cascade, required_name},
    entities::{Classification, Product, Shop, classification, product, shop},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, QuerySelect, Set, TransactionTrait, prelude::*};
use tracing::info;

/// Derives a URL slug from a name.
///
/// Lowercases ASCII letters and digits and collapses every run of other characters
/// into a single `-`, trimming separators from both ends. `"Ceiling & Gypsum"`
/// becomes `"ceiling-gypsum"`.
#[must_use]
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_separator = false;

    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_separator && !slug.is_empty() {
                slug.push('-');
            }
            pending_separator = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_separator = true;
        }
    }

    slug
}

/// Validated input for a classification.
#[derive(Debug, Clone)]
pub struct NewClassification {
    name: String,
    slug: String,
    icon: Option<String>,
    description: Option<String>,
}

impl NewClassification {
    /// Validates the fields, deriving the slug from the name when none is supplied.
    /// A supplied slug is normalised the same way.
    ///
    /// # Errors
    /// Returns [`Error::Validation`] if the name is empty or no usable slug results.
    pub fn new(
        name: &str,
        slug: Option<&str>,
        icon: Option<String>,
        description: Option<String>,
    ) -> Result<Self> {
        let name = required_name(name, "Classification")?;

        let slug = slugify(slug.filter(|s| !s.trim().is_empty()).unwrap_or(&name));
        if slug.is_empty() {
            return Err(Error::Validation {
                message: format!("Cannot derive a slug from '{name}'"),
            });
        }

        Ok(Self {
            name,
            slug,
            icon: non_blank(icon),
            description: non_blank(description),
        })
    }

    /// The slug this classification will be stored under.
    #[must_use]
    pub fn slug(&self) -> &str {
        &self.slug
    }
}

/// Creates a classification.
///
/// # Errors
/// Returns [`Error::DuplicateSlug`] if another classification already uses the slug.
pub async fn create_classification<C>(
    db: &C,
    input: NewClassification,
) -> Result<classification::Model>
where
    C: ConnectionTrait,
{
    if get_classification_by_slug(db, &input.slug).await?.is_some() {
        return Err(Error::DuplicateSlug { slug: input.slug });
    }

    let created = classification::ActiveModel {
        name: Set(input.name),
        slug: Set(input.slug),
        icon: Set(input.icon),
        description: Set(input.description),
        ..Default::default()
    }
    .insert(db)
    .await?;

    info!(classification_id = created.id, slug = %created.slug, "Created classification");
    Ok(created)
}

/// Retrieves a classification by id.
pub async fn get_classification_by_id<C>(
    db: &C,
    classification_id: i64,
) -> Result<Option<classification::Model>>
where
    C: ConnectionTrait,
{
    Classification::find_by_id(classification_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Retrieves a classification by slug.
pub async fn get_classification_by_slug<C>(
    db: &C,
    slug: &str,
) -> Result<Option<classification::Model>>
where
    C: ConnectionTrait,
{
    Classification::find()
        .filter(classification::Column::Slug.eq(slug))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Lists all classifications alphabetically.
pub async fn list_classifications(db: &DatabaseConnection) -> Result<Vec<classification::Model>> {
    Classification::find()
        .order_by_asc(classification::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Updates name, icon and description. The slug is kept so existing links stay valid.
pub async fn update_classification(
    db: &DatabaseConnection,
    classification_id: i64,
    name: &str,
    icon: Option<String>,
    description: Option<String>,
) -> Result<classification::Model> {
    let name = required_name(name, "Classification")?;

    let mut model: classification::ActiveModel = get_classification_by_id(db, classification_id)
        .await?
        .ok_or_else(|| Error::ClassificationNotFound {
            key: classification_id.to_string(),
        })?
        .into();

    model.name = Set(name);
    model.icon = Set(non_blank(icon));
    model.description = Set(non_blank(description));
    model.update(db).await.map_err(Into::into)
}

/// What a cascading catalog delete removed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CascadeReport {
    /// Shops removed
    pub shops_deleted: u64,
    /// Products removed
    pub products_deleted: u64,
}

/// Deletes a classification, its shops, their products, and every cart, wishlist,
/// budget and review row that referenced those products.
///
/// # Errors
/// Returns [`Error::ClassificationNotFound`] if the classification does not exist.
pub async fn delete_classification(
    db: &DatabaseConnection,
    classification_id: i64,
) -> Result<CascadeReport> {
    let txn = db.begin().await?;

    let found = get_classification_by_id(&txn, classification_id)
        .await?
        .ok_or_else(|| Error::ClassificationNotFound {
            key: classification_id.to_string(),
        })?;

    let shop_ids: Vec<i64> = Shop::find()
        .select_only()
        .column(shop::Column::Id)
        .filter(shop::Column::ClassificationId.eq(classification_id))
        .into_tuple()
        .all(&txn)
        .await?;

    let product_ids: Vec<i64> = Product::find()
        .select_only()
        .column(product::Column::Id)
        .filter(product::Column::ShopId.is_in(shop_ids.iter().copied()))
        .into_tuple()
        .all(&txn)
        .await?;

    let products_deleted = delete_products_cascade(&txn, &product_ids).await?;
    let shops_deleted = Shop::delete_many()
        .filter(shop::Column::ClassificationId.eq(classification_id))
        .exec(&txn)
        .await?
        .rows_affected;
    found.delete(&txn).await?;

    txn.commit().await?;

    info!(
        classification_id,
        shops_deleted, products_deleted, "Deleted classification"
    );
    Ok(CascadeReport {
        shops_deleted,
        products_deleted,
    })
}
