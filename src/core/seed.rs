//! Starter catalog seeding from the config file.
//!
//! Seeding is idempotent: every classification, shop and product is looked up by name
//! (shops within their classification, products within their shop) and only created
//! when missing, so it is safe to run on every startup. Entries whose parent cannot be
//! found or whose fields do not validate are logged and skipped.

use crate::{
    config::catalog::{CatalogSeed, ClassificationSeed, ProductSeed, ShopSeed},
    core::{
        classification::{NewClassification, create_classification},
        product::{ProductDetails, create_product},
        shop::{ShopDetails, create_shop},
    },
    entities::{Classification, Product, Shop, classification, product, shop},
    errors::{Error, Result},
};
use sea_orm::{DatabaseTransaction, TransactionTrait, prelude::*};
use tracing::{info, warn};

/// What a seeding run changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    /// Classifications inserted
    pub classifications_created: usize,
    /// Shops inserted
    pub shops_created: usize,
    /// Products inserted
    pub products_created: usize,
    /// Entries skipped because of a missing parent or invalid field
    pub skipped: usize,
}

/// Ensures every seeded classification, shop and product exists. Runs in one transaction.
pub async fn seed_catalog(db: &DatabaseConnection, seed: &CatalogSeed) -> Result<SeedReport> {
    let txn = db.begin().await?;
    let mut report = SeedReport::default();

    for entry in &seed.classifications {
        match seed_classification(&txn, entry).await {
            Ok(true) => report.classifications_created += 1,
            Ok(false) => {}
            Err(e @ Error::Database(_)) => return Err(e),
            Err(e) => {
                warn!(classification = %entry.name, error = %e, "Skipping seed classification");
                report.skipped += 1;
            }
        }
    }

    for entry in &seed.shops {
        match seed_shop(&txn, entry).await {
            Ok(true) => report.shops_created += 1,
            Ok(false) => {}
            Err(e @ Error::Database(_)) => return Err(e),
            Err(e) => {
                warn!(shop = %entry.name, error = %e, "Skipping seed shop");
                report.skipped += 1;
            }
        }
    }

    for entry in &seed.products {
        match seed_product(&txn, entry).await {
            Ok(true) => report.products_created += 1,
            Ok(false) => {}
            Err(e @ Error::Database(_)) => return Err(e),
            Err(e) => {
                warn!(product = %entry.name, error = %e, "Skipping seed product");
                report.skipped += 1;
            }
        }
    }

    txn.commit().await?;

    info!(
        classifications = report.classifications_created,
        shops = report.shops_created,
        products = report.products_created,
        skipped = report.skipped,
        "Catalog seeding finished"
    );
    Ok(report)
}

async fn find_classification_by_name(
    txn: &DatabaseTransaction,
    name: &str,
) -> Result<Option<classification::Model>> {
    Classification::find()
        .filter(classification::Column::Name.eq(name.trim()))
        .one(txn)
        .await
        .map_err(Into::into)
}

async fn seed_classification(txn: &DatabaseTransaction, entry: &ClassificationSeed) -> Result<bool> {
    if find_classification_by_name(txn, &entry.name).await?.is_some() {
        return Ok(false);
    }

    let input = NewClassification::new(
        &entry.name,
        None,
        entry.icon.clone(),
        entry.description.clone(),
    )?;
    create_classification(txn, input).await?;
    Ok(true)
}

async fn seed_shop(txn: &DatabaseTransaction, entry: &ShopSeed) -> Result<bool> {
    let parent = find_classification_by_name(txn, &entry.classification)
        .await?
        .ok_or_else(|| Error::ClassificationNotFound {
            key: entry.classification.clone(),
        })?;

    let existing = Shop::find()
        .filter(shop::Column::ClassificationId.eq(parent.id))
        .filter(shop::Column::Name.eq(entry.name.trim()))
        .one(txn)
        .await?;
    if existing.is_some() {
        return Ok(false);
    }

    let details = ShopDetails::new(
        &entry.name,
        entry.description.clone(),
        entry.phone.clone(),
        entry.email.clone(),
        entry.address.clone(),
    )?;
    create_shop(txn, parent.id, details).await?;
    Ok(true)
}

async fn seed_product(txn: &DatabaseTransaction, entry: &ProductSeed) -> Result<bool> {
    let parent = Shop::find()
        .filter(shop::Column::Name.eq(entry.shop.trim()))
        .one(txn)
        .await?
        .ok_or_else(|| Error::Validation {
            message: format!("unknown shop '{}'", entry.shop),
        })?;

    let existing = Product::find()
        .filter(product::Column::ShopId.eq(parent.id))
        .filter(product::Column::Name.eq(entry.name.trim()))
        .one(txn)
        .await?;
    if existing.is_some() {
        return Ok(false);
    }

    let details = ProductDetails::parse(
        &entry.name,
        &entry.price,
        entry.description.clone(),
        entry.is_available,
    )?;
    create_product(txn, parent.id, details).await?;
    Ok(true)
}
