//! Catalog seed data loading from the TOML config file.
//!
//! The `[[classifications]]`, `[[shops]]` and `[[products]]` arrays describe a starter
//! catalog. Shops name their classification and products name their shop, so the file
//! stays readable without ids. Seeding itself lives in [`crate::core::seed`].

use serde::Deserialize;

/// The seed part of the config file
#[derive(Debug, Default, Deserialize, Clone)]
pub struct CatalogSeed {
    /// Classifications to ensure exist
    #[serde(default)]
    pub classifications: Vec<ClassificationSeed>,
    /// Shops to ensure exist
    #[serde(default)]
    pub shops: Vec<ShopSeed>,
    /// Products to ensure exist
    #[serde(default)]
    pub products: Vec<ProductSeed>,
}

/// Configuration for a single classification
#[derive(Debug, Deserialize, Clone)]
pub struct ClassificationSeed {
    /// Display name, also the seed key
    pub name: String,
    /// Optional emoji/icon
    pub icon: Option<String>,
    /// Optional description
    pub description: Option<String>,
}

/// Configuration for a single shop
#[derive(Debug, Deserialize, Clone)]
pub struct ShopSeed {
    /// Shop name, also the seed key
    pub name: String,
    /// Name of the owning classification
    pub classification: String,
    /// Optional description
    pub description: Option<String>,
    /// Optional contact phone
    pub phone: Option<String>,
    /// Optional contact email
    pub email: Option<String>,
    /// Optional street address
    pub address: Option<String>,
}

/// Configuration for a single product
#[derive(Debug, Deserialize, Clone)]
pub struct ProductSeed {
    /// Product name, also the seed key
    pub name: String,
    /// Name of the owning shop
    pub shop: String,
    /// Price as decimal text, e.g. `"1200.00"`
    pub price: String,
    /// Optional description
    pub description: Option<String>,
    /// Defaults to available
    #[serde(default = "default_available")]
    pub is_available: bool,
}

const fn default_available() -> bool {
    true
}
