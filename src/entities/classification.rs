//! Classification entity - Top-level product category (e.g., Furniture, Tiles).
//!
//! Each classification owns a set of shops. The slug is derived from the name when
//! not supplied and is unique across the catalog; it is what browse URLs use.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Classification database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "classifications")]
pub struct Model {
    /// Unique identifier for the classification
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Display name (e.g., "Lighting & Fixtures")
    pub name: String,
    /// URL-safe unique key (e.g., `"lighting-fixtures"`)
    #[sea_orm(unique)]
    pub slug: String,
    /// Optional emoji or short icon code
    pub icon: Option<String>,
    /// Optional free-text description
    pub description: Option<String>,
}

/// Defines relationships between Classification and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One classification has many shops
    #[sea_orm(has_many = "super::shop::Entity")]
    Shops,
}

impl Related<super::shop::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Shops.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
