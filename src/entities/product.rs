//! Product entity - An item a shop sells at a fixed price.
//!
//! The price is kept as canonical two-place decimal text (e.g. `"99.99"`). `SQLite` has no
//! exact decimal column type, so storing text keeps prices exact; use
//! [`Model::unit_price`] to read it as a `Decimal`.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Product database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "products")]
pub struct Model {
    /// Unique identifier for the product
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Owning shop
    pub shop_id: i64,
    /// Product name
    pub name: String,
    /// Unit price as two-place decimal text
    pub price: String,
    /// Optional description
    pub description: Option<String>,
    /// Whether the shop currently offers the product
    pub is_available: bool,
}

impl Model {
    /// Unit price as a decimal. Malformed stored text reads as zero.
    #[must_use]
    pub fn unit_price(&self) -> rust_decimal::Decimal {
        crate::core::money::stored_decimal(&self.price, "products.price", self.id)
    }
}

/// Defines relationships between Product and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each product belongs to one shop
    #[sea_orm(
        belongs_to = "super::shop::Entity",
        from = "Column::ShopId",
        to = "super::shop::Column::Id",
        on_delete = "Cascade"
    )]
    Shop,
    /// One product has many reviews
    #[sea_orm(has_many = "super::product_review::Entity")]
    Reviews,
}

impl Related<super::shop::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Shop.def()
    }
}

impl Related<super::product_review::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Reviews.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
