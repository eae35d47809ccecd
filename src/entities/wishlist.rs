//! Wishlist entity - A product saved for later, with a purchased toggle.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Wishlist item database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "wishlist")]
pub struct Model {
    /// Unique identifier for the wishlist item
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Owning user
    pub user_id: i64,
    /// Saved product
    pub product_id: i64,
    /// When the product was saved
    pub added_at: DateTimeUtc,
    /// Whether the user has marked it as bought
    pub is_purchased: bool,
}

/// Defines relationships between Wishlist and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each wishlist item references one product
    #[sea_orm(
        belongs_to = "super::product::Entity",
        from = "Column::ProductId",
        to = "super::product::Column::Id",
        on_delete = "Cascade"
    )]
    Product,
    /// Each wishlist item belongs to one user
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Product.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
