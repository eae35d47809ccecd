//! Cart entity - A product the user intends to buy now.
//!
//! At most one row exists per (user, product); adding again bumps `quantity`.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Cart item database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "cart")]
pub struct Model {
    /// Unique identifier for the cart item
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Owning user
    pub user_id: i64,
    /// Product in the cart
    pub product_id: i64,
    /// Number of units, always at least 1
    pub quantity: i32,
    /// When the product first entered the cart
    pub added_at: DateTimeUtc,
}

/// Defines relationships between Cart and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each cart item references one product
    #[sea_orm(
        belongs_to = "super::product::Entity",
        from = "Column::ProductId",
        to = "super::product::Column::Id",
        on_delete = "Cascade"
    )]
    Product,
    /// Each cart item belongs to one user
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
