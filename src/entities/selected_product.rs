//! Selected product entity - A product the user planned against their budget.
//!
//! `user_id` duplicates `budget.user_id` so lookups and ownership checks stay single-table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Selected product database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "selected_products")]
pub struct Model {
    /// Unique identifier for the selection
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Budget this selection counts against
    pub budget_id: i64,
    /// Owning user
    pub user_id: i64,
    /// Selected product
    pub product_id: i64,
    /// Number of units, always at least 1
    pub quantity: i32,
}

/// Defines relationships between `SelectedProduct` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each selection belongs to one budget
    #[sea_orm(
        belongs_to = "super::budget::Entity",
        from = "Column::BudgetId",
        to = "super::budget::Column::Id",
        on_delete = "Cascade"
    )]
    Budget,
    /// Each selection references one product
    #[sea_orm(
        belongs_to = "super::product::Entity",
        from = "Column::ProductId",
        to = "super::product::Column::Id",
        on_delete = "Cascade"
    )]
    Product,
    /// Each selection belongs to one user
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::budget::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Budget.def()
    }
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
