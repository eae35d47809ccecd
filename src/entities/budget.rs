//! Budget entity - A user's single declared spending ceiling.
//!
//! There is at most one budget per user; it is created lazily with a zero total.
//! Like product prices, the total is stored as two-place decimal text.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Budget database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "budgets")]
pub struct Model {
    /// Unique identifier for the budget
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Owning user, one budget per user
    #[sea_orm(unique)]
    pub user_id: i64,
    /// Spending ceiling as two-place decimal text
    pub total: String,
    /// When the budget was first created
    pub created_at: DateTimeUtc,
}

impl Model {
    /// Spending ceiling as a decimal. Malformed stored text reads as zero.
    #[must_use]
    pub fn total_amount(&self) -> rust_decimal::Decimal {
        crate::core::money::stored_decimal(&self.total, "budgets.total", self.id)
    }
}

/// Defines relationships between Budget and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each budget belongs to one user
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    User,
    /// Products selected against this budget
    #[sea_orm(has_many = "super::selected_product::Entity")]
    SelectedProducts,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::selected_product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SelectedProducts.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
