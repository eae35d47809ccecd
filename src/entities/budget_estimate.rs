//! Budget estimate entity - A user's saved cost estimate for a piece of work.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Budget estimate database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "budget_estimates")]
pub struct Model {
    /// Unique identifier for the estimate
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Owning user
    pub user_id: i64,
    /// Estimated cost as two-place decimal text
    pub estimated_cost: String,
    /// Free-text notes on what the estimate covers
    pub details: Option<String>,
    /// When the estimate was saved
    pub created_at: DateTimeUtc,
}

impl Model {
    /// Estimated cost as a decimal. Malformed or negative stored text reads as zero.
    #[must_use]
    pub fn cost(&self) -> rust_decimal::Decimal {
        crate::core::money::stored_decimal(&self.estimated_cost, "budget_estimates.estimated_cost", self.id)
    }
}

/// Defines relationships between `BudgetEstimate` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each estimate belongs to one user
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
