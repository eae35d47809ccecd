//! Product review entity - One rating (1-5) and optional comment per user per product.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Product review database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "product_reviews")]
pub struct Model {
    /// Unique identifier for the review
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Author
    pub user_id: i64,
    /// Reviewed product
    pub product_id: i64,
    /// Star rating, 1 through 5
    pub rating: i32,
    /// Optional review text
    pub comment: Option<String>,
    /// When the review was first submitted
    pub created_at: DateTimeUtc,
}

/// Defines relationships between `ProductReview` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each review is about one product
    #[sea_orm(
        belongs_to = "super::product::Entity",
        from = "Column::ProductId",
        to = "super::product::Column::Id",
        on_delete = "Cascade"
    )]
    Product,
    /// Each review is written by one user
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
