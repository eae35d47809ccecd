//! Shop entity - A vendor listed under exactly one classification.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Shop database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "shops")]
pub struct Model {
    /// Unique identifier for the shop
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Owning classification
    pub classification_id: i64,
    /// Shop name
    pub name: String,
    /// Optional description
    pub description: Option<String>,
    /// Optional contact phone
    pub phone: Option<String>,
    /// Optional contact email
    pub email: Option<String>,
    /// Optional street address
    pub address: Option<String>,
}

/// Defines relationships between Shop and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each shop belongs to one classification
    #[sea_orm(
        belongs_to = "super::classification::Entity",
        from = "Column::ClassificationId",
        to = "super::classification::Column::Id",
        on_delete = "Cascade"
    )]
    Classification,
    /// One shop lists many products
    #[sea_orm(has_many = "super::product::Entity")]
    Products,
}

impl Related<super::classification::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Classification.def()
    }
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Products.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
