//! User entity - The identity every cart, wishlist, budget and review row hangs off.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// User database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    /// Unique identifier for the user
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Login name, unique
    #[sea_orm(unique)]
    pub username: String,
    /// Optional email address
    pub email: Option<String>,
    /// When the account was created
    pub date_joined: DateTimeUtc,
}

/// Defines relationships between User and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Exactly one profile per user
    #[sea_orm(has_one = "super::user_profile::Entity")]
    Profile,
    /// Exactly one budget per user (created lazily)
    #[sea_orm(has_one = "super::budget::Entity")]
    Budget,
}

impl Related<super::user_profile::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Profile.def()
    }
}

impl Related<super::budget::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Budget.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
