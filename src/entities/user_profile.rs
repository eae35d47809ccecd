//! User profile entity - Contact details created together with the user.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// User profile database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user_profiles")]
pub struct Model {
    /// Unique identifier for the profile
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Owning user, one profile per user
    #[sea_orm(unique)]
    pub user_id: i64,
    /// Optional phone number
    pub phone: Option<String>,
    /// Optional postal address
    pub address: Option<String>,
}

/// Defines relationships between `UserProfile` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each profile belongs to one user
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
