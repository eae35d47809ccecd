//! User business logic - account creation with its profile, lookups, and the
//! cascading delete that removes every user-scoped row.
//!
//! A profile is created in the same transaction as its user, so a user without a
//! profile never exists.

use crate::{
    core::non_blank,
    entities::{
        Budget, BudgetEstimate, Cart, ProductReview, SelectedProduct, User, UserProfile, Wishlist,
        budget, budget_estimate, cart, product_review, selected_product, user, user_profile,
        wishlist,
    },
    errors::{Error, Result},
};
use sea_orm::{Set, TransactionTrait, prelude::*};
use tracing::info;

/// Validated input for a new user account.
#[derive(Debug, Clone)]
pub struct NewUser {
    username: String,
    email: Option<String>,
    phone: Option<String>,
    address: Option<String>,
}

impl NewUser {
    /// Validates and normalises the account fields.
    ///
    /// # Errors
    /// Returns [`Error::Validation`] when the username is empty or contains whitespace.
    pub fn new(
        username: &str,
        email: Option<String>,
        phone: Option<String>,
        address: Option<String>,
    ) -> Result<Self> {
        let username = username.trim();
        if username.is_empty() {
            return Err(Error::Validation {
                message: "Username cannot be empty".to_string(),
            });
        }
        if username.chars().any(char::is_whitespace) {
            return Err(Error::Validation {
                message: "Username cannot contain spaces".to_string(),
            });
        }

        Ok(Self {
            username: username.to_string(),
            email: non_blank(email),
            phone: non_blank(phone),
            address: non_blank(address),
        })
    }
}

/// Creates a user and their profile in one transaction.
///
/// # Errors
/// Returns [`Error::DuplicateUsername`] if the username is taken, or a database error.
pub async fn create_user(db: &DatabaseConnection, new_user: NewUser) -> Result<user::Model> {
    let txn = db.begin().await?;

    let taken = User::find()
        .filter(user::Column::Username.eq(new_user.username.as_str()))
        .one(&txn)
        .await?;
    if taken.is_some() {
        return Err(Error::DuplicateUsername {
            username: new_user.username,
        });
    }

    let created = user::ActiveModel {
        username: Set(new_user.username),
        email: Set(new_user.email),
        date_joined: Set(chrono::Utc::now()),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    user_profile::ActiveModel {
        user_id: Set(created.id),
        phone: Set(new_user.phone),
        address: Set(new_user.address),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    txn.commit().await?;

    info!(user_id = created.id, username = %created.username, "Created user");
    Ok(created)
}

/// Retrieves a user by id.
pub async fn get_user<C>(db: &C, user_id: i64) -> Result<Option<user::Model>>
where
    C: ConnectionTrait,
{
    User::find_by_id(user_id).one(db).await.map_err(Into::into)
}

/// Retrieves a user by username.
pub async fn get_user_by_username(
    db: &DatabaseConnection,
    username: &str,
) -> Result<Option<user::Model>> {
    User::find()
        .filter(user::Column::Username.eq(username))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Fails with [`Error::UserNotFound`] unless the user exists.
pub async fn ensure_user_exists<C>(db: &C, user_id: i64) -> Result<user::Model>
where
    C: ConnectionTrait,
{
    get_user(db, user_id)
        .await?
        .ok_or(Error::UserNotFound { id: user_id })
}

/// Retrieves a user's profile.
pub async fn get_profile(db: &DatabaseConnection, user_id: i64) -> Result<user_profile::Model> {
    UserProfile::find()
        .filter(user_profile::Column::UserId.eq(user_id))
        .one(db)
        .await?
        .ok_or(Error::UserNotFound { id: user_id })
}

/// Replaces a user's phone and address.
pub async fn update_profile(
    db: &DatabaseConnection,
    user_id: i64,
    phone: Option<String>,
    address: Option<String>,
) -> Result<user_profile::Model> {
    let mut profile: user_profile::ActiveModel = get_profile(db, user_id).await?.into();
    profile.phone = Set(non_blank(phone));
    profile.address = Set(non_blank(address));
    profile.update(db).await.map_err(Into::into)
}

/// Deletes a user together with everything they own: budget selections, budget, cart,
/// wishlist, reviews, estimates and profile. Runs in a single transaction.
///
/// # Errors
/// Returns [`Error::UserNotFound`] if the user does not exist.
pub async fn delete_user(db: &DatabaseConnection, user_id: i64) -> Result<()> {
    let txn = db.begin().await?;

    ensure_user_exists(&txn, user_id).await?;

    SelectedProduct::delete_many()
        .filter(selected_product::Column::UserId.eq(user_id))
        .exec(&txn)
        .await?;
    Budget::delete_many()
        .filter(budget::Column::UserId.eq(user_id))
        .exec(&txn)
        .await?;
    Cart::delete_many()
        .filter(cart::Column::UserId.eq(user_id))
        .exec(&txn)
        .await?;
    Wishlist::delete_many()
        .filter(wishlist::Column::UserId.eq(user_id))
        .exec(&txn)
        .await?;
    ProductReview::delete_many()
        .filter(product_review::Column::UserId.eq(user_id))
        .exec(&txn)
        .await?;
    BudgetEstimate::delete_many()
        .filter(budget_estimate::Column::UserId.eq(user_id))
        .exec(&txn)
        .await?;
    UserProfile::delete_many()
        .filter(user_profile::Column::UserId.eq(user_id))
        .exec(&txn)
        .await?;
    User::delete_by_id(user_id).exec(&txn).await?;

    txn.commit().await?;

    info!(user_id, "Deleted user and owned rows");
    Ok(())
}
