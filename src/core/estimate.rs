//! Saved cost estimates. A user can keep any number of them; each stores a validated
//! amount and optional free-text details.

use crate::{
    core::{
        money::{parse_money, to_stored},
        non_blank,
        user::ensure_user_exists,
    },
    entities::{BudgetEstimate, budget_estimate},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, prelude::*};
use tracing::info;

/// Saves a cost estimate for the user.
///
/// # Errors
/// Returns [`Error::InvalidDecimal`] or [`Error::InvalidAmount`] for a bad cost, or
/// [`Error::UserNotFound`].
pub async fn create_estimate(
    db: &DatabaseConnection,
    user_id: i64,
    raw_cost: &str,
    details: Option<String>,
) -> Result<budget_estimate::Model> {
    let cost = parse_money(raw_cost)?;
    ensure_user_exists(db, user_id).await?;

    let created = budget_estimate::ActiveModel {
        user_id: Set(user_id),
        estimated_cost: Set(to_stored(cost)),
        details: Set(non_blank(details)),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await?;

    info!(user_id, estimate_id = created.id, cost = %created.estimated_cost, "Saved estimate");
    Ok(created)
}

/// Lists the user's estimates, newest first.
pub async fn list_estimates(
    db: &DatabaseConnection,
    user_id: i64,
) -> Result<Vec<budget_estimate::Model>> {
    BudgetEstimate::find()
        .filter(budget_estimate::Column::UserId.eq(user_id))
        .order_by_desc(budget_estimate::Column::CreatedAt)
        .order_by_desc(budget_estimate::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Deletes one of the user's estimates.
///
/// # Errors
/// Returns [`Error::ItemNotFound`] if the estimate does not belong to the user.
pub async fn delete_estimate(db: &DatabaseConnection, user_id: i64, estimate_id: i64) -> Result<()> {
    let deleted = BudgetEstimate::delete_many()
        .filter(budget_estimate::Column::Id.eq(estimate_id))
        .filter(budget_estimate::Column::UserId.eq(user_id))
        .exec(db)
        .await?;

    if deleted.rows_affected == 0 {
        return Err(Error::ItemNotFound {
            kind: "estimate",
            id: estimate_id,
            user_id,
        });
    }
    Ok(())
}
