//! Budget business logic - the per-user spending ceiling and the products selected
//! against it.
//!
//! A user's budget is created on first use with an atomic insert-if-absent keyed on
//! the unique `user_id`, so concurrent first visits still yield one row. Selections
//! use the same approach keyed on (user, product): adding an already-selected product
//! bumps its quantity in the same statement.

use crate::{
    core::{
        cart::list_cart,
        money::{parse_money, to_stored},
        product::require_product,
        summary::{BudgetSummary, LineItem, SpendPolicy, compute_summary},
        user::ensure_user_exists,
    },
    entities::{Budget, Product, SelectedProduct, budget, cart, product, selected_product},
    errors::{Error, Result},
};
use rust_decimal::Decimal;
use sea_orm::{
    QueryOrder, Set, TransactionTrait,
    prelude::*,
    sea_query::{Expr, OnConflict},
};
use tracing::{debug, info};

/// A selected product joined with its catalog entry.
pub type Selection = (selected_product::Model, product::Model);

/// Everything the budget page shows.
#[derive(Debug, Clone)]
pub struct BudgetOverview {
    /// The user's budget
    pub budget: budget::Model,
    /// Products selected against it
    pub selections: Vec<Selection>,
    /// Cart items, counted or not depending on the policy
    pub cart: Vec<(cart::Model, product::Model)>,
    /// Derived totals and flags
    pub summary: BudgetSummary,
}

/// Returns the user's budget, creating it with a zero total if it does not exist.
///
/// # Errors
/// Returns [`Error::UserNotFound`] if the user does not exist.
pub async fn get_or_create_budget<C>(db: &C, user_id: i64) -> Result<budget::Model>
where
    C: ConnectionTrait,
{
    if let Some(existing) = find_budget(db, user_id).await? {
        return Ok(existing);
    }

    ensure_user_exists(db, user_id).await?;

    let fresh = budget::ActiveModel {
        user_id: Set(user_id),
        total: Set(to_stored(Decimal::ZERO)),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };
    let inserted = Budget::insert(fresh)
        .on_conflict(
            OnConflict::column(budget::Column::UserId)
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(db)
        .await?;
    if inserted > 0 {
        debug!(user_id, "Created empty budget");
    }

    find_budget(db, user_id)
        .await?
        .ok_or(Error::UserNotFound { id: user_id })
}

async fn find_budget<C>(db: &C, user_id: i64) -> Result<Option<budget::Model>>
where
    C: ConnectionTrait,
{
    Budget::find()
        .filter(budget::Column::UserId.eq(user_id))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Sets the budget total from submitted text.
///
/// The text is validated before anything is written; malformed input comes back as
/// [`Error::InvalidDecimal`], whose message is meant to be shown to the user.
///
/// # Errors
/// Returns [`Error::InvalidDecimal`], [`Error::InvalidAmount`] or [`Error::UserNotFound`].
pub async fn set_budget_total(
    db: &DatabaseConnection,
    user_id: i64,
    raw_total: &str,
) -> Result<budget::Model> {
    let total = parse_money(raw_total)?;

    let txn = db.begin().await?;
    let mut model: budget::ActiveModel = get_or_create_budget(&txn, user_id).await?.into();
    model.total = Set(to_stored(total));
    let updated = model.update(&txn).await?;
    txn.commit().await?;

    info!(user_id, total = %updated.total, "Updated budget total");
    Ok(updated)
}

/// Adds a product to the user's budget, or bumps its quantity by one if already selected.
///
/// # Errors
/// Returns [`Error::ProductNotFound`] or [`Error::UserNotFound`].
pub async fn add_to_budget(
    db: &DatabaseConnection,
    user_id: i64,
    product_id: i64,
) -> Result<selected_product::Model> {
    let txn = db.begin().await?;

    require_product(&txn, product_id).await?;
    let budget = get_or_create_budget(&txn, user_id).await?;

    let selection = selected_product::ActiveModel {
        budget_id: Set(budget.id),
        user_id: Set(user_id),
        product_id: Set(product_id),
        quantity: Set(1),
        ..Default::default()
    };
    SelectedProduct::insert(selection)
        .on_conflict(
            OnConflict::columns([
                selected_product::Column::UserId,
                selected_product::Column::ProductId,
            ])
            .value(
                selected_product::Column::Quantity,
                Expr::col(selected_product::Column::Quantity).add(1),
            )
            .to_owned(),
        )
        .exec_without_returning(&txn)
        .await?;

    let stored = SelectedProduct::find()
        .filter(selected_product::Column::UserId.eq(user_id))
        .filter(selected_product::Column::ProductId.eq(product_id))
        .one(&txn)
        .await?
        .ok_or(Error::ProductNotFound { id: product_id })?;

    txn.commit().await?;

    debug!(user_id, product_id, quantity = stored.quantity, "Added product to budget");
    Ok(stored)
}

async fn find_owned_selection(
    db: &DatabaseConnection,
    user_id: i64,
    selected_id: i64,
) -> Result<selected_product::Model> {
    SelectedProduct::find_by_id(selected_id)
        .filter(selected_product::Column::UserId.eq(user_id))
        .one(db)
        .await?
        .ok_or(Error::ItemNotFound {
            kind: "budget selection",
            id: selected_id,
            user_id,
        })
}

/// Removes a selection from the user's budget.
///
/// # Errors
/// Returns [`Error::ItemNotFound`] if the selection does not belong to the user.
pub async fn remove_from_budget(
    db: &DatabaseConnection,
    user_id: i64,
    selected_id: i64,
) -> Result<()> {
    find_owned_selection(db, user_id, selected_id)
        .await?
        .delete(db)
        .await?;
    debug!(user_id, selected_id, "Removed product from budget");
    Ok(())
}

/// Sets a selection's quantity. A quantity of zero removes the selection and
/// returns `None`.
///
/// # Errors
/// Returns [`Error::InvalidQuantity`] for negative quantities, or
/// [`Error::ItemNotFound`] if the selection does not belong to the user.
pub async fn update_budget_quantity(
    db: &DatabaseConnection,
    user_id: i64,
    selected_id: i64,
    quantity: i32,
) -> Result<Option<selected_product::Model>> {
    if quantity < 0 {
        return Err(Error::InvalidQuantity { quantity });
    }

    let selection = find_owned_selection(db, user_id, selected_id).await?;
    if quantity == 0 {
        selection.delete(db).await?;
        return Ok(None);
    }

    let mut model: selected_product::ActiveModel = selection.into();
    model.quantity = Set(quantity);
    Ok(Some(model.update(db).await?))
}

/// Lists the user's budget selections with their products, oldest first.
pub async fn list_selected_products(
    db: &DatabaseConnection,
    user_id: i64,
) -> Result<Vec<Selection>> {
    let rows = SelectedProduct::find()
        .filter(selected_product::Column::UserId.eq(user_id))
        .find_also_related(Product)
        .order_by_asc(selected_product::Column::Id)
        .all(db)
        .await?;

    Ok(rows
        .into_iter()
        .filter_map(|(selection, product)| product.map(|p| (selection, p)))
        .collect())
}

/// Loads the budget page: budget (created if missing), selections, cart and totals.
pub async fn budget_overview(
    db: &DatabaseConnection,
    user_id: i64,
    policy: SpendPolicy,
) -> Result<BudgetOverview> {
    let budget = get_or_create_budget(db, user_id).await?;
    let selections = list_selected_products(db, user_id).await?;
    let cart = list_cart(db, user_id).await?;

    let selected_lines: Vec<LineItem> = selections
        .iter()
        .map(|(s, p)| LineItem::new(p.unit_price(), s.quantity))
        .collect();
    let cart_lines: Vec<LineItem> = cart
        .iter()
        .map(|(c, p)| LineItem::new(p.unit_price(), c.quantity))
        .collect();

    let summary = compute_summary(budget.total_amount(), &selected_lines, &cart_lines, policy);

    Ok(BudgetOverview {
        budget,
        selections,
        cart,
        summary,
    })
}
