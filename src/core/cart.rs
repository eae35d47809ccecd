//! Cart business logic.
//!
//! One row per (user, product). Adding a product already in the cart increments its
//! quantity inside the insert itself, so two concurrent adds land as quantity 2.

use crate::{
    core::{
        budget::{get_or_create_budget, list_selected_products},
        product::require_product,
        summary::{BudgetSummary, LineItem, SpendPolicy, compute_summary, sum_lines},
        user::ensure_user_exists,
    },
    entities::{Cart, Product, budget, cart, product},
    errors::{Error, Result},
};
use rust_decimal::Decimal;
use sea_orm::{
    QueryOrder, Set, TransactionTrait,
    prelude::*,
    sea_query::{Expr, OnConflict},
};
use tracing::debug;

/// A cart row joined with its product.
pub type CartLine = (cart::Model, product::Model);

/// The cart page: items, their total, and how the cart sits against the budget.
#[derive(Debug, Clone)]
pub struct CartOverview {
    /// Cart rows with their products
    pub items: Vec<CartLine>,
    /// Sum of price times quantity over the cart
    pub cart_total: Decimal,
    /// The user's budget
    pub budget: budget::Model,
    /// Derived totals and flags
    pub summary: BudgetSummary,
}

/// Adds a product to the cart, or bumps its quantity by one.
///
/// # Errors
/// Returns [`Error::UserNotFound`] or [`Error::ProductNotFound`].
pub async fn add_to_cart(
    db: &DatabaseConnection,
    user_id: i64,
    product_id: i64,
) -> Result<cart::Model> {
    let txn = db.begin().await?;

    ensure_user_exists(&txn, user_id).await?;
    require_product(&txn, product_id).await?;

    let item = cart::ActiveModel {
        user_id: Set(user_id),
        product_id: Set(product_id),
        quantity: Set(1),
        added_at: Set(chrono::Utc::now()),
        ..Default::default()
    };
    Cart::insert(item)
        .on_conflict(
            OnConflict::columns([cart::Column::UserId, cart::Column::ProductId])
                .value(cart::Column::Quantity, Expr::col(cart::Column::Quantity).add(1))
                .to_owned(),
        )
        .exec_without_returning(&txn)
        .await?;

    let stored = find_by_pair(&txn, user_id, product_id)
        .await?
        .ok_or(Error::ProductNotFound { id: product_id })?;

    txn.commit().await?;

    debug!(user_id, product_id, quantity = stored.quantity, "Added product to cart");
    Ok(stored)
}

async fn find_by_pair<C>(db: &C, user_id: i64, product_id: i64) -> Result<Option<cart::Model>>
where
    C: ConnectionTrait,
{
    Cart::find()
        .filter(cart::Column::UserId.eq(user_id))
        .filter(cart::Column::ProductId.eq(product_id))
        .one(db)
        .await
        .map_err(Into::into)
}

async fn find_owned_item(
    db: &DatabaseConnection,
    user_id: i64,
    cart_id: i64,
) -> Result<cart::Model> {
    Cart::find_by_id(cart_id)
        .filter(cart::Column::UserId.eq(user_id))
        .one(db)
        .await?
        .ok_or(Error::ItemNotFound {
            kind: "cart item",
            id: cart_id,
            user_id,
        })
}

/// Removes an item from the user's cart.
///
/// # Errors
/// Returns [`Error::ItemNotFound`] if the item does not belong to the user.
pub async fn remove_from_cart(db: &DatabaseConnection, user_id: i64, cart_id: i64) -> Result<()> {
    find_owned_item(db, user_id, cart_id)
        .await?
        .delete(db)
        .await?;
    debug!(user_id, cart_id, "Removed product from cart");
    Ok(())
}

/// Sets a cart item's quantity. Zero removes the item and returns `None`.
///
/// # Errors
/// Returns [`Error::InvalidQuantity`] for negative quantities, or
/// [`Error::ItemNotFound`] if the item does not belong to the user.
pub async fn update_cart_quantity(
    db: &DatabaseConnection,
    user_id: i64,
    cart_id: i64,
    quantity: i32,
) -> Result<Option<cart::Model>> {
    if quantity < 0 {
        return Err(Error::InvalidQuantity { quantity });
    }

    let item = find_owned_item(db, user_id, cart_id).await?;
    if quantity == 0 {
        item.delete(db).await?;
        return Ok(None);
    }

    let mut model: cart::ActiveModel = item.into();
    model.quantity = Set(quantity);
    Ok(Some(model.update(db).await?))
}

/// Lists the user's cart with products, in the order they were added.
pub async fn list_cart(db: &DatabaseConnection, user_id: i64) -> Result<Vec<CartLine>> {
    let rows = Cart::find()
        .filter(cart::Column::UserId.eq(user_id))
        .find_also_related(Product)
        .order_by_asc(cart::Column::AddedAt)
        .order_by_asc(cart::Column::Id)
        .all(db)
        .await?;

    Ok(rows
        .into_iter()
        .filter_map(|(item, product)| product.map(|p| (item, p)))
        .collect())
}

/// Loads the cart page. The user's budget is created if missing so the page always
/// has something to compare against.
pub async fn cart_overview(
    db: &DatabaseConnection,
    user_id: i64,
    policy: SpendPolicy,
) -> Result<CartOverview> {
    let budget = get_or_create_budget(db, user_id).await?;
    let items = list_cart(db, user_id).await?;

    let selected_lines: Vec<LineItem> = list_selected_products(db, user_id)
        .await?
        .iter()
        .map(|(s, p)| LineItem::new(p.unit_price(), s.quantity))
        .collect();
    let cart_lines: Vec<LineItem> = items
        .iter()
        .map(|(c, p)| LineItem::new(p.unit_price(), c.quantity))
        .collect();

    let cart_total = sum_lines(&cart_lines);
    let summary = compute_summary(budget.total_amount(), &selected_lines, &cart_lines, policy);

    Ok(CartOverview {
        items,
        cart_total,
        budget,
        summary,
    })
}
