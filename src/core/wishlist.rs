//! Wishlist business logic.
//!
//! Saving a product twice is a no-op that reports the existing row; the purchased flag
//! is flipped in place.

use crate::{
    core::{product::require_product, user::ensure_user_exists},
    entities::{Product, Wishlist, product, wishlist},
    errors::{Error, Result},
};
use sea_orm::{
    QueryOrder, Set, TransactionTrait,
    prelude::*,
    sea_query::OnConflict,
};
use tracing::debug;

/// Result of adding to the wishlist.
#[derive(Debug, Clone)]
pub struct WishlistAdd {
    /// The wishlist row, new or pre-existing
    pub item: wishlist::Model,
    /// False when the product was already saved
    pub created: bool,
}

/// Saves a product to the user's wishlist. Saving an already-saved product changes
/// nothing and returns the existing row with `created == false`.
///
/// # Errors
/// Returns [`Error::UserNotFound`] or [`Error::ProductNotFound`].
pub async fn add_to_wishlist(
    db: &DatabaseConnection,
    user_id: i64,
    product_id: i64,
) -> Result<WishlistAdd> {
    let txn = db.begin().await?;

    ensure_user_exists(&txn, user_id).await?;
    require_product(&txn, product_id).await?;

    let inserted = Wishlist::insert(wishlist::ActiveModel {
        user_id: Set(user_id),
        product_id: Set(product_id),
        added_at: Set(chrono::Utc::now()),
        is_purchased: Set(false),
        ..Default::default()
    })
    .on_conflict(
        OnConflict::columns([wishlist::Column::UserId, wishlist::Column::ProductId])
            .do_nothing()
            .to_owned(),
    )
    .exec_without_returning(&txn)
    .await?;

    let item = Wishlist::find()
        .filter(wishlist::Column::UserId.eq(user_id))
        .filter(wishlist::Column::ProductId.eq(product_id))
        .one(&txn)
        .await?
        .ok_or(Error::ProductNotFound { id: product_id })?;

    txn.commit().await?;

    let created = inserted == 1;
    debug!(user_id, product_id, created, "Saved product to wishlist");
    Ok(WishlistAdd { item, created })
}

async fn find_owned_item(
    db: &DatabaseConnection,
    user_id: i64,
    wishlist_id: i64,
) -> Result<wishlist::Model> {
    Wishlist::find_by_id(wishlist_id)
        .filter(wishlist::Column::UserId.eq(user_id))
        .one(db)
        .await?
        .ok_or(Error::ItemNotFound {
            kind: "wishlist item",
            id: wishlist_id,
            user_id,
        })
}

/// Removes an item from the user's wishlist.
///
/// # Errors
/// Returns [`Error::ItemNotFound`] if the item does not belong to the user.
pub async fn remove_from_wishlist(
    db: &DatabaseConnection,
    user_id: i64,
    wishlist_id: i64,
) -> Result<()> {
    find_owned_item(db, user_id, wishlist_id)
        .await?
        .delete(db)
        .await?;
    Ok(())
}

/// Flips the purchased flag and returns the updated row.
///
/// # Errors
/// Returns [`Error::ItemNotFound`] if the item does not belong to the user.
pub async fn toggle_purchased(
    db: &DatabaseConnection,
    user_id: i64,
    wishlist_id: i64,
) -> Result<wishlist::Model> {
    let item = find_owned_item(db, user_id, wishlist_id).await?;
    let flipped = !item.is_purchased;

    let mut model: wishlist::ActiveModel = item.into();
    model.is_purchased = Set(flipped);
    model.update(db).await.map_err(Into::into)
}

/// Lists the user's wishlist with products, most recently saved first.
pub async fn list_wishlist(
    db: &DatabaseConnection,
    user_id: i64,
) -> Result<Vec<(wishlist::Model, product::Model)>> {
    let rows = Wishlist::find()
        .filter(wishlist::Column::UserId.eq(user_id))
        .find_also_related(Product)
        .order_by_desc(wishlist::Column::AddedAt)
        .order_by_desc(wishlist::Column::Id)
        .all(db)
        .await?;

    Ok(rows
        .into_iter()
        .filter_map(|(item, product)| product.map(|p| (item, p)))
        .collect())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;
    use sea_orm::PaginatorTrait;

    #[tokio::test]
    async fn test_add_to_wishlist_is_idempotent() -> Result<()> {
        let (db, _classification, _shop, product) = setup_with_product().await?;
        let user = create_test_user(&db, "vera").await?;

        let first = add_to_wishlist(&db, user.id, product.id).await?;
        assert!(first.created);
        assert!(!first.item.is_purchased);

        let second = add_to_wishlist(&db, user.id, product.id).await?;
        assert!(!second.created);
        assert_eq!(second.item, first.item);

        assert_eq!(Wishlist::find().count(&db).await?, 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_toggle_purchased() -> Result<()> {
        let (db, _classification, _shop, product) = setup_with_product().await?;
        let user = create_test_user(&db, "walt").await?;
        let added = add_to_wishlist(&db, user.id, product.id).await?;

        let bought = toggle_purchased(&db, user.id, added.item.id).await?;
        assert!(bought.is_purchased);
        let unbought = toggle_purchased(&db, user.id, added.item.id).await?;
        assert!(!unbought.is_purchased);

        // Re-adding does not reset the flag
        toggle_purchased(&db, user.id, added.item.id).await?;
        let again = add_to_wishlist(&db, user.id, product.id).await?;
        assert!(again.item.is_purchased);
        Ok(())
    }

    #[tokio::test]
    async fn test_wishlist_scoped_to_owner() -> Result<()> {
        let (db, _classification, _shop, product) = setup_with_product().await?;
        let owner = create_test_user(&db, "xena").await?;
        let stranger = create_test_user(&db, "yuri").await?;
        let added = add_to_wishlist(&db, owner.id, product.id).await?;

        assert!(matches!(
            toggle_purchased(&db, stranger.id, added.item.id).await,
            Err(Error::ItemNotFound { kind: "wishlist item", .. })
        ));
        assert!(matches!(
            remove_from_wishlist(&db, stranger.id, added.item.id).await,
            Err(Error::ItemNotFound { .. })
        ));
        assert!(list_wishlist(&db, stranger.id).await?.is_empty());

        remove_from_wishlist(&db, owner.id, added.item.id).await?;
        assert!(list_wishlist(&db, owner.id).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_list_wishlist_newest_first() -> Result<()> {
        let (db, _classification, shop) = setup_with_shop().await?;
        let sofa = create_test_product(&db, "Sofa", shop.id).await?;
        let vase = create_test_product(&db, "Vase", shop.id).await?;
        let user = create_test_user(&db, "zara").await?;

        add_to_wishlist(&db, user.id, sofa.id).await?;
        add_to_wishlist(&db, user.id, vase.id).await?;

        let items = list_wishlist(&db, user.id).await?;
        let names: Vec<&str> = items.iter().map(|(_, p)| p.name.as_str()).collect();
        assert_eq!(names, ["Vase", "Sofa"]);
        Ok(())
    }

    #[tokio::test]
    async fn test_add_to_wishlist_unknown_product() -> Result<()> {
        let db = setup_test_db().await?;
        let user = create_test_user(&db, "abby").await?;
        let result = add_to_wishlist(&db, user.id, 12).await;
        assert!(matches!(result, Err(Error::ProductNotFound { id: 12 })));
        Ok(())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_adds_create_one_wishlist_row() -> Result<()> {
        const TASKS: usize = 16;
        let (db, path) = setup_file_test_db("wishlist-race").await?;
        let classification = create_test_classification(&db, "Decor").await?;
        let shop = create_test_shop(&db, "Frame Works", classification.id).await?;
        let product = create_test_product(&db, "Wall Mirror", shop.id).await?;
        let user = create_test_user(&db, "tariq").await?;

        // `DatabaseConnection` is not `Clone` with sea-orm's `mock` feature.
        let db = std::sync::Arc::new(db);
        let tasks: Vec<_> = (0..TASKS)
            .map(|_| {
                let db = std::sync::Arc::clone(&db);
                let (user_id, product_id) = (user.id, product.id);
                tokio::spawn(async move { add_to_wishlist(&db, user_id, product_id).await })
            })
            .collect();
        let mut created = 0;
        for task in tasks {
            let added = task.await.unwrap()?;
            assert_eq!(added.item.product_id, product.id);
            if added.created {
                created += 1;
            }
        }
        let db = std::sync::Arc::try_unwrap(db).expect("all tasks finished");

        assert_eq!(created, 1);
        assert_eq!(Wishlist::find().count(&db).await?, 1);

        remove_file_test_db(db, &path).await;
        Ok(())
    }
}
