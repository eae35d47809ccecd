//! Product review business logic.
//!
//! Each user holds at most one review per product. Submitting again overwrites the
//! rating and comment of the existing review in a single upsert; `created_at` keeps the
//! time of the first submission.

use crate::{
    core::{non_blank, product::require_product, user::ensure_user_exists},
    entities::{ProductReview, product, product_review},
    errors::{Error, Result},
};
use sea_orm::{
    QueryOrder, Set, TransactionTrait,
    prelude::*,
    sea_query::OnConflict,
};
use tracing::info;

/// Lowest accepted rating
pub const MIN_RATING: i32 = 1;
/// Highest accepted rating
pub const MAX_RATING: i32 = 5;

/// A validated rating with optional comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewInput {
    rating: i32,
    comment: Option<String>,
}

impl ReviewInput {
    /// Validates a review submission.
    ///
    /// # Errors
    /// Returns [`Error::InvalidRating`] when the rating is outside 1 to 5.
    pub fn new(rating: i32, comment: Option<String>) -> Result<Self> {
        if !(MIN_RATING..=MAX_RATING).contains(&rating) {
            return Err(Error::InvalidRating { rating });
        }
        Ok(Self {
            rating,
            comment: non_blank(comment),
        })
    }

    /// The validated rating
    #[must_use]
    pub const fn rating(&self) -> i32 {
        self.rating
    }
}

/// Result of submitting a review.
#[derive(Debug, Clone)]
pub struct ReviewOutcome {
    /// The stored review
    pub review: product_review::Model,
    /// False when an earlier review was overwritten
    pub created: bool,
}

/// A product with its reviews and average rating.
#[derive(Debug, Clone)]
pub struct ProductRatings {
    /// The reviewed product
    pub product: product::Model,
    /// Reviews, newest first
    pub reviews: Vec<product_review::Model>,
    /// Mean rating, 0 when there are no reviews
    pub average: f64,
    /// Number of reviews
    pub count: usize,
}

/// Creates the user's review of a product, or overwrites the one they already wrote.
///
/// # Errors
/// Returns [`Error::UserNotFound`] or [`Error::ProductNotFound`].
pub async fn submit_review(
    db: &DatabaseConnection,
    user_id: i64,
    product_id: i64,
    input: ReviewInput,
) -> Result<ReviewOutcome> {
    let txn = db.begin().await?;

    ensure_user_exists(&txn, user_id).await?;
    require_product(&txn, product_id).await?;

    let existed = find_by_pair(&txn, user_id, product_id).await?.is_some();

    ProductReview::insert(product_review::ActiveModel {
        user_id: Set(user_id),
        product_id: Set(product_id),
        rating: Set(input.rating),
        comment: Set(input.comment),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    })
    .on_conflict(
        OnConflict::columns([
            product_review::Column::UserId,
            product_review::Column::ProductId,
        ])
        .update_columns([product_review::Column::Rating, product_review::Column::Comment])
        .to_owned(),
    )
    .exec_without_returning(&txn)
    .await?;

    let review = find_by_pair(&txn, user_id, product_id)
        .await?
        .ok_or(Error::ProductNotFound { id: product_id })?;

    txn.commit().await?;

    info!(
        user_id,
        product_id,
        rating = review.rating,
        created = !existed,
        "Stored product review"
    );
    Ok(ReviewOutcome {
        review,
        created: !existed,
    })
}

async fn find_by_pair<C>(
    db: &C,
    user_id: i64,
    product_id: i64,
) -> Result<Option<product_review::Model>>
where
    C: ConnectionTrait,
{
    ProductReview::find()
        .filter(product_review::Column::UserId.eq(user_id))
        .filter(product_review::Column::ProductId.eq(product_id))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Deletes a review. Only its author may delete it.
///
/// # Errors
/// Returns [`Error::ItemNotFound`] if the review does not belong to the user.
pub async fn delete_review(db: &DatabaseConnection, user_id: i64, review_id: i64) -> Result<()> {
    let review = ProductReview::find_by_id(review_id)
        .filter(product_review::Column::UserId.eq(user_id))
        .one(db)
        .await?
        .ok_or(Error::ItemNotFound {
            kind: "review",
            id: review_id,
            user_id,
        })?;
    review.delete(db).await?;
    info!(user_id, review_id, "Deleted product review");
    Ok(())
}

/// Lists a product's reviews, newest first.
pub async fn list_reviews_for_product(
    db: &DatabaseConnection,
    product_id: i64,
) -> Result<Vec<product_review::Model>> {
    ProductReview::find()
        .filter(product_review::Column::ProductId.eq(product_id))
        .order_by_desc(product_review::Column::CreatedAt)
        .order_by_desc(product_review::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Arithmetic mean of the ratings; 0 for an empty slice.
#[must_use]
pub fn average_rating(ratings: &[i32]) -> f64 {
    if ratings.is_empty() {
        return 0.0;
    }
    let sum: f64 = ratings.iter().copied().map(f64::from).sum();
    // Review counts stay far below 2^52
    #[allow(clippy::cast_precision_loss)]
    let count = ratings.len() as f64;
    sum / count
}

/// Loads a product with its reviews and their average rating.
///
/// # Errors
/// Returns [`Error::ProductNotFound`] if the product does not exist.
pub async fn product_rating_summary(
    db: &DatabaseConnection,
    product_id: i64,
) -> Result<ProductRatings> {
    let product = require_product(db, product_id).await?;
    let reviews = list_reviews_for_product(db, product_id).await?;
    let ratings: Vec<i32> = reviews.iter().map(|r| r.rating).collect();

    Ok(ProductRatings {
        product,
        average: average_rating(&ratings),
        count: reviews.len(),
        reviews,
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::float_cmp)]
    use super::*;
    use crate::test_utils::*;
    use sea_orm::PaginatorTrait;

    #[test]
    fn test_review_input_validation() {
        assert!(matches!(
            ReviewInput::new(0, None),
            Err(Error::InvalidRating { rating: 0 })
        ));
        assert!(matches!(
            ReviewInput::new(6, None),
            Err(Error::InvalidRating { rating: 6 })
        ));

        let input = ReviewInput::new(5, Some("   ".to_string())).unwrap();
        assert_eq!(input.rating(), 5);
        assert!(input.comment.is_none());
        assert!(ReviewInput::new(1, None).is_ok());
    }

    #[test]
    fn test_average_rating() {
        assert_eq!(average_rating(&[]), 0.0);
        assert_eq!(average_rating(&[4, 2]), 3.0);
        assert_eq!(average_rating(&[5]), 5.0);
        assert!((average_rating(&[5, 4, 4]) - 13.0 / 3.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_submit_review_overwrites() -> Result<()> {
        let (db, _classification, _shop, product) = setup_with_product().await?;
        let user = create_test_user(&db, "beth").await?;

        let first = submit_review(
            &db,
            user.id,
            product.id,
            ReviewInput::new(2, Some("Wobbly".to_string()))?,
        )
        .await?;
        assert!(first.created);

        let second = submit_review(&db, user.id, product.id, ReviewInput::new(4, None)?).await?;
        assert!(!second.created);
        assert_eq!(second.review.id, first.review.id);
        assert_eq!(second.review.rating, 4);
        assert!(second.review.comment.is_none());
        assert_eq!(second.review.created_at, first.review.created_at);

        assert_eq!(ProductReview::find().count(&db).await?, 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_submit_review_unknown_product() -> Result<()> {
        let db = setup_test_db().await?;
        let user = create_test_user(&db, "carl").await?;
        let result = submit_review(&db, user.id, 77, ReviewInput::new(3, None)?).await;
        assert!(matches!(result, Err(Error::ProductNotFound { id: 77 })));
        Ok(())
    }

    #[tokio::test]
    async fn test_product_rating_summary() -> Result<()> {
        let (db, _classification, _shop, product) = setup_with_product().await?;
        let empty = product_rating_summary(&db, product.id).await?;
        assert_eq!(empty.count, 0);
        assert_eq!(empty.average, 0.0);

        let ann = create_test_user(&db, "ann").await?;
        let ben = create_test_user(&db, "ben").await?;
        submit_review(&db, ann.id, product.id, ReviewInput::new(4, None)?).await?;
        submit_review(&db, ben.id, product.id, ReviewInput::new(2, None)?).await?;

        let summary = product_rating_summary(&db, product.id).await?;
        assert_eq!(summary.count, 2);
        assert_eq!(summary.average, 3.0);
        assert_eq!(summary.reviews[0].user_id, ben.id);

        assert!(matches!(
            product_rating_summary(&db, 404).await,
            Err(Error::ProductNotFound { id: 404 })
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_review_owner_only() -> Result<()> {
        let (db, _classification, _shop, product) = setup_with_product().await?;
        let author = create_test_user(&db, "dina").await?;
        let other = create_test_user(&db, "eric").await?;
        let outcome = submit_review(&db, author.id, product.id, ReviewInput::new(5, None)?).await?;

        let result = delete_review(&db, other.id, outcome.review.id).await;
        assert!(matches!(result, Err(Error::ItemNotFound { kind: "review", .. })));

        delete_review(&db, author.id, outcome.review.id).await?;
        assert!(list_reviews_for_product(&db, product.id).await?.is_empty());
        Ok(())
    }
}
