use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::domain::{
    entities::reviews::InsertReviewEntity,
    repositories::{mechanics::MechanicRepository, reviews::ReviewRepository},
    value_objects::reviews::{CreateReviewModel, ReviewModel, UpdateReviewModel},
};

#[derive(Debug, Error)]
pub enum ReviewError {
    #[error("mechanic not found")]
    MechanicNotFound,
    #[error("review not found")]
    ReviewNotFound,
    #[error("already reviewed")]
    AlreadyReviewed,
    #[error("actor is not the review author")]
    NotReviewAuthor,
    #[error("rating must be between 0 and 5")]
    RatingOutOfRange,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ReviewError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            ReviewError::MechanicNotFound | ReviewError::ReviewNotFound => StatusCode::NOT_FOUND,
            ReviewError::AlreadyReviewed => StatusCode::CONFLICT,
            ReviewError::NotReviewAuthor => StatusCode::FORBIDDEN,
            ReviewError::RatingOutOfRange => StatusCode::BAD_REQUEST,
            ReviewError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ReviewError::MechanicNotFound | ReviewError::ReviewNotFound => "not_found",
            ReviewError::AlreadyReviewed => "conflict",
            ReviewError::NotReviewAuthor => "forbidden",
            ReviewError::RatingOutOfRange => "invalid_request",
            ReviewError::Internal(_) => "internal",
        }
    }
}

pub type ReviewResult<T> = std::result::Result<T, ReviewError>;

pub struct ReviewUseCase<R, M>
where
    R: ReviewRepository + Send + Sync + 'static,
    M: MechanicRepository + Send + Sync + 'static,
{
    review_repo: Arc<R>,
    mechanic_repo: Arc<M>,
}

impl<R, M> ReviewUseCase<R, M>
where
    R: ReviewRepository + Send + Sync + 'static,
    M: MechanicRepository + Send + Sync + 'static,
{
    pub fn new(review_repo: Arc<R>, mechanic_repo: Arc<M>) -> Self {
        Self {
            review_repo,
            mechanic_repo,
        }
    }

    pub async fn create(
        &self,
        author_id: Uuid,
        create_review_model: CreateReviewModel,
    ) -> ReviewResult<ReviewModel> {
        Self::check_rating(create_review_model.rating)?;

        let mechanic = self
            .mechanic_repo
            .find_by_id(create_review_model.mechanic_id)
            .await
            .map_err(|err| {
                error!(db_error = ?err, "reviews: failed to load mechanic");
                ReviewError::Internal(err)
            })?
            .ok_or(ReviewError::MechanicNotFound)?;

        let existing = self
            .review_repo
            .find_by_author_for_mechanic(author_id, mechanic.id)
            .await
            .map_err(|err| {
                error!(db_error = ?err, "reviews: failed to look up existing review");
                ReviewError::Internal(err)
            })?;

        let review = match existing {
            Some(existing) if existing.is_live() => {
                warn!(
                    %author_id,
                    mechanic_id = %mechanic.id,
                    "reviews: duplicate live review rejected"
                );
                return Err(ReviewError::AlreadyReviewed);
            }
            // A tombstoned row for this pair is revived in place rather than
            // duplicated, keeping one row per (author, mechanic).
            Some(tombstoned) => self
                .review_repo
                .restore(
                    tombstoned.id,
                    create_review_model.rating,
                    create_review_model.comment.clone(),
                )
                .await
                .map_err(|err| {
                    error!(db_error = ?err, "reviews: failed to restore review");
                    ReviewError::Internal(err)
                })?,
            None => self
                .review_repo
                .create(InsertReviewEntity {
                    user_id: author_id,
                    mechanic_id: mechanic.id,
                    rating: create_review_model.rating,
                    comment: create_review_model.comment.clone(),
                    created_at: Utc::now(),
                    updated_at: Utc::now(),
                })
                .await
                .map_err(|err| {
                    error!(db_error = ?err, "reviews: failed to persist review");
                    ReviewError::Internal(err)
                })?,
        };

        self.recompute(mechanic.id).await?;
        info!(review_id = %review.id, mechanic_id = %mechanic.id, "reviews: review recorded");

        Ok(ReviewModel::from(review))
    }

    pub async fn update(
        &self,
        author_id: Uuid,
        review_id: Uuid,
        update_review_model: UpdateReviewModel,
    ) -> ReviewResult<ReviewModel> {
        if let Some(rating) = update_review_model.rating {
            Self::check_rating(rating)?;
        }

        let review = self.load_owned(author_id, review_id).await?;

        let updated = self
            .review_repo
            .update_content(
                review.id,
                update_review_model.rating,
                update_review_model.comment.clone(),
            )
            .await
            .map_err(|err| {
                error!(db_error = ?err, "reviews: failed to update review");
                ReviewError::Internal(err)
            })?;

        self.recompute(review.mechanic_id).await?;

        Ok(ReviewModel::from(updated))
    }

    pub async fn delete(&self, author_id: Uuid, review_id: Uuid) -> ReviewResult<()> {
        let review = self.load_owned(author_id, review_id).await?;

        self.review_repo
            .soft_delete(review.id)
            .await
            .map_err(|err| {
                error!(db_error = ?err, "reviews: failed to soft-delete review");
                ReviewError::Internal(err)
            })?;

        self.recompute(review.mechanic_id).await?;
        info!(%review_id, "reviews: review tombstoned");

        Ok(())
    }

    /// Full recomputation from live reviews; an empty set resets to zero.
    /// The only writer of `mechanics.rating`.
    pub async fn recompute(&self, mechanic_id: Uuid) -> ReviewResult<f64> {
        let ratings = self
            .review_repo
            .list_live_ratings(mechanic_id)
            .await
            .map_err(|err| {
                error!(db_error = ?err, "reviews: failed to load live ratings");
                ReviewError::Internal(err)
            })?;

        let rating = if ratings.is_empty() {
            0.0
        } else {
            ratings.iter().sum::<f64>() / ratings.len() as f64
        };

        self.mechanic_repo
            .set_rating(mechanic_id, rating)
            .await
            .map_err(|err| {
                error!(db_error = ?err, "reviews: failed to store aggregate rating");
                ReviewError::Internal(err)
            })?;

        info!(%mechanic_id, rating, review_count = ratings.len(), "reviews: rating recomputed");
        Ok(rating)
    }

    async fn load_owned(
        &self,
        author_id: Uuid,
        review_id: Uuid,
    ) -> ReviewResult<crate::domain::entities::reviews::ReviewEntity> {
        let review = self
            .review_repo
            .find_by_id(review_id)
            .await
            .map_err(|err| {
                error!(db_error = ?err, "reviews: failed to load review");
                ReviewError::Internal(err)
            })?
            .ok_or(ReviewError::ReviewNotFound)?;

        if review.user_id != author_id {
            warn!(%author_id, %review_id, "reviews: actor is not the author");
            return Err(ReviewError::NotReviewAuthor);
        }

        // A tombstoned review is invisible to its author too.
        if !review.is_live() {
            return Err(ReviewError::ReviewNotFound);
        }

        Ok(review)
    }

    fn check_rating(rating: f64) -> ReviewResult<()> {
        if !(0.0..=5.0).contains(&rating) {
            return Err(ReviewError::RatingOutOfRange);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        entities::{mechanics::MechanicEntity, reviews::ReviewEntity},
        repositories::{mechanics::MockMechanicRepository, reviews::MockReviewRepository},
    };
    use mockall::predicate::eq;

    fn sample_mechanic(id: Uuid) -> MechanicEntity {
        let now = Utc::now();
        MechanicEntity {
            id,
            user_id: Uuid::new_v4(),
            services: vec!["Oil Change".to_string()],
            availability: true,
            current_latitude: None,
            current_longitude: None,
            service_radius_km: 10.0,
            rating: 0.0,
            experience_years: 3,
            certifications: vec![],
            created_at: now,
            updated_at: now,
        }
    }

    fn sample_review(author_id: Uuid, mechanic_id: Uuid, rating: f64) -> ReviewEntity {
        let now = Utc::now();
        ReviewEntity {
            id: Uuid::new_v4(),
            user_id: author_id,
            mechanic_id,
            rating,
            comment: Some("quick and tidy".to_string()),
            deleted_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn entity_from_insert(insert: InsertReviewEntity) -> ReviewEntity {
        ReviewEntity {
            id: Uuid::new_v4(),
            user_id: insert.user_id,
            mechanic_id: insert.mechanic_id,
            rating: insert.rating,
            comment: insert.comment,
            deleted_at: None,
            created_at: insert.created_at,
            updated_at: insert.updated_at,
        }
    }

    #[tokio::test]
    async fn recompute_of_no_live_reviews_resets_to_zero() {
        let mechanic_id = Uuid::new_v4();

        let mut review_repo = MockReviewRepository::new();
        let mut mechanic_repo = MockMechanicRepository::new();

        review_repo
            .expect_list_live_ratings()
            .with(eq(mechanic_id))
            .returning(|_| Ok(vec![]));
        mechanic_repo
            .expect_set_rating()
            .with(eq(mechanic_id), eq(0.0))
            .times(1)
            .returning(|_, _| Ok(()));

        let usecase = ReviewUseCase::new(Arc::new(review_repo), Arc::new(mechanic_repo));

        assert_eq!(usecase.recompute(mechanic_id).await.unwrap(), 0.0);
    }

    #[tokio::test]
    async fn recompute_takes_the_arithmetic_mean() {
        let mechanic_id = Uuid::new_v4();

        let mut review_repo = MockReviewRepository::new();
        let mut mechanic_repo = MockMechanicRepository::new();

        review_repo
            .expect_list_live_ratings()
            .returning(|_| Ok(vec![5.0, 3.0, 4.0]));
        mechanic_repo
            .expect_set_rating()
            .with(eq(mechanic_id), eq(4.0))
            .times(1)
            .returning(|_, _| Ok(()));

        let usecase = ReviewUseCase::new(Arc::new(review_repo), Arc::new(mechanic_repo));

        assert_eq!(usecase.recompute(mechanic_id).await.unwrap(), 4.0);
    }

    #[tokio::test]
    async fn duplicate_live_review_is_rejected() {
        let author_id = Uuid::new_v4();
        let mechanic_id = Uuid::new_v4();
        let mechanic = sample_mechanic(mechanic_id);
        let live = sample_review(author_id, mechanic_id, 4.0);

        let mut review_repo = MockReviewRepository::new();
        let mut mechanic_repo = MockMechanicRepository::new();

        mechanic_repo.expect_find_by_id().returning(move |_| {
            let mechanic = mechanic.clone();
            Ok(Some(mechanic))
        });
        review_repo
            .expect_find_by_author_for_mechanic()
            .with(eq(author_id), eq(mechanic_id))
            .returning(move |_, _| {
                let live = live.clone();
                Ok(Some(live))
            });

        let usecase = ReviewUseCase::new(Arc::new(review_repo), Arc::new(mechanic_repo));

        let err = usecase
            .create(
                author_id,
                CreateReviewModel {
                    mechanic_id,
                    rating: 5.0,
                    comment: None,
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, ReviewError::AlreadyReviewed));
        assert_eq!(err.kind(), "conflict");
    }

    #[tokio::test]
    async fn tombstoned_review_is_restored_with_new_values() {
        let author_id = Uuid::new_v4();
        let mechanic_id = Uuid::new_v4();
        let mechanic = sample_mechanic(mechanic_id);
        let mut tombstoned = sample_review(author_id, mechanic_id, 2.0);
        tombstoned.deleted_at = Some(Utc::now());
        let tombstoned_id = tombstoned.id;

        let mut review_repo = MockReviewRepository::new();
        let mut mechanic_repo = MockMechanicRepository::new();

        mechanic_repo.expect_find_by_id().returning(move |_| {
            let mechanic = mechanic.clone();
            Ok(Some(mechanic))
        });
        review_repo
            .expect_find_by_author_for_mechanic()
            .returning(move |_, _| {
                let tombstoned = tombstoned.clone();
                Ok(Some(tombstoned))
            });
        review_repo
            .expect_restore()
            .with(eq(tombstoned_id), eq(5.0), eq(None::<String>))
            .times(1)
            .returning(move |id, rating, comment| {
                let mut restored = sample_review(author_id, mechanic_id, rating);
                restored.id = id;
                restored.comment = comment;
                Ok(restored)
            });
        review_repo
            .expect_list_live_ratings()
            .returning(|_| Ok(vec![5.0]));
        mechanic_repo
            .expect_set_rating()
            .with(eq(mechanic_id), eq(5.0))
            .times(1)
            .returning(|_, _| Ok(()));

        let usecase = ReviewUseCase::new(Arc::new(review_repo), Arc::new(mechanic_repo));

        let review = usecase
            .create(
                author_id,
                CreateReviewModel {
                    mechanic_id,
                    rating: 5.0,
                    comment: None,
                },
            )
            .await
            .unwrap();

        assert_eq!(review.id, tombstoned_id);
        assert_eq!(review.rating, 5.0);
    }

    #[tokio::test]
    async fn first_review_is_created_and_aggregated() {
        let author_id = Uuid::new_v4();
        let mechanic_id = Uuid::new_v4();
        let mechanic = sample_mechanic(mechanic_id);

        let mut review_repo = MockReviewRepository::new();
        let mut mechanic_repo = MockMechanicRepository::new();

        mechanic_repo.expect_find_by_id().returning(move |_| {
            let mechanic = mechanic.clone();
            Ok(Some(mechanic))
        });
        review_repo
            .expect_find_by_author_for_mechanic()
            .returning(|_, _| Ok(None));
        review_repo
            .expect_create()
            .withf(move |insert| insert.user_id == author_id && insert.rating == 4.0)
            .times(1)
            .returning(|insert| Ok(entity_from_insert(insert)));
        review_repo
            .expect_list_live_ratings()
            .returning(|_| Ok(vec![4.0]));
        mechanic_repo
            .expect_set_rating()
            .with(eq(mechanic_id), eq(4.0))
            .times(1)
            .returning(|_, _| Ok(()));

        let usecase = ReviewUseCase::new(Arc::new(review_repo), Arc::new(mechanic_repo));

        let review = usecase
            .create(
                author_id,
                CreateReviewModel {
                    mechanic_id,
                    rating: 4.0,
                    comment: Some("solid work".to_string()),
                },
            )
            .await
            .unwrap();

        assert_eq!(review.rating, 4.0);
    }

    #[tokio::test]
    async fn out_of_range_rating_is_rejected() {
        let usecase = ReviewUseCase::new(
            Arc::new(MockReviewRepository::new()),
            Arc::new(MockMechanicRepository::new()),
        );

        let err = usecase
            .create(
                Uuid::new_v4(),
                CreateReviewModel {
                    mechanic_id: Uuid::new_v4(),
                    rating: 5.5,
                    comment: None,
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, ReviewError::RatingOutOfRange));
        assert_eq!(err.kind(), "invalid_request");
    }

    #[tokio::test]
    async fn only_the_author_may_update() {
        let review = sample_review(Uuid::new_v4(), Uuid::new_v4(), 4.0);
        let review_id = review.id;

        let mut review_repo = MockReviewRepository::new();
        review_repo.expect_find_by_id().returning(move |_| {
            let review = review.clone();
            Ok(Some(review))
        });

        let usecase = ReviewUseCase::new(
            Arc::new(review_repo),
            Arc::new(MockMechanicRepository::new()),
        );

        let err = usecase
            .update(
                Uuid::new_v4(),
                review_id,
                UpdateReviewModel {
                    rating: Some(1.0),
                    comment: None,
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, ReviewError::NotReviewAuthor));
        assert_eq!(err.kind(), "forbidden");
    }

    #[tokio::test]
    async fn soft_delete_tombstones_and_recomputes() {
        let author_id = Uuid::new_v4();
        let mechanic_id = Uuid::new_v4();
        let review = sample_review(author_id, mechanic_id, 5.0);
        let review_id = review.id;

        let mut review_repo = MockReviewRepository::new();
        let mut mechanic_repo = MockMechanicRepository::new();

        review_repo.expect_find_by_id().returning(move |_| {
            let review = review.clone();
            Ok(Some(review))
        });
        review_repo
            .expect_soft_delete()
            .with(eq(review_id))
            .times(1)
            .returning(|_| Ok(()));
        review_repo
            .expect_list_live_ratings()
            .returning(|_| Ok(vec![3.0]));
        mechanic_repo
            .expect_set_rating()
            .with(eq(mechanic_id), eq(3.0))
            .times(1)
            .returning(|_, _| Ok(()));

        let usecase = ReviewUseCase::new(Arc::new(review_repo), Arc::new(mechanic_repo));

        usecase.delete(author_id, review_id).await.unwrap();
    }

    #[tokio::test]
    async fn tombstoned_review_cannot_be_updated() {
        let author_id = Uuid::new_v4();
        let mut review = sample_review(author_id, Uuid::new_v4(), 4.0);
        review.deleted_at = Some(Utc::now());
        let review_id = review.id;

        let mut review_repo = MockReviewRepository::new();
        review_repo.expect_find_by_id().returning(move |_| {
            let review = review.clone();
            Ok(Some(review))
        });

        let usecase = ReviewUseCase::new(
            Arc::new(review_repo),
            Arc::new(MockMechanicRepository::new()),
        );

        let err = usecase
            .update(
                author_id,
                review_id,
                UpdateReviewModel {
                    rating: Some(2.0),
                    comment: None,
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, ReviewError::ReviewNotFound));
    }
}
