use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::reviews::{InsertReviewEntity, ReviewEntity};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReviewRepository {
    async fn create(&self, insert_review_entity: InsertReviewEntity) -> Result<ReviewEntity>;

    async fn find_by_id(&self, review_id: Uuid) -> Result<Option<ReviewEntity>>;

    /// The (author, mechanic) row whether live or tombstoned; at most one
    /// exists.
    async fn find_by_author_for_mechanic(
        &self,
        user_id: Uuid,
        mechanic_id: Uuid,
    ) -> Result<Option<ReviewEntity>>;

    /// Clears the tombstone and replaces the rated values in one update.
    async fn restore(
        &self,
        review_id: Uuid,
        rating: f64,
        comment: Option<String>,
    ) -> Result<ReviewEntity>;

    async fn update_content(
        &self,
        review_id: Uuid,
        rating: Option<f64>,
        comment: Option<String>,
    ) -> Result<ReviewEntity>;

    async fn soft_delete(&self, review_id: Uuid) -> Result<()>;

    /// Rating values of live reviews only; tombstoned rows are excluded.
    async fn list_live_ratings(&self, mechanic_id: Uuid) -> Result<Vec<f64>>;
}
