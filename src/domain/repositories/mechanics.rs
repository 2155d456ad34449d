use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::mechanics::MechanicEntity;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MechanicRepository {
    async fn find_by_id(&self, mechanic_id: Uuid) -> Result<Option<MechanicEntity>>;

    async fn find_by_user_id(&self, user_id: Uuid) -> Result<Option<MechanicEntity>>;

    /// Full candidate scan for proximity search; filtering happens in the
    /// use case so it stays unit-testable.
    async fn list_candidates(&self) -> Result<Vec<MechanicEntity>>;

    /// Owned by the rating aggregator; nothing else writes `rating`.
    async fn set_rating(&self, mechanic_id: Uuid, rating: f64) -> Result<()>;

    /// Location push: overwrites the current fix and marks the mechanic
    /// available.
    async fn update_location(&self, mechanic_id: Uuid, latitude: f64, longitude: f64)
        -> Result<()>;
}
