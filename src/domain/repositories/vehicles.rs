use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::vehicles::VehicleEntity;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VehicleRepository {
    async fn find_by_id(&self, vehicle_id: Uuid) -> Result<Option<VehicleEntity>>;

    async fn find_most_recent_for_user(&self, user_id: Uuid) -> Result<Option<VehicleEntity>>;
}
