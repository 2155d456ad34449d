use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::users::UserEntity;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository {
    async fn find_by_id(&self, user_id: Uuid) -> Result<Option<UserEntity>>;
}
