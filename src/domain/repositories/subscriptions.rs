use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::{
    maintenance_schedules::{InsertMaintenanceScheduleEntity, MaintenanceScheduleEntity},
    subscriptions::{InsertSubscriptionEntity, SubscriptionEntity},
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SubscriptionRepository {
    /// Inserts the subscription and every schedule row in one transaction;
    /// a failure on any row rolls the whole activation back.
    async fn create_with_schedules(
        &self,
        insert_subscription_entity: InsertSubscriptionEntity,
        schedule_entries: Vec<InsertMaintenanceScheduleEntity>,
    ) -> Result<SubscriptionEntity>;

    async fn find_by_id_for_user(
        &self,
        subscription_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<SubscriptionEntity>>;

    async fn cancel(&self, subscription_id: Uuid) -> Result<()>;

    /// Schedule rows for a subscription, scheduled_date ascending.
    async fn list_schedules(
        &self,
        subscription_id: Uuid,
    ) -> Result<Vec<MaintenanceScheduleEntity>>;
}
