use anyhow::Result;
use async_trait::async_trait;
use diesel::{Connection, RunQueryDsl, insert_into, prelude::*, update};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    domain::{
        entities::{
            maintenance_schedules::{
                InsertMaintenanceScheduleEntity, MaintenanceScheduleEntity,
            },
            subscriptions::{InsertSubscriptionEntity, SubscriptionEntity},
        },
        repositories::subscriptions::SubscriptionRepository,
        value_objects::enums::subscription_statuses::SubscriptionStatus,
    },
    infrastructure::postgres::{
        postgres_connection::PgPool,
        schema::{maintenance_schedules, subscriptions},
    },
};

pub struct SubscriptionPostgres {
    db_pool: Arc<PgPool>,
}

impl SubscriptionPostgres {
    pub fn new(db_pool: Arc<PgPool>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl SubscriptionRepository for SubscriptionPostgres {
    async fn create_with_schedules(
        &self,
        insert_subscription_entity: InsertSubscriptionEntity,
        schedule_entries: Vec<InsertMaintenanceScheduleEntity>,
    ) -> Result<SubscriptionEntity> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let subscription =
            conn.transaction::<SubscriptionEntity, diesel::result::Error, _>(|conn| {
                let subscription = insert_into(subscriptions::table)
                    .values(&insert_subscription_entity)
                    .returning(SubscriptionEntity::as_returning())
                    .get_result::<SubscriptionEntity>(conn)?;

                if !schedule_entries.is_empty() {
                    let rows: Vec<_> = schedule_entries
                        .iter()
                        .map(|entry| {
                            (
                                maintenance_schedules::subscription_id.eq(subscription.id),
                                entry.clone(),
                            )
                        })
                        .collect();

                    insert_into(maintenance_schedules::table)
                        .values(&rows)
                        .execute(conn)?;
                }

                Ok(subscription)
            })?;

        Ok(subscription)
    }

    async fn find_by_id_for_user(
        &self,
        subscription_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<SubscriptionEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = subscriptions::table
            .filter(subscriptions::id.eq(subscription_id))
            .filter(subscriptions::user_id.eq(user_id))
            .select(SubscriptionEntity::as_select())
            .first::<SubscriptionEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn cancel(&self, subscription_id: Uuid) -> Result<()> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        update(subscriptions::table.filter(subscriptions::id.eq(subscription_id)))
            .set((
                subscriptions::status.eq(SubscriptionStatus::Cancelled.to_string()),
                subscriptions::auto_renew.eq(false),
            ))
            .execute(&mut conn)?;

        Ok(())
    }

    async fn list_schedules(
        &self,
        subscription_id: Uuid,
    ) -> Result<Vec<MaintenanceScheduleEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = maintenance_schedules::table
            .filter(maintenance_schedules::subscription_id.eq(subscription_id))
            .order(maintenance_schedules::scheduled_date.asc())
            .select(MaintenanceScheduleEntity::as_select())
            .load::<MaintenanceScheduleEntity>(&mut conn)?;

        Ok(results)
    }
}
