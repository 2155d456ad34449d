use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{
    entities::{
        maintenance_schedules::MaintenanceScheduleEntity, subscriptions::SubscriptionEntity,
    },
    value_objects::enums::{
        schedule_statuses::ScheduleStatus, subscription_statuses::SubscriptionStatus,
    },
};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SubscriptionModel {
    pub id: Uuid,
    pub user_id: Uuid,
    pub plan_id: Uuid,
    pub status: SubscriptionStatus,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub auto_renew: bool,
    pub created_at: DateTime<Utc>,
}

impl From<SubscriptionEntity> for SubscriptionModel {
    fn from(entity: SubscriptionEntity) -> Self {
        Self {
            id: entity.id,
            user_id: entity.user_id,
            plan_id: entity.plan_id,
            status: SubscriptionStatus::from_str(&entity.status).unwrap_or_default(),
            starts_at: entity.starts_at,
            ends_at: entity.ends_at,
            auto_renew: entity.auto_renew,
            created_at: entity.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivateSubscriptionModel {
    pub plan_id: Uuid,
    pub vehicle_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MaintenanceScheduleModel {
    pub id: Uuid,
    pub subscription_id: Uuid,
    pub vehicle_id: Uuid,
    pub service_type: String,
    pub mechanic_id: Option<Uuid>,
    pub scheduled_date: NaiveDate,
    pub status: ScheduleStatus,
    pub rescheduled_from: Option<Uuid>,
}

impl From<MaintenanceScheduleEntity> for MaintenanceScheduleModel {
    fn from(entity: MaintenanceScheduleEntity) -> Self {
        Self {
            id: entity.id,
            subscription_id: entity.subscription_id,
            vehicle_id: entity.vehicle_id,
            service_type: entity.service_type,
            mechanic_id: entity.mechanic_id,
            scheduled_date: entity.scheduled_date,
            status: ScheduleStatus::from_str(&entity.status).unwrap_or_default(),
            rescheduled_from: entity.rescheduled_from,
        }
    }
}
