use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::infrastructure::postgres::schema::maintenance_schedules;

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = maintenance_schedules)]
pub struct MaintenanceScheduleEntity {
    pub id: Uuid,
    pub subscription_id: Uuid,
    pub vehicle_id: Uuid,
    pub service_type: String,
    pub mechanic_id: Option<Uuid>,
    pub scheduled_date: NaiveDate,
    pub status: String,
    pub rescheduled_from: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = maintenance_schedules)]
pub struct InsertMaintenanceScheduleEntity {
    pub vehicle_id: Uuid,
    pub service_type: String,
    pub mechanic_id: Option<Uuid>,
    pub scheduled_date: NaiveDate,
    pub status: String,
    pub rescheduled_from: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
