use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::infrastructure::postgres::schema::bookings;

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = bookings)]
pub struct BookingEntity {
    pub id: Uuid,
    pub user_id: Uuid,
    pub mechanic_id: Uuid,
    pub service_type: String,
    pub scheduled_time: DateTime<Utc>,
    pub estimated_duration_minutes: i32,
    pub actual_duration_minutes: Option<i32>,
    pub estimated_cost: f64,
    pub final_cost: Option<f64>,
    pub latitude: f64,
    pub longitude: f64,
    pub issue_description: Option<String>,
    pub status: String,
    pub payment_status: String,
    pub cancellation_reason: Option<String>,
    pub completion_time: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = bookings)]
pub struct InsertBookingEntity {
    pub user_id: Uuid,
    pub mechanic_id: Uuid,
    pub service_type: String,
    pub scheduled_time: DateTime<Utc>,
    pub estimated_duration_minutes: i32,
    pub estimated_cost: f64,
    pub latitude: f64,
    pub longitude: f64,
    pub issue_description: Option<String>,
    pub status: String,
    pub payment_status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = bookings)]
pub struct UpdateBookingEntity {
    pub status: Option<String>,
    pub actual_duration_minutes: Option<i32>,
    pub final_cost: Option<f64>,
    pub cancellation_reason: Option<String>,
    pub completion_time: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}
