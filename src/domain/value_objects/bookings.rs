use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{
    entities::bookings::{BookingEntity, InsertBookingEntity},
    value_objects::{
        enums::{
            booking_statuses::BookingStatus, payment_statuses::PaymentStatus,
            sort_order::SortOrder,
        },
        geo::GeoPoint,
        mechanics::MechanicModel,
        users::PartyModel,
    },
};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BookingModel {
    pub id: Uuid,
    pub user_id: Uuid,
    pub mechanic_id: Uuid,
    pub service_type: String,
    pub scheduled_time: DateTime<Utc>,
    pub estimated_duration_minutes: i32,
    pub actual_duration_minutes: Option<i32>,
    pub estimated_cost: f64,
    pub final_cost: Option<f64>,
    pub service_location: GeoPoint,
    pub issue_description: Option<String>,
    pub status: BookingStatus,
    pub payment_status: PaymentStatus,
    pub cancellation_reason: Option<String>,
    pub completion_time: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<BookingEntity> for BookingModel {
    fn from(entity: BookingEntity) -> Self {
        Self {
            id: entity.id,
            user_id: entity.user_id,
            mechanic_id: entity.mechanic_id,
            service_type: entity.service_type,
            scheduled_time: entity.scheduled_time,
            estimated_duration_minutes: entity.estimated_duration_minutes,
            actual_duration_minutes: entity.actual_duration_minutes,
            estimated_cost: entity.estimated_cost,
            final_cost: entity.final_cost,
            service_location: GeoPoint {
                latitude: entity.latitude,
                longitude: entity.longitude,
            },
            issue_description: entity.issue_description,
            status: BookingStatus::from_str(&entity.status).unwrap_or_default(),
            payment_status: PaymentStatus::from_str(&entity.payment_status).unwrap_or_default(),
            cancellation_reason: entity.cancellation_reason,
            completion_time: entity.completion_time,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

/// Booking with its two parties looked up and attached.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BookingDetailModel {
    #[serde(flatten)]
    pub booking: BookingModel,
    pub requester: PartyModel,
    pub mechanic: MechanicModel,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBookingModel {
    pub mechanic_id: Uuid,
    pub service_type: String,
    pub scheduled_time: DateTime<Utc>,
    pub estimated_duration_minutes: i32,
    pub service_location: GeoPoint,
    pub estimated_cost: f64,
    pub issue_description: Option<String>,
}

impl CreateBookingModel {
    pub fn to_entity(&self, user_id: Uuid) -> InsertBookingEntity {
        InsertBookingEntity {
            user_id,
            mechanic_id: self.mechanic_id,
            service_type: self.service_type.clone(),
            scheduled_time: self.scheduled_time,
            estimated_duration_minutes: self.estimated_duration_minutes,
            estimated_cost: self.estimated_cost,
            latitude: self.service_location.latitude,
            longitude: self.service_location.longitude,
            issue_description: self.issue_description.clone(),
            status: BookingStatus::Pending.to_string(),
            payment_status: PaymentStatus::Pending.to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateBookingModel {
    pub status: BookingStatus,
    pub cancellation_reason: Option<String>,
    pub actual_duration_minutes: Option<i32>,
    pub final_cost: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ListBookingsFilter {
    pub status: Option<BookingStatus>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub page: i64,
    pub limit: i64,
    pub order: SortOrder,
}

/// Repository-level query built from a filter after role scoping.
#[derive(Debug, Clone, PartialEq)]
pub struct BookingListQuery {
    pub user_id: Option<Uuid>,
    pub mechanic_id: Option<Uuid>,
    pub status: Option<String>,
    pub scheduled_from: Option<DateTime<Utc>>,
    pub scheduled_to: Option<DateTime<Utc>>,
    pub limit: i64,
    pub offset: i64,
    pub order: SortOrder,
}
