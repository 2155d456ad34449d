use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{
    entities::bookings::{BookingEntity, InsertBookingEntity, UpdateBookingEntity},
    value_objects::bookings::BookingListQuery,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookingRepository {
    async fn create(&self, insert_booking_entity: InsertBookingEntity) -> Result<BookingEntity>;

    async fn find_by_id(&self, booking_id: Uuid) -> Result<Option<BookingEntity>>;

    /// All bookings of one mechanic currently carrying the given status.
    async fn list_by_mechanic_and_status(
        &self,
        mechanic_id: Uuid,
        status: String,
    ) -> Result<Vec<BookingEntity>>;

    async fn update(
        &self,
        booking_id: Uuid,
        update_booking_entity: UpdateBookingEntity,
    ) -> Result<BookingEntity>;

    async fn list(&self, query: BookingListQuery) -> Result<Vec<BookingEntity>>;
}
