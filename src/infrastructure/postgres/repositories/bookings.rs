use anyhow::Result;
use async_trait::async_trait;
use diesel::{RunQueryDsl, insert_into, prelude::*, update};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    domain::{
        entities::bookings::{BookingEntity, InsertBookingEntity, UpdateBookingEntity},
        repositories::bookings::BookingRepository,
        value_objects::{bookings::BookingListQuery, enums::sort_order::SortOrder},
    },
    infrastructure::postgres::{postgres_connection::PgPool, schema::bookings},
};

pub struct BookingPostgres {
    db_pool: Arc<PgPool>,
}

impl BookingPostgres {
    pub fn new(db_pool: Arc<PgPool>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl BookingRepository for BookingPostgres {
    async fn create(&self, insert_booking_entity: InsertBookingEntity) -> Result<BookingEntity> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = insert_into(bookings::table)
            .values(&insert_booking_entity)
            .returning(BookingEntity::as_returning())
            .get_result::<BookingEntity>(&mut conn)?;

        Ok(result)
    }

    async fn find_by_id(&self, booking_id: Uuid) -> Result<Option<BookingEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = bookings::table
            .filter(bookings::id.eq(booking_id))
            .select(BookingEntity::as_select())
            .first::<BookingEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn list_by_mechanic_and_status(
        &self,
        mechanic_id: Uuid,
        status: String,
    ) -> Result<Vec<BookingEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = bookings::table
            .filter(bookings::mechanic_id.eq(mechanic_id))
            .filter(bookings::status.eq(status))
            .select(BookingEntity::as_select())
            .load::<BookingEntity>(&mut conn)?;

        Ok(results)
    }

    async fn update(
        &self,
        booking_id: Uuid,
        update_booking_entity: UpdateBookingEntity,
    ) -> Result<BookingEntity> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = update(bookings::table.filter(bookings::id.eq(booking_id)))
            .set(&update_booking_entity)
            .returning(BookingEntity::as_returning())
            .get_result::<BookingEntity>(&mut conn)?;

        Ok(result)
    }

    async fn list(&self, query: BookingListQuery) -> Result<Vec<BookingEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let mut statement = bookings::table.into_boxed();

        if let Some(user_id) = query.user_id {
            statement = statement.filter(bookings::user_id.eq(user_id));
        }
        if let Some(mechanic_id) = query.mechanic_id {
            statement = statement.filter(bookings::mechanic_id.eq(mechanic_id));
        }
        if let Some(status) = query.status {
            statement = statement.filter(bookings::status.eq(status));
        }
        if let Some(scheduled_from) = query.scheduled_from {
            statement = statement.filter(bookings::scheduled_time.ge(scheduled_from));
        }
        if let Some(scheduled_to) = query.scheduled_to {
            statement = statement.filter(bookings::scheduled_time.le(scheduled_to));
        }

        statement = match query.order {
            SortOrder::Asc => statement.order(bookings::scheduled_time.asc()),
            SortOrder::Desc => statement.order(bookings::scheduled_time.desc()),
        };

        let results = statement
            .offset(query.offset)
            .limit(query.limit)
            .select(BookingEntity::as_select())
            .load::<BookingEntity>(&mut conn)?;

        Ok(results)
    }
}
