use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use diesel::{RunQueryDsl, prelude::*, update};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    domain::{entities::mechanics::MechanicEntity, repositories::mechanics::MechanicRepository},
    infrastructure::postgres::{postgres_connection::PgPool, schema::mechanics},
};

pub struct MechanicPostgres {
    db_pool: Arc<PgPool>,
}

impl MechanicPostgres {
    pub fn new(db_pool: Arc<PgPool>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl MechanicRepository for MechanicPostgres {
    async fn find_by_id(&self, mechanic_id: Uuid) -> Result<Option<MechanicEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = mechanics::table
            .filter(mechanics::id.eq(mechanic_id))
            .select(MechanicEntity::as_select())
            .first::<MechanicEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn find_by_user_id(&self, user_id: Uuid) -> Result<Option<MechanicEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = mechanics::table
            .filter(mechanics::user_id.eq(user_id))
            .select(MechanicEntity::as_select())
            .first::<MechanicEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn list_candidates(&self) -> Result<Vec<MechanicEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = mechanics::table
            .select(MechanicEntity::as_select())
            .load::<MechanicEntity>(&mut conn)?;

        Ok(results)
    }

    async fn set_rating(&self, mechanic_id: Uuid, rating: f64) -> Result<()> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        update(mechanics::table.filter(mechanics::id.eq(mechanic_id)))
            .set((
                mechanics::rating.eq(rating),
                mechanics::updated_at.eq(Utc::now()),
            ))
            .execute(&mut conn)?;

        Ok(())
    }

    async fn update_location(
        &self,
        mechanic_id: Uuid,
        latitude: f64,
        longitude: f64,
    ) -> Result<()> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        update(mechanics::table.filter(mechanics::id.eq(mechanic_id)))
            .set((
                mechanics::current_latitude.eq(Some(latitude)),
                mechanics::current_longitude.eq(Some(longitude)),
                mechanics::availability.eq(true),
                mechanics::updated_at.eq(Utc::now()),
            ))
            .execute(&mut conn)?;

        Ok(())
    }
}
