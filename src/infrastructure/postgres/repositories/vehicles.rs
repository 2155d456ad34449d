use anyhow::Result;
use async_trait::async_trait;
use diesel::{RunQueryDsl, prelude::*};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    domain::{entities::vehicles::VehicleEntity, repositories::vehicles::VehicleRepository},
    infrastructure::postgres::{postgres_connection::PgPool, schema::vehicles},
};

pub struct VehiclePostgres {
    db_pool: Arc<PgPool>,
}

impl VehiclePostgres {
    pub fn new(db_pool: Arc<PgPool>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl VehicleRepository for VehiclePostgres {
    async fn find_by_id(&self, vehicle_id: Uuid) -> Result<Option<VehicleEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = vehicles::table
            .filter(vehicles::id.eq(vehicle_id))
            .select(VehicleEntity::as_select())
            .first::<VehicleEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn find_most_recent_for_user(&self, user_id: Uuid) -> Result<Option<VehicleEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = vehicles::table
            .filter(vehicles::user_id.eq(user_id))
            .order(vehicles::created_at.desc())
            .select(VehicleEntity::as_select())
            .first::<VehicleEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }
}
