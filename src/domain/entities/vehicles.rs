use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::infrastructure::postgres::schema::vehicles;

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = vehicles)]
pub struct VehicleEntity {
    pub id: Uuid,
    pub user_id: Uuid,
    pub make: String,
    pub model: String,
    pub year: i32,
    pub license_plate: Option<String>,
    pub created_at: DateTime<Utc>,
}
