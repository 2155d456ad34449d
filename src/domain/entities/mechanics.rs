use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::infrastructure::postgres::schema::mechanics;

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = mechanics)]
pub struct MechanicEntity {
    pub id: Uuid,
    pub user_id: Uuid,
    pub services: Vec<String>,
    pub availability: bool,
    pub current_latitude: Option<f64>,
    pub current_longitude: Option<f64>,
    pub service_radius_km: f64,
    pub rating: f64,
    pub experience_years: i32,
    pub certifications: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl MechanicEntity {
    pub fn offers(&self, service_type: &str) -> bool {
        self.services.iter().any(|s| s == service_type)
    }
}
