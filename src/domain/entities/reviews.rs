use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::infrastructure::postgres::schema::reviews;

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = reviews)]
pub struct ReviewEntity {
    pub id: Uuid,
    pub user_id: Uuid,
    pub mechanic_id: Uuid,
    pub rating: f64,
    pub comment: Option<String>,
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ReviewEntity {
    /// A review without a tombstone still counts toward the mechanic's rating.
    pub fn is_live(&self) -> bool {
        self.deleted_at.is_none()
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = reviews)]
pub struct InsertReviewEntity {
    pub user_id: Uuid,
    pub mechanic_id: Uuid,
    pub rating: f64,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
