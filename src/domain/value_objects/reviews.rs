use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::reviews::ReviewEntity;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReviewModel {
    pub id: Uuid,
    pub user_id: Uuid,
    pub mechanic_id: Uuid,
    pub rating: f64,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ReviewEntity> for ReviewModel {
    fn from(entity: ReviewEntity) -> Self {
        Self {
            id: entity.id,
            user_id: entity.user_id,
            mechanic_id: entity.mechanic_id,
            rating: entity.rating,
            comment: entity.comment,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateReviewModel {
    pub mechanic_id: Uuid,
    pub rating: f64,
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateReviewModel {
    pub rating: Option<f64>,
    pub comment: Option<String>,
}
