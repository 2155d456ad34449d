use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::users::UserEntity;

/// Thin projection of a user attached to booking responses.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PartyModel {
    pub id: Uuid,
    pub display_name: String,
    pub phone: Option<String>,
}

impl From<UserEntity> for PartyModel {
    fn from(entity: UserEntity) -> Self {
        Self {
            id: entity.id,
            display_name: entity.display_name,
            phone: entity.phone,
        }
    }
}
