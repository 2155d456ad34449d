use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{entities::mechanics::MechanicEntity, value_objects::geo::GeoPoint};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MechanicModel {
    pub id: Uuid,
    pub user_id: Uuid,
    pub services: Vec<String>,
    pub availability: bool,
    pub current_location: Option<GeoPoint>,
    pub service_radius_km: f64,
    pub rating: f64,
    pub experience_years: i32,
    pub certifications: Vec<String>,
}

impl From<MechanicEntity> for MechanicModel {
    fn from(entity: MechanicEntity) -> Self {
        let current_location = match (entity.current_latitude, entity.current_longitude) {
            (Some(latitude), Some(longitude)) => Some(GeoPoint {
                latitude,
                longitude,
            }),
            _ => None,
        };

        Self {
            id: entity.id,
            user_id: entity.user_id,
            services: entity.services,
            availability: entity.availability,
            current_location,
            service_radius_km: entity.service_radius_km,
            rating: entity.rating,
            experience_years: entity.experience_years,
            certifications: entity.certifications,
        }
    }
}

/// Search hit: distance is absent when the search ran without a location.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NearbyMechanicModel {
    #[serde(flatten)]
    pub mechanic: MechanicModel,
    pub distance_km: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchMechanicsModel {
    pub location: GeoPoint,
    pub radius_km: f64,
    pub service_type: Option<String>,
    pub use_location: bool,
}

/// Event pushed from a mechanic's device and fanned out to that mechanic's
/// subscribers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LocationEventModel {
    pub latitude: f64,
    pub longitude: f64,
    pub accuracy: Option<f64>,
    pub speed: Option<f64>,
    pub heading: Option<f64>,
    pub recorded_at: DateTime<Utc>,
}
