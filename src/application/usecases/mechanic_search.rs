use std::cmp::Ordering;
use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use crate::domain::{
    repositories::mechanics::MechanicRepository,
    value_objects::{
        geo::{haversine_km, GeoPoint},
        mechanics::{NearbyMechanicModel, SearchMechanicsModel},
    },
};

pub struct MechanicSearchUseCase<M>
where
    M: MechanicRepository + Send + Sync + 'static,
{
    mechanic_repo: Arc<M>,
}

impl<M> MechanicSearchUseCase<M>
where
    M: MechanicRepository + Send + Sync + 'static,
{
    pub fn new(mechanic_repo: Arc<M>) -> Self {
        Self { mechanic_repo }
    }

    /// Distance is computed per request rather than cached: mechanic
    /// locations churn through the push channel.
    pub async fn search(
        &self,
        search_mechanics_model: SearchMechanicsModel,
    ) -> Result<Vec<NearbyMechanicModel>> {
        let ranked_by_distance =
            search_mechanics_model.use_location && !search_mechanics_model.location.is_origin();

        let candidates = self.mechanic_repo.list_candidates().await?;
        let candidate_count = candidates.len();

        let mut results: Vec<NearbyMechanicModel> = Vec::new();
        for mechanic in candidates {
            if !mechanic.availability {
                continue;
            }

            if let Some(service_type) = search_mechanics_model.service_type.as_deref() {
                if !mechanic.offers(service_type) {
                    continue;
                }
            }

            if !ranked_by_distance {
                results.push(NearbyMechanicModel {
                    mechanic: mechanic.into(),
                    distance_km: None,
                });
                continue;
            }

            // A mechanic that never pushed a fix cannot be ranked.
            let location = match (mechanic.current_latitude, mechanic.current_longitude) {
                (Some(latitude), Some(longitude)) => GeoPoint {
                    latitude,
                    longitude,
                },
                _ => continue,
            };

            let distance_km = haversine_km(search_mechanics_model.location, location);
            if distance_km <= search_mechanics_model.radius_km {
                results.push(NearbyMechanicModel {
                    mechanic: mechanic.into(),
                    distance_km: Some(distance_km),
                });
            }
        }

        if ranked_by_distance {
            results.sort_by(|a, b| {
                a.distance_km
                    .partial_cmp(&b.distance_km)
                    .unwrap_or(Ordering::Equal)
                    .then_with(|| a.mechanic.id.cmp(&b.mechanic.id))
            });
        }

        info!(
            candidate_count,
            result_count = results.len(),
            ranked_by_distance,
            "mechanic_search: search completed"
        );

        Ok(results)
    }
}
