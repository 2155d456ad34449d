use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::{broadcast, RwLock};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::domain::{
    repositories::mechanics::MechanicRepository,
    value_objects::mechanics::LocationEventModel,
};

/// Bounded per-channel backlog; a lagging subscriber skips ahead rather than
/// stalling the publisher.
const CHANNEL_CAPACITY: usize = 32;

/// One broadcast topic per mechanic. Events fan out only to subscribers of
/// that mechanic's channel, never across channels.
#[derive(Clone, Default)]
pub struct LocationChannels {
    inner: Arc<RwLock<HashMap<Uuid, broadcast::Sender<LocationEventModel>>>>,
}

impl LocationChannels {
    pub fn new() -> Self {
        Self::default()
    }

    async fn sender_for(&self, mechanic_id: Uuid) -> broadcast::Sender<LocationEventModel> {
        let mut channels = self.inner.write().await;
        channels
            .entry(mechanic_id)
            .or_insert_with(|| broadcast::channel(CHANNEL_CAPACITY).0)
            .clone()
    }

    pub async fn subscribe(&self, mechanic_id: Uuid) -> broadcast::Receiver<LocationEventModel> {
        self.sender_for(mechanic_id).await.subscribe()
    }

    /// Returns the number of subscribers that received the event.
    pub async fn publish(&self, mechanic_id: Uuid, event: LocationEventModel) -> usize {
        self.sender_for(mechanic_id).await.send(event).unwrap_or(0)
    }
}

#[derive(Debug, Error)]
pub enum LocationError {
    #[error("mechanic not found")]
    MechanicNotFound,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl LocationError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            LocationError::MechanicNotFound => StatusCode::NOT_FOUND,
            LocationError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            LocationError::MechanicNotFound => "not_found",
            LocationError::Internal(_) => "internal",
        }
    }
}

pub type LocationResult<T> = std::result::Result<T, LocationError>;

pub struct MechanicLocationUseCase<M>
where
    M: MechanicRepository + Send + Sync + 'static,
{
    mechanic_repo: Arc<M>,
    channels: LocationChannels,
}

impl<M> MechanicLocationUseCase<M>
where
    M: MechanicRepository + Send + Sync + 'static,
{
    pub fn new(mechanic_repo: Arc<M>, channels: LocationChannels) -> Self {
        Self {
            mechanic_repo,
            channels,
        }
    }

    /// Device push: overwrite the current fix, mark the mechanic available,
    /// forward the event to this mechanic's subscribers.
    pub async fn push(
        &self,
        user_id: Uuid,
        location_event_model: LocationEventModel,
    ) -> LocationResult<()> {
        let mechanic = self
            .mechanic_repo
            .find_by_user_id(user_id)
            .await
            .map_err(|err| {
                error!(db_error = ?err, "locations: failed to resolve mechanic profile");
                LocationError::Internal(err)
            })?
            .ok_or_else(|| {
                warn!(%user_id, "locations: push from user without mechanic profile");
                LocationError::MechanicNotFound
            })?;

        self.mechanic_repo
            .update_location(
                mechanic.id,
                location_event_model.latitude,
                location_event_model.longitude,
            )
            .await
            .map_err(|err| {
                error!(db_error = ?err, "locations: failed to store location");
                LocationError::Internal(err)
            })?;

        let delivered = self
            .channels
            .publish(mechanic.id, location_event_model)
            .await;

        info!(
            mechanic_id = %mechanic.id,
            delivered,
            "locations: location event published"
        );

        Ok(())
    }

    pub async fn subscribe(
        &self,
        mechanic_id: Uuid,
    ) -> LocationResult<broadcast::Receiver<LocationEventModel>> {
        self.mechanic_repo
            .find_by_id(mechanic_id)
            .await
            .map_err(|err| {
                error!(db_error = ?err, "locations: failed to load mechanic");
                LocationError::Internal(err)
            })?
            .ok_or(LocationError::MechanicNotFound)?;

        Ok(self.channels.subscribe(mechanic_id).await)
    }
}
