use std::convert::Infallible;
use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{
        IntoResponse, Response,
        sse::{Event, KeepAlive, Sse},
    },
    routing::{get, post},
};
use futures_util::stream;
use serde::Deserialize;
use tokio::sync::broadcast;
use tracing::info;
use uuid::Uuid;

use crate::{
    application::usecases::{
        mechanic_location::{LocationChannels, MechanicLocationUseCase},
        mechanic_search::MechanicSearchUseCase,
    },
    domain::{
        repositories::mechanics::MechanicRepository,
        value_objects::{
            geo::GeoPoint,
            mechanics::{LocationEventModel, SearchMechanicsModel},
        },
    },
    infrastructure::{
        axum_http::auth::AuthUser,
        postgres::{postgres_connection::PgPool, repositories::mechanics::MechanicPostgres},
    },
};

const DEFAULT_SEARCH_RADIUS_KM: f64 = 10.0;

#[derive(Debug, Deserialize)]
pub struct SearchMechanicsQuery {
    latitude: Option<f64>,
    longitude: Option<f64>,
    radius: Option<f64>,
    service_type: Option<String>,
    use_location: Option<bool>,
}

pub fn routes(db_pool: Arc<PgPool>) -> Router {
    let search_repository = MechanicPostgres::new(Arc::clone(&db_pool));
    let search_usecase = MechanicSearchUseCase::new(Arc::new(search_repository));

    let location_repository = MechanicPostgres::new(Arc::clone(&db_pool));
    let location_usecase = MechanicLocationUseCase::new(
        Arc::new(location_repository),
        LocationChannels::new(),
    );

    let search_router = Router::new()
        .route("/", get(search_mechanics))
        .with_state(Arc::new(search_usecase));

    let location_router = Router::new()
        .route("/location", post(push_location))
        .route("/:mechanic_id/location/stream", get(stream_location))
        .with_state(Arc::new(location_usecase));

    search_router.merge(location_router)
}

pub async fn search_mechanics<M>(
    State(usecase): State<Arc<MechanicSearchUseCase<M>>>,
    _auth: AuthUser,
    Query(query): Query<SearchMechanicsQuery>,
) -> impl IntoResponse
where
    M: MechanicRepository + Send + Sync + 'static,
{
    let radius_km = query.radius.unwrap_or(DEFAULT_SEARCH_RADIUS_KM);
    if radius_km <= 0.0 {
        return (
            StatusCode::BAD_REQUEST,
            "radius must be a positive number".to_string(),
        )
            .into_response();
    }

    let search = SearchMechanicsModel {
        location: GeoPoint {
            latitude: query.latitude.unwrap_or(0.0),
            longitude: query.longitude.unwrap_or(0.0),
        },
        radius_km,
        service_type: query.service_type,
        use_location: query.use_location.unwrap_or(false),
    };

    match usecase.search(search).await {
        Ok(mechanics) => Json(mechanics).into_response(),
        Err(err) => {
            tracing::error!(error = ?err, "mechanics: search failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to search mechanics".to_string(),
            )
                .into_response()
        }
    }
}

pub async fn push_location<M>(
    State(usecase): State<Arc<MechanicLocationUseCase<M>>>,
    AuthUser { user_id, .. }: AuthUser,
    Json(location_event_model): Json<LocationEventModel>,
) -> impl IntoResponse
where
    M: MechanicRepository + Send + Sync + 'static,
{
    match usecase.push(user_id, location_event_model).await {
        Ok(()) => StatusCode::ACCEPTED.into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn stream_location<M>(
    State(usecase): State<Arc<MechanicLocationUseCase<M>>>,
    _auth: AuthUser,
    Path(mechanic_id): Path<Uuid>,
) -> Response
where
    M: MechanicRepository + Send + Sync + 'static,
{
    let receiver = match usecase.subscribe(mechanic_id).await {
        Ok(receiver) => receiver,
        Err(err) => return err.into_response(),
    };

    info!(%mechanic_id, "mechanics: location stream opened");

    let stream = stream::unfold(receiver, |mut receiver| async move {
        loop {
            match receiver.recv().await {
                Ok(event) => match Event::default().json_data(&event) {
                    Ok(sse_event) => {
                        return Some((Ok::<Event, Infallible>(sse_event), receiver));
                    }
                    Err(_) => continue,
                },
                // A slow consumer skips dropped events instead of erroring.
                Err(broadcast::error::RecvError::Lagged(_)) => continue,
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    });

    Sse::new(stream).keep_alive(KeepAlive::default()).into_response()
}
