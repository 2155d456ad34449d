use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post},
};
use tracing::info;
use uuid::Uuid;

use crate::{
    application::usecases::subscriptions::{SubscriptionUseCase, VehicleSelection},
    domain::{
        repositories::{
            plans::PlanRepository, subscriptions::SubscriptionRepository, users::UserRepository,
            vehicles::VehicleRepository,
        },
        value_objects::subscriptions::ActivateSubscriptionModel,
    },
    infrastructure::{
        axum_http::auth::AuthUser,
        postgres::{
            postgres_connection::PgPool,
            repositories::{
                plans::PlanPostgres, subscriptions::SubscriptionPostgres, users::UserPostgres,
                vehicles::VehiclePostgres,
            },
        },
    },
};

pub fn routes(db_pool: Arc<PgPool>) -> Router {
    let subscription_repository = SubscriptionPostgres::new(Arc::clone(&db_pool));
    let plan_repository = PlanPostgres::new(Arc::clone(&db_pool));
    let vehicle_repository = VehiclePostgres::new(Arc::clone(&db_pool));
    let user_repository = UserPostgres::new(Arc::clone(&db_pool));

    let subscription_usecase = SubscriptionUseCase::new(
        Arc::new(subscription_repository),
        Arc::new(plan_repository),
        Arc::new(vehicle_repository),
        Arc::new(user_repository),
        VehicleSelection::default(),
    );

    Router::new()
        .route("/plans", get(list_plans))
        .route("/initiate", post(initiate_subscription))
        .route("/:subscription_id", delete(cancel_subscription))
        .route("/:subscription_id/schedule", get(list_schedule))
        .with_state(Arc::new(subscription_usecase))
}

pub async fn list_plans<S, P, V, U>(
    State(usecase): State<Arc<SubscriptionUseCase<S, P, V, U>>>,
    _auth: AuthUser,
) -> impl IntoResponse
where
    S: SubscriptionRepository + Send + Sync + 'static,
    P: PlanRepository + Send + Sync + 'static,
    V: VehicleRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
{
    match usecase.list_plans().await {
        Ok(plans) => Json(plans).into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn initiate_subscription<S, P, V, U>(
    State(usecase): State<Arc<SubscriptionUseCase<S, P, V, U>>>,
    AuthUser { user_id, .. }: AuthUser,
    Json(activate_subscription_model): Json<ActivateSubscriptionModel>,
) -> impl IntoResponse
where
    S: SubscriptionRepository + Send + Sync + 'static,
    P: PlanRepository + Send + Sync + 'static,
    V: VehicleRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
{
    info!(%user_id, "subscriptions: initiate request received");
    match usecase.activate(user_id, activate_subscription_model).await {
        Ok(subscription) => (StatusCode::CREATED, Json(subscription)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn cancel_subscription<S, P, V, U>(
    State(usecase): State<Arc<SubscriptionUseCase<S, P, V, U>>>,
    AuthUser { user_id, .. }: AuthUser,
    Path(subscription_id): Path<Uuid>,
) -> impl IntoResponse
where
    S: SubscriptionRepository + Send + Sync + 'static,
    P: PlanRepository + Send + Sync + 'static,
    V: VehicleRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
{
    info!(%user_id, %subscription_id, "subscriptions: cancel request received");
    match usecase.cancel(user_id, subscription_id).await {
        Ok(()) => StatusCode::OK.into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn list_schedule<S, P, V, U>(
    State(usecase): State<Arc<SubscriptionUseCase<S, P, V, U>>>,
    AuthUser { user_id, .. }: AuthUser,
    Path(subscription_id): Path<Uuid>,
) -> impl IntoResponse
where
    S: SubscriptionRepository + Send + Sync + 'static,
    P: PlanRepository + Send + Sync + 'static,
    V: VehicleRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
{
    match usecase.list_schedule(user_id, subscription_id).await {
        Ok(schedule) => Json(schedule).into_response(),
        Err(err) => err.into_response(),
    }
}
