use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{post, put},
};
use tracing::info;
use uuid::Uuid;

use crate::{
    application::usecases::reviews::ReviewUseCase,
    domain::{
        repositories::{mechanics::MechanicRepository, reviews::ReviewRepository},
        value_objects::reviews::{CreateReviewModel, UpdateReviewModel},
    },
    infrastructure::{
        axum_http::auth::AuthUser,
        postgres::{
            postgres_connection::PgPool,
            repositories::{mechanics::MechanicPostgres, reviews::ReviewPostgres},
        },
    },
};

pub fn routes(db_pool: Arc<PgPool>) -> Router {
    let review_repository = ReviewPostgres::new(Arc::clone(&db_pool));
    let mechanic_repository = MechanicPostgres::new(Arc::clone(&db_pool));

    let review_usecase =
        ReviewUseCase::new(Arc::new(review_repository), Arc::new(mechanic_repository));

    Router::new()
        .route("/", post(create_review))
        .route("/:review_id", put(update_review).delete(delete_review))
        .with_state(Arc::new(review_usecase))
}

pub async fn create_review<R, M>(
    State(usecase): State<Arc<ReviewUseCase<R, M>>>,
    AuthUser { user_id, .. }: AuthUser,
    Json(create_review_model): Json<CreateReviewModel>,
) -> impl IntoResponse
where
    R: ReviewRepository + Send + Sync + 'static,
    M: MechanicRepository + Send + Sync + 'static,
{
    info!(%user_id, "reviews: create request received");
    match usecase.create(user_id, create_review_model).await {
        Ok(review) => (StatusCode::CREATED, Json(review)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn update_review<R, M>(
    State(usecase): State<Arc<ReviewUseCase<R, M>>>,
    AuthUser { user_id, .. }: AuthUser,
    Path(review_id): Path<Uuid>,
    Json(update_review_model): Json<UpdateReviewModel>,
) -> impl IntoResponse
where
    R: ReviewRepository + Send + Sync + 'static,
    M: MechanicRepository + Send + Sync + 'static,
{
    match usecase.update(user_id, review_id, update_review_model).await {
        Ok(review) => Json(review).into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn delete_review<R, M>(
    State(usecase): State<Arc<ReviewUseCase<R, M>>>,
    AuthUser { user_id, .. }: AuthUser,
    Path(review_id): Path<Uuid>,
) -> impl IntoResponse
where
    R: ReviewRepository + Send + Sync + 'static,
    M: MechanicRepository + Send + Sync + 'static,
{
    match usecase.delete(user_id, review_id).await {
        Ok(()) => StatusCode::OK.into_response(),
        Err(err) => err.into_response(),
    }
}
