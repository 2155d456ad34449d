use crate::{
    application::usecases::bookings::{BookingUseCase, ConflictPolicy},
    domain::{
        repositories::{
            bookings::BookingRepository, mechanics::MechanicRepository, users::UserRepository,
        },
        value_objects::{
            bookings::{CreateBookingModel, ListBookingsFilter, UpdateBookingModel},
            enums::{booking_statuses::BookingStatus, sort_order::SortOrder},
        },
    },
    infrastructure::{
        axum_http::auth::AuthUser,
        postgres::{
            postgres_connection::PgPool,
            repositories::{
                bookings::BookingPostgres, mechanics::MechanicPostgres, users::UserPostgres,
            },
        },
    },
};
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, put},
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

const DEFAULT_PAGE_LIMIT: i64 = 20;
const MAX_PAGE_LIMIT: i64 = 100;

#[derive(Debug, Deserialize)]
pub struct ListBookingsQuery {
    status: Option<String>,
    start_date: Option<String>,
    end_date: Option<String>,
    page: Option<i64>,
    limit: Option<i64>,
    order: Option<String>,
}

pub fn routes(db_pool: Arc<PgPool>) -> Router {
    let booking_repository = BookingPostgres::new(Arc::clone(&db_pool));
    let mechanic_repository = MechanicPostgres::new(Arc::clone(&db_pool));
    let user_repository = UserPostgres::new(Arc::clone(&db_pool));

    let booking_usecase = BookingUseCase::new(
        Arc::new(booking_repository),
        Arc::new(mechanic_repository),
        Arc::new(user_repository),
        ConflictPolicy::default(),
    );

    Router::new()
        .route("/", get(list_bookings).post(create_booking))
        .route("/:booking_id", put(update_booking))
        .with_state(Arc::new(booking_usecase))
}

pub async fn create_booking<B, M, U>(
    State(usecase): State<Arc<BookingUseCase<B, M, U>>>,
    AuthUser { user_id, .. }: AuthUser,
    Json(create_booking_model): Json<CreateBookingModel>,
) -> impl IntoResponse
where
    B: BookingRepository + Send + Sync + 'static,
    M: MechanicRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
{
    info!(%user_id, "bookings: create request received");
    match usecase.create(user_id, create_booking_model).await {
        Ok(booking) => (StatusCode::CREATED, Json(booking)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn update_booking<B, M, U>(
    State(usecase): State<Arc<BookingUseCase<B, M, U>>>,
    AuthUser { user_id, role }: AuthUser,
    Path(booking_id): Path<Uuid>,
    Json(update_booking_model): Json<UpdateBookingModel>,
) -> impl IntoResponse
where
    B: BookingRepository + Send + Sync + 'static,
    M: MechanicRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
{
    info!(%user_id, %booking_id, "bookings: update request received");
    match usecase
        .update(user_id, role, booking_id, update_booking_model)
        .await
    {
        Ok(booking) => Json(booking).into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn list_bookings<B, M, U>(
    State(usecase): State<Arc<BookingUseCase<B, M, U>>>,
    AuthUser { user_id, role }: AuthUser,
    Query(query): Query<ListBookingsQuery>,
) -> impl IntoResponse
where
    B: BookingRepository + Send + Sync + 'static,
    M: MechanicRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
{
    info!(%user_id, "bookings: list request received");

    let limit = query.limit.unwrap_or(DEFAULT_PAGE_LIMIT);
    if limit <= 0 {
        return (
            StatusCode::BAD_REQUEST,
            "limit must be a positive number".to_string(),
        )
            .into_response();
    }
    if limit > MAX_PAGE_LIMIT {
        return (
            StatusCode::BAD_REQUEST,
            format!("limit must be <= {}", MAX_PAGE_LIMIT),
        )
            .into_response();
    }

    let page = query.page.unwrap_or(1);
    if page <= 0 {
        return (
            StatusCode::BAD_REQUEST,
            "page must be a positive number".to_string(),
        )
            .into_response();
    }

    let status = match query.status.as_deref() {
        None => None,
        Some(raw) => match BookingStatus::from_str(raw) {
            Some(parsed) => Some(parsed),
            None => {
                return (
                    StatusCode::BAD_REQUEST,
                    format!("unknown booking status: {}", raw),
                )
                    .into_response();
            }
        },
    };

    let start_date = match parse_rfc3339(query.start_date.as_deref()) {
        Ok(parsed) => parsed,
        Err(response) => return response,
    };
    let end_date = match parse_rfc3339(query.end_date.as_deref()) {
        Ok(parsed) => parsed,
        Err(response) => return response,
    };

    let order = match query.order.as_deref() {
        None => SortOrder::Desc,
        Some(raw) => match SortOrder::from_str(raw) {
            Some(parsed) => parsed,
            None => {
                return (
                    StatusCode::BAD_REQUEST,
                    "order must be asc or desc".to_string(),
                )
                    .into_response();
            }
        },
    };

    let filter = ListBookingsFilter {
        status,
        start_date,
        end_date,
        page,
        limit,
        order,
    };

    match usecase.list(user_id, role, filter).await {
        Ok(bookings) => Json(bookings).into_response(),
        Err(err) => err.into_response(),
    }
}

fn parse_rfc3339(
    raw: Option<&str>,
) -> Result<Option<DateTime<Utc>>, axum::response::Response> {
    match raw {
        None => Ok(None),
        Some(value) => match DateTime::parse_from_rfc3339(value) {
            Ok(parsed) => Ok(Some(parsed.with_timezone(&Utc))),
            Err(_) => Err((
                StatusCode::BAD_REQUEST,
                format!("{} is not an RFC3339 timestamp", value),
            )
                .into_response()),
        },
    }
}
