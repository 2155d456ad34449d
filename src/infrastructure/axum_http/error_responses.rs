use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::application::usecases::{
    bookings::BookingError, mechanic_location::LocationError, reviews::ReviewError,
    subscriptions::SubscriptionError,
};

/// Wire shape for every error: `error` is the stable machine-readable kind,
/// `message` the human-readable one.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub code: u16,
    pub error: &'static str,
    pub message: String,
}

pub fn error_response(status: StatusCode, kind: &'static str, message: String) -> Response {
    let body = Json(ErrorResponse {
        code: status.as_u16(),
        error: kind,
        message,
    });

    (status, body).into_response()
}

impl IntoResponse for BookingError {
    fn into_response(self) -> Response {
        let message = match &self {
            // Don't leak internal error detail to the client.
            BookingError::Internal(_) => "Internal server error".to_string(),
            other => other.to_string(),
        };
        error_response(self.status_code(), self.kind(), message)
    }
}

impl IntoResponse for SubscriptionError {
    fn into_response(self) -> Response {
        let message = match &self {
            SubscriptionError::Internal(_) => "Internal server error".to_string(),
            other => other.to_string(),
        };
        error_response(self.status_code(), self.kind(), message)
    }
}

impl IntoResponse for ReviewError {
    fn into_response(self) -> Response {
        let message = match &self {
            ReviewError::Internal(_) => "Internal server error".to_string(),
            other => other.to_string(),
        };
        error_response(self.status_code(), self.kind(), message)
    }
}

impl IntoResponse for LocationError {
    fn into_response(self) -> Response {
        let message = match &self {
            LocationError::Internal(_) => "Internal server error".to_string(),
            other => other.to_string(),
        };
        error_response(self.status_code(), self.kind(), message)
    }
}
