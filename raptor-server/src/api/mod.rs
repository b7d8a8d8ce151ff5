pub mod health;
pub mod search;

use axum::{http::StatusCode, response::{IntoResponse, Response}, Json};
use raptor_core::prelude::RaptorError;

use crate::dto::ErrorBody;

/// Maps the engine's typed errors onto HTTP status codes: malformed input
/// is the caller's fault, a provider-contract violation or an
/// unreconstructible journey is ours.
pub struct ApiError(pub RaptorError);

impl From<RaptorError> for ApiError {
    fn from(err: RaptorError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.0 {
            RaptorError::InvalidStop(_)
            | RaptorError::InvalidTime(_)
            | RaptorError::EmptyAccessLegs
            | RaptorError::InvalidMaxTransfers(_)
            | RaptorError::InvalidDepartureWindow { .. } => StatusCode::BAD_REQUEST,
            RaptorError::InvalidPattern(_)
            | RaptorError::InvalidTrip { .. }
            | RaptorError::MonotonicityViolation { .. }
            | RaptorError::MaxTransfersExceeded(_)
            | RaptorError::InvalidJourney => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(ErrorBody::from(self.0))).into_response()
    }
}
