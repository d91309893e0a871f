//! Route handlers.

pub mod analyze;
pub mod health;

use axum::{extract::rejection::JsonRejection, http::StatusCode, Json};
use mia_core::MiaError;
use serde::{Deserialize, Serialize};

/// Error body, `{"detail": "..."}`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub detail: String,
}

pub type ApiError = (StatusCode, Json<ErrorBody>);

/// Map a core error to a response. Caller mistakes are 400, everything else 500.
pub fn api_error(e: MiaError) -> ApiError {
    let status = if e.is_client_error() {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };
    (status, Json(ErrorBody { detail: e.to_string() }))
}

/// Map a body that failed to parse into the same `{detail}` shape.
pub fn json_rejection(rejection: JsonRejection) -> ApiError {
    (
        rejection.status(),
        Json(ErrorBody {
            detail: rejection.body_text(),
        }),
    )
}
