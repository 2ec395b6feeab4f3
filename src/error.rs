use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use crate::models::actor::Role;
use crate::models::order::OrderStatus;

/// Every rejection the service can produce. Each transition failure carries
/// its specific kind so callers can tell a wrong role from a wrong state
/// from a lost claim.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("authentication required")]
    Unauthenticated,

    #[error("requires role {required:?}, actor is {actual:?}")]
    UnauthorizedRole { required: Role, actual: Role },

    #[error("courier is not verified")]
    Unverified,

    #[error("order is {actual:?}, expected {expected:?}")]
    IllegalState {
        expected: OrderStatus,
        actual: OrderStatus,
    },

    #[error("order already taken")]
    AlreadyAssigned,

    #[error("order is assigned to another courier")]
    NotAssignee,

    #[error("store error: {0}")]
    Store(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Stable label used as the metrics outcome and in response bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "validation",
            AppError::NotFound(_) => "not_found",
            AppError::Unauthenticated => "unauthenticated",
            AppError::UnauthorizedRole { .. } => "unauthorized_role",
            AppError::Unverified => "unverified",
            AppError::IllegalState { .. } => "illegal_state",
            AppError::AlreadyAssigned => "already_assigned",
            AppError::NotAssignee => "not_assignee",
            AppError::Store(_) => "store",
            AppError::Internal(_) => "internal",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Unauthenticated => StatusCode::UNAUTHORIZED,
            AppError::UnauthorizedRole { .. } | AppError::Unverified | AppError::NotAssignee => {
                StatusCode::FORBIDDEN
            }
            AppError::IllegalState { .. } | AppError::AlreadyAssigned => StatusCode::CONFLICT,
            AppError::Store(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": self.to_string(),
            "kind": self.kind(),
        }));

        (status, body).into_response()
    }
}
