use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use derive_more::Display;
use serde_json::json;

use crate::model::{leave_request::LeaveStatus, role::Role};

/// Error taxonomy for the leave and attendance APIs. Validation and
/// not-found errors are raised before any write; transition errors carry
/// the request id and the status at refusal time so the client can say
/// why the decision was refused.
#[derive(Debug, Display)]
pub enum ApiError {
    #[display(fmt = "only workers, supervisors and managers may submit leave")]
    InvalidRole,

    #[display(fmt = "start_date cannot be after end_date")]
    InvalidDateRange,

    #[display(fmt = "worker profile not found")]
    WorkerNotFound,

    #[display(fmt = "leave request not found")]
    RequestNotFound,

    #[display(fmt = "leave request #{} is already finalized as {}", id, status)]
    AlreadyFinalized { id: u64, status: LeaveStatus },

    #[display(fmt = "{} may not decide leave request #{} in status {}", role, id, status)]
    UnauthorizedTransition {
        id: u64,
        role: Role,
        status: LeaveStatus,
    },

    #[display(fmt = "{}", _0)]
    Forbidden(&'static str),

    #[display(fmt = "internal server error")]
    Internal(String),

    #[display(fmt = "internal server error")]
    Database(sqlx::Error),
}

impl From<sqlx::Error> for ApiError {
    fn from(e: sqlx::Error) -> Self {
        tracing::error!(error = %e, "database error");
        ApiError::Database(e)
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidRole | ApiError::InvalidDateRange => StatusCode::BAD_REQUEST,
            ApiError::WorkerNotFound | ApiError::RequestNotFound => StatusCode::NOT_FOUND,
            ApiError::UnauthorizedTransition { .. } | ApiError::Forbidden(_) => {
                StatusCode::FORBIDDEN
            }
            ApiError::AlreadyFinalized { .. } => StatusCode::CONFLICT,
            ApiError::Internal(_) | ApiError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let mut body = json!({ "message": self.to_string() });
        match self {
            ApiError::AlreadyFinalized { id, status }
            | ApiError::UnauthorizedTransition { id, status, .. } => {
                body["request_id"] = json!(id);
                body["current_status"] = json!(status.as_str());
            }
            _ => {}
        }
        HttpResponse::build(self.status_code()).json(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_follow_the_taxonomy() {
        assert_eq!(ApiError::InvalidRole.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::InvalidDateRange.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::WorkerNotFound.status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::RequestNotFound.status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::UnauthorizedTransition {
                id: 7,
                role: Role::Supervisor,
                status: LeaveStatus::AwaitingManager,
            }
            .status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            ApiError::AlreadyFinalized {
                id: 7,
                status: LeaveStatus::Approved,
            }
            .status_code(),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn transition_refusals_carry_request_context() {
        let err = ApiError::AlreadyFinalized {
            id: 42,
            status: LeaveStatus::Rejected,
        };
        let msg = err.to_string();
        assert!(msg.contains("#42"));
        assert!(msg.contains("rejected"));
    }
}
