use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

/// Application-wide error type. Domain-rule violations each get their own
/// variant so the transport layer can emit a stable machine-readable kind
/// alongside the HTTP status.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Forbidden")]
    Forbidden,

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Validation error: {0}")]
    Validation(String),

    // Membership policy violations. One variant per rule so callers can
    // distinguish missing resource vs. forbidden action vs. conflicting
    // state all the way out to the client.
    #[error("Not a member of this family")]
    NotAMember,

    #[error("Not authorized: {0}")]
    NotAuthorized(String),

    #[error("The owner's role cannot be changed")]
    CannotChangeOwnerRole,

    #[error("The owner's status cannot be changed")]
    CannotChangeOwnerStatus,

    #[error("Admins cannot modify other admins or the owner")]
    AdminModificationNotAllowed,

    #[error("Members cannot modify themselves through this operation")]
    SelfModificationNotAllowed,

    #[error("Member does not belong to this family")]
    MemberNotInFamily,

    #[error("Invalid state transition: {0}")]
    InvalidStateTransition(String),
}

impl AppError {
    /// Stable kind string for the JSON error body. These are part of the
    /// external contract; renaming one is a breaking change.
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::Database(_) => "database",
            AppError::NotFound(_) => "not-found",
            AppError::Unauthorized => "unauthorized",
            AppError::Forbidden => "forbidden",
            AppError::BadRequest(_) => "bad-request",
            AppError::Conflict(_) => "conflict",
            AppError::Internal(_) => "internal",
            AppError::Validation(_) => "validation",
            AppError::NotAMember => "not-a-member",
            AppError::NotAuthorized(_) => "not-authorized",
            AppError::CannotChangeOwnerRole => "cannot-change-owner-role",
            AppError::CannotChangeOwnerStatus => "cannot-change-owner-status",
            AppError::AdminModificationNotAllowed => "admin-modification-not-allowed",
            AppError::SelfModificationNotAllowed => "self-modification-not-allowed",
            AppError::MemberNotInFamily => "member-not-in-family",
            AppError::InvalidStateTransition(_) => "invalid-state-transition",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let kind = self.kind();
        let (status, error_message) = match self {
            AppError::Database(ref msg) => {
                tracing::error!("Database error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Database error occurred".to_string())
            }
            AppError::NotFound(ref msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized".to_string()),
            AppError::Forbidden => (StatusCode::FORBIDDEN, "Forbidden".to_string()),
            AppError::BadRequest(ref msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Conflict(ref msg) => (StatusCode::CONFLICT, msg.clone()),
            AppError::Internal(ref msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
            AppError::Validation(ref msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg.clone()),
            AppError::NotAMember
            | AppError::NotAuthorized(_)
            | AppError::CannotChangeOwnerRole
            | AppError::CannotChangeOwnerStatus
            | AppError::AdminModificationNotAllowed
            | AppError::SelfModificationNotAllowed => {
                (StatusCode::FORBIDDEN, self.to_string())
            }
            AppError::MemberNotInFamily => (StatusCode::BAD_REQUEST, self.to_string()),
            AppError::InvalidStateTransition(ref msg) => (StatusCode::CONFLICT, msg.clone()),
        };

        let body = Json(json!({
            "error": error_message,
            "kind": kind,
        }));

        (status, body).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::Database(err.to_string())
    }
}
