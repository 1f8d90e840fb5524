//! Error taxonomy shared by the validator, the gateway and the handlers.
//!
//! Validation failures surface as 400 and carry the offending field. Storage
//! failures surface as 500 with a redacted body; the cause is logged instead.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, error};

/// Reason attached to a [`ValidationError`]; logged, not returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationCode {
    MissingField,
    InvalidType,
    OutOfRange,
    UnknownField,
    MalformedBody,
}

/// Rejected request input, naming the field at fault.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    field: String,
    code: ValidationCode,
    message: String,
}

impl ValidationError {
    pub fn new(
        field: impl Into<String>,
        code: ValidationCode,
        message: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            code,
            message: message.into(),
        }
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn code(&self) -> ValidationCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Failures reported by a [`crate::gateway::ContactGateway`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    /// The store could not be reached, or no pooled connection became free.
    #[error("storage unavailable: {message}")]
    Unavailable { message: String },
    /// A database constraint rejected the write.
    #[error("storage constraint violated: {message}")]
    Constraint { message: String },
    #[error("storage query failed: {message}")]
    Query { message: String },
}

impl StorageError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    pub fn constraint(message: impl Into<String>) -> Self {
        Self::Constraint {
            message: message.into(),
        }
    }

    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }
}

impl From<sqlx::Error> for StorageError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::WorkerCrashed => {
                Self::unavailable(err.to_string())
            }
            sqlx::Error::Io(_) | sqlx::Error::Tls(_) => Self::unavailable(err.to_string()),
            sqlx::Error::Database(ref db) if db.constraint().is_some() => {
                Self::constraint(db.message().to_owned())
            }
            other => Self::query(other.to_string()),
        }
    }
}

/// Error returned by HTTP handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    field: Option<&'a str>,
    message: &'a str,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            Self::Validation(err) => {
                debug!(field = err.field(), code = ?err.code(), "rejected request input");
                let body = ErrorBody {
                    error: "validation_error",
                    field: Some(err.field()),
                    message: err.message(),
                };
                (status, Json(body)).into_response()
            }
            Self::Storage(err) => {
                // Do not leak driver details to clients.
                error!(error = %err, "storage operation failed");
                let body = ErrorBody {
                    error: "storage_error",
                    field: None,
                    message: "internal server error",
                };
                (status, Json(body)).into_response()
            }
        }
    }
}
