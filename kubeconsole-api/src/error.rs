//! Error taxonomy and API error responses
//!
//! Every component returns a [`ConsoleError`]. At the HTTP boundary it is
//! logged with its numeric code and cause, then replaced by a terse message
//! that never carries the cause.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::error;

/// The four classes every console failure falls into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    NotFound,
    ConnectionError,
    ValidationError,
    ModuleNotFound,
}

/// Console errors
#[derive(Debug, Error)]
pub enum ConsoleError {
    /// Cluster record missing or soft-deleted
    #[error("Cluster not found: {0}")]
    ClusterNotFound(String),

    /// Datacenter or zone record missing or soft-deleted
    #[error("{table} record not found: {id}")]
    RecordNotFound { table: &'static str, id: String },

    /// Live object missing in the cluster
    #[error("Resource not found: {kind}/{name} in namespace {namespace}")]
    ResourceNotFound {
        kind: String,
        name: String,
        namespace: String,
    },

    /// Credential material could not produce a client
    #[error("Invalid credentials for cluster {cluster_id}: {reason}")]
    InvalidCredentials { cluster_id: String, reason: String },

    #[error("Kubernetes API error: {0}")]
    Kube(#[from] kube::Error),

    #[error("CMDB error: {0}")]
    Cmdb(#[from] sqlx::Error),

    #[error("Invalid scope: {0}")]
    InvalidScope(String),

    /// Filter or order key not declared on the table
    #[error("Unknown field '{field}' for table {table}")]
    UnknownField { table: &'static str, field: String },

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Proposed name already used by a live object
    #[error("Name taken: {kind}/{name} already exists in namespace {namespace}")]
    NameTaken {
        kind: String,
        name: String,
        namespace: String,
    },

    /// Manifest could not be read as, or rendered from, the typed object
    #[error("Invalid manifest: {0}")]
    InvalidManifest(String),

    #[error(transparent)]
    Model(#[from] kubeconsole_common::Error),

    #[error("Resource module not found: {0}")]
    ModuleNotFound(String),
}

impl ConsoleError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ClusterNotFound(_) | Self::RecordNotFound { .. } | Self::ResourceNotFound { .. } => {
                ErrorKind::NotFound
            }
            Self::InvalidCredentials { .. } | Self::Kube(_) | Self::Cmdb(_) => {
                ErrorKind::ConnectionError
            }
            Self::InvalidScope(_)
            | Self::UnknownField { .. }
            | Self::InvalidRequest(_)
            | Self::NameTaken { .. }
            | Self::InvalidManifest(_)
            | Self::Model(_) => ErrorKind::ValidationError,
            Self::ModuleNotFound(_) => ErrorKind::ModuleNotFound,
        }
    }

    /// Stable numeric code written to the log
    pub fn code(&self) -> u32 {
        match self {
            Self::ModuleNotFound(_) => 40400,
            Self::ClusterNotFound(_) => 40401,
            Self::RecordNotFound { .. } => 40402,
            Self::ResourceNotFound { .. } => 40403,
            Self::InvalidScope(_) => 42201,
            Self::UnknownField { .. } => 42202,
            Self::InvalidRequest(_) => 42203,
            Self::Model(_) => 42204,
            Self::InvalidManifest(_) => 42205,
            Self::NameTaken { .. } => 42206,
            Self::InvalidCredentials { .. } => 50201,
            Self::Kube(_) => 50202,
            Self::Cmdb(_) => 50203,
        }
    }

    /// Classify a failed named lookup, turning an API 404 into `ResourceNotFound`
    pub fn from_lookup(err: kube::Error, kind: &str, name: &str, namespace: Option<&str>) -> Self {
        match err {
            kube::Error::Api(ref response) if response.code == 404 => Self::ResourceNotFound {
                kind: kind.to_string(),
                name: name.to_string(),
                namespace: namespace.unwrap_or("-").to_string(),
            },
            other => Self::Kube(other),
        }
    }

    pub fn invalid_credentials(cluster_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidCredentials {
            cluster_id: cluster_id.into(),
            reason: reason.into(),
        }
    }
}

/// Result type alias for console operations
pub type ConsoleResult<T> = std::result::Result<T, ConsoleError>;

/// Standard API error response format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// HTTP status code
    pub status: u16,

    /// Error class for programmatic handling
    pub error: String,

    /// Numeric code matching the server log entry
    pub code: u32,

    /// Human-readable error message
    pub message: String,

    /// Timestamp when error occurred
    pub timestamp: String,
}

impl ErrorResponse {
    pub fn new(status: u16, error: impl Into<String>, code: u32, message: impl Into<String>) -> Self {
        Self {
            status,
            error: error.into(),
            code,
            message: message.into(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// API error types with standardized responses
#[derive(Debug)]
pub enum ApiError {
    /// 404 Not Found
    NotFound(u32),

    /// 502 Bad Gateway
    Connection(u32),

    /// 422 Unprocessable Entity
    Validation(u32),

    /// 404 Not Found, for an unknown resource kind
    ModuleNotFound(u32),

    /// 500 Internal Server Error
    Internal(String),
}

impl ApiError {
    /// Convert error to ErrorResponse
    pub fn to_error_response(&self) -> ErrorResponse {
        match self {
            ApiError::NotFound(code) => ErrorResponse::new(
                404,
                "NOT_FOUND",
                *code,
                "The requested object does not exist",
            ),
            ApiError::Connection(code) => ErrorResponse::new(
                502,
                "CONNECTION_ERROR",
                *code,
                "The cluster or configuration store could not be reached",
            ),
            ApiError::Validation(code) => ErrorResponse::new(
                422,
                "VALIDATION_ERROR",
                *code,
                "The request parameters are invalid",
            ),
            ApiError::ModuleNotFound(code) => {
                ErrorResponse::new(404, "MODULE_NOT_FOUND", *code, "Unknown resource kind")
            }
            ApiError::Internal(msg) => {
                error!("Internal API error: {}", msg);
                ErrorResponse::new(500, "INTERNAL_ERROR", 50000, "An internal server error occurred")
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let error_response = self.to_error_response();
        let status_code = StatusCode::from_u16(error_response.status)
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        (status_code, Json(error_response)).into_response()
    }
}

impl From<ConsoleError> for ApiError {
    fn from(err: ConsoleError) -> Self {
        let code = err.code();
        error!(code, kind = ?err.kind(), cause = %err, "Request failed");

        match err.kind() {
            ErrorKind::NotFound => ApiError::NotFound(code),
            ErrorKind::ConnectionError => ApiError::Connection(code),
            ErrorKind::ValidationError => ApiError::Validation(code),
            ErrorKind::ModuleNotFound => ApiError::ModuleNotFound(code),
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Internal(format!("JSON serialization failed: {}", err))
    }
}
