use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    InvalidInput(anyhow::Error),

    #[error("Not found: {0}")]
    NotFound(anyhow::Error),

    #[error("Conflict: {0}")]
    Conflict(anyhow::Error),

    #[error("Referential violation: {0}")]
    ReferentialViolation(anyhow::Error),

    #[error("Storage unavailable: {0}")]
    StorageUnavailable(anyhow::Error),

    #[error("Database error: {0}")]
    DatabaseError(anyhow::Error),

    #[error("Internal server error: {0}")]
    InternalError(#[from] anyhow::Error),

    #[error("Configuration error: {0}")]
    ConfigError(anyhow::Error),
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::ConfigError(anyhow::Error::new(err))
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::InternalError(anyhow::Error::new(err))
    }
}

impl AppError {
    /// Label used for the error counter metric.
    pub fn error_type(&self) -> &'static str {
        match self {
            AppError::InvalidInput(_) => "invalid_input",
            AppError::NotFound(_) => "not_found",
            AppError::Conflict(_) => "conflict",
            AppError::ReferentialViolation(_) => "referential_violation",
            AppError::StorageUnavailable(_) => "storage_unavailable",
            AppError::DatabaseError(_) => "database_error",
            AppError::InternalError(_) => "internal_error",
            AppError::ConfigError(_) => "config_error",
        }
    }

    /// Classify a storage-level failure into the error taxonomy.
    ///
    /// Unique violations become `Conflict`, foreign-key violations become
    /// `ReferentialViolation`, a missing row becomes `NotFound`, and
    /// connection-level failures become `StorageUnavailable` so the caller
    /// knows a retry is safe.
    pub fn from_sqlx(err: sqlx::Error, context: &str) -> Self {
        match &err {
            sqlx::Error::RowNotFound => {
                AppError::NotFound(anyhow::anyhow!("{}: no matching row", context))
            }
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                AppError::Conflict(anyhow::anyhow!("{}: {}", context, err))
            }
            sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => {
                AppError::ReferentialViolation(anyhow::anyhow!("{}: {}", context, err))
            }
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                AppError::StorageUnavailable(anyhow::anyhow!("{}: {}", context, err))
            }
            _ => AppError::DatabaseError(anyhow::anyhow!("{}: {}", context, err)),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        crate::services::metrics::ERRORS_TOTAL
            .with_label_values(&[self.error_type()])
            .inc();

        #[derive(Serialize)]
        struct ErrorResponse {
            error: String,
            #[serde(skip_serializing_if = "Option::is_none")]
            details: Option<String>,
        }

        let (status, error_message, details) = match self {
            AppError::InvalidInput(err) => (StatusCode::BAD_REQUEST, err.to_string(), None),
            AppError::NotFound(err) => (StatusCode::NOT_FOUND, err.to_string(), None),
            AppError::Conflict(err) => (StatusCode::CONFLICT, err.to_string(), None),
            AppError::ReferentialViolation(err) => (StatusCode::CONFLICT, err.to_string(), None),
            AppError::StorageUnavailable(err) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "Storage unavailable".to_string(),
                Some(err.to_string()),
            ),
            AppError::DatabaseError(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Database error".to_string(),
                Some(err.to_string()),
            ),
            AppError::InternalError(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
                Some(format!("{:#?}", err)),
            ),
            AppError::ConfigError(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Configuration error".to_string(),
                Some(err.to_string()),
            ),
        };

        (
            status,
            Json(ErrorResponse {
                error: error_message,
                details,
            }),
        )
            .into_response()
    }
}
