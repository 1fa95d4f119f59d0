use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use informes_analysis::AnalysisError;
use informes_core::error::CoreError;
use informes_ingest::IngestError;
use serde_json::json;

/// Application-level error type for HTTP handlers.
///
/// Wraps the domain error types of the workspace crates and adds
/// HTTP-specific variants. Implements [`IntoResponse`] to produce
/// consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `informes_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// An Excel reading or writing error from `informes_ingest`.
    #[error(transparent)]
    Ingest(#[from] IngestError),

    /// An analysis pipeline error from `informes_analysis`.
    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Core(core) => classify_core_error(core),
            AppError::Database(err) => classify_sqlx_error(err),
            AppError::Ingest(err) => classify_ingest_error(err),
            AppError::Analysis(err) => classify_analysis_error(err),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

fn classify_core_error(err: &CoreError) -> (StatusCode, &'static str, String) {
    match err {
        CoreError::NotFound { .. } | CoreError::NotFoundCodigo { .. } => {
            (StatusCode::NOT_FOUND, "NOT_FOUND", err.to_string())
        }
        CoreError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
        CoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
        CoreError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone()),
        CoreError::Forbidden(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone()),
        CoreError::Internal(msg) => {
            tracing::error!(error = %msg, "Internal core error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            )
        }
    }
}

/// Classify a sqlx error into an HTTP status, error code, and message.
///
/// - `RowNotFound` maps to 404.
/// - Unique constraint violations (constraint name starting with `uq_`) map to 409.
/// - Everything else maps to 500 with a sanitized message.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, &'static str, String) {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Resource not found".to_string(),
        ),
        sqlx::Error::Database(db_err) => {
            // PostgreSQL unique constraint violation: error code 23505
            if db_err.code().as_deref() == Some("23505") {
                let constraint = db_err.constraint().unwrap_or("unknown");
                if constraint.starts_with("uq_") {
                    return (
                        StatusCode::CONFLICT,
                        "CONFLICT",
                        format!("Duplicate value violates unique constraint: {constraint}"),
                    );
                }
            }
            tracing::error!(error = %db_err, "Database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            )
        }
        other => {
            tracing::error!(error = %other, "Database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            )
        }
    }
}

/// Uploaded-file problems are the client's fault; workbook generation
/// failures are ours.
fn classify_ingest_error(err: &IngestError) -> (StatusCode, &'static str, String) {
    match err {
        IngestError::Libro(e) => (
            StatusCode::BAD_REQUEST,
            "INVALID_FILE",
            format!("el archivo no es un .xlsx válido: {e}"),
        ),
        IngestError::SinDatos(msg) => {
            (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
        }
        IngestError::Dominio(core) => classify_core_error(core),
        IngestError::Escritura(e) => {
            tracing::error!(error = %e, "workbook generation failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            )
        }
    }
}

fn classify_analysis_error(err: &AnalysisError) -> (StatusCode, &'static str, String) {
    match err {
        AnalysisError::NoConfigurado => (
            StatusCode::SERVICE_UNAVAILABLE,
            "AI_UNAVAILABLE",
            err.to_string(),
        ),
        AnalysisError::SinDatos(_) => (StatusCode::NOT_FOUND, "NO_DATA", err.to_string()),
        AnalysisError::Llm(e) => {
            tracing::error!(error = %e, "LLM call failed");
            (
                StatusCode::BAD_GATEWAY,
                "AI_ERROR",
                "el servicio de IA no respondió correctamente".to_string(),
            )
        }
        AnalysisError::RespuestaInvalida(msg) => {
            tracing::error!(error = %msg, "LLM response unusable");
            (
                StatusCode::BAD_GATEWAY,
                "AI_ERROR",
                "el servicio de IA no respondió correctamente".to_string(),
            )
        }
        AnalysisError::Database(e) => classify_sqlx_error(e),
        AnalysisError::Core(core) => classify_core_error(core),
    }
}
