//! Root-level ingestion routes kept for external integrations.
//!
//! `/stats/{codigo}` and `/download/{codigo}` are aliases of the
//! `/api/reportes/{codigo}` endpoints; `/webhook/upload/{codigo}` is the
//! unauthenticated JSON ingestion path.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{ingesta, reportes};
use crate::state::AppState;

/// Mount root-level ingestion routes.
///
/// ```text
/// POST /upload                   -> generic workbook upload ('reporte'/'type' + 'file')
/// POST /webhook/upload/{codigo}  -> JSON batch ingestion (public)
/// GET  /stats/{codigo}           -> load stats
/// GET  /download/{codigo}        -> upload template
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/upload", post(reportes::upload_general))
        .route("/webhook/upload/{codigo}", post(ingesta::webhook_upload))
        .route("/stats/{codigo}", get(reportes::estadisticas))
        .route("/download/{codigo}", get(reportes::descargar))
}
