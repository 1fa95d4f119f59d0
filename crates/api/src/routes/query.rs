//! Route definitions for the `/query` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::query;
use crate::state::AppState;

/// Routes mounted at `/query`.
///
/// ```text
/// GET /{codigo}         -> raw rows
/// GET /{codigo}/export  -> rows as workbook
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{codigo}", get(query::consultar))
        .route("/{codigo}/export", get(query::exportar))
}
