//! Route definitions for the `/permisos` resource (admin group only).

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::permisos;
use crate::state::AppState;

/// Routes mounted at `/permisos`.
///
/// ```text
/// GET  POST   /grupo/{id}                    -> list, assign
/// POST DELETE /grupo/{id}/reporte/{codigo}   -> upsert, revoke
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/grupo/{id}",
            get(permisos::list_por_grupo).post(permisos::asignar),
        )
        .route(
            "/grupo/{id}/reporte/{codigo}",
            post(permisos::upsert).delete(permisos::delete),
        )
}
