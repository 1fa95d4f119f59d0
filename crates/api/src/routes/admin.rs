//! Route definitions for the `/admin` resource (admin group only).

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{aclaraciones, notificaciones, reportes_admin};
use crate::state::AppState;

/// Routes mounted at `/admin`.
///
/// ```text
/// GET  POST   /reportes                        -> list, create
/// GET  PUT    /reportes/{codigo}               -> get, update
/// DELETE      /reportes/{codigo}               -> soft delete
/// POST        /analizar-excel                  -> infer fields from workbook
/// GET         /aclaraciones/pendientes         -> open clarifications
/// GET         /aclaraciones/pendientes/count   -> polling badge
/// POST        /aclaraciones/{id}/validar       -> close a clarification
/// GET         /notificaciones                  -> unread notifications
/// POST        /notificaciones/{id}/leida       -> mark read
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/reportes",
            get(reportes_admin::list).post(reportes_admin::create),
        )
        .route(
            "/reportes/{codigo}",
            get(reportes_admin::get)
                .put(reportes_admin::update)
                .delete(reportes_admin::delete),
        )
        .route("/analizar-excel", post(reportes_admin::analizar_excel))
        .route("/aclaraciones/pendientes", get(aclaraciones::pendientes))
        .route(
            "/aclaraciones/pendientes/count",
            get(aclaraciones::count_pendientes),
        )
        .route("/aclaraciones/{id}/validar", post(aclaraciones::validar))
        .route("/notificaciones", get(notificaciones::list))
        .route(
            "/notificaciones/{id}/leida",
            post(notificaciones::marcar_leida),
        )
}
