pub mod aclaraciones;
pub mod admin;
pub mod analysis;
pub mod auth;
pub mod grupos;
pub mod health;
pub mod ingesta;
pub mod permisos;
pub mod query;
pub mod reportes;
pub mod usuarios;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/login                                    login (public)
///
/// /admin/reportes                                list, create (admin only)
/// /admin/reportes/{codigo}                       get, update, soft delete
/// /admin/analizar-excel                          infer fields from workbook (POST)
/// /admin/aclaraciones/pendientes                 open clarifications (GET)
/// /admin/aclaraciones/pendientes/count           polling badge (GET)
/// /admin/aclaraciones/{id}/validar               close a clarification (POST)
/// /admin/notificaciones                          unread notifications (GET)
/// /admin/notificaciones/{id}/leida               mark read (POST)
///
/// /reportes/disponibles                          visible reports (auth required)
/// /reportes/{codigo}/datos                       filtered rows (GET)
/// /reportes/{codigo}/estadisticas                load stats (GET)
/// /reportes/{codigo}/descargar                   upload template (GET)
/// /reportes/{codigo}/upload                      ingest workbook (POST)
///
/// /aclaraciones/{id}/responder                   answer a clarification (POST)
///
/// /query/{codigo}                                raw rows (GET)
/// /query/{codigo}/export                         rows as workbook (GET)
///
/// /usuarios                                      list, create (admin only)
/// /grupos                                        list, create (admin only)
/// /permisos/grupo/{id}                           list, assign (admin only)
/// /permisos/grupo/{id}/reporte/{codigo}          upsert, revoke (admin only)
///
/// /analysis/{codigo}/pregunta                    Q&A (POST)
/// /analysis/{codigo}/indexar                     rebuild semantic index (POST)
/// /analysis/{codigo}/analisis                    canned analysis (GET, ?tipo=)
/// /analysis/{codigo}/informe                     full informe (POST)
/// /analysis/{codigo}/buscar                      semantic search (GET, ?q=&limite=)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/admin", admin::router())
        .nest("/reportes", reportes::router())
        .nest("/aclaraciones", aclaraciones::router())
        .nest("/query", query::router())
        .nest("/usuarios", usuarios::router())
        .nest("/grupos", grupos::router())
        .nest("/permisos", permisos::router())
        .nest("/analysis", analysis::router())
}
