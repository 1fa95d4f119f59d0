//! Route definitions for the `/usuarios` resource (admin group only).

use axum::routing::get;
use axum::Router;

use crate::handlers::usuarios;
use crate::state::AppState;

/// Routes mounted at `/usuarios`.
///
/// ```text
/// GET POST / -> list, create
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(usuarios::list).post(usuarios::create))
}
