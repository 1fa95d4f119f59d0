//! Route definitions for the `/grupos` resource (admin group only).

use axum::routing::get;
use axum::Router;

use crate::handlers::grupos;
use crate::state::AppState;

/// Routes mounted at `/grupos`.
///
/// ```text
/// GET POST / -> list, create
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(grupos::list).post(grupos::create))
}
