//! Route definitions for the `/aclaraciones` resource (user side).

use axum::routing::post;
use axum::Router;

use crate::handlers::aclaraciones;
use crate::state::AppState;

/// Routes mounted at `/aclaraciones`.
///
/// ```text
/// POST /{id}/responder -> answer a pending clarification
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/{id}/responder", post(aclaraciones::responder))
}
