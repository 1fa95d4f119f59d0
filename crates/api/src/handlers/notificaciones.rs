//! Admin notification handlers.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use informes_core::error::CoreError;
use informes_core::types::DbId;
use informes_db::models::notificacion::Notificacion;
use informes_db::repositories::NotificacionRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::state::AppState;

/// GET /api/admin/notificaciones
///
/// Unread notifications, newest first.
pub async fn list(
    RequireAdmin(_user): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<Notificacion>>> {
    Ok(Json(NotificacionRepo::list_no_leidas(&state.pool).await?))
}

/// POST /api/admin/notificaciones/{id}/leida
pub async fn marcar_leida(
    RequireAdmin(_user): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if !NotificacionRepo::marcar_leida(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "notificacion",
            id,
        }));
    }
    Ok(StatusCode::NO_CONTENT)
}
