//! Group administration handlers.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use informes_core::schema::validar_codigo;
use informes_db::models::grupo::{CreateGrupo, Grupo};
use informes_db::repositories::GrupoRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::state::AppState;

/// GET /api/grupos
pub async fn list(
    RequireAdmin(_user): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<Grupo>>> {
    Ok(Json(GrupoRepo::list_all(&state.pool).await?))
}

/// POST /api/grupos
pub async fn create(
    RequireAdmin(_user): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateGrupo>,
) -> AppResult<(StatusCode, Json<Grupo>)> {
    validar_codigo(&input.codigo).map_err(AppError::Core)?;
    let grupo = GrupoRepo::create(&state.pool, &input).await?;
    tracing::info!(codigo = %grupo.codigo, "group created");
    Ok((StatusCode::CREATED, Json(grupo)))
}
