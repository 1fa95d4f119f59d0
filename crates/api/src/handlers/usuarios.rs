//! User administration handlers.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use informes_core::error::CoreError;
use informes_db::models::usuario::{CreateUsuario, UsuarioConGrupo};
use informes_db::repositories::{GrupoRepo, UsuarioRepo};

use crate::auth::password::{hash_password, validate_password_strength};
use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::state::AppState;

/// GET /api/usuarios
pub async fn list(
    RequireAdmin(_user): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<UsuarioConGrupo>>> {
    Ok(Json(UsuarioRepo::list_all(&state.pool).await?))
}

/// POST /api/usuarios
///
/// The plaintext password is hashed here; the repository only ever sees
/// the PHC hash.
pub async fn create(
    RequireAdmin(_user): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateUsuario>,
) -> AppResult<(StatusCode, Json<UsuarioConGrupo>)> {
    if input.username.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "username no puede estar vacío".into(),
        )));
    }
    validate_password_strength(&input.password)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    GrupoRepo::find_by_id(&state.pool, input.grupo_id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "grupo",
                id: input.grupo_id,
            })
        })?;

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let usuario = UsuarioRepo::create(
        &state.pool,
        &input.username,
        &password_hash,
        &input.nombre,
        input.grupo_id,
    )
    .await?;

    let con_grupo = UsuarioRepo::find_con_grupo(&state.pool, usuario.id)
        .await?
        .ok_or_else(|| AppError::InternalError("created user not found".into()))?;

    tracing::info!(username = %con_grupo.username, grupo = %con_grupo.grupo_codigo, "user created");
    Ok((StatusCode::CREATED, Json(con_grupo)))
}
