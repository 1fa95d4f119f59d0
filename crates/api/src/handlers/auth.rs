//! Handlers for the `/auth` resource.

use axum::extract::State;
use axum::Json;
use informes_core::error::CoreError;
use informes_core::types::DbId;
use informes_db::repositories::UsuarioRepo;
use serde::{Deserialize, Serialize};

use crate::auth::jwt::generate_access_token;
use crate::auth::password::verify_password;
use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Request body for `POST /api/auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Successful authentication response.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub token_type: &'static str,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    pub user: UserInfo,
}

/// Public user info embedded in [`AuthResponse`].
#[derive(Debug, Serialize)]
pub struct UserInfo {
    pub id: DbId,
    pub username: String,
    pub nombre: String,
    pub grupo: String,
}

/// POST /api/auth/login
///
/// Authenticate with username + password. Returns a Bearer access token.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let usuario = UsuarioRepo::find_by_username(&state.pool, &input.username)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid username or password".into(),
            ))
        })?;

    if usuario.estado != "activo" {
        return Err(AppError::Core(CoreError::Forbidden(
            "Account is deactivated".into(),
        )));
    }

    let password_valid = verify_password(&input.password, &usuario.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !password_valid {
        return Err(AppError::Core(CoreError::Unauthorized(
            "Invalid username or password".into(),
        )));
    }

    let con_grupo = UsuarioRepo::find_con_grupo(&state.pool, usuario.id)
        .await?
        .ok_or_else(|| AppError::InternalError("user row lost its group".into()))?;

    let access_token = generate_access_token(
        con_grupo.id,
        &con_grupo.username,
        &con_grupo.grupo_codigo,
        &state.config.jwt,
    )
    .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    tracing::info!(username = %con_grupo.username, grupo = %con_grupo.grupo_codigo, "login");
    Ok(Json(AuthResponse {
        access_token,
        token_type: "Bearer",
        expires_in: state.config.jwt.access_token_expiry_mins * 60,
        user: UserInfo {
            id: con_grupo.id,
            username: con_grupo.username,
            nombre: con_grupo.nombre,
            grupo: con_grupo.grupo_codigo,
        },
    }))
}
