//! JWT-based authentication extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use informes_core::error::CoreError;
use informes_core::roles::GRUPO_ADMIN;
use informes_core::types::DbId;

use crate::auth::jwt::validate_token;
use crate::error::AppError;
use crate::state::AppState;

/// Authenticated user extracted from a JWT Bearer token in the `Authorization` header.
///
/// Use this as an extractor parameter in any handler that requires authentication:
///
/// ```ignore
/// async fn my_handler(user: AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(user_id = user.user_id, grupo = %user.grupo, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The user's internal database id (from `claims.sub`).
    pub user_id: DbId,
    /// The username (from `claims.username`).
    pub username: String,
    /// The user's group codigo (e.g. `"admin"`, `"usuarios"`).
    pub grupo: String,
    /// The group's database id, for permission-matrix lookups.
    pub grupo_id: DbId,
}

impl AuthUser {
    /// Whether this user belongs to the admin group.
    pub fn es_admin(&self) -> bool {
        self.grupo == GRUPO_ADMIN
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(
                    "Missing Authorization header".into(),
                ))
            })?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid Authorization format. Expected: Bearer <token>".into(),
            ))
        })?;

        let claims = validate_token(token, &state.config.jwt).map_err(|_| {
            AppError::Core(CoreError::Unauthorized("Invalid or expired token".into()))
        })?;

        // Group membership can change between token issue and use, so the
        // grupo_id is resolved against the database on every request.
        let usuario = informes_db::repositories::UsuarioRepo::find_con_grupo(
            &state.pool,
            claims.sub,
        )
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized("User no longer exists".into())))?;

        Ok(AuthUser {
            user_id: usuario.id,
            username: usuario.username,
            grupo: usuario.grupo_codigo,
            grupo_id: usuario.grupo_id,
        })
    }
}
