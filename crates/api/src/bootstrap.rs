//! First-boot provisioning: guarantee an admin account exists.

use informes_core::roles::GRUPO_ADMIN;
use informes_db::repositories::{GrupoRepo, UsuarioRepo};
use informes_db::DbPool;

use crate::auth::password::hash_password;
use crate::error::AppError;

/// Username of the seeded administrator.
const ADMIN_USERNAME: &str = "admin";

/// Ensure the `admin` user exists, creating it on first boot.
///
/// The initial password comes from `ADMIN_PASSWORD`; without it a fresh
/// database gets a well-known default and a loud warning, matching the
/// expectation that the installer changes it immediately.
pub async fn ensure_admin_user(pool: &DbPool) -> Result<(), AppError> {
    if UsuarioRepo::find_by_username(pool, ADMIN_USERNAME)
        .await?
        .is_some()
    {
        return Ok(());
    }

    let grupo = GrupoRepo::find_by_codigo(pool, GRUPO_ADMIN)
        .await?
        .ok_or_else(|| {
            AppError::InternalError("seed group 'admin' missing; migrations not applied?".into())
        })?;

    let password = match std::env::var("ADMIN_PASSWORD") {
        Ok(p) if !p.is_empty() => p,
        _ => {
            tracing::warn!(
                "ADMIN_PASSWORD not set; seeding 'admin' with the default password. Change it."
            );
            "admin123".to_string()
        }
    };

    let password_hash = hash_password(&password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    UsuarioRepo::create(
        pool,
        ADMIN_USERNAME,
        &password_hash,
        "Administrador",
        grupo.id,
    )
    .await?;
    tracing::info!(username = ADMIN_USERNAME, "admin user seeded");
    Ok(())
}
