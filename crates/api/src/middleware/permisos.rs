//! Per-report permission checks against the grupos_reportes matrix.

use informes_core::error::CoreError;
use informes_db::models::permiso::Accion;
use informes_db::repositories::PermisoRepo;
use informes_db::DbPool;

use super::auth::AuthUser;
use crate::error::AppError;

/// Require one CRUD flag on a report for the authenticated user's group.
///
/// Admins bypass the matrix entirely. For everyone else, the absence of a
/// permission row means no access.
pub async fn exigir_permiso(
    pool: &DbPool,
    user: &AuthUser,
    reporte_codigo: &str,
    accion: Accion,
) -> Result<(), AppError> {
    if user.es_admin() {
        return Ok(());
    }
    if PermisoRepo::tiene_permiso(pool, user.grupo_id, reporte_codigo, accion).await? {
        return Ok(());
    }
    Err(AppError::Core(CoreError::Forbidden(format!(
        "el grupo '{}' no tiene acceso al reporte '{reporte_codigo}'",
        user.grupo
    ))))
}
