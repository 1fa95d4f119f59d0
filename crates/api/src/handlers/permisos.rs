//! Permission-matrix handlers.
//!
//! The matrix is one row per (grupo, reporte) pair. Writes are partial:
//! absent flags keep their stored value, so toggling one flag never
//! clears the others. Deleting a row revokes all access, which is not
//! the same as setting every flag to false.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use informes_core::error::CoreError;
use informes_core::types::DbId;
use informes_db::models::permiso::{Permiso, UpsertPermiso};
use informes_db::repositories::{GrupoRepo, PermisoRepo, ReporteRepo};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::state::AppState;

/// Body for `POST /api/permisos/grupo/{id}`: a permission write that
/// names its target report.
#[derive(Debug, Deserialize)]
pub struct AsignarPermiso {
    pub reporte_codigo: String,
    #[serde(flatten)]
    pub flags: UpsertPermiso,
}

/// GET /api/permisos/grupo/{id}
pub async fn list_por_grupo(
    RequireAdmin(_user): RequireAdmin,
    State(state): State<AppState>,
    Path(grupo_id): Path<DbId>,
) -> AppResult<Json<Vec<Permiso>>> {
    grupo_o_404(&state, grupo_id).await?;
    Ok(Json(PermisoRepo::list_por_grupo(&state.pool, grupo_id).await?))
}

/// POST /api/permisos/grupo/{id}
pub async fn asignar(
    RequireAdmin(_user): RequireAdmin,
    State(state): State<AppState>,
    Path(grupo_id): Path<DbId>,
    Json(input): Json<AsignarPermiso>,
) -> AppResult<Json<Permiso>> {
    grupo_o_404(&state, grupo_id).await?;
    reporte_existe(&state, &input.reporte_codigo).await?;
    let permiso =
        PermisoRepo::upsert_parcial(&state.pool, grupo_id, &input.reporte_codigo, &input.flags)
            .await?;
    Ok(Json(permiso))
}

/// POST /api/permisos/grupo/{id}/reporte/{codigo}
pub async fn upsert(
    RequireAdmin(_user): RequireAdmin,
    State(state): State<AppState>,
    Path((grupo_id, codigo)): Path<(DbId, String)>,
    Json(flags): Json<UpsertPermiso>,
) -> AppResult<Json<Permiso>> {
    grupo_o_404(&state, grupo_id).await?;
    reporte_existe(&state, &codigo).await?;
    let permiso = PermisoRepo::upsert_parcial(&state.pool, grupo_id, &codigo, &flags).await?;
    tracing::info!(grupo_id, reporte = %codigo, "permission updated");
    Ok(Json(permiso))
}

/// DELETE /api/permisos/grupo/{id}/reporte/{codigo}
pub async fn delete(
    RequireAdmin(_user): RequireAdmin,
    State(state): State<AppState>,
    Path((grupo_id, codigo)): Path<(DbId, String)>,
) -> AppResult<StatusCode> {
    if !PermisoRepo::delete(&state.pool, grupo_id, &codigo).await? {
        return Err(AppError::Core(CoreError::Validation(format!(
            "el grupo {grupo_id} no tiene permisos sobre '{codigo}'"
        ))));
    }
    tracing::info!(grupo_id, reporte = %codigo, "permission revoked");
    Ok(StatusCode::NO_CONTENT)
}

async fn grupo_o_404(state: &AppState, grupo_id: DbId) -> AppResult<()> {
    GrupoRepo::find_by_id(&state.pool, grupo_id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "grupo",
                id: grupo_id,
            })
        })?;
    Ok(())
}

async fn reporte_existe(state: &AppState, codigo: &str) -> AppResult<()> {
    ReporteRepo::find_by_codigo(&state.pool, codigo)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFoundCodigo {
                entity: "reporte",
                codigo: codigo.to_string(),
            })
        })?;
    Ok(())
}
