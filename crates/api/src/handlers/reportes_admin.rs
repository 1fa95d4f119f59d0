//! Admin handlers for report definitions (CRUD plus Excel analysis).

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::Json;
use informes_core::error::CoreError;
use informes_core::schema::{validar_campos, validar_codigo};
use informes_db::models::reporte::{CreateReporte, Reporte, UpdateReporte};
use informes_db::repositories::ReporteRepo;
use informes_ingest::AnalisisExcel;

use crate::error::{AppError, AppResult};
use crate::handlers::{leer_archivo_xlsx, reporte_o_404};
use crate::middleware::rbac::RequireAdmin;
use crate::state::AppState;

/// GET /api/admin/reportes
///
/// Every report definition, inactive included.
pub async fn list(
    RequireAdmin(_user): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<Reporte>>> {
    Ok(Json(ReporteRepo::list_all(&state.pool).await?))
}

/// POST /api/admin/reportes
///
/// Create a report definition. When the LLM is configured, the field
/// definitions are reviewed in the background and dubious fields open
/// clarifications.
pub async fn create(
    RequireAdmin(user): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateReporte>,
) -> AppResult<(StatusCode, Json<Reporte>)> {
    validar_codigo(&input.codigo).map_err(AppError::Core)?;
    validar_campos(&input.campos).map_err(AppError::Core)?;

    let reporte = ReporteRepo::create(&state.pool, &input, Some(&user.username)).await?;
    tracing::info!(codigo = %reporte.codigo, created_by = %user.username, "report created");

    if state.llm.is_configured() {
        let pool = state.pool.clone();
        let llm = state.llm.clone();
        let creado = reporte.clone();
        tokio::spawn(async move {
            informes_analysis::validacion::procesar_reporte_nuevo(&pool, &llm, &creado).await;
        });
    }

    Ok((StatusCode::CREATED, Json(reporte)))
}

/// GET /api/admin/reportes/{codigo}
pub async fn get(
    RequireAdmin(_user): RequireAdmin,
    State(state): State<AppState>,
    Path(codigo): Path<String>,
) -> AppResult<Json<Reporte>> {
    Ok(Json(reporte_o_404(&state.pool, &codigo).await?))
}

/// PUT /api/admin/reportes/{codigo}
///
/// Partial update; absent fields keep their stored value.
pub async fn update(
    RequireAdmin(_user): RequireAdmin,
    State(state): State<AppState>,
    Path(codigo): Path<String>,
    Json(input): Json<UpdateReporte>,
) -> AppResult<Json<Reporte>> {
    if let Some(campos) = &input.campos {
        validar_campos(campos).map_err(AppError::Core)?;
    }

    let reporte = ReporteRepo::update(&state.pool, &codigo, &input)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFoundCodigo {
                entity: "reporte",
                codigo: codigo.clone(),
            })
        })?;
    Ok(Json(reporte))
}

/// DELETE /api/admin/reportes/{codigo}
///
/// Soft delete: the definition and its data stay in place, the report
/// disappears from permission-filtered listings.
pub async fn delete(
    RequireAdmin(user): RequireAdmin,
    State(state): State<AppState>,
    Path(codigo): Path<String>,
) -> AppResult<StatusCode> {
    if !ReporteRepo::soft_delete(&state.pool, &codigo).await? {
        return Err(AppError::Core(CoreError::NotFoundCodigo {
            entity: "reporte",
            codigo,
        }));
    }
    tracing::info!(%codigo, by = %user.username, "report deactivated");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/admin/analizar-excel
///
/// Infer a candidate field list from an uploaded workbook. Nothing is
/// persisted; the admin edits the result before saving a report.
pub async fn analizar_excel(
    RequireAdmin(_user): RequireAdmin,
    mut multipart: Multipart,
) -> AppResult<Json<AnalisisExcel>> {
    let (_filename, bytes) = leer_archivo_xlsx(&mut multipart).await?;
    Ok(Json(informes_ingest::analizar_excel(&bytes)?))
}
