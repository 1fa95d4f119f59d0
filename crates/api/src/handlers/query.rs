//! Raw data query handlers: filtered listings and Excel export.

use axum::extract::{Path, Query, State};
use axum::response::Response;
use axum::Json;
use informes_db::models::permiso::Accion;
use informes_db::models::registro::ListRegistrosParams;
use informes_db::models::reporte::Reporte;
use informes_db::repositories::RegistroRepo;
use serde::Serialize;
use serde_json::Value;

use crate::error::AppResult;
use crate::handlers::reportes::acceder;
use crate::handlers::xlsx_response;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Response body for `GET /api/query/{codigo}`: the bare row objects,
/// without ingestion metadata.
#[derive(Debug, Serialize)]
pub struct QueryResponse {
    pub reporte: String,
    pub total: usize,
    pub registros: Vec<Value>,
}

/// GET /api/query/{codigo}?limite=&fecha_desde=&fecha_hasta=
pub async fn consultar(
    State(state): State<AppState>,
    user: AuthUser,
    Path(codigo): Path<String>,
    Query(params): Query<ListRegistrosParams>,
) -> AppResult<Json<QueryResponse>> {
    let reporte = acceder(&state, &user, &codigo, Accion::Ver).await?;
    let registros: Vec<Value> = RegistroRepo::list(&state.pool, &reporte.codigo, &params)
        .await?
        .into_iter()
        .map(|r| r.datos)
        .collect();
    Ok(Json(QueryResponse {
        reporte: reporte.codigo,
        total: registros.len(),
        registros,
    }))
}

/// GET /api/query/{codigo}/export
///
/// The same filtered rows as a workbook. Column headers are the field
/// nombres, so the export re-ingests through the upload path unchanged.
pub async fn exportar(
    State(state): State<AppState>,
    user: AuthUser,
    Path(codigo): Path<String>,
    Query(params): Query<ListRegistrosParams>,
) -> AppResult<Response> {
    let reporte = acceder(&state, &user, &codigo, Accion::Ver).await?;
    let registros = RegistroRepo::list(&state.pool, &reporte.codigo, &params).await?;

    let columnas = columnas_export(&reporte);
    let filas: Vec<Vec<Value>> = registros
        .iter()
        .map(|r| {
            columnas
                .iter()
                .map(|c| r.datos.get(c).cloned().unwrap_or(Value::Null))
                .collect()
        })
        .collect();

    let bytes = informes_ingest::exportar_tabla(&reporte.nombre, &columnas, &filas)?;
    Ok(xlsx_response(
        &format!("consulta_{}.xlsx", reporte.codigo),
        bytes,
    ))
}

/// Export column order: the declared schema order.
pub(crate) fn columnas_export(reporte: &Reporte) -> Vec<String> {
    reporte.campos.iter().map(|c| c.nombre.clone()).collect()
}
