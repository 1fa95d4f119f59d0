//! AI analysis handlers: Q&A, indexing, canned analyses, informes, and
//! semantic search.
//!
//! Every endpoint requires view permission on the report. Without an LLM
//! API key these return 503 rather than failing at startup.

use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use informes_analysis::agent::{self, RespuestaPregunta, TipoAnalisis};
use informes_analysis::indexer::{self, Hit};
use informes_analysis::informe;
use informes_core::charts::solicita_export;
use informes_db::models::permiso::Accion;
use informes_db::models::registro::ListRegistrosParams;
use informes_db::repositories::RegistroRepo;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{AppError, AppResult};
use crate::handlers::query::columnas_export;
use crate::handlers::reportes::acceder;
use crate::handlers::xlsx_response;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Request body for `POST /api/analysis/{codigo}/pregunta`.
#[derive(Debug, Deserialize)]
pub struct PreguntaRequest {
    pub pregunta: String,
}

/// Query string for `GET /api/analysis/{codigo}/analisis`.
#[derive(Debug, Default, Deserialize)]
pub struct AnalisisParams {
    #[serde(default)]
    pub tipo: Option<TipoAnalisis>,
}

/// Query string for `GET /api/analysis/{codigo}/buscar`.
#[derive(Debug, Deserialize)]
pub struct BuscarParams {
    pub q: String,
    pub limite: Option<usize>,
}

/// Response body for semantic search.
#[derive(Debug, Serialize)]
pub struct BuscarResponse {
    pub consulta: String,
    pub resultados: Vec<Hit>,
}

/// Response body for index rebuilds.
#[derive(Debug, Serialize)]
pub struct IndexarResponse {
    pub reporte: String,
    pub indexados: i64,
}

/// POST /api/analysis/{codigo}/pregunta
///
/// Natural-language Q&A. A question that asks for an export returns the
/// report's rows as a workbook instead of a chat answer.
pub async fn pregunta(
    State(state): State<AppState>,
    user: AuthUser,
    Path(codigo): Path<String>,
    Json(input): Json<PreguntaRequest>,
) -> AppResult<Response> {
    let pregunta = input.pregunta.trim();
    if pregunta.is_empty() {
        return Err(AppError::BadRequest("la pregunta no puede estar vacía".into()));
    }
    let reporte = acceder(&state, &user, &codigo, Accion::Ver).await?;

    if solicita_export(pregunta) {
        let registros = RegistroRepo::list(
            &state.pool,
            &reporte.codigo,
            &ListRegistrosParams {
                limite: Some(1000),
                ..Default::default()
            },
        )
        .await?;
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
        return Ok(xlsx_response(
            &format!("consulta_{}.xlsx", reporte.codigo),
            bytes,
        ));
    }

    let respuesta: RespuestaPregunta =
        agent::responder_pregunta(&state.pool, &state.llm, &reporte, pregunta).await?;
    Ok(Json(respuesta).into_response())
}

/// POST /api/analysis/{codigo}/indexar
///
/// Rebuild the semantic index of a report.
pub async fn indexar(
    State(state): State<AppState>,
    user: AuthUser,
    Path(codigo): Path<String>,
) -> AppResult<Json<IndexarResponse>> {
    let reporte = acceder(&state, &user, &codigo, Accion::Ver).await?;
    if !state.llm.is_configured() {
        return Err(informes_analysis::AnalysisError::NoConfigurado.into());
    }
    let indexados = indexer::indexar_reporte(&state.pool, &state.llm, &reporte).await?;
    Ok(Json(IndexarResponse {
        reporte: reporte.codigo,
        indexados,
    }))
}

/// GET /api/analysis/{codigo}/analisis?tipo=general|tendencias|anomalias
pub async fn analisis(
    State(state): State<AppState>,
    user: AuthUser,
    Path(codigo): Path<String>,
    Query(params): Query<AnalisisParams>,
) -> AppResult<Json<agent::Analisis>> {
    let reporte = acceder(&state, &user, &codigo, Accion::Ver).await?;
    let tipo = params.tipo.unwrap_or_default();
    let resultado = agent::generar_analisis(&state.pool, &state.llm, &reporte, tipo).await?;
    Ok(Json(resultado))
}

/// POST /api/analysis/{codigo}/informe
pub async fn generar_informe(
    State(state): State<AppState>,
    user: AuthUser,
    Path(codigo): Path<String>,
) -> AppResult<Json<informe::Informe>> {
    let reporte = acceder(&state, &user, &codigo, Accion::Ver).await?;
    let informe = informe::generar_informe(&state.pool, &state.llm, &reporte).await?;
    Ok(Json(informe))
}

/// GET /api/analysis/{codigo}/buscar?q=...&limite=5
pub async fn buscar(
    State(state): State<AppState>,
    user: AuthUser,
    Path(codigo): Path<String>,
    Query(params): Query<BuscarParams>,
) -> AppResult<Json<BuscarResponse>> {
    let consulta = params.q.trim().to_string();
    if consulta.is_empty() {
        return Err(AppError::BadRequest("'q' no puede estar vacío".into()));
    }
    let reporte = acceder(&state, &user, &codigo, Accion::Ver).await?;
    if !state.llm.is_configured() {
        return Err(informes_analysis::AnalysisError::NoConfigurado.into());
    }

    let limite = params.limite.unwrap_or(indexer::DEFAULT_HITS);
    let resultados =
        indexer::buscar(&state.pool, &state.llm, &reporte, &consulta, limite).await?;
    Ok(Json(BuscarResponse {
        consulta,
        resultados,
    }))
}
