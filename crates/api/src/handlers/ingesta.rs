//! Webhook ingestion: JSON record batches from external systems.
//!
//! The webhook is the one unauthenticated write path; it only accepts
//! rows for active reports and validates each row against the schema
//! like any other upload.

use axum::extract::{Path, State};
use axum::Json;
use informes_core::error::CoreError;
use informes_db::models::carga::RegistrarCarga;
use informes_db::models::registro::InsercionResultado;
use informes_db::repositories::{CargaRepo, RegistroRepo};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{AppError, AppResult};
use crate::handlers::reporte_o_404;
use crate::state::AppState;

/// Request body for `POST /webhook/upload/{codigo}`.
#[derive(Debug, Deserialize)]
pub struct WebhookPayload {
    pub datos: Vec<Map<String, Value>>,
}

/// Response body for webhook ingestion.
#[derive(Debug, Serialize)]
pub struct WebhookResponse {
    pub reporte: String,
    #[serde(flatten)]
    pub resultado: InsercionResultado,
}

/// POST /webhook/upload/{codigo}
pub async fn webhook_upload(
    State(state): State<AppState>,
    Path(codigo): Path<String>,
    Json(payload): Json<WebhookPayload>,
) -> AppResult<Json<WebhookResponse>> {
    let reporte = reporte_o_404(&state.pool, &codigo).await?;
    if !reporte.activo {
        return Err(AppError::Core(CoreError::NotFoundCodigo {
            entity: "reporte",
            codigo,
        }));
    }
    if payload.datos.is_empty() {
        return Err(AppError::BadRequest("'datos' está vacío".into()));
    }

    let resultado = RegistroRepo::insert_batch(
        &state.pool,
        &reporte.codigo,
        &payload.datos,
        &reporte.campos,
        Some("webhook"),
    )
    .await?;

    let estado = if resultado.errores == 0 {
        "completado"
    } else {
        "completado_con_errores"
    };
    CargaRepo::registrar(
        &state.pool,
        &RegistrarCarga {
            reporte_codigo: Some(reporte.codigo.clone()),
            nombre_archivo: None,
            registros_insertados: resultado.insertados as i32,
            registros_error: resultado.errores as i32,
            estado: estado.into(),
            mensaje: (!resultado.mensajes.is_empty()).then(|| resultado.mensajes.join("; ")),
            usuario: Some("webhook".into()),
        },
    )
    .await?;

    tracing::info!(
        codigo = %reporte.codigo,
        insertados = resultado.insertados,
        errores = resultado.errores,
        "webhook batch ingested"
    );
    Ok(Json(WebhookResponse {
        reporte: reporte.codigo,
        resultado,
    }))
}
