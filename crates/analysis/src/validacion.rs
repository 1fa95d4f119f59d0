//! LLM-assisted review of a report schema.
//!
//! When an admin saves a report, the field definitions are sent to the
//! LLM for a clarity review. Each dubious field opens a clarification in
//! the workflow and one admin notification, so unclear semantics get
//! resolved by a human before they poison the analysis prompts.

use informes_core::schema::Campo;
use informes_db::models::aclaracion::CreateAclaracion;
use informes_db::models::notificacion::CreateNotificacion;
use informes_db::models::reporte::Reporte;
use informes_db::repositories::{AclaracionRepo, NotificacionRepo};
use informes_db::DbPool;
use serde::Deserialize;

use crate::client::LlmClient;
use crate::error::AnalysisError;

const SYSTEM_VALIDACION: &str = "\
Eres un auditor de calidad de datos. Evalúa si las definiciones de campos \
de un reporte son lo bastante claras para que un analista las use sin \
ambigüedad. Responde ÚNICAMENTE con JSON válido, sin texto adicional.";

/// Result of reviewing a report's field definitions.
#[derive(Debug, Clone, Deserialize)]
pub struct ValidacionCampos {
    pub aprobado: bool,
    pub puntuacion_claridad: f32,
    #[serde(default)]
    pub campos_dudosos: Vec<CampoDudoso>,
    #[serde(default)]
    pub sugerencias: Vec<String>,
}

/// One field the reviewer could not interpret with confidence.
#[derive(Debug, Clone, Deserialize)]
pub struct CampoDudoso {
    pub nombre: String,
    pub razon: String,
    #[serde(default)]
    pub severidad: Option<String>,
}

/// Ask the LLM to review the field definitions of a report.
pub async fn validar_campos_reporte(
    llm: &LlmClient,
    reporte_nombre: &str,
    contexto: Option<&str>,
    campos: &[Campo],
) -> Result<ValidacionCampos, AnalysisError> {
    let prompt = prompt_validacion(reporte_nombre, contexto, campos);
    let respuesta = llm.chat(SYSTEM_VALIDACION, &prompt, 0.1, 1000).await?;
    parsear_validacion(&respuesta)
}

/// Review a just-saved report and open a clarification plus an admin
/// notification for each dubious field. Intended to run detached after
/// report creation; failures are logged, never surfaced to the save.
pub async fn procesar_reporte_nuevo(pool: &DbPool, llm: &LlmClient, reporte: &Reporte) {
    let validacion =
        match validar_campos_reporte(llm, &reporte.nombre, reporte.contexto.as_deref(), &reporte.campos).await {
            Ok(v) => v,
            Err(error) => {
                tracing::warn!(codigo = %reporte.codigo, %error, "field review failed");
                return;
            }
        };

    tracing::info!(
        codigo = %reporte.codigo,
        aprobado = validacion.aprobado,
        claridad = validacion.puntuacion_claridad,
        dudosos = validacion.campos_dudosos.len(),
        "field review completed"
    );

    for dudoso in &validacion.campos_dudosos {
        if let Err(error) = abrir_aclaracion(pool, reporte, dudoso).await {
            tracing::warn!(
                codigo = %reporte.codigo,
                campo = %dudoso.nombre,
                %error,
                "could not open clarification"
            );
        }
    }
}

async fn abrir_aclaracion(
    pool: &DbPool,
    reporte: &Reporte,
    dudoso: &CampoDudoso,
) -> Result<(), sqlx::Error> {
    let pregunta = format!(
        "¿Qué significa exactamente el campo \"{}\" en el reporte \"{}\"? {}",
        dudoso.nombre, reporte.nombre, dudoso.razon
    );
    let aclaracion = AclaracionRepo::crear(
        pool,
        &CreateAclaracion {
            reporte_codigo: reporte.codigo.clone(),
            nombre_campo: dudoso.nombre.clone(),
            pregunta_ia: pregunta,
            contexto_uso: Some(dudoso.razon.clone()),
        },
    )
    .await?;

    NotificacionRepo::crear(
        pool,
        &CreateNotificacion {
            tipo: "aclaracion_pendiente".to_string(),
            titulo: format!("Aclaración pendiente en {}", reporte.nombre),
            mensaje: format!(
                "La IA necesita aclaración sobre el campo \"{}\" del reporte \"{}\"",
                dudoso.nombre, reporte.nombre
            ),
            datos: Some(serde_json::json!({
                "reporte_codigo": reporte.codigo,
                "nombre_campo": dudoso.nombre,
                "severidad": dudoso.severidad,
            })),
            relacionado_con: Some("campo_aclaraciones".to_string()),
            relacionado_id: Some(aclaracion.id),
        },
    )
    .await?;
    Ok(())
}

fn prompt_validacion(reporte_nombre: &str, contexto: Option<&str>, campos: &[Campo]) -> String {
    let mut listado = String::new();
    for campo in campos {
        listado.push_str(&format!(
            "- {} (etiqueta: \"{}\", tipo: {}): {}\n",
            campo.nombre,
            campo.etiqueta,
            campo.tipo_dato.as_str(),
            campo.descripcion.as_deref().unwrap_or("sin descripción"),
        ));
    }

    format!(
        "Revisa las definiciones de campos del reporte \"{reporte_nombre}\".\n\
         Contexto del reporte: {}\n\n\
         CAMPOS:\n{listado}\n\
         Devuelve JSON con esta estructura exacta:\n\
         {{\n\
           \"aprobado\": true o false,\n\
           \"puntuacion_claridad\": número de 0 a 10,\n\
           \"campos_dudosos\": [{{\"nombre\": \"...\", \"razon\": \"...\", \"severidad\": \"alta|media|baja\"}}],\n\
           \"sugerencias\": [\"...\"]\n\
         }}",
        contexto.unwrap_or("no especificado"),
    )
}

/// Parse the reviewer response, tolerating markdown code fences.
fn parsear_validacion(respuesta: &str) -> Result<ValidacionCampos, AnalysisError> {
    let limpio = respuesta
        .trim()
        .trim_start_matches("```json")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim();
    serde_json::from_str(limpio)
        .map_err(|e| AnalysisError::RespuestaInvalida(format!("validación no es JSON: {e}")))
}
