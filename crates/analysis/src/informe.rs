//! Full multi-section informe generation.
//!
//! An informe is the three canned analyses (general, tendencias,
//! anomalías) run over the same snapshot of rows, plus the dataset
//! summary and the automatic charts, bundled as one document.

use informes_core::charts::{graficos_automaticos, GraficoSpec};
use informes_core::stats::{resumen_dataset, ResumenDataset};
use informes_core::types::Timestamp;
use informes_db::models::reporte::Reporte;
use informes_db::DbPool;
use serde::Serialize;

use crate::agent::{self, TipoAnalisis};
use crate::client::LlmClient;
use crate::error::AnalysisError;

/// Rows loaded for an informe.
const MAX_REGISTROS_INFORME: i64 = 100;

/// One analysis section of an informe.
#[derive(Debug, Clone, Serialize)]
pub struct SeccionInforme {
    pub tipo: String,
    pub contenido: String,
}

/// A complete generated informe.
#[derive(Debug, Clone, Serialize)]
pub struct Informe {
    pub reporte: String,
    pub codigo: String,
    pub total_registros: usize,
    pub resumen: ResumenDataset,
    pub secciones: Vec<SeccionInforme>,
    pub graficos: Vec<GraficoSpec>,
    pub timestamp: Timestamp,
}

/// Generate the full informe for a report.
pub async fn generar_informe(
    pool: &DbPool,
    llm: &LlmClient,
    reporte: &Reporte,
) -> Result<Informe, AnalysisError> {
    if !llm.is_configured() {
        return Err(AnalysisError::NoConfigurado);
    }

    let registros = agent::cargar_registros(pool, &reporte.codigo, MAX_REGISTROS_INFORME).await?;
    if registros.is_empty() {
        return Err(AnalysisError::SinDatos(reporte.codigo.clone()));
    }

    let mut secciones = Vec::with_capacity(3);
    for tipo in [
        TipoAnalisis::General,
        TipoAnalisis::Tendencias,
        TipoAnalisis::Anomalias,
    ] {
        let prompt = agent::prompt_analisis(reporte, tipo, &registros);
        let contenido = llm.chat(agent::SYSTEM_ANALISIS, &prompt, 0.7, 2000).await?;
        secciones.push(SeccionInforme {
            tipo: tipo.as_str().to_string(),
            contenido,
        });
    }

    tracing::info!(codigo = %reporte.codigo, registros = registros.len(), "informe generated");
    Ok(Informe {
        reporte: reporte.nombre.clone(),
        codigo: reporte.codigo.clone(),
        total_registros: registros.len(),
        resumen: resumen_dataset(&registros),
        secciones,
        graficos: graficos_automaticos(&registros),
        timestamp: chrono::Utc::now(),
    })
}
