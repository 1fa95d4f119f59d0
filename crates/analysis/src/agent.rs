//! Retrieval-augmented Q&A and canned analyses.
//!
//! The agent answers in Spanish: it retrieves the closest indexed
//! documents, computes column statistics over the raw rows, folds in the
//! validated knowledge base, and assembles one deterministic prompt. A
//! chart spec is attached whenever the question asks for one.

use informes_core::charts::{construir_grafico, graficos_automaticos, solicita_grafico, GraficoSpec};
use informes_core::stats::{columnas, stats_columnas};
use informes_core::types::Timestamp;
use informes_db::models::registro::ListRegistrosParams;
use informes_db::models::reporte::Reporte;
use informes_db::repositories::{ConocimientoRepo, RegistroRepo};
use informes_db::DbPool;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::client::LlmClient;
use crate::error::AnalysisError;
use crate::indexer;

/// Rows loaded for Q&A statistics.
const MAX_REGISTROS_PREGUNTA: i64 = 1000;
/// Rows loaded for canned analyses.
const MAX_REGISTROS_ANALISIS: i64 = 100;
/// Sample rows shown verbatim in prompts.
const FILAS_MUESTRA: usize = 5;

/// System prompt for Q&A: results only, no process narration.
const SYSTEM_ANALISTA: &str = "\
Eres un analista de datos experto con acceso COMPLETO a los registros del reporte. \
Puedes calcular sumas, promedios, máximos, mínimos, conteos y agrupaciones con los \
datos del contexto. Presenta SOLO los resultados finales, con números específicos, \
en español claro y profesional. Nunca describas el proceso, nunca muestres código, \
nunca digas que no tienes acceso ni que necesitas más información.";

/// System prompt for canned analyses.
pub(crate) const SYSTEM_ANALISIS: &str = "\
Eres un analista de datos experto. Proporciona insights valiosos y recomendaciones \
basadas en los datos del contexto. Responde en español y de forma clara y profesional.";

/// Canned analysis flavor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TipoAnalisis {
    #[default]
    General,
    Tendencias,
    Anomalias,
}

impl TipoAnalisis {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Tendencias => "tendencias",
            Self::Anomalias => "anomalias",
        }
    }
}

/// Answer to a natural-language question.
#[derive(Debug, Clone, Serialize)]
pub struct RespuestaPregunta {
    pub pregunta: String,
    pub respuesta: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grafico: Option<GraficoSpec>,
    pub contexto_usado: usize,
    pub timestamp: Timestamp,
}

/// Result of a canned analysis.
#[derive(Debug, Clone, Serialize)]
pub struct Analisis {
    pub tipo_analisis: String,
    pub reporte: String,
    pub total_registros: usize,
    pub analisis: String,
    pub graficos: Vec<GraficoSpec>,
    pub timestamp: Timestamp,
}

/// Load a report's rows as JSON objects, newest first.
pub async fn cargar_registros(
    pool: &DbPool,
    codigo: &str,
    max: i64,
) -> Result<Vec<Map<String, Value>>, AnalysisError> {
    let registros = RegistroRepo::list(
        pool,
        codigo,
        &ListRegistrosParams {
            limite: Some(max),
            ..Default::default()
        },
    )
    .await?;
    Ok(registros
        .into_iter()
        .filter_map(|r| r.datos.as_object().cloned())
        .collect())
}

/// Answer a question about a report's data.
pub async fn responder_pregunta(
    pool: &DbPool,
    llm: &LlmClient,
    reporte: &Reporte,
    pregunta: &str,
) -> Result<RespuestaPregunta, AnalysisError> {
    if !llm.is_configured() {
        return Err(AnalysisError::NoConfigurado);
    }

    let registros = cargar_registros(pool, &reporte.codigo, MAX_REGISTROS_PREGUNTA).await?;
    if registros.is_empty() {
        return Err(AnalysisError::SinDatos(reporte.codigo.clone()));
    }

    let contexto = indexer::buscar(pool, llm, reporte, pregunta, indexer::DEFAULT_HITS).await?;
    let prompt = prompt_pregunta(pool, reporte, pregunta, &registros, &contexto).await?;
    let respuesta = llm.chat(SYSTEM_ANALISTA, &prompt, 0.2, 1500).await?;

    let grafico = if solicita_grafico(pregunta) {
        construir_grafico(pregunta, &registros)
    } else {
        None
    };

    tracing::info!(
        codigo = %reporte.codigo,
        contexto_usado = contexto.len(),
        con_grafico = grafico.is_some(),
        "question answered"
    );
    Ok(RespuestaPregunta {
        pregunta: pregunta.to_string(),
        respuesta,
        grafico,
        contexto_usado: contexto.len(),
        timestamp: chrono::Utc::now(),
    })
}

/// Run a canned analysis over a report's data.
pub async fn generar_analisis(
    pool: &DbPool,
    llm: &LlmClient,
    reporte: &Reporte,
    tipo: TipoAnalisis,
) -> Result<Analisis, AnalysisError> {
    if !llm.is_configured() {
        return Err(AnalysisError::NoConfigurado);
    }

    let registros = cargar_registros(pool, &reporte.codigo, MAX_REGISTROS_ANALISIS).await?;
    if registros.is_empty() {
        return Err(AnalysisError::SinDatos(reporte.codigo.clone()));
    }

    let prompt = prompt_analisis(reporte, tipo, &registros);
    let analisis = llm.chat(SYSTEM_ANALISIS, &prompt, 0.7, 2000).await?;

    Ok(Analisis {
        tipo_analisis: tipo.as_str().to_string(),
        reporte: reporte.nombre.clone(),
        total_registros: registros.len(),
        analisis,
        graficos: graficos_automaticos(&registros),
        timestamp: chrono::Utc::now(),
    })
}

async fn prompt_pregunta(
    pool: &DbPool,
    reporte: &Reporte,
    pregunta: &str,
    registros: &[Map<String, Value>],
    contexto: &[indexer::Hit],
) -> Result<String, AnalysisError> {
    let stats = stats_columnas(registros);
    let muestra: Vec<&Map<String, Value>> = registros.iter().take(FILAS_MUESTRA).collect();
    let conocimiento = ConocimientoRepo::list_por_reporte(pool, &reporte.codigo).await?;

    let mut prompt = format!(
        "Responde la siguiente pregunta sobre el reporte \"{}\":\n\n\
         PREGUNTA: {pregunta}\n\n\
         DATOS DISPONIBLES:\n\
         - Total de registros analizables: {}\n\
         - Columnas: {}\n\n\
         ESTADÍSTICAS POR COLUMNA:\n{}\n\n\
         MUESTRA DE DATOS (primeros {FILAS_MUESTRA} registros):\n{}\n",
        reporte.nombre,
        registros.len(),
        columnas(registros).join(", "),
        serde_json::to_string_pretty(&stats).unwrap_or_default(),
        serde_json::to_string(&muestra).unwrap_or_default(),
    );

    if !contexto.is_empty() {
        prompt.push_str("\nREGISTROS MÁS RELEVANTES PARA LA PREGUNTA:\n");
        for hit in contexto {
            prompt.push_str(&hit.documento);
            prompt.push('\n');
        }
    }

    if !conocimiento.is_empty() {
        prompt.push_str("\nSIGNIFICADO VALIDADO DE CAMPOS:\n");
        for entrada in &conocimiento {
            prompt.push_str(&format!(
                "- {}: {}\n",
                entrada.nombre_campo, entrada.respuesta
            ));
        }
    }

    Ok(prompt)
}

pub(crate) fn prompt_analisis(
    reporte: &Reporte,
    tipo: TipoAnalisis,
    registros: &[Map<String, Value>],
) -> String {
    let stats = stats_columnas(registros);
    let muestra: Vec<&Map<String, Value>> = registros.iter().take(FILAS_MUESTRA).collect();
    let encabezado = format!(
        "Total de registros: {}\n\
         Columnas: {}\n\n\
         Estadísticas por columna:\n{}\n\n\
         Muestra de datos:\n{}\n",
        registros.len(),
        columnas(registros).join(", "),
        serde_json::to_string_pretty(&stats).unwrap_or_default(),
        serde_json::to_string(&muestra).unwrap_or_default(),
    );

    match tipo {
        TipoAnalisis::General => format!(
            "Analiza los siguientes datos del reporte \"{}\":\n\n{encabezado}\n\
             Proporciona un análisis detallado que incluya:\n\
             1. Resumen ejecutivo\n\
             2. Insights principales\n\
             3. Tendencias identificadas\n\
             4. Recomendaciones\n\
             5. Alertas o anomalías (si las hay)",
            reporte.nombre
        ),
        TipoAnalisis::Tendencias => format!(
            "Analiza las tendencias en los datos del reporte \"{}\".\n\n{encabezado}\n\
             Identifica:\n\
             1. Tendencias temporales\n\
             2. Patrones recurrentes\n\
             3. Proyecciones futuras\n\
             4. Cambios significativos",
            reporte.nombre
        ),
        TipoAnalisis::Anomalias => format!(
            "Detecta anomalías en los datos del reporte \"{}\".\n\n{encabezado}\n\
             Identifica valores atípicos, inconsistencias o datos sospechosos.",
            reporte.nombre
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tipo_analisis_deserializa_en_minusculas() {
        let tipo: TipoAnalisis = serde_json::from_str("\"tendencias\"").unwrap();
        assert_eq!(tipo, TipoAnalisis::Tendencias);
        assert_eq!(TipoAnalisis::default(), TipoAnalisis::General);
    }

    #[test]
    fn prompt_de_analisis_incluye_estadisticas() {
        let registros: Vec<Map<String, Value>> = vec![serde_json::json!({
            "cliente": "ACME",
            "monto": 150.5
        })
        .as_object()
        .unwrap()
        .clone()];
        let reporte = reporte_de_prueba();

        let prompt = prompt_analisis(&reporte, TipoAnalisis::General, &registros);
        assert!(prompt.contains("Facturas"));
        assert!(prompt.contains("cliente, monto"));
        assert!(prompt.contains("Resumen ejecutivo"));
    }

    fn reporte_de_prueba() -> Reporte {
        Reporte {
            id: 1,
            codigo: "facturas".to_string(),
            nombre: "Facturas".to_string(),
            descripcion: None,
            contexto: None,
            categoria: None,
            icono: None,
            activo: true,
            campos: sqlx::types::Json(Vec::new()),
            relaciones: sqlx::types::Json(Vec::new()),
            api_endpoint: None,
            query_template: None,
            created_by: None,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }
    }
}
