//! Semantic index over ingested records.
//!
//! Each record renders to a plain-text document which is embedded and
//! stored alongside the record id. Ranking is plain cosine similarity in
//! process; corpora are capped at 1000 records per report, which keeps
//! the scan trivial.

use informes_db::models::reporte::Reporte;
use informes_db::repositories::{IndiceRepo, RegistroRepo};
use informes_db::repositories::indice_repo::NuevoIndice;
use informes_db::DbPool;
use serde::Serialize;
use serde_json::Value;

use crate::client::LlmClient;
use crate::error::AnalysisError;

/// At most this many records are indexed per report.
pub const MAX_REGISTROS_INDEX: i64 = 1000;

/// Embedding API batch size.
const BATCH_EMBED: usize = 100;

/// Default number of search hits.
pub const DEFAULT_HITS: usize = 5;

/// One semantic-search hit.
#[derive(Debug, Clone, Serialize)]
pub struct Hit {
    pub registro_id: i64,
    pub documento: String,
    pub score: f32,
}

/// Render one record as the text document to embed.
pub fn documento_registro(reporte_nombre: &str, datos: &Value) -> String {
    let mut texto = format!("Registro del reporte {reporte_nombre}:\n");
    if let Some(objeto) = datos.as_object() {
        for (campo, valor) in objeto {
            if valor.is_null() {
                continue;
            }
            let plano = match valor {
                Value::String(s) => s.clone(),
                otro => otro.to_string(),
            };
            texto.push_str(&format!("{campo}: {plano}\n"));
        }
    }
    texto
}

/// Cosine similarity between two vectors. Zero for mismatched lengths
/// or zero-norm inputs.
pub fn similitud_coseno(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let punto: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norma_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norma_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norma_a == 0.0 || norma_b == 0.0 {
        return 0.0;
    }
    punto / (norma_a * norma_b)
}

/// Build (or rebuild) the semantic index of a report. Returns the number
/// of documents indexed.
pub async fn indexar_reporte(
    pool: &DbPool,
    llm: &LlmClient,
    reporte: &Reporte,
) -> Result<i64, AnalysisError> {
    let registros =
        RegistroRepo::list_para_indexar(pool, &reporte.codigo, MAX_REGISTROS_INDEX).await?;
    if registros.is_empty() {
        return Ok(0);
    }

    let documentos: Vec<String> = registros
        .iter()
        .map(|(_, datos)| documento_registro(&reporte.nombre, datos))
        .collect();

    let mut nuevos = Vec::with_capacity(documentos.len());
    for (lote_docs, lote_regs) in documentos
        .chunks(BATCH_EMBED)
        .zip(registros.chunks(BATCH_EMBED))
    {
        let embeddings = llm.embed(lote_docs).await?;
        for (((id, _), documento), embedding) in
            lote_regs.iter().zip(lote_docs).zip(embeddings)
        {
            nuevos.push(NuevoIndice {
                registro_id: *id,
                documento: documento.clone(),
                embedding: Some(embedding),
            });
        }
    }

    let indexados = IndiceRepo::replace_all(pool, &reporte.codigo, &nuevos).await?;
    tracing::info!(codigo = %reporte.codigo, indexados, "semantic index rebuilt");
    Ok(indexados)
}

/// Semantic search over a report's index. An empty index is built on
/// first use.
pub async fn buscar(
    pool: &DbPool,
    llm: &LlmClient,
    reporte: &Reporte,
    pregunta: &str,
    limite: usize,
) -> Result<Vec<Hit>, AnalysisError> {
    if IndiceRepo::count(pool, &reporte.codigo).await? == 0 {
        indexar_reporte(pool, llm, reporte).await?;
    }

    let indices = IndiceRepo::list_por_reporte(pool, &reporte.codigo).await?;
    if indices.is_empty() {
        return Ok(Vec::new());
    }

    let consulta = llm.embed(&[pregunta.to_string()]).await?;
    let consulta = &consulta[0];

    let mut hits: Vec<Hit> = indices
        .into_iter()
        .filter_map(|indice| {
            let embedding = indice.embedding?;
            Some(Hit {
                score: similitud_coseno(consulta, &embedding.0),
                registro_id: indice.registro_id,
                documento: indice.documento,
            })
        })
        .collect();

    hits.sort_by(|a, b| b.score.total_cmp(&a.score));
    hits.truncate(limite.max(1));
    Ok(hits)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
