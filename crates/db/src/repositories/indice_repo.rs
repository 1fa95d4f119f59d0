//! Repository for the `registro_indices` semantic index.
//!
//! Embeddings are stored as JSON arrays of floats and ranked in process;
//! re-indexing a report replaces its rows wholesale inside a transaction.

use informes_core::types::DbId;
use sqlx::types::Json;
use sqlx::PgPool;

use crate::models::indice::Indice;

/// Column list for `registro_indices` queries.
const INDICE_COLUMNS: &str =
    "id, reporte_codigo, registro_id, documento, embedding, created_at";

/// One document ready for insertion.
#[derive(Debug, Clone)]
pub struct NuevoIndice {
    pub registro_id: DbId,
    pub documento: String,
    pub embedding: Option<Vec<f32>>,
}

/// Provides semantic-index operations.
pub struct IndiceRepo;

impl IndiceRepo {
    /// Replace every index row of a report with the given documents.
    /// Returns the number of rows written.
    pub async fn replace_all(
        pool: &PgPool,
        reporte_codigo: &str,
        documentos: &[NuevoIndice],
    ) -> Result<i64, sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query("DELETE FROM registro_indices WHERE reporte_codigo = $1")
            .bind(reporte_codigo)
            .execute(&mut *tx)
            .await?;

        for doc in documentos {
            sqlx::query(
                "INSERT INTO registro_indices \
                     (reporte_codigo, registro_id, documento, embedding) \
                 VALUES ($1, $2, $3, $4)",
            )
            .bind(reporte_codigo)
            .bind(doc.registro_id)
            .bind(&doc.documento)
            .bind(doc.embedding.as_ref().map(Json))
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(documentos.len() as i64)
    }

    /// Fetch every index row of a report (ranking happens in process).
    pub async fn list_por_reporte(
        pool: &PgPool,
        reporte_codigo: &str,
    ) -> Result<Vec<Indice>, sqlx::Error> {
        let query = format!(
            "SELECT {INDICE_COLUMNS} FROM registro_indices \
             WHERE reporte_codigo = $1 \
             ORDER BY registro_id"
        );
        sqlx::query_as::<_, Indice>(&query)
            .bind(reporte_codigo)
            .fetch_all(pool)
            .await
    }

    /// Count the index rows of a report.
    pub async fn count(pool: &PgPool, reporte_codigo: &str) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM registro_indices WHERE reporte_codigo = $1",
        )
        .bind(reporte_codigo)
        .fetch_one(pool)
        .await
    }
}
