//! Repository for the `datos_reportes` table.
//!
//! Records are append-only: one JSONB object per ingested row, keyed by
//! the report's `Campo.nombre` identifiers. Batch inserts validate each
//! row against the schema and keep going on failures, reporting counts.

use informes_core::pagination::clamp_limit;
use informes_core::records::validar_registro;
use informes_core::schema::Campo;
use informes_core::types::DbId;
use serde_json::{Map, Value};
use sqlx::PgPool;

use crate::models::registro::{InsercionResultado, ListRegistrosParams, Registro};

/// Column list for `datos_reportes` queries.
const REGISTRO_COLUMNS: &str = "id, reporte_codigo, datos, uploaded_by, created_at";

/// At most this many per-row error messages are kept in a batch result.
const MAX_MENSAJES: usize = 20;

/// Provides insert and listing operations for ingested records.
pub struct RegistroRepo;

impl RegistroRepo {
    /// Insert one already-validated record.
    pub async fn insert(
        pool: &PgPool,
        reporte_codigo: &str,
        datos: &Value,
        uploaded_by: Option<&str>,
    ) -> Result<Registro, sqlx::Error> {
        let query = format!(
            "INSERT INTO datos_reportes (reporte_codigo, datos, uploaded_by) \
             VALUES ($1, $2, $3) \
             RETURNING {REGISTRO_COLUMNS}"
        );
        sqlx::query_as::<_, Registro>(&query)
            .bind(reporte_codigo)
            .bind(datos)
            .bind(uploaded_by)
            .fetch_one(pool)
            .await
    }

    /// Validate and insert a batch of records row by row.
    ///
    /// A row that fails validation is skipped and counted; the batch is
    /// never rolled back. Database errors still abort, since they signal
    /// infrastructure trouble rather than bad data.
    pub async fn insert_batch(
        pool: &PgPool,
        reporte_codigo: &str,
        filas: &[Map<String, Value>],
        campos: &[Campo],
        uploaded_by: Option<&str>,
    ) -> Result<InsercionResultado, sqlx::Error> {
        let mut resultado = InsercionResultado::default();

        for (num, fila) in filas.iter().enumerate() {
            match validar_registro(fila, campos) {
                Ok(coercido) => {
                    Self::insert(pool, reporte_codigo, &Value::Object(coercido), uploaded_by)
                        .await?;
                    resultado.insertados += 1;
                }
                Err(e) => {
                    resultado.errores += 1;
                    if resultado.mensajes.len() < MAX_MENSAJES {
                        resultado.mensajes.push(format!("fila {}: {e}", num + 1));
                    }
                }
            }
        }

        tracing::debug!(
            reporte_codigo,
            insertados = resultado.insertados,
            errores = resultado.errores,
            "batch insert finished"
        );
        Ok(resultado)
    }

    /// List records newest-first with optional limit and date-range filters.
    pub async fn list(
        pool: &PgPool,
        reporte_codigo: &str,
        params: &ListRegistrosParams,
    ) -> Result<Vec<Registro>, sqlx::Error> {
        let limite = clamp_limit(params.limite);
        let query = format!(
            "SELECT {REGISTRO_COLUMNS} FROM datos_reportes \
             WHERE reporte_codigo = $1 \
               AND ($2::date IS NULL OR created_at::date >= $2) \
               AND ($3::date IS NULL OR created_at::date <= $3) \
             ORDER BY created_at DESC \
             LIMIT $4"
        );
        sqlx::query_as::<_, Registro>(&query)
            .bind(reporte_codigo)
            .bind(params.fecha_desde)
            .bind(params.fecha_hasta)
            .bind(limite)
            .fetch_all(pool)
            .await
    }

    /// Count the records of a report.
    pub async fn count(pool: &PgPool, reporte_codigo: &str) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM datos_reportes WHERE reporte_codigo = $1",
        )
        .bind(reporte_codigo)
        .fetch_one(pool)
        .await
    }

    /// Fetch the `(id, datos)` pairs used to build the semantic index,
    /// oldest-first so document order is stable across re-indexing.
    pub async fn list_para_indexar(
        pool: &PgPool,
        reporte_codigo: &str,
        max: i64,
    ) -> Result<Vec<(DbId, Value)>, sqlx::Error> {
        sqlx::query_as::<_, (DbId, Value)>(
            "SELECT id, datos FROM datos_reportes \
             WHERE reporte_codigo = $1 \
             ORDER BY id \
             LIMIT $2",
        )
        .bind(reporte_codigo)
        .bind(max)
        .fetch_all(pool)
        .await
    }
}
