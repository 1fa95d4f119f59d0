//! Repository for the `ia_conocimiento` knowledge base.
//!
//! Rows enter only through admin-approved clarification answers and are
//! read back as context for analysis prompts.

use sqlx::PgPool;

use crate::models::conocimiento::Conocimiento;

/// Column list for `ia_conocimiento` queries.
const CONOCIMIENTO_COLUMNS: &str =
    "id, reporte_codigo, nombre_campo, respuesta, fuente, created_at";

/// Provides knowledge-base operations.
pub struct ConocimientoRepo;

impl ConocimientoRepo {
    /// Store an approved answer.
    pub async fn guardar(
        pool: &PgPool,
        reporte_codigo: &str,
        nombre_campo: &str,
        respuesta: &str,
    ) -> Result<Conocimiento, sqlx::Error> {
        let query = format!(
            "INSERT INTO ia_conocimiento (reporte_codigo, nombre_campo, respuesta) \
             VALUES ($1, $2, $3) \
             RETURNING {CONOCIMIENTO_COLUMNS}"
        );
        sqlx::query_as::<_, Conocimiento>(&query)
            .bind(reporte_codigo)
            .bind(nombre_campo)
            .bind(respuesta)
            .fetch_one(pool)
            .await
    }

    /// List the knowledge entries of one report, newest first.
    pub async fn list_por_reporte(
        pool: &PgPool,
        reporte_codigo: &str,
    ) -> Result<Vec<Conocimiento>, sqlx::Error> {
        let query = format!(
            "SELECT {CONOCIMIENTO_COLUMNS} FROM ia_conocimiento \
             WHERE reporte_codigo = $1 \
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Conocimiento>(&query)
            .bind(reporte_codigo)
            .fetch_all(pool)
            .await
    }
}
