//! Repository for the `reportes_config` table.
//!
//! Report definitions are addressed by `codigo`. Deletion is always a
//! soft delete (`activo = false`); inactive reports stay fetchable by
//! admins but disappear from permission-filtered listings.

use informes_core::types::DbId;
use sqlx::types::Json;
use sqlx::PgPool;

use crate::models::reporte::{CreateReporte, Reporte, ReporteStats, UpdateReporte};

/// Column list for `reportes_config` queries.
const REPORTE_COLUMNS: &str = "\
    id, codigo, nombre, descripcion, contexto, categoria, icono, activo, \
    campos, relaciones, api_endpoint, query_template, created_by, \
    created_at, updated_at";

/// Same list qualified with the `r` alias, for joined queries.
const REPORTE_COLUMNS_R: &str = "\
    r.id, r.codigo, r.nombre, r.descripcion, r.contexto, r.categoria, \
    r.icono, r.activo, r.campos, r.relaciones, r.api_endpoint, \
    r.query_template, r.created_by, r.created_at, r.updated_at";

/// Provides CRUD operations for report definitions.
pub struct ReporteRepo;

impl ReporteRepo {
    /// Create a report definition. A duplicate `codigo` surfaces as a
    /// unique violation on `uq_reportes_config_codigo`.
    pub async fn create(
        pool: &PgPool,
        dto: &CreateReporte,
        created_by: Option<&str>,
    ) -> Result<Reporte, sqlx::Error> {
        let query = format!(
            "INSERT INTO reportes_config \
                 (codigo, nombre, descripcion, contexto, categoria, icono, \
                  campos, relaciones, api_endpoint, query_template, created_by) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) \
             RETURNING {REPORTE_COLUMNS}"
        );
        sqlx::query_as::<_, Reporte>(&query)
            .bind(&dto.codigo)
            .bind(&dto.nombre)
            .bind(&dto.descripcion)
            .bind(&dto.contexto)
            .bind(&dto.categoria)
            .bind(&dto.icono)
            .bind(Json(&dto.campos))
            .bind(Json(&dto.relaciones))
            .bind(&dto.api_endpoint)
            .bind(&dto.query_template)
            .bind(created_by)
            .fetch_one(pool)
            .await
    }

    /// Find a report by its codigo, active or not.
    pub async fn find_by_codigo(
        pool: &PgPool,
        codigo: &str,
    ) -> Result<Option<Reporte>, sqlx::Error> {
        let query = format!("SELECT {REPORTE_COLUMNS} FROM reportes_config WHERE codigo = $1");
        sqlx::query_as::<_, Reporte>(&query)
            .bind(codigo)
            .fetch_optional(pool)
            .await
    }

    /// List every report definition, inactive included (admin view).
    pub async fn list_all(pool: &PgPool) -> Result<Vec<Reporte>, sqlx::Error> {
        let query = format!(
            "SELECT {REPORTE_COLUMNS} FROM reportes_config ORDER BY categoria NULLS LAST, nombre"
        );
        sqlx::query_as::<_, Reporte>(&query).fetch_all(pool).await
    }

    /// List the active reports a group may see (`puede_ver = true`).
    pub async fn list_visibles(pool: &PgPool, grupo_id: DbId) -> Result<Vec<Reporte>, sqlx::Error> {
        let query = format!(
            "SELECT {REPORTE_COLUMNS_R} FROM reportes_config r \
             JOIN grupos_reportes gr \
               ON gr.reporte_codigo = r.codigo AND gr.grupo_id = $1 AND gr.puede_ver \
             WHERE r.activo \
             ORDER BY r.categoria NULLS LAST, r.nombre"
        );
        sqlx::query_as::<_, Reporte>(&query)
            .bind(grupo_id)
            .fetch_all(pool)
            .await
    }

    /// Update a report definition. Absent fields keep their stored value;
    /// concurrent edits are last-write-wins.
    ///
    /// Returns `None` if no report with the given codigo exists.
    pub async fn update(
        pool: &PgPool,
        codigo: &str,
        dto: &UpdateReporte,
    ) -> Result<Option<Reporte>, sqlx::Error> {
        let query = format!(
            "UPDATE reportes_config SET \
                 nombre = COALESCE($2, nombre), \
                 descripcion = COALESCE($3, descripcion), \
                 contexto = COALESCE($4, contexto), \
                 categoria = COALESCE($5, categoria), \
                 icono = COALESCE($6, icono), \
                 campos = COALESCE($7, campos), \
                 relaciones = COALESCE($8, relaciones), \
                 api_endpoint = COALESCE($9, api_endpoint), \
                 query_template = COALESCE($10, query_template), \
                 activo = COALESCE($11, activo), \
                 updated_at = NOW() \
             WHERE codigo = $1 \
             RETURNING {REPORTE_COLUMNS}"
        );
        sqlx::query_as::<_, Reporte>(&query)
            .bind(codigo)
            .bind(&dto.nombre)
            .bind(&dto.descripcion)
            .bind(&dto.contexto)
            .bind(&dto.categoria)
            .bind(&dto.icono)
            .bind(dto.campos.as_ref().map(Json))
            .bind(dto.relaciones.as_ref().map(Json))
            .bind(&dto.api_endpoint)
            .bind(&dto.query_template)
            .bind(dto.activo)
            .fetch_optional(pool)
            .await
    }

    /// Soft-delete a report. Returns `true` if an active report was
    /// deactivated.
    pub async fn soft_delete(pool: &PgPool, codigo: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE reportes_config SET activo = FALSE, updated_at = NOW() \
             WHERE codigo = $1 AND activo",
        )
        .bind(codigo)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Load statistics: row count plus first/last ingestion timestamps.
    pub async fn stats(pool: &PgPool, codigo: &str) -> Result<ReporteStats, sqlx::Error> {
        sqlx::query_as::<_, ReporteStats>(
            "SELECT COUNT(*) AS total_registros, \
                    MIN(created_at) AS primera_carga, \
                    MAX(created_at) AS ultima_carga \
             FROM datos_reportes WHERE reporte_codigo = $1",
        )
        .bind(codigo)
        .fetch_one(pool)
        .await
    }
}
