//! Repository for the `cargas_log` ingestion audit trail.

use sqlx::PgPool;

use crate::models::carga::{Carga, RegistrarCarga};

/// Column list for `cargas_log` queries.
const CARGA_COLUMNS: &str = "\
    id, reporte_codigo, nombre_archivo, registros_insertados, \
    registros_error, estado, mensaje, usuario, fecha_carga";

/// Provides ingestion-log operations.
pub struct CargaRepo;

impl CargaRepo {
    /// Record one upload attempt.
    pub async fn registrar(pool: &PgPool, dto: &RegistrarCarga) -> Result<Carga, sqlx::Error> {
        let query = format!(
            "INSERT INTO cargas_log \
                 (reporte_codigo, nombre_archivo, registros_insertados, \
                  registros_error, estado, mensaje, usuario) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {CARGA_COLUMNS}"
        );
        sqlx::query_as::<_, Carga>(&query)
            .bind(&dto.reporte_codigo)
            .bind(&dto.nombre_archivo)
            .bind(dto.registros_insertados)
            .bind(dto.registros_error)
            .bind(&dto.estado)
            .bind(&dto.mensaje)
            .bind(&dto.usuario)
            .fetch_one(pool)
            .await
    }

    /// List the most recent upload attempts.
    pub async fn list_recientes(pool: &PgPool, limit: i64) -> Result<Vec<Carga>, sqlx::Error> {
        let query = format!(
            "SELECT {CARGA_COLUMNS} FROM cargas_log ORDER BY fecha_carga DESC LIMIT $1"
        );
        sqlx::query_as::<_, Carga>(&query)
            .bind(limit)
            .fetch_all(pool)
            .await
    }
}
