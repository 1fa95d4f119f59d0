//! Ingestion audit-trail models.

use informes_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `cargas_log` table: one upload attempt (file or webhook).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Carga {
    pub id: DbId,
    pub reporte_codigo: Option<String>,
    pub nombre_archivo: Option<String>,
    pub registros_insertados: i32,
    pub registros_error: i32,
    pub estado: String,
    pub mensaje: Option<String>,
    pub usuario: Option<String>,
    pub fecha_carga: Timestamp,
}

/// Payload for recording an upload attempt.
#[derive(Debug, Clone)]
pub struct RegistrarCarga {
    pub reporte_codigo: Option<String>,
    pub nombre_archivo: Option<String>,
    pub registros_insertados: i32,
    pub registros_error: i32,
    pub estado: String,
    pub mensaje: Option<String>,
    pub usuario: Option<String>,
}
