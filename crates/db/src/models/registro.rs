//! Ingested record models.

use chrono::NaiveDate;
use informes_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `datos_reportes` table. `datos` is the whole ingested
/// record keyed by `Campo.nombre`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Registro {
    pub id: DbId,
    pub reporte_codigo: String,
    pub datos: serde_json::Value,
    pub uploaded_by: Option<String>,
    pub created_at: Timestamp,
}

/// Query parameters for record listing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListRegistrosParams {
    /// Maximum rows to return. Defaults to 100, capped at 1000.
    pub limite: Option<i64>,
    /// Keep rows loaded on or after this date.
    pub fecha_desde: Option<NaiveDate>,
    /// Keep rows loaded on or before this date.
    pub fecha_hasta: Option<NaiveDate>,
}

/// Outcome of a batch insert: per-row failures do not abort the batch.
#[derive(Debug, Clone, Default, Serialize)]
pub struct InsercionResultado {
    pub insertados: i64,
    pub errores: i64,
    /// One message per failed row, capped by the caller.
    pub mensajes: Vec<String>,
}
