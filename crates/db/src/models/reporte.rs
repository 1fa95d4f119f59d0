//! Report definition models and DTOs.

use informes_core::schema::{Campo, Relacion};
use informes_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;

/// A row from the `reportes_config` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Reporte {
    pub id: DbId,
    pub codigo: String,
    pub nombre: String,
    pub descripcion: Option<String>,
    pub contexto: Option<String>,
    pub categoria: Option<String>,
    pub icono: Option<String>,
    pub activo: bool,
    pub campos: Json<Vec<Campo>>,
    pub relaciones: Json<Vec<Relacion>>,
    pub api_endpoint: Option<String>,
    pub query_template: Option<String>,
    pub created_by: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a report definition.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateReporte {
    pub codigo: String,
    pub nombre: String,
    pub descripcion: Option<String>,
    pub contexto: Option<String>,
    pub categoria: Option<String>,
    pub icono: Option<String>,
    pub campos: Vec<Campo>,
    #[serde(default)]
    pub relaciones: Vec<Relacion>,
    pub api_endpoint: Option<String>,
    pub query_template: Option<String>,
}

/// DTO for updating a report definition. `codigo` is immutable; absent
/// fields are left untouched (last write wins, no optimistic locking).
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateReporte {
    pub nombre: Option<String>,
    pub descripcion: Option<String>,
    pub contexto: Option<String>,
    pub categoria: Option<String>,
    pub icono: Option<String>,
    pub campos: Option<Vec<Campo>>,
    pub relaciones: Option<Vec<Relacion>>,
    pub api_endpoint: Option<String>,
    pub query_template: Option<String>,
    pub activo: Option<bool>,
}

/// Load statistics for one report.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ReporteStats {
    pub total_registros: i64,
    pub primera_carga: Option<Timestamp>,
    pub ultima_carga: Option<Timestamp>,
}
