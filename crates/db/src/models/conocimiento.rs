//! Knowledge-base models (approved clarification answers).

use informes_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `ia_conocimiento` table. Written only when an admin
/// approves a clarification answer.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Conocimiento {
    pub id: DbId,
    pub reporte_codigo: String,
    pub nombre_campo: String,
    pub respuesta: String,
    pub fuente: String,
    pub created_at: Timestamp,
}
