//! Semantic-index models.

use informes_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::types::Json;
use sqlx::FromRow;

/// A row from the `registro_indices` table: one text document per ingested
/// record, with its embedding stored as a JSON array of floats.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Indice {
    pub id: DbId,
    pub reporte_codigo: String,
    pub registro_id: DbId,
    pub documento: String,
    pub embedding: Option<Json<Vec<f32>>>,
    pub created_at: Timestamp,
}
