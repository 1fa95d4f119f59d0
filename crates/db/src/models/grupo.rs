//! Group models and DTOs.

use informes_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `grupos` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Grupo {
    pub id: DbId,
    pub codigo: String,
    pub nombre: String,
    pub descripcion: Option<String>,
    pub estado: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a group.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateGrupo {
    pub codigo: String,
    pub nombre: String,
    pub descripcion: Option<String>,
}
