//! Per-(group, report) permission models.

use informes_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `grupos_reportes` table. Absence of a row means the
/// group has no access to the report at all.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Permiso {
    pub id: DbId,
    pub grupo_id: DbId,
    pub reporte_codigo: String,
    pub puede_ver: bool,
    pub puede_crear: bool,
    pub puede_editar: bool,
    pub puede_eliminar: bool,
    pub created_at: Timestamp,
}

/// Partial permission upsert: only the flags present in the request are
/// written; absent flags keep their stored value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpsertPermiso {
    pub puede_ver: Option<bool>,
    pub puede_crear: Option<bool>,
    pub puede_editar: Option<bool>,
    pub puede_eliminar: Option<bool>,
}

/// One CRUD action gated by the permission matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Accion {
    Ver,
    Crear,
    Editar,
    Eliminar,
}

impl Accion {
    /// The `grupos_reportes` column backing this action.
    pub fn columna(&self) -> &'static str {
        match self {
            Self::Ver => "puede_ver",
            Self::Crear => "puede_crear",
            Self::Editar => "puede_editar",
            Self::Eliminar => "puede_eliminar",
        }
    }
}
