//! Admin notification models.

use informes_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `notificaciones_admin` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Notificacion {
    pub id: DbId,
    pub tipo: String,
    pub titulo: String,
    pub mensaje: String,
    pub datos: Option<serde_json::Value>,
    pub relacionado_con: Option<String>,
    pub relacionado_id: Option<DbId>,
    pub leido: bool,
    pub fecha_creacion: Timestamp,
    pub fecha_leido: Option<Timestamp>,
}

/// Payload for creating a notification.
#[derive(Debug, Clone)]
pub struct CreateNotificacion {
    pub tipo: String,
    pub titulo: String,
    pub mensaje: String,
    pub datos: Option<serde_json::Value>,
    pub relacionado_con: Option<String>,
    pub relacionado_id: Option<DbId>,
}
