//! Clarification workflow models.

use informes_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `campo_aclaraciones` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Aclaracion {
    pub id: DbId,
    pub reporte_codigo: String,
    pub nombre_campo: String,
    pub pregunta_ia: String,
    pub respuesta_usuario: Option<String>,
    pub respuesta_admin: Option<String>,
    pub estado: String,
    pub usuario_respondio: Option<String>,
    pub admin_respondio: Option<String>,
    pub aprobado: bool,
    pub contexto_uso: Option<String>,
    pub fecha_pregunta: Timestamp,
    pub fecha_respuesta_usuario: Option<Timestamp>,
    pub fecha_respuesta_admin: Option<Timestamp>,
    pub fecha_aprobacion: Option<Timestamp>,
}

/// DTO for opening a clarification about a report field.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateAclaracion {
    pub reporte_codigo: String,
    pub nombre_campo: String,
    pub pregunta_ia: String,
    pub contexto_uso: Option<String>,
}

/// DTO for the user answer to a pending clarification.
#[derive(Debug, Clone, Deserialize)]
pub struct ResponderAclaracion {
    pub respuesta: String,
}

/// DTO for the admin validation of a user answer.
#[derive(Debug, Clone, Deserialize)]
pub struct ValidarAclaracion {
    pub respuesta_final: String,
    pub aprobar: bool,
}
