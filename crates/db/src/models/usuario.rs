//! User models and DTOs.

use informes_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `usuarios` table. Never serialized to clients; use
/// [`UsuarioConGrupo`] for responses.
#[derive(Debug, Clone, FromRow)]
pub struct Usuario {
    pub id: DbId,
    pub username: String,
    pub password_hash: String,
    pub nombre: String,
    pub estado: String,
    pub grupo_id: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// User joined with its group, without the password hash.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UsuarioConGrupo {
    pub id: DbId,
    pub username: String,
    pub nombre: String,
    pub estado: String,
    pub grupo_id: DbId,
    pub grupo_codigo: String,
    pub grupo_nombre: String,
    pub created_at: Timestamp,
}

/// DTO for creating a user. The plaintext password is hashed at the HTTP
/// layer before it reaches the repository.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateUsuario {
    pub username: String,
    pub password: String,
    pub nombre: String,
    pub grupo_id: DbId,
}
