//! Repository for the `usuarios` table.

use informes_core::types::DbId;
use sqlx::PgPool;

use crate::models::usuario::{Usuario, UsuarioConGrupo};

/// Column list for `usuarios` queries.
const USUARIO_COLUMNS: &str =
    "id, username, password_hash, nombre, estado, grupo_id, created_at, updated_at";

/// Column list for user-with-group queries.
const USUARIO_GRUPO_COLUMNS: &str = "\
    u.id, u.username, u.nombre, u.estado, u.grupo_id, \
    g.codigo AS grupo_codigo, g.nombre AS grupo_nombre, u.created_at";

/// Provides user lookup and creation.
pub struct UsuarioRepo;

impl UsuarioRepo {
    /// Find a user by username, including the password hash (login path).
    pub async fn find_by_username(
        pool: &PgPool,
        username: &str,
    ) -> Result<Option<Usuario>, sqlx::Error> {
        let query = format!("SELECT {USUARIO_COLUMNS} FROM usuarios WHERE username = $1");
        sqlx::query_as::<_, Usuario>(&query)
            .bind(username)
            .fetch_optional(pool)
            .await
    }

    /// Find a user joined with its group.
    pub async fn find_con_grupo(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<UsuarioConGrupo>, sqlx::Error> {
        let query = format!(
            "SELECT {USUARIO_GRUPO_COLUMNS} FROM usuarios u \
             JOIN grupos g ON g.id = u.grupo_id \
             WHERE u.id = $1"
        );
        sqlx::query_as::<_, UsuarioConGrupo>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a user with its group by username.
    pub async fn find_con_grupo_by_username(
        pool: &PgPool,
        username: &str,
    ) -> Result<Option<UsuarioConGrupo>, sqlx::Error> {
        let query = format!(
            "SELECT {USUARIO_GRUPO_COLUMNS} FROM usuarios u \
             JOIN grupos g ON g.id = u.grupo_id \
             WHERE u.username = $1"
        );
        sqlx::query_as::<_, UsuarioConGrupo>(&query)
            .bind(username)
            .fetch_optional(pool)
            .await
    }

    /// List all users with their group.
    pub async fn list_all(pool: &PgPool) -> Result<Vec<UsuarioConGrupo>, sqlx::Error> {
        let query = format!(
            "SELECT {USUARIO_GRUPO_COLUMNS} FROM usuarios u \
             JOIN grupos g ON g.id = u.grupo_id \
             ORDER BY u.username"
        );
        sqlx::query_as::<_, UsuarioConGrupo>(&query)
            .fetch_all(pool)
            .await
    }

    /// Create a user. The password must already be hashed.
    pub async fn create(
        pool: &PgPool,
        username: &str,
        password_hash: &str,
        nombre: &str,
        grupo_id: DbId,
    ) -> Result<Usuario, sqlx::Error> {
        let query = format!(
            "INSERT INTO usuarios (username, password_hash, nombre, grupo_id) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {USUARIO_COLUMNS}"
        );
        sqlx::query_as::<_, Usuario>(&query)
            .bind(username)
            .bind(password_hash)
            .bind(nombre)
            .bind(grupo_id)
            .fetch_one(pool)
            .await
    }
}
