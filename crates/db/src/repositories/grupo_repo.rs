//! Repository for the `grupos` table.

use informes_core::types::DbId;
use sqlx::PgPool;

use crate::models::grupo::{CreateGrupo, Grupo};

/// Column list for `grupos` queries.
const GRUPO_COLUMNS: &str = "id, codigo, nombre, descripcion, estado, created_at, updated_at";

/// Provides group lookup and creation.
pub struct GrupoRepo;

impl GrupoRepo {
    /// List all groups.
    pub async fn list_all(pool: &PgPool) -> Result<Vec<Grupo>, sqlx::Error> {
        let query = format!("SELECT {GRUPO_COLUMNS} FROM grupos ORDER BY codigo");
        sqlx::query_as::<_, Grupo>(&query).fetch_all(pool).await
    }

    /// Find a group by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Grupo>, sqlx::Error> {
        let query = format!("SELECT {GRUPO_COLUMNS} FROM grupos WHERE id = $1");
        sqlx::query_as::<_, Grupo>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a group by its codigo.
    pub async fn find_by_codigo(
        pool: &PgPool,
        codigo: &str,
    ) -> Result<Option<Grupo>, sqlx::Error> {
        let query = format!("SELECT {GRUPO_COLUMNS} FROM grupos WHERE codigo = $1");
        sqlx::query_as::<_, Grupo>(&query)
            .bind(codigo)
            .fetch_optional(pool)
            .await
    }

    /// Create a group. A duplicate codigo surfaces as a unique violation
    /// on `uq_grupos_codigo`.
    pub async fn create(pool: &PgPool, dto: &CreateGrupo) -> Result<Grupo, sqlx::Error> {
        let query = format!(
            "INSERT INTO grupos (codigo, nombre, descripcion) \
             VALUES ($1, $2, $3) \
             RETURNING {GRUPO_COLUMNS}"
        );
        sqlx::query_as::<_, Grupo>(&query)
            .bind(&dto.codigo)
            .bind(&dto.nombre)
            .bind(&dto.descripcion)
            .fetch_one(pool)
            .await
    }
}
