//! Repository for the `grupos_reportes` permission matrix.
//!
//! One row per (grupo, reporte) pair; absence of a row means no access.
//! Upserts are partial: only the flags present in the request are
//! written, so toggling one flag never clears the other three. Removing
//! a row is a distinct operation from setting every flag to false.

use informes_core::types::DbId;
use sqlx::PgPool;

use crate::models::permiso::{Accion, Permiso, UpsertPermiso};

/// Column list for `grupos_reportes` queries.
const PERMISO_COLUMNS: &str = "\
    id, grupo_id, reporte_codigo, puede_ver, puede_crear, puede_editar, \
    puede_eliminar, created_at";

/// Provides permission-matrix operations.
pub struct PermisoRepo;

impl PermisoRepo {
    /// List the permission rows of a group.
    pub async fn list_por_grupo(
        pool: &PgPool,
        grupo_id: DbId,
    ) -> Result<Vec<Permiso>, sqlx::Error> {
        let query = format!(
            "SELECT {PERMISO_COLUMNS} FROM grupos_reportes \
             WHERE grupo_id = $1 ORDER BY reporte_codigo"
        );
        sqlx::query_as::<_, Permiso>(&query)
            .bind(grupo_id)
            .fetch_all(pool)
            .await
    }

    /// Find the permission row for one (grupo, reporte) pair.
    pub async fn find(
        pool: &PgPool,
        grupo_id: DbId,
        reporte_codigo: &str,
    ) -> Result<Option<Permiso>, sqlx::Error> {
        let query = format!(
            "SELECT {PERMISO_COLUMNS} FROM grupos_reportes \
             WHERE grupo_id = $1 AND reporte_codigo = $2"
        );
        sqlx::query_as::<_, Permiso>(&query)
            .bind(grupo_id)
            .bind(reporte_codigo)
            .fetch_optional(pool)
            .await
    }

    /// Partially upsert a permission row.
    ///
    /// On insert, absent flags take the column defaults (`puede_ver` true,
    /// the rest false). On update, absent flags keep their stored value.
    pub async fn upsert_parcial(
        pool: &PgPool,
        grupo_id: DbId,
        reporte_codigo: &str,
        dto: &UpsertPermiso,
    ) -> Result<Permiso, sqlx::Error> {
        let query = format!(
            "INSERT INTO grupos_reportes \
                 (grupo_id, reporte_codigo, puede_ver, puede_crear, puede_editar, puede_eliminar) \
             VALUES ($1, $2, \
                     COALESCE($3, TRUE), COALESCE($4, FALSE), \
                     COALESCE($5, FALSE), COALESCE($6, FALSE)) \
             ON CONFLICT (grupo_id, reporte_codigo) DO UPDATE SET \
                 puede_ver = COALESCE($3, grupos_reportes.puede_ver), \
                 puede_crear = COALESCE($4, grupos_reportes.puede_crear), \
                 puede_editar = COALESCE($5, grupos_reportes.puede_editar), \
                 puede_eliminar = COALESCE($6, grupos_reportes.puede_eliminar) \
             RETURNING {PERMISO_COLUMNS}"
        );
        sqlx::query_as::<_, Permiso>(&query)
            .bind(grupo_id)
            .bind(reporte_codigo)
            .bind(dto.puede_ver)
            .bind(dto.puede_crear)
            .bind(dto.puede_editar)
            .bind(dto.puede_eliminar)
            .fetch_one(pool)
            .await
    }

    /// Remove the permission row for one pair. Returns `true` if a row
    /// was deleted.
    pub async fn delete(
        pool: &PgPool,
        grupo_id: DbId,
        reporte_codigo: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM grupos_reportes WHERE grupo_id = $1 AND reporte_codigo = $2",
        )
        .bind(grupo_id)
        .bind(reporte_codigo)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Check one CRUD flag for a (grupo, reporte) pair. No row means no
    /// permission.
    pub async fn tiene_permiso(
        pool: &PgPool,
        grupo_id: DbId,
        reporte_codigo: &str,
        accion: Accion,
    ) -> Result<bool, sqlx::Error> {
        // Accion::columna() is a fixed set of identifiers, never user input.
        let query = format!(
            "SELECT {} FROM grupos_reportes WHERE grupo_id = $1 AND reporte_codigo = $2",
            accion.columna()
        );
        let permitido: Option<bool> = sqlx::query_scalar(&query)
            .bind(grupo_id)
            .bind(reporte_codigo)
            .fetch_optional(pool)
            .await?;
        Ok(permitido.unwrap_or(false))
    }
}
