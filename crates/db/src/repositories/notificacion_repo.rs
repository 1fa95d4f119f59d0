//! Repository for the `notificaciones_admin` table.

use informes_core::types::DbId;
use sqlx::PgPool;

use crate::models::notificacion::{CreateNotificacion, Notificacion};

/// Column list for `notificaciones_admin` queries.
const NOTIFICACION_COLUMNS: &str = "\
    id, tipo, titulo, mensaje, datos, relacionado_con, relacionado_id, \
    leido, fecha_creacion, fecha_leido";

/// Provides admin-notification operations.
pub struct NotificacionRepo;

impl NotificacionRepo {
    /// Create a notification.
    pub async fn crear(
        pool: &PgPool,
        dto: &CreateNotificacion,
    ) -> Result<Notificacion, sqlx::Error> {
        let query = format!(
            "INSERT INTO notificaciones_admin \
                 (tipo, titulo, mensaje, datos, relacionado_con, relacionado_id) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {NOTIFICACION_COLUMNS}"
        );
        sqlx::query_as::<_, Notificacion>(&query)
            .bind(&dto.tipo)
            .bind(&dto.titulo)
            .bind(&dto.mensaje)
            .bind(&dto.datos)
            .bind(&dto.relacionado_con)
            .bind(dto.relacionado_id)
            .fetch_one(pool)
            .await
    }

    /// List unread notifications, newest first.
    pub async fn list_no_leidas(pool: &PgPool) -> Result<Vec<Notificacion>, sqlx::Error> {
        let query = format!(
            "SELECT {NOTIFICACION_COLUMNS} FROM notificaciones_admin \
             WHERE NOT leido \
             ORDER BY fecha_creacion DESC"
        );
        sqlx::query_as::<_, Notificacion>(&query).fetch_all(pool).await
    }

    /// Mark a notification as read. Returns `true` if an unread row was
    /// updated.
    pub async fn marcar_leida(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE notificaciones_admin SET leido = TRUE, fecha_leido = NOW() \
             WHERE id = $1 AND NOT leido",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
