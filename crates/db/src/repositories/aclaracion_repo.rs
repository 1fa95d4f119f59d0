//! Repository for the `campo_aclaraciones` table.
//!
//! The state machine (pendiente → respondida_usuario → aprobada) is
//! enforced at the SQL level: answer and validation updates carry a
//! `WHERE estado = ...` guard, so an out-of-order call affects zero rows
//! and surfaces to the caller as `None`.

use informes_core::types::DbId;
use sqlx::PgPool;

use crate::models::aclaracion::{Aclaracion, CreateAclaracion};

/// Column list for `campo_aclaraciones` queries.
const ACLARACION_COLUMNS: &str = "\
    id, reporte_codigo, nombre_campo, pregunta_ia, respuesta_usuario, \
    respuesta_admin, estado, usuario_respondio, admin_respondio, aprobado, \
    contexto_uso, fecha_pregunta, fecha_respuesta_usuario, \
    fecha_respuesta_admin, fecha_aprobacion";

/// Provides clarification workflow operations.
pub struct AclaracionRepo;

impl AclaracionRepo {
    /// Open a clarification for a (reporte, campo) pair. Re-asking about
    /// the same field refreshes the question text but never resets the
    /// workflow state of an answered clarification.
    pub async fn crear(
        pool: &PgPool,
        dto: &CreateAclaracion,
    ) -> Result<Aclaracion, sqlx::Error> {
        let query = format!(
            "INSERT INTO campo_aclaraciones \
                 (reporte_codigo, nombre_campo, pregunta_ia, contexto_uso) \
             VALUES ($1, $2, $3, $4) \
             ON CONFLICT (reporte_codigo, nombre_campo) DO UPDATE SET \
                 pregunta_ia = EXCLUDED.pregunta_ia, \
                 contexto_uso = COALESCE(EXCLUDED.contexto_uso, campo_aclaraciones.contexto_uso) \
             RETURNING {ACLARACION_COLUMNS}"
        );
        sqlx::query_as::<_, Aclaracion>(&query)
            .bind(&dto.reporte_codigo)
            .bind(&dto.nombre_campo)
            .bind(&dto.pregunta_ia)
            .bind(&dto.contexto_uso)
            .fetch_one(pool)
            .await
    }

    /// Find a clarification by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Aclaracion>, sqlx::Error> {
        let query = format!("SELECT {ACLARACION_COLUMNS} FROM campo_aclaraciones WHERE id = $1");
        sqlx::query_as::<_, Aclaracion>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List clarifications awaiting someone: pending a user answer or
    /// pending admin validation.
    pub async fn pendientes(pool: &PgPool) -> Result<Vec<Aclaracion>, sqlx::Error> {
        let query = format!(
            "SELECT {ACLARACION_COLUMNS} FROM campo_aclaraciones \
             WHERE estado IN ('pendiente', 'respondida_usuario') \
             ORDER BY fecha_pregunta"
        );
        sqlx::query_as::<_, Aclaracion>(&query).fetch_all(pool).await
    }

    /// Count clarifications awaiting someone (polling badge).
    pub async fn count_pendientes(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM campo_aclaraciones \
             WHERE estado IN ('pendiente', 'respondida_usuario')",
        )
        .fetch_one(pool)
        .await
    }

    /// Record the user answer. Only a `pendiente` clarification can be
    /// answered; returns `None` otherwise.
    pub async fn responder(
        pool: &PgPool,
        id: DbId,
        respuesta: &str,
        usuario: &str,
    ) -> Result<Option<Aclaracion>, sqlx::Error> {
        let query = format!(
            "UPDATE campo_aclaraciones SET \
                 respuesta_usuario = $2, \
                 usuario_respondio = $3, \
                 estado = 'respondida_usuario', \
                 fecha_respuesta_usuario = NOW() \
             WHERE id = $1 AND estado = 'pendiente' \
             RETURNING {ACLARACION_COLUMNS}"
        );
        sqlx::query_as::<_, Aclaracion>(&query)
            .bind(id)
            .bind(respuesta)
            .bind(usuario)
            .fetch_optional(pool)
            .await
    }

    /// Record the admin validation. Always closes the clarification
    /// (estado = 'aprobada'); `aprobado` records whether the answer was
    /// accepted. Only a `respondida_usuario` row can be validated.
    pub async fn validar(
        pool: &PgPool,
        id: DbId,
        respuesta_final: &str,
        aprobar: bool,
        admin: &str,
    ) -> Result<Option<Aclaracion>, sqlx::Error> {
        let query = format!(
            "UPDATE campo_aclaraciones SET \
                 respuesta_admin = $2, \
                 admin_respondio = $3, \
                 aprobado = $4, \
                 estado = 'aprobada', \
                 fecha_respuesta_admin = NOW(), \
                 fecha_aprobacion = CASE WHEN $4 THEN NOW() ELSE NULL END \
             WHERE id = $1 AND estado = 'respondida_usuario' \
             RETURNING {ACLARACION_COLUMNS}"
        );
        sqlx::query_as::<_, Aclaracion>(&query)
            .bind(id)
            .bind(respuesta_final)
            .bind(admin)
            .bind(aprobar)
            .fetch_optional(pool)
            .await
    }
}
