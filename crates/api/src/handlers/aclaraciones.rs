//! Clarification workflow handlers.
//!
//! pendiente → respondida_usuario → aprobada. The repository enforces the
//! transitions with WHERE-estado guards; an out-of-order call comes back
//! as `None` and maps here to 409 (or 404 when the row does not exist).

use axum::extract::{Path, State};
use axum::Json;
use informes_core::clarification::EstadoAclaracion;
use informes_core::error::CoreError;
use informes_core::types::DbId;
use informes_db::models::aclaracion::{Aclaracion, ResponderAclaracion, ValidarAclaracion};
use informes_db::repositories::{AclaracionRepo, ConocimientoRepo};
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::state::AppState;

/// Response body for the polling badge.
#[derive(Debug, Serialize)]
pub struct CountResponse {
    pub pendientes: i64,
}

/// GET /api/admin/aclaraciones/pendientes
pub async fn pendientes(
    RequireAdmin(_user): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<Aclaracion>>> {
    Ok(Json(AclaracionRepo::pendientes(&state.pool).await?))
}

/// GET /api/admin/aclaraciones/pendientes/count
pub async fn count_pendientes(
    RequireAdmin(_user): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<CountResponse>> {
    Ok(Json(CountResponse {
        pendientes: AclaracionRepo::count_pendientes(&state.pool).await?,
    }))
}

/// POST /api/aclaraciones/{id}/responder
///
/// Any authenticated user may answer a pending clarification.
pub async fn responder(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<ResponderAclaracion>,
) -> AppResult<Json<Aclaracion>> {
    if input.respuesta.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "la respuesta no puede estar vacía".into(),
        )));
    }

    match AclaracionRepo::responder(&state.pool, id, &input.respuesta, &user.username).await? {
        Some(aclaracion) => Ok(Json(aclaracion)),
        None => Err(fuera_de_estado(&state, id, EstadoAclaracion::Pendiente).await?),
    }
}

/// POST /api/admin/aclaraciones/{id}/validar
///
/// Close an answered clarification. Approval feeds the knowledge base;
/// rejection closes the clarification without feeding it.
pub async fn validar(
    RequireAdmin(user): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<ValidarAclaracion>,
) -> AppResult<Json<Aclaracion>> {
    if input.respuesta_final.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "la respuesta final no puede estar vacía".into(),
        )));
    }

    let aclaracion = match AclaracionRepo::validar(
        &state.pool,
        id,
        &input.respuesta_final,
        input.aprobar,
        &user.username,
    )
    .await?
    {
        Some(a) => a,
        None => {
            return Err(fuera_de_estado(&state, id, EstadoAclaracion::RespondidaUsuario).await?)
        }
    };

    if input.aprobar {
        ConocimientoRepo::guardar(
            &state.pool,
            &aclaracion.reporte_codigo,
            &aclaracion.nombre_campo,
            &input.respuesta_final,
        )
        .await?;
        tracing::info!(
            id,
            reporte = %aclaracion.reporte_codigo,
            campo = %aclaracion.nombre_campo,
            "clarification approved, knowledge stored"
        );
    } else {
        tracing::info!(id, "clarification rejected");
    }

    Ok(Json(aclaracion))
}

/// Distinguish "no such clarification" from "clarification in the wrong
/// state" when a guarded update touched zero rows.
async fn fuera_de_estado(
    state: &AppState,
    id: DbId,
    esperado: EstadoAclaracion,
) -> Result<AppError, AppError> {
    match AclaracionRepo::find_by_id(&state.pool, id).await? {
        None => Ok(AppError::Core(CoreError::NotFound {
            entity: "aclaracion",
            id,
        })),
        Some(actual) => {
            // Surface a stored estado the state machine does not know.
            EstadoAclaracion::parse(&actual.estado).map_err(AppError::Core)?;
            Ok(AppError::Core(CoreError::Conflict(format!(
                "la aclaración {id} está en estado '{}', se esperaba '{}'",
                actual.estado,
                esperado.as_str()
            ))))
        }
    }
}
