//! User-facing report handlers: listing, data access, templates, uploads.
//!
//! Every handler here goes through the permission matrix; admins bypass
//! it. Inactive reports are only reachable by admins.

use axum::extract::{Multipart, Path, Query, State};
use axum::response::Response;
use axum::Json;
use informes_core::error::CoreError;
use informes_db::models::carga::RegistrarCarga;
use informes_db::models::permiso::Accion;
use informes_db::models::registro::{InsercionResultado, ListRegistrosParams, Registro};
use informes_db::models::reporte::{Reporte, ReporteStats};
use informes_db::repositories::{CargaRepo, RegistroRepo, ReporteRepo};
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::handlers::{leer_archivo_xlsx, reporte_o_404, xlsx_response};
use crate::middleware::auth::AuthUser;
use crate::middleware::permisos::exigir_permiso;
use crate::state::AppState;

/// Response body for data listings.
#[derive(Debug, Serialize)]
pub struct DatosResponse {
    pub reporte: String,
    pub total: i64,
    pub registros: Vec<Registro>,
}

/// Response body for uploads.
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub reporte: String,
    pub archivo: String,
    #[serde(flatten)]
    pub resultado: InsercionResultado,
}

/// GET /api/reportes/disponibles
///
/// The active reports the caller's group may see. Admins see every
/// active report.
pub async fn disponibles(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<Vec<Reporte>>> {
    let reportes = if user.es_admin() {
        ReporteRepo::list_all(&state.pool)
            .await?
            .into_iter()
            .filter(|r| r.activo)
            .collect()
    } else {
        ReporteRepo::list_visibles(&state.pool, user.grupo_id).await?
    };
    Ok(Json(reportes))
}

/// GET /api/reportes/{codigo}/datos
pub async fn datos(
    State(state): State<AppState>,
    user: AuthUser,
    Path(codigo): Path<String>,
    Query(params): Query<ListRegistrosParams>,
) -> AppResult<Json<DatosResponse>> {
    let reporte = acceder(&state, &user, &codigo, Accion::Ver).await?;
    let registros = RegistroRepo::list(&state.pool, &reporte.codigo, &params).await?;
    let total = RegistroRepo::count(&state.pool, &reporte.codigo).await?;
    Ok(Json(DatosResponse {
        reporte: reporte.codigo,
        total,
        registros,
    }))
}

/// GET /api/reportes/{codigo}/estadisticas (also mounted as GET /stats/{codigo})
pub async fn estadisticas(
    State(state): State<AppState>,
    user: AuthUser,
    Path(codigo): Path<String>,
) -> AppResult<Json<ReporteStats>> {
    let reporte = acceder(&state, &user, &codigo, Accion::Ver).await?;
    Ok(Json(ReporteRepo::stats(&state.pool, &reporte.codigo).await?))
}

/// GET /api/reportes/{codigo}/descargar (also mounted as GET /download/{codigo})
///
/// The upload template for the report: data sheet, example sheet, and
/// instructions.
pub async fn descargar(
    State(state): State<AppState>,
    user: AuthUser,
    Path(codigo): Path<String>,
) -> AppResult<Response> {
    let reporte = acceder(&state, &user, &codigo, Accion::Ver).await?;
    let bytes = informes_ingest::generar_plantilla(
        &reporte.nombre,
        reporte.descripcion.as_deref(),
        reporte.contexto.as_deref(),
        &reporte.campos,
    )?;
    Ok(xlsx_response(
        &format!("plantilla_{}.xlsx", reporte.codigo),
        bytes,
    ))
}

/// POST /api/reportes/{codigo}/upload
///
/// Ingest a filled template. Rows failing schema validation are skipped
/// and reported; the upload is logged either way.
pub async fn upload(
    State(state): State<AppState>,
    user: AuthUser,
    Path(codigo): Path<String>,
    mut multipart: Multipart,
) -> AppResult<Json<UploadResponse>> {
    let reporte = acceder(&state, &user, &codigo, Accion::Crear).await?;
    let (archivo, bytes) = leer_archivo_xlsx(&mut multipart).await?;
    ingerir_archivo(&state, &reporte, archivo, &bytes, &user.username).await
}

/// POST /upload
///
/// Legacy generic upload: the target report travels as a multipart text
/// field (`reporte`, or `type` for older integrations) alongside `file`.
pub async fn upload_general(
    State(state): State<AppState>,
    user: AuthUser,
    mut multipart: Multipart,
) -> AppResult<Json<UploadResponse>> {
    let mut codigo: Option<String> = None;
    let mut archivo: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("multipart inválido: {e}")))?
    {
        match field.name() {
            Some("reporte") | Some("type") => {
                codigo = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| AppError::BadRequest(format!("campo 'reporte': {e}")))?,
                );
            }
            Some("file") => {
                let filename = field
                    .file_name()
                    .ok_or_else(|| {
                        AppError::BadRequest("el campo 'file' no trae nombre de archivo".into())
                    })?
                    .to_string();
                if !filename.to_lowercase().ends_with(".xlsx") {
                    return Err(AppError::BadRequest("solo se aceptan archivos .xlsx".into()));
                }
                let bytes = field.bytes().await.map_err(|e| {
                    AppError::BadRequest(format!("no se pudo leer el archivo: {e}"))
                })?;
                archivo = Some((filename, bytes.to_vec()));
            }
            _ => {}
        }
    }

    let codigo =
        codigo.ok_or_else(|| AppError::BadRequest("falta el campo multipart 'reporte'".into()))?;
    let (archivo, bytes) =
        archivo.ok_or_else(|| AppError::BadRequest("falta el campo multipart 'file'".into()))?;

    let reporte = acceder(&state, &user, &codigo, Accion::Crear).await?;
    ingerir_archivo(&state, &reporte, archivo, &bytes, &user.username).await
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Resolve a report and enforce one permission flag. Inactive reports are
/// invisible to non-admins.
pub(crate) async fn acceder(
    state: &AppState,
    user: &AuthUser,
    codigo: &str,
    accion: Accion,
) -> AppResult<Reporte> {
    exigir_permiso(&state.pool, user, codigo, accion).await?;
    let reporte = reporte_o_404(&state.pool, codigo).await?;
    if !reporte.activo && !user.es_admin() {
        return Err(AppError::Core(CoreError::NotFoundCodigo {
            entity: "reporte",
            codigo: codigo.to_string(),
        }));
    }
    Ok(reporte)
}

/// Parse workbook rows, insert them, and log the upload.
async fn ingerir_archivo(
    state: &AppState,
    reporte: &Reporte,
    archivo: String,
    bytes: &[u8],
    usuario: &str,
) -> AppResult<Json<UploadResponse>> {
    let filas = match informes_ingest::leer_registros(bytes, &reporte.campos) {
        Ok(filas) => filas,
        Err(e) => {
            CargaRepo::registrar(
                &state.pool,
                &RegistrarCarga {
                    reporte_codigo: Some(reporte.codigo.clone()),
                    nombre_archivo: Some(archivo),
                    registros_insertados: 0,
                    registros_error: 0,
                    estado: "error".into(),
                    mensaje: Some(e.to_string()),
                    usuario: Some(usuario.to_string()),
                },
            )
            .await?;
            return Err(e.into());
        }
    };

    let resultado = RegistroRepo::insert_batch(
        &state.pool,
        &reporte.codigo,
        &filas,
        &reporte.campos,
        Some(usuario),
    )
    .await?;

    let estado = if resultado.errores == 0 {
        "completado"
    } else {
        "completado_con_errores"
    };
    CargaRepo::registrar(
        &state.pool,
        &RegistrarCarga {
            reporte_codigo: Some(reporte.codigo.clone()),
            nombre_archivo: Some(archivo.clone()),
            registros_insertados: resultado.insertados as i32,
            registros_error: resultado.errores as i32,
            estado: estado.into(),
            mensaje: (!resultado.mensajes.is_empty()).then(|| resultado.mensajes.join("; ")),
            usuario: Some(usuario.to_string()),
        },
    )
    .await?;

    tracing::info!(
        codigo = %reporte.codigo,
        insertados = resultado.insertados,
        errores = resultado.errores,
        "upload ingested"
    );
    Ok(Json(UploadResponse {
        reporte: reporte.codigo.clone(),
        archivo,
        resultado,
    }))
}
