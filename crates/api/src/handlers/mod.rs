//! HTTP handlers, grouped by resource.

pub mod aclaraciones;
pub mod analysis;
pub mod auth;
pub mod grupos;
pub mod ingesta;
pub mod notificaciones;
pub mod permisos;
pub mod query;
pub mod reportes;
pub mod reportes_admin;
pub mod usuarios;

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use informes_core::error::CoreError;
use informes_db::models::reporte::Reporte;
use informes_db::repositories::ReporteRepo;
use informes_db::DbPool;

use crate::error::{AppError, AppResult};

/// MIME type for `.xlsx` downloads.
const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Build an attachment response for generated workbook bytes.
pub(crate) fn xlsx_response(filename: &str, bytes: Vec<u8>) -> Response {
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, XLSX_MIME.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        bytes,
    )
        .into_response()
}

/// Load a report by codigo or fail with 404.
pub(crate) async fn reporte_o_404(pool: &DbPool, codigo: &str) -> AppResult<Reporte> {
    ReporteRepo::find_by_codigo(pool, codigo)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFoundCodigo {
                entity: "reporte",
                codigo: codigo.to_string(),
            })
        })
}

/// Read the uploaded `.xlsx` file from a multipart request.
///
/// Returns `(filename, bytes)` from the first field named `file`. The
/// extension gate lives here; corrupt contents surface later from the
/// workbook parser.
pub(crate) async fn leer_archivo_xlsx(
    multipart: &mut axum::extract::Multipart,
) -> AppResult<(String, Vec<u8>)> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("multipart inválido: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field
            .file_name()
            .ok_or_else(|| AppError::BadRequest("el campo 'file' no trae nombre de archivo".into()))?
            .to_string();
        if !filename.to_lowercase().ends_with(".xlsx") {
            return Err(AppError::BadRequest(
                "solo se aceptan archivos .xlsx".into(),
            ));
        }
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(format!("no se pudo leer el archivo: {e}")))?;
        return Ok((filename, bytes.to_vec()));
    }
    Err(AppError::BadRequest(
        "falta el campo multipart 'file'".into(),
    ))
}
