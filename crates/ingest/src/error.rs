//! Ingestion error type.

use informes_core::error::CoreError;

/// Errors raised while reading or writing workbooks.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    /// The uploaded file is not a readable workbook.
    #[error("archivo Excel inválido: {0}")]
    Libro(#[from] calamine::XlsxError),

    /// The workbook has no usable content (missing sheet, empty header
    /// row, no data rows).
    #[error("{0}")]
    SinDatos(String),

    /// Domain validation failed (invalid headers, missing obligatorio
    /// columns).
    #[error(transparent)]
    Dominio(#[from] CoreError),

    /// Workbook generation failed.
    #[error("error generando Excel: {0}")]
    Escritura(#[from] rust_xlsxwriter::XlsxError),
}
