//! Excel boundary: reading uploaded workbooks (schema inference and
//! record extraction) and generating workbooks (templates and exports).

pub mod error;
pub mod escritura;
pub mod lectura;

pub use error::IngestError;
pub use escritura::{exportar_tabla, generar_plantilla};
pub use lectura::{analizar_excel, leer_registros, AnalisisExcel};
