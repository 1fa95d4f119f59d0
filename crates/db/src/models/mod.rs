//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - A `Deserialize` update DTO (all `Option` fields) for patches

pub mod aclaracion;
pub mod carga;
pub mod conocimiento;
pub mod grupo;
pub mod indice;
pub mod notificacion;
pub mod permiso;
pub mod registro;
pub mod reporte;
pub mod usuario;
