//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod aclaracion_repo;
pub mod carga_repo;
pub mod conocimiento_repo;
pub mod grupo_repo;
pub mod indice_repo;
pub mod notificacion_repo;
pub mod permiso_repo;
pub mod registro_repo;
pub mod reporte_repo;
pub mod usuario_repo;

pub use aclaracion_repo::AclaracionRepo;
pub use carga_repo::CargaRepo;
pub use conocimiento_repo::ConocimientoRepo;
pub use grupo_repo::GrupoRepo;
pub use indice_repo::IndiceRepo;
pub use notificacion_repo::NotificacionRepo;
pub use permiso_repo::PermisoRepo;
pub use registro_repo::RegistroRepo;
pub use reporte_repo::ReporteRepo;
pub use usuario_repo::UsuarioRepo;
