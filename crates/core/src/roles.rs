//! Well-known group codes.
//!
//! Members of the `admin` group bypass the per-report permission matrix;
//! every other group is gated row-by-row through `grupos_reportes`.

/// Group whose members have unrestricted access.
pub const GRUPO_ADMIN: &str = "admin";

/// Default group for newly created users.
pub const GRUPO_USUARIOS: &str = "usuarios";
