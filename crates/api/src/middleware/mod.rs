//! Request extractors for authentication and authorization.

pub mod auth;
pub mod permisos;
pub mod rbac;
