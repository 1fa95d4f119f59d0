//! State machine for field clarifications.
//!
//! When the agent cannot interpret a field it opens a clarification that
//! walks a fixed path: the user answers a pending question, then an admin
//! validates the answer. Validation always closes the clarification; the
//! separate `aprobado` flag records whether the answer entered the
//! knowledge base.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Lifecycle state of a clarification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EstadoAclaracion {
    Pendiente,
    RespondidaUsuario,
    Aprobada,
}

impl EstadoAclaracion {
    /// Database representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pendiente => "pendiente",
            Self::RespondidaUsuario => "respondida_usuario",
            Self::Aprobada => "aprobada",
        }
    }

    /// Parse the database representation.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s {
            "pendiente" => Ok(Self::Pendiente),
            "respondida_usuario" => Ok(Self::RespondidaUsuario),
            "aprobada" => Ok(Self::Aprobada),
            otro => Err(CoreError::Internal(format!(
                "unknown clarification estado '{otro}'"
            ))),
        }
    }
}

/// Check a state transition. Only `pendiente → respondida_usuario` (user
/// answer) and `respondida_usuario → aprobada` (admin validation) are
/// legal; anything else conflicts.
pub fn validar_transicion(
    desde: EstadoAclaracion,
    hacia: EstadoAclaracion,
) -> Result<(), CoreError> {
    use EstadoAclaracion::*;
    match (desde, hacia) {
        (Pendiente, RespondidaUsuario) | (RespondidaUsuario, Aprobada) => Ok(()),
        _ => Err(CoreError::Conflict(format!(
            "clarification cannot move from '{}' to '{}'",
            desde.as_str(),
            hacia.as_str()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::EstadoAclaracion::*;
    use super::*;

    #[test]
    fn transiciones_legales() {
        assert!(validar_transicion(Pendiente, RespondidaUsuario).is_ok());
        assert!(validar_transicion(RespondidaUsuario, Aprobada).is_ok());
    }

    #[test]
    fn transiciones_ilegales_conflictan() {
        assert_matches!(
            validar_transicion(Pendiente, Aprobada),
            Err(CoreError::Conflict(_))
        );
        assert_matches!(
            validar_transicion(Aprobada, Pendiente),
            Err(CoreError::Conflict(_))
        );
        assert_matches!(
            validar_transicion(RespondidaUsuario, Pendiente),
            Err(CoreError::Conflict(_))
        );
    }

    #[test]
    fn parse_roundtrip() {
        for estado in [Pendiente, RespondidaUsuario, Aprobada] {
            assert_eq!(EstadoAclaracion::parse(estado.as_str()).unwrap(), estado);
        }
        assert!(EstadoAclaracion::parse("cerrada").is_err());
    }
}
