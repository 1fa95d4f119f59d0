//! Report schema definitions: field types, fields, relations, and the
//! validation rules applied when an admin saves a report.
//!
//! `Campo.nombre` is the stable technical identifier used as the JSON key
//! in every ingested record, so it must be a lowercase identifier and
//! unique within its report. `codigo` is used verbatim in URL path
//! segments and must stay URL-safe.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Maximum length of a report codigo (matches the VARCHAR(100) column).
pub const MAX_CODIGO_LEN: usize = 100;

// ---------------------------------------------------------------------------
// TipoDato
// ---------------------------------------------------------------------------

/// Data type of a report field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TipoDato {
    #[default]
    Texto,
    Numero,
    Decimal,
    Fecha,
    Booleano,
    Email,
    Telefono,
}

impl TipoDato {
    /// Wire name, matching the serde representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Texto => "texto",
            Self::Numero => "numero",
            Self::Decimal => "decimal",
            Self::Fecha => "fecha",
            Self::Booleano => "booleano",
            Self::Email => "email",
            Self::Telefono => "telefono",
        }
    }
}

// ---------------------------------------------------------------------------
// Campo / Relacion
// ---------------------------------------------------------------------------

/// One typed field within a report schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Campo {
    /// Technical identifier, used as the JSON object key in ingested records.
    pub nombre: String,
    /// Display label.
    pub etiqueta: String,
    #[serde(default)]
    pub tipo_dato: TipoDato,
    #[serde(default)]
    pub obligatorio: bool,
    #[serde(default)]
    pub descripcion: Option<String>,
    #[serde(default)]
    pub ejemplo: Option<String>,
    #[serde(default)]
    pub orden: i32,
    /// When non-empty, ingested values must be one of these.
    #[serde(default)]
    pub valores_permitidos: Vec<String>,
    /// Optional extra validation applied to the string rendering of a value.
    #[serde(default)]
    pub validacion_regex: Option<String>,
}

/// Directional relation to another report. No referential integrity is
/// enforced on ingested data; relations are metadata for analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relacion {
    pub reporte_destino: String,
    pub campo_origen: String,
    pub campo_destino: String,
    #[serde(default = "default_tipo_relacion")]
    pub tipo: String,
    #[serde(default)]
    pub descripcion: Option<String>,
}

fn default_tipo_relacion() -> String {
    "referencia".to_string()
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate a report codigo: non-empty, at most [`MAX_CODIGO_LEN`] chars,
/// lowercase alphanumerics plus `_` and `-` only.
pub fn validar_codigo(codigo: &str) -> Result<(), CoreError> {
    if codigo.is_empty() {
        return Err(CoreError::Validation("codigo must not be empty".into()));
    }
    if codigo.len() > MAX_CODIGO_LEN {
        return Err(CoreError::Validation(format!(
            "codigo must be at most {MAX_CODIGO_LEN} characters"
        )));
    }
    if !codigo
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '-')
    {
        return Err(CoreError::Validation(format!(
            "codigo '{codigo}' must contain only lowercase letters, digits, '_' or '-'"
        )));
    }
    Ok(())
}

/// Check that a field nombre is a valid technical identifier:
/// starts with a lowercase letter, then lowercase alphanumerics or `_`.
pub fn es_nombre_campo_valido(nombre: &str) -> bool {
    let mut chars = nombre.chars();
    match chars.next() {
        Some(c) if c.is_ascii_lowercase() => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}

/// Validate the field list of a report on save.
///
/// The list may be empty only transiently in an editor; a saved report
/// must have at least one field, every nombre must be a valid identifier
/// unique within the report, and every etiqueta must be non-empty.
pub fn validar_campos(campos: &[Campo]) -> Result<(), CoreError> {
    if campos.is_empty() {
        return Err(CoreError::Validation(
            "a report must define at least one campo".into(),
        ));
    }

    let mut vistos: HashSet<&str> = HashSet::with_capacity(campos.len());
    for campo in campos {
        if !es_nombre_campo_valido(&campo.nombre) {
            return Err(CoreError::Validation(format!(
                "campo nombre '{}' is not a valid identifier",
                campo.nombre
            )));
        }
        if campo.etiqueta.trim().is_empty() {
            return Err(CoreError::Validation(format!(
                "campo '{}' must have a non-empty etiqueta",
                campo.nombre
            )));
        }
        if !vistos.insert(campo.nombre.as_str()) {
            return Err(CoreError::Validation(format!(
                "duplicate campo nombre '{}'",
                campo.nombre
            )));
        }
        if let Some(pattern) = &campo.validacion_regex {
            regex::Regex::new(pattern).map_err(|e| {
                CoreError::Validation(format!(
                    "campo '{}' has an invalid validacion_regex: {e}",
                    campo.nombre
                ))
            })?;
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
