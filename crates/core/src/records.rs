//! Validation and coercion of ingested records against a report schema.
//!
//! Every ingested row is a JSON object keyed by `Campo.nombre`. Before a
//! row is stored, each declared field is checked: obligatorio fields must
//! be present and non-null, and values are coerced to a canonical JSON
//! representation for the field's `TipoDato` (dates normalize to
//! `YYYY-MM-DD`, decimals to numbers, booleans to `true`/`false`, ...).
//! Keys not declared in the schema pass through untouched.

use chrono::NaiveDate;
use serde_json::{Map, Number, Value};

use crate::error::CoreError;
use crate::schema::{Campo, TipoDato};

/// Date formats accepted on ingestion, tried in order.
const FORMATOS_FECHA: &[&str] = &["%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y"];

/// Validate and coerce one record against the report's fields.
///
/// Returns the coerced object, or a single [`CoreError::Validation`]
/// aggregating every problem found in the row.
pub fn validar_registro(
    datos: &Map<String, Value>,
    campos: &[Campo],
) -> Result<Map<String, Value>, CoreError> {
    let mut salida = datos.clone();
    let mut errores: Vec<String> = Vec::new();

    for campo in campos {
        let valor = match datos.get(&campo.nombre) {
            None | Some(Value::Null) => {
                if campo.obligatorio {
                    errores.push(format!("campo obligatorio '{}' ausente", campo.nombre));
                }
                continue;
            }
            Some(valor) => valor,
        };

        match coercer_valor(valor, campo) {
            Ok(coercido) => {
                salida.insert(campo.nombre.clone(), coercido);
            }
            Err(motivo) => errores.push(format!("campo '{}': {motivo}", campo.nombre)),
        }
    }

    if errores.is_empty() {
        Ok(salida)
    } else {
        Err(CoreError::Validation(errores.join("; ")))
    }
}

/// Coerce a single value to the canonical representation of its TipoDato.
pub fn coercer_valor(valor: &Value, campo: &Campo) -> Result<Value, String> {
    let coercido = match campo.tipo_dato {
        TipoDato::Texto => coercer_texto(valor)?,
        TipoDato::Numero => coercer_numero(valor)?,
        TipoDato::Decimal => coercer_decimal(valor)?,
        TipoDato::Fecha => coercer_fecha(valor)?,
        TipoDato::Booleano => coercer_booleano(valor)?,
        TipoDato::Email => coercer_email(valor)?,
        TipoDato::Telefono => coercer_telefono(valor)?,
    };

    if !campo.valores_permitidos.is_empty() {
        let render = render_plano(&coercido);
        if !campo.valores_permitidos.iter().any(|v| v == &render) {
            return Err(format!("valor '{render}' no está entre los permitidos"));
        }
    }

    if let Some(pattern) = &campo.validacion_regex {
        // Already validated to compile when the report was saved.
        let re = regex::Regex::new(pattern).map_err(|e| e.to_string())?;
        let render = render_plano(&coercido);
        if !re.is_match(&render) {
            return Err(format!("valor '{render}' no cumple la validación"));
        }
    }

    Ok(coercido)
}

fn coercer_texto(valor: &Value) -> Result<Value, String> {
    match valor {
        Value::String(_) => Ok(valor.clone()),
        Value::Number(_) | Value::Bool(_) => Ok(Value::String(render_plano(valor))),
        otro => Err(format!("se esperaba texto, llegó {}", tipo_json(otro))),
    }
}

fn coercer_numero(valor: &Value) -> Result<Value, String> {
    match valor {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(Value::Number(i.into()))
            } else if let Some(f) = n.as_f64() {
                if f.fract() == 0.0 {
                    Ok(Value::Number((f as i64).into()))
                } else {
                    Err(format!("'{f}' no es un entero"))
                }
            } else {
                Err("número fuera de rango".into())
            }
        }
        Value::String(s) => s
            .trim()
            .parse::<i64>()
            .map(|i| Value::Number(i.into()))
            .map_err(|_| format!("'{s}' no es un entero")),
        otro => Err(format!("se esperaba entero, llegó {}", tipo_json(otro))),
    }
}

fn coercer_decimal(valor: &Value) -> Result<Value, String> {
    let parsed = match valor {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().replace(',', ".").parse::<f64>().ok(),
        _ => None,
    };
    match parsed.and_then(Number::from_f64) {
        Some(n) => Ok(Value::Number(n)),
        None => Err(format!("'{}' no es un decimal", render_plano(valor))),
    }
}

fn coercer_fecha(valor: &Value) -> Result<Value, String> {
    let s = match valor {
        Value::String(s) => s.trim(),
        otro => return Err(format!("se esperaba fecha, llegó {}", tipo_json(otro))),
    };
    parse_fecha(s)
        .map(|d| Value::String(d.format("%Y-%m-%d").to_string()))
        .ok_or_else(|| format!("'{s}' no es una fecha válida"))
}

fn coercer_booleano(valor: &Value) -> Result<Value, String> {
    match valor {
        Value::Bool(_) => Ok(valor.clone()),
        Value::String(s) => match s.trim().to_lowercase().as_str() {
            "true" | "si" | "sí" | "1" => Ok(Value::Bool(true)),
            "false" | "no" | "0" => Ok(Value::Bool(false)),
            otro => Err(format!("'{otro}' no es un booleano")),
        },
        Value::Number(n) => match n.as_i64() {
            Some(0) => Ok(Value::Bool(false)),
            Some(1) => Ok(Value::Bool(true)),
            _ => Err(format!("'{n}' no es un booleano")),
        },
        otro => Err(format!("se esperaba booleano, llegó {}", tipo_json(otro))),
    }
}

fn coercer_email(valor: &Value) -> Result<Value, String> {
    let s = match valor {
        Value::String(s) => s.trim(),
        otro => return Err(format!("se esperaba email, llegó {}", tipo_json(otro))),
    };
    if es_email(s) {
        Ok(Value::String(s.to_string()))
    } else {
        Err(format!("'{s}' no es un email válido"))
    }
}

fn coercer_telefono(valor: &Value) -> Result<Value, String> {
    let s = match valor {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        otro => return Err(format!("se esperaba teléfono, llegó {}", tipo_json(otro))),
    };
    let digitos = s.chars().filter(|c| c.is_ascii_digit()).count();
    if (7..=20).contains(&digitos) {
        Ok(Value::String(s))
    } else {
        Err(format!("'{s}' no es un teléfono válido"))
    }
}

/// Parse a date string using the accepted ingestion formats.
pub fn parse_fecha(s: &str) -> Option<NaiveDate> {
    FORMATOS_FECHA
        .iter()
        .find_map(|f| NaiveDate::parse_from_str(s, f).ok())
}

/// Minimal email shape check: one `@`, a dot somewhere after it.
pub fn es_email(s: &str) -> bool {
    match s.split_once('@') {
        Some((local, dominio)) => {
            !local.is_empty() && dominio.contains('.') && !dominio.starts_with('.')
        }
        None => false,
    }
}

/// Render a scalar JSON value without quotes, for error messages and
/// regex/allowed-value checks.
fn render_plano(valor: &Value) -> String {
    match valor {
        Value::String(s) => s.clone(),
        otro => otro.to_string(),
    }
}

fn tipo_json(valor: &Value) -> &'static str {
    match valor {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use serde_json::json;

    use super::*;

    fn campo(nombre: &str, tipo: TipoDato, obligatorio: bool) -> Campo {
        Campo {
            nombre: nombre.to_string(),
            etiqueta: nombre.to_string(),
            tipo_dato: tipo,
            obligatorio,
            descripcion: None,
            ejemplo: None,
            orden: 0,
            valores_permitidos: Vec::new(),
            validacion_regex: None,
        }
    }

    fn objeto(v: Value) -> Map<String, Value> {
        v.as_object().unwrap().clone()
    }

    #[test]
    fn registro_valido_se_coerce() {
        let campos = vec![
            campo("numero_factura", TipoDato::Texto, true),
            campo("monto", TipoDato::Decimal, true),
            campo("fecha", TipoDato::Fecha, false),
        ];
        let datos = objeto(json!({
            "numero_factura": "F-001",
            "monto": "150.50",
            "fecha": "15/03/2024"
        }));

        let salida = validar_registro(&datos, &campos).unwrap();
        assert_eq!(salida["monto"], json!(150.5));
        assert_eq!(salida["fecha"], json!("2024-03-15"));
        assert_eq!(salida["numero_factura"], json!("F-001"));
    }

    #[test]
    fn obligatorio_ausente_falla() {
        let campos = vec![campo("monto", TipoDato::Decimal, true)];
        let datos = objeto(json!({ "otro": 1 }));
        assert_matches!(
            validar_registro(&datos, &campos),
            Err(CoreError::Validation(msg)) if msg.contains("monto")
        );
    }

    #[test]
    fn opcional_ausente_pasa() {
        let campos = vec![campo("monto", TipoDato::Decimal, false)];
        let datos = objeto(json!({}));
        assert!(validar_registro(&datos, &campos).is_ok());
    }

    #[test]
    fn errores_se_agregan() {
        let campos = vec![
            campo("monto", TipoDato::Decimal, true),
            campo("fecha", TipoDato::Fecha, true),
        ];
        let datos = objeto(json!({ "monto": "abc", "fecha": "ayer" }));
        let err = validar_registro(&datos, &campos).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("monto") && msg.contains("fecha"));
    }

    #[test]
    fn claves_no_declaradas_pasan_intactas() {
        let campos = vec![campo("monto", TipoDato::Decimal, false)];
        let datos = objeto(json!({ "monto": 1.0, "extra": "x" }));
        let salida = validar_registro(&datos, &campos).unwrap();
        assert_eq!(salida["extra"], json!("x"));
    }

    #[test]
    fn booleanos_en_espanol() {
        let campos = vec![campo("activo", TipoDato::Booleano, true)];
        let salida = validar_registro(&objeto(json!({ "activo": "si" })), &campos).unwrap();
        assert_eq!(salida["activo"], json!(true));
        let salida = validar_registro(&objeto(json!({ "activo": "NO" })), &campos).unwrap();
        assert_eq!(salida["activo"], json!(false));
    }

    #[test]
    fn decimal_con_coma() {
        let campos = vec![campo("monto", TipoDato::Decimal, true)];
        let salida = validar_registro(&objeto(json!({ "monto": "150,50" })), &campos).unwrap();
        assert_eq!(salida["monto"], json!(150.5));
    }

    #[test]
    fn valores_permitidos_se_aplican() {
        let mut estado = campo("estado", TipoDato::Texto, true);
        estado.valores_permitidos = vec!["pendiente".into(), "pagada".into()];
        let campos = vec![estado];

        assert!(validar_registro(&objeto(json!({ "estado": "pagada" })), &campos).is_ok());
        assert_matches!(
            validar_registro(&objeto(json!({ "estado": "anulada" })), &campos),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn email_minimo() {
        assert!(es_email("ana@empresa.com"));
        assert!(!es_email("ana@empresa"));
        assert!(!es_email("sin-arroba.com"));
    }
}
