//! Excel-to-schema field inference.
//!
//! Given the header row and one sample data row of an uploaded
//! spreadsheet, produce an ordered candidate field list: technical name
//! slugged from the header, label preserved as typed, data type inferred
//! from the sample value. The admin edits this list before saving a
//! report, so inference favors the safe fallback (`texto`) over clever
//! guesses. Everything here is deterministic: same input, same output.

use crate::error::CoreError;
use crate::records::{es_email, parse_fecha};
use crate::schema::{Campo, TipoDato};

/// Slug a spreadsheet header into a technical field name.
///
/// Lowercases, folds Spanish accents, maps every other non-alphanumeric
/// run to a single `_`, and prefixes `c_` when the result would start
/// with a digit. An all-symbol header slugs to `"campo"`.
pub fn slug_campo(header: &str) -> String {
    let mut slug = String::with_capacity(header.len());
    let mut anterior_guion = true; // suppress leading '_'

    for c in header.chars() {
        let c = plegar_acento(c);
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
            anterior_guion = false;
        } else if !anterior_guion {
            slug.push('_');
            anterior_guion = true;
        }
    }
    while slug.ends_with('_') {
        slug.pop();
    }

    if slug.is_empty() {
        return "campo".to_string();
    }
    if slug.starts_with(|c: char| c.is_ascii_digit()) {
        return format!("c_{slug}");
    }
    slug
}

fn plegar_acento(c: char) -> char {
    match c {
        'á' | 'à' | 'ä' | 'Á' | 'À' | 'Ä' => 'a',
        'é' | 'è' | 'ë' | 'É' | 'È' | 'Ë' => 'e',
        'í' | 'ì' | 'ï' | 'Í' | 'Ì' | 'Ï' => 'i',
        'ó' | 'ò' | 'ö' | 'Ó' | 'Ò' | 'Ö' => 'o',
        'ú' | 'ù' | 'ü' | 'Ú' | 'Ù' | 'Ü' => 'u',
        'ñ' | 'Ñ' => 'n',
        otro => otro,
    }
}

/// Infer the data type of a column from one sample cell.
///
/// Order matters: booleans and dates are checked before numbers so that
/// `"1"`-style booleans never shadow them (they do not: `"1"` infers as
/// numero; only textual tokens infer booleano), and integers before
/// decimals so `"150"` is numero while `"150.50"` is decimal.
pub fn inferir_tipo(muestra: &str) -> TipoDato {
    let s = muestra.trim();
    if s.is_empty() {
        return TipoDato::Texto;
    }

    match s.to_lowercase().as_str() {
        "true" | "false" | "si" | "sí" | "no" => return TipoDato::Booleano,
        _ => {}
    }
    if parse_fecha(s).is_some() {
        return TipoDato::Fecha;
    }
    if s.parse::<i64>().is_ok() {
        return TipoDato::Numero;
    }
    if s.replace(',', ".").parse::<f64>().is_ok() {
        return TipoDato::Decimal;
    }
    if es_email(s) {
        return TipoDato::Email;
    }
    TipoDato::Texto
}

/// Infer an ordered field list from a header row and a sample data row.
///
/// `muestra` may be shorter than `headers` (trailing empty cells);
/// missing samples infer as texto. Duplicate slugs are disambiguated
/// with `_2`, `_3`, ... suffixes so nombres stay unique.
pub fn inferir_campos(headers: &[String], muestra: &[String]) -> Result<Vec<Campo>, CoreError> {
    if headers.iter().all(|h| h.trim().is_empty()) {
        return Err(CoreError::Validation(
            "the header row is missing or empty".into(),
        ));
    }

    let mut campos = Vec::with_capacity(headers.len());
    let mut usados: std::collections::HashMap<String, u32> = std::collections::HashMap::new();

    for (idx, header) in headers.iter().enumerate() {
        if header.trim().is_empty() {
            continue;
        }

        let base = slug_campo(header);
        let repeticiones = usados.entry(base.clone()).or_insert(0);
        *repeticiones += 1;
        let nombre = if *repeticiones == 1 {
            base
        } else {
            format!("{base}_{repeticiones}")
        };

        let ejemplo = muestra.get(idx).map(|s| s.trim()).filter(|s| !s.is_empty());

        campos.push(Campo {
            nombre,
            etiqueta: header.trim().to_string(),
            tipo_dato: ejemplo.map(inferir_tipo).unwrap_or_default(),
            obligatorio: false,
            descripcion: None,
            ejemplo: ejemplo.map(str::to_string),
            orden: idx as i32,
            valores_permitidos: Vec::new(),
            validacion_regex: None,
        });
    }

    Ok(campos)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_basico() {
        assert_eq!(slug_campo("Numero Factura"), "numero_factura");
        assert_eq!(slug_campo("Monto"), "monto");
    }

    #[test]
    fn slug_acentos_y_simbolos() {
        assert_eq!(slug_campo("Día de Emisión"), "dia_de_emision");
        assert_eq!(slug_campo("Valor ($)"), "valor");
        assert_eq!(slug_campo("Año"), "ano");
    }

    #[test]
    fn slug_inicia_con_digito() {
        assert_eq!(slug_campo("2024 Total"), "c_2024_total");
    }

    #[test]
    fn slug_vacio_cae_a_campo() {
        assert_eq!(slug_campo("***"), "campo");
    }

    #[test]
    fn inferencia_tipos() {
        assert_eq!(inferir_tipo("F-001"), TipoDato::Texto);
        assert_eq!(inferir_tipo("150.50"), TipoDato::Decimal);
        assert_eq!(inferir_tipo("150,50"), TipoDato::Decimal);
        assert_eq!(inferir_tipo("42"), TipoDato::Numero);
        assert_eq!(inferir_tipo("2024-03-15"), TipoDato::Fecha);
        assert_eq!(inferir_tipo("15/03/2024"), TipoDato::Fecha);
        assert_eq!(inferir_tipo("si"), TipoDato::Booleano);
        assert_eq!(inferir_tipo("ana@empresa.com"), TipoDato::Email);
        assert_eq!(inferir_tipo(""), TipoDato::Texto);
    }

    #[test]
    fn ejemplo_de_la_especificacion() {
        // ["Numero Factura", "Monto"] + ["F-001", "150.50"]
        let headers = vec!["Numero Factura".to_string(), "Monto".to_string()];
        let muestra = vec!["F-001".to_string(), "150.50".to_string()];

        let campos = inferir_campos(&headers, &muestra).unwrap();
        assert_eq!(campos.len(), 2);
        assert_eq!(campos[0].nombre, "numero_factura");
        assert_eq!(campos[0].tipo_dato, TipoDato::Texto);
        assert_eq!(campos[1].nombre, "monto");
        assert_eq!(campos[1].tipo_dato, TipoDato::Decimal);
        assert_eq!(campos[1].ejemplo.as_deref(), Some("150.50"));
    }

    #[test]
    fn inferencia_es_determinista() {
        let headers = vec!["Cliente".to_string(), "Cliente".to_string()];
        let muestra = vec!["ACME".to_string(), "ACME 2".to_string()];
        let a = inferir_campos(&headers, &muestra).unwrap();
        let b = inferir_campos(&headers, &muestra).unwrap();
        assert_eq!(a, b);
        assert_eq!(a[0].nombre, "cliente");
        assert_eq!(a[1].nombre, "cliente_2");
    }

    #[test]
    fn encabezados_vacios_fallan() {
        let headers = vec!["  ".to_string(), "".to_string()];
        assert!(inferir_campos(&headers, &[]).is_err());
    }

    #[test]
    fn columnas_en_blanco_se_omiten() {
        let headers = vec!["Cliente".to_string(), "".to_string(), "Monto".to_string()];
        let muestra = vec!["ACME".to_string(), "".to_string(), "10".to_string()];
        let campos = inferir_campos(&headers, &muestra).unwrap();
        assert_eq!(campos.len(), 2);
        assert_eq!(campos[1].nombre, "monto");
        assert_eq!(campos[1].orden, 2);
    }
}
