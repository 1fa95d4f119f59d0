//! Reading uploaded workbooks: schema inference and record extraction.
//!
//! Uploads arrive as in-memory `.xlsx` bytes (the extension gate lives at
//! the HTTP layer). The data sheet is `Datos` when present, otherwise the
//! first sheet. The first row is always the header row.

use std::io::Cursor;

use calamine::{Data, Range, Reader, Xlsx};
use informes_core::inference::{inferir_campos, slug_campo};
use informes_core::schema::Campo;
use serde_json::{Map, Number, Value};

use crate::error::IngestError;

/// Preferred data-sheet name in templates and uploads.
const HOJA_DATOS: &str = "Datos";

/// Result of analyzing an uploaded workbook for schema inference.
#[derive(Debug, Clone, serde::Serialize)]
pub struct AnalisisExcel {
    pub campos: Vec<Campo>,
    pub total_columnas: usize,
    pub filas_muestra: usize,
    pub mensaje: String,
}

/// Open the workbook and return its data sheet.
fn hoja_datos(data: &[u8]) -> Result<Range<Data>, IngestError> {
    let mut libro = Xlsx::new(Cursor::new(data))?;

    let nombre = if libro.sheet_names().iter().any(|n| n == HOJA_DATOS) {
        HOJA_DATOS.to_string()
    } else {
        libro
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| IngestError::SinDatos("el archivo no tiene hojas".into()))?
    };

    libro
        .worksheet_range(&nombre)
        .map_err(IngestError::Libro)
}

/// Analyze an uploaded workbook: infer a candidate field list from the
/// header row and the first data row.
pub fn analizar_excel(data: &[u8]) -> Result<AnalisisExcel, IngestError> {
    let rango = hoja_datos(data)?;
    let mut filas = rango.rows();

    let encabezados: Vec<String> = filas
        .next()
        .ok_or_else(|| IngestError::SinDatos("la hoja de datos está vacía".into()))?
        .iter()
        .map(celda_texto)
        .collect();

    let muestra: Vec<String> = filas
        .next()
        .ok_or_else(|| {
            IngestError::SinDatos("el archivo no tiene filas de datos debajo del encabezado".into())
        })?
        .iter()
        .map(celda_texto)
        .collect();

    let filas_muestra = rango.rows().count().saturating_sub(1);
    let campos = inferir_campos(&encabezados, &muestra)?;
    let total_columnas = campos.len();

    tracing::debug!(total_columnas, filas_muestra, "workbook analyzed");
    Ok(AnalisisExcel {
        mensaje: format!(
            "Se detectaron {total_columnas} columnas y {filas_muestra} filas de datos"
        ),
        campos,
        total_columnas,
        filas_muestra,
    })
}

/// Read the data sheet into JSON objects keyed by `Campo.nombre`.
///
/// Headers are matched to fields by slug, so templates regenerated from
/// etiquetas round-trip. Every obligatorio field must have a column;
/// fully empty rows are skipped. Per-row type validation happens later,
/// at insertion.
pub fn leer_registros(
    data: &[u8],
    campos: &[Campo],
) -> Result<Vec<Map<String, Value>>, IngestError> {
    let rango = hoja_datos(data)?;
    let mut filas = rango.rows();

    let encabezados = filas
        .next()
        .ok_or_else(|| IngestError::SinDatos("la hoja de datos está vacía".into()))?;

    // Column index -> campo nombre. A header matches a field when its
    // slug equals the nombre, or it is already the nombre verbatim.
    let mut mapeo: Vec<Option<String>> = Vec::with_capacity(encabezados.len());
    for celda in encabezados {
        let texto = celda_texto(celda);
        let slug = slug_campo(&texto);
        let nombre = campos
            .iter()
            .find(|c| c.nombre == slug || c.nombre == texto)
            .map(|c| c.nombre.clone());
        mapeo.push(nombre);
    }

    for campo in campos.iter().filter(|c| c.obligatorio) {
        if !mapeo.iter().flatten().any(|n| n == &campo.nombre) {
            return Err(IngestError::SinDatos(format!(
                "falta la columna obligatoria '{}'",
                campo.etiqueta
            )));
        }
    }

    let mut registros = Vec::new();
    for fila in filas {
        let mut registro = Map::new();
        for (idx, celda) in fila.iter().enumerate() {
            let Some(Some(nombre)) = mapeo.get(idx) else {
                continue;
            };
            let valor = celda_valor(celda);
            if !valor.is_null() {
                registro.insert(nombre.clone(), valor);
            }
        }
        if !registro.is_empty() {
            registros.push(registro);
        }
    }

    if registros.is_empty() {
        return Err(IngestError::SinDatos(
            "el archivo no tiene filas de datos debajo del encabezado".into(),
        ));
    }
    Ok(registros)
}

/// Render a cell as display text (inference samples, headers).
fn celda_texto(celda: &Data) -> String {
    match celda {
        Data::Empty => String::new(),
        Data::String(s) => s.trim().to_string(),
        Data::Float(f) if f.fract() == 0.0 => format!("{}", *f as i64),
        Data::Float(f) => f.to_string(),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => dt
            .as_datetime()
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default(),
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Error(e) => format!("#ERROR {e:?}"),
    }
}

/// Convert a cell to its JSON value. Dates normalize to `YYYY-MM-DD`.
fn celda_valor(celda: &Data) -> Value {
    match celda {
        Data::Empty => Value::Null,
        Data::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                Value::Null
            } else {
                Value::String(s.to_string())
            }
        }
        Data::Float(f) if f.fract() == 0.0 => Value::Number((*f as i64).into()),
        Data::Float(f) => Number::from_f64(*f).map(Value::Number).unwrap_or(Value::Null),
        Data::Int(i) => Value::Number((*i).into()),
        Data::Bool(b) => Value::Bool(*b),
        Data::DateTime(dt) => dt
            .as_datetime()
            .map(|d| Value::String(d.format("%Y-%m-%d").to_string()))
            .unwrap_or(Value::Null),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Value::String(s.clone()),
        Data::Error(_) => Value::Null,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
