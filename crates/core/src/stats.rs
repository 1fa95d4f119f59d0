//! Column statistics over ingested records.
//!
//! Feeds the analysis prompts and the generated informe: numeric columns
//! get totals/averages/extremes, text columns get distinct counts and the
//! most frequent values. Columns are classified numeric when every
//! non-null value parses as a number.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{Map, Value};

/// How many top values to keep for a text column.
const TOP_VALORES: usize = 5;

/// Statistics for a single column.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "tipo", rename_all = "lowercase")]
pub enum ColumnaStats {
    Numerica {
        conteo: i64,
        total: f64,
        promedio: f64,
        max: f64,
        min: f64,
    },
    Texto {
        valores_unicos: i64,
        /// Most frequent values with their counts, descending.
        top: Vec<(String, i64)>,
    },
}

/// Dataset-level summary used by the informe.
#[derive(Debug, Clone, Serialize)]
pub struct ResumenDataset {
    pub total_registros: i64,
    pub columnas: Vec<String>,
    /// Null/absent count per column.
    pub nulos: BTreeMap<String, i64>,
}

/// Interpret a JSON value as a number, accepting numeric strings
/// (`"150.50"`, `"150,50"`).
pub fn valor_numerico(valor: &Value) -> Option<f64> {
    match valor {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().replace(',', ".").parse::<f64>().ok(),
        _ => None,
    }
}

/// Render a JSON scalar for grouping/labelling.
pub fn valor_texto(valor: &Value) -> String {
    match valor {
        Value::String(s) => s.clone(),
        otro => otro.to_string(),
    }
}

/// Collect the ordered set of column names across all records.
pub fn columnas(registros: &[Map<String, Value>]) -> Vec<String> {
    let mut nombres: Vec<String> = Vec::new();
    for registro in registros {
        for clave in registro.keys() {
            if !nombres.iter().any(|n| n == clave) {
                nombres.push(clave.clone());
            }
        }
    }
    nombres
}

/// True when the column has at least one value and every non-null value
/// is numeric.
pub fn columna_es_numerica(registros: &[Map<String, Value>], columna: &str) -> bool {
    let mut alguno = false;
    for registro in registros {
        match registro.get(columna) {
            None | Some(Value::Null) => {}
            Some(v) => {
                if valor_numerico(v).is_none() {
                    return false;
                }
                alguno = true;
            }
        }
    }
    alguno
}

/// Compute per-column statistics for a set of records.
pub fn stats_columnas(registros: &[Map<String, Value>]) -> BTreeMap<String, ColumnaStats> {
    let mut salida = BTreeMap::new();

    for columna in columnas(registros) {
        let stats = if columna_es_numerica(registros, &columna) {
            let valores: Vec<f64> = registros
                .iter()
                .filter_map(|r| r.get(&columna))
                .filter_map(valor_numerico)
                .collect();
            let conteo = valores.len() as i64;
            let total: f64 = valores.iter().sum();
            ColumnaStats::Numerica {
                conteo,
                total,
                promedio: total / conteo as f64,
                max: valores.iter().cloned().fold(f64::MIN, f64::max),
                min: valores.iter().cloned().fold(f64::MAX, f64::min),
            }
        } else {
            let conteos = contar_valores(registros, &columna);
            let valores_unicos = conteos.len() as i64;
            let mut top: Vec<(String, i64)> = conteos.into_iter().collect();
            top.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
            top.truncate(TOP_VALORES);
            ColumnaStats::Texto {
                valores_unicos,
                top,
            }
        };
        salida.insert(columna, stats);
    }

    salida
}

/// Compute the dataset summary (row count, columns, nulls per column).
pub fn resumen_dataset(registros: &[Map<String, Value>]) -> ResumenDataset {
    let columnas = columnas(registros);
    let mut nulos = BTreeMap::new();

    for columna in &columnas {
        let faltantes = registros
            .iter()
            .filter(|r| matches!(r.get(columna), None | Some(Value::Null)))
            .count() as i64;
        nulos.insert(columna.clone(), faltantes);
    }

    ResumenDataset {
        total_registros: registros.len() as i64,
        columnas,
        nulos,
    }
}

/// Count occurrences of each distinct value in a column (nulls skipped).
pub fn contar_valores(
    registros: &[Map<String, Value>],
    columna: &str,
) -> BTreeMap<String, i64> {
    let mut conteos: BTreeMap<String, i64> = BTreeMap::new();
    for registro in registros {
        match registro.get(columna) {
            None | Some(Value::Null) => {}
            Some(v) => *conteos.entry(valor_texto(v)).or_insert(0) += 1,
        }
    }
    conteos
}

/// Sum a numeric column grouped by the values of another column.
pub fn sumar_por_grupo(
    registros: &[Map<String, Value>],
    grupo: &str,
    valor: &str,
) -> BTreeMap<String, f64> {
    let mut sumas: BTreeMap<String, f64> = BTreeMap::new();
    for registro in registros {
        let clave = match registro.get(grupo) {
            None | Some(Value::Null) => continue,
            Some(v) => valor_texto(v),
        };
        let monto = registro.get(valor).and_then(valor_numerico).unwrap_or(0.0);
        *sumas.entry(clave).or_insert(0.0) += monto;
    }
    sumas
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
