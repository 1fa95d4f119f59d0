//! Chart spec heuristics for the Q&A agent.
//!
//! A [`GraficoSpec`] is the declarative payload the frontend renders
//! (Chart.js-style): type, title, parallel label/value arrays, and the
//! column the chart was built from. Nothing here draws anything; the
//! builders only aggregate records and pick sensible defaults from the
//! wording of the user's question.

use chrono::Datelike;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::records::parse_fecha;
use crate::stats::{columna_es_numerica, columnas, contar_valores, sumar_por_grupo};

/// Default number of elements in a requested chart.
pub const LIMITE_DEFECTO: usize = 10;
/// Hard cap on requested chart elements.
pub const LIMITE_MAX: usize = 20;
/// Pie charts stay readable up to this many segments.
pub const LIMITE_PIE: usize = 8;

/// Chart flavor. Line is reserved for temporal series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GraficoTipo {
    Bar,
    Pie,
    Line,
}

/// Declarative chart payload returned alongside agent answers.
#[derive(Debug, Clone, Serialize)]
pub struct GraficoSpec {
    pub tipo: GraficoTipo,
    pub titulo: String,
    pub labels: Vec<String>,
    pub datos: Vec<f64>,
    /// Source column (or period name for temporal groupings).
    pub columna: String,
}

/// Keyword families that map question wording to a column.
const FAMILIAS_COLUMNA: &[(&str, &[&str])] = &[
    ("tipo", &["tipo", "tipos", "categoria", "categoría", "clase"]),
    (
        "cliente",
        &["cliente", "razonsocial", "razon", "tercero", "terceros"],
    ),
    ("sede", &["sede", "sedes", "sucursal"]),
    ("estado", &["estado", "estados", "estatus"]),
    ("vendedor", &["vendedor", "vendedora", "comercial"]),
    (
        "producto",
        &["producto", "productos", "item", "referencia"],
    ),
    ("fecha", &["fecha", "periodo"]),
];

/// Column-name fragments that mark a numeric value column worth summing.
const PALABRAS_VALOR: &[&str] = &["factur", "total", "valor", "venta", "monto", "precio", "vr_"];

/// Does the question ask for a chart?
pub fn solicita_grafico(pregunta: &str) -> bool {
    let p = pregunta.to_lowercase();
    [
        "gráfico",
        "grafico",
        "gráfica",
        "grafica",
        "chart",
        "visualiza",
        "visualización",
        "muestra",
        "diagrama",
        "top",
        "ranking",
    ]
    .iter()
    .any(|palabra| p.contains(palabra))
}

/// Does the question ask for an Excel export?
pub fn solicita_export(pregunta: &str) -> bool {
    let p = pregunta.to_lowercase();
    ["excel", "exporta", "exportar", "descarga", "descargar", "xlsx"]
        .iter()
        .any(|palabra| p.contains(palabra))
}

/// Temporal grouping granularity detected from the question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Periodo {
    Dia,
    Semana,
    Mes,
    Anio,
}

impl Periodo {
    fn titulo(&self) -> &'static str {
        match self {
            Self::Dia => "Días",
            Self::Semana => "Semanas",
            Self::Mes => "Meses",
            Self::Anio => "Años",
        }
    }
}

fn detectar_periodo(pregunta: &str) -> Option<Periodo> {
    let p = pregunta.to_lowercase();
    if ["semana", "semanal", "semanas"].iter().any(|w| p.contains(w)) {
        Some(Periodo::Semana)
    } else if ["mensual", "meses", "mes "].iter().any(|w| p.contains(w)) || p.ends_with("mes") {
        Some(Periodo::Mes)
    } else if ["diario", "dias", "día", "días", "dia "].iter().any(|w| p.contains(w)) {
        Some(Periodo::Dia)
    } else if ["año", "anual", "años"].iter().any(|w| p.contains(w)) {
        Some(Periodo::Anio)
    } else {
        None
    }
}

/// Extract the requested element count from the question (`top 5`, ...).
fn detectar_limite(pregunta: &str, tipo: GraficoTipo) -> usize {
    let digitos: String = pregunta
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit())
        .collect();
    let mut limite = digitos.parse::<usize>().unwrap_or(LIMITE_DEFECTO);
    if limite == 0 {
        limite = LIMITE_DEFECTO;
    }
    limite = limite.min(LIMITE_MAX);
    if tipo == GraficoTipo::Pie {
        limite = limite.min(LIMITE_PIE);
    }
    limite
}

fn detectar_tipo(pregunta: &str) -> GraficoTipo {
    let p = pregunta.to_lowercase();
    if ["torta", "pie", "pastel", "circular"].iter().any(|w| p.contains(w)) {
        GraficoTipo::Pie
    } else {
        GraficoTipo::Bar
    }
}

/// Find a date-like column by name.
fn columna_fecha(nombres: &[String]) -> Option<String> {
    nombres
        .iter()
        .find(|n| {
            let n = n.to_lowercase();
            n.contains("fecha") || n.contains("f_") || n.contains("date")
        })
        .cloned()
}

/// Find a numeric column whose name suggests a monetary value.
fn columna_valor(registros: &[Map<String, Value>], nombres: &[String]) -> Option<String> {
    nombres
        .iter()
        .find(|n| {
            let bajo = n.to_lowercase();
            PALABRAS_VALOR.iter().any(|p| bajo.contains(p))
                && columna_es_numerica(registros, n)
        })
        .cloned()
}

/// Find the column the question is about, first by keyword family, then
/// by a literal column-name mention.
fn columna_objetivo(pregunta: &str, nombres: &[String]) -> Option<String> {
    let p = pregunta.to_lowercase();

    for (_, palabras) in FAMILIAS_COLUMNA {
        if palabras.iter().any(|w| p.contains(w)) {
            if let Some(col) = nombres.iter().find(|n| {
                let bajo = n.to_lowercase();
                palabras.iter().any(|w| bajo.contains(w))
            }) {
                return Some(col.clone());
            }
        }
    }

    nombres.iter().find(|n| p.contains(&n.to_lowercase())).cloned()
}

/// Bucket a normalized `YYYY-MM-DD` date value into the requested period.
fn clave_periodo(valor: &Value, periodo: Periodo) -> Option<String> {
    let fecha = parse_fecha(valor.as_str()?.trim())?;
    Some(match periodo {
        Periodo::Dia => fecha.format("%Y-%m-%d").to_string(),
        Periodo::Semana => {
            let iso = fecha.iso_week();
            format!("{}-{}", iso.week(), iso.year())
        }
        Periodo::Mes => fecha.format("%Y-%m").to_string(),
        Periodo::Anio => fecha.format("%Y").to_string(),
    })
}

fn top_n(pares: impl IntoIterator<Item = (String, f64)>, limite: usize) -> (Vec<String>, Vec<f64>) {
    let mut pares: Vec<(String, f64)> = pares.into_iter().collect();
    pares.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    pares.truncate(limite);
    pares.into_iter().unzip()
}

/// Build the chart a question asks for, or `None` when the records give
/// nothing to chart.
pub fn construir_grafico(
    pregunta: &str,
    registros: &[Map<String, Value>],
) -> Option<GraficoSpec> {
    if registros.is_empty() {
        return None;
    }

    let tipo = detectar_tipo(pregunta);
    let limite = detectar_limite(pregunta, tipo);
    let nombres = columnas(registros);
    let valor = columna_valor(registros, &nombres);

    // Temporal grouping takes precedence when the question names a period
    // and a date column exists.
    if let Some(periodo) = detectar_periodo(pregunta) {
        if let Some(fecha_col) = columna_fecha(&nombres) {
            let mut grupos: std::collections::BTreeMap<String, f64> = Default::default();
            for registro in registros {
                let Some(clave) = registro
                    .get(&fecha_col)
                    .and_then(|v| clave_periodo(v, periodo))
                else {
                    continue;
                };
                let aporte = match &valor {
                    Some(col) => registro
                        .get(col)
                        .and_then(crate::stats::valor_numerico)
                        .unwrap_or(0.0),
                    None => 1.0,
                };
                *grupos.entry(clave).or_insert(0.0) += aporte;
            }
            if !grupos.is_empty() {
                let (labels, datos) = top_n(grupos, limite);
                return Some(GraficoSpec {
                    tipo,
                    titulo: format!("Facturación por {}", periodo.titulo()),
                    labels,
                    datos,
                    columna: periodo.titulo().to_string(),
                });
            }
        }
    }

    if let Some(objetivo) = columna_objetivo(pregunta, &nombres) {
        return Some(match &valor {
            Some(col) if *col != objetivo => {
                let sumas = sumar_por_grupo(registros, &objetivo, col);
                let (labels, datos) = top_n(sumas, limite);
                GraficoSpec {
                    tipo,
                    titulo: format!("Top {limite} por {objetivo}"),
                    labels,
                    datos,
                    columna: objetivo,
                }
            }
            _ => {
                let conteos = contar_valores(registros, &objetivo);
                let (labels, datos) =
                    top_n(conteos.into_iter().map(|(k, v)| (k, v as f64)), limite);
                GraficoSpec {
                    tipo,
                    titulo: format!("Top {limite} - {objetivo}"),
                    labels,
                    datos,
                    columna: objetivo,
                }
            }
        });
    }

    // Fallback: count over the first text column.
    let texto = nombres
        .iter()
        .find(|n| !columna_es_numerica(registros, n))?;
    let conteos = contar_valores(registros, texto);
    let (labels, datos) = top_n(conteos.into_iter().map(|(k, v)| (k, v as f64)), limite);
    Some(GraficoSpec {
        tipo,
        titulo: format!("Top {limite} - {texto}"),
        labels,
        datos,
        columna: texto.clone(),
    })
}

/// Build the default chart set for a full analysis: top-10 bars for the
/// first numeric columns, pies for the first text columns with more than
/// one distinct value, and a totals bar.
pub fn graficos_automaticos(registros: &[Map<String, Value>]) -> Vec<GraficoSpec> {
    let mut salida = Vec::new();
    if registros.is_empty() {
        return salida;
    }

    let nombres = columnas(registros);
    let numericas: Vec<&String> = nombres
        .iter()
        .filter(|n| columna_es_numerica(registros, n))
        .take(5)
        .collect();
    let textuales: Vec<&String> = nombres
        .iter()
        .filter(|n| !columna_es_numerica(registros, n))
        .take(3)
        .collect();

    for col in &numericas {
        let conteos = contar_valores(registros, col);
        if conteos.is_empty() {
            continue;
        }
        let (labels, datos) = top_n(
            conteos.into_iter().map(|(k, v)| (k, v as f64)),
            LIMITE_DEFECTO,
        );
        salida.push(GraficoSpec {
            tipo: GraficoTipo::Bar,
            titulo: format!("Top 10 - {col}"),
            labels,
            datos,
            columna: (*col).clone(),
        });
    }

    for col in &textuales {
        let conteos = contar_valores(registros, col);
        if conteos.len() <= 1 {
            continue;
        }
        let (labels, datos) = top_n(
            conteos.into_iter().map(|(k, v)| (k, v as f64)),
            LIMITE_PIE,
        );
        salida.push(GraficoSpec {
            tipo: GraficoTipo::Pie,
            titulo: format!("Distribución - {col}"),
            labels,
            datos,
            columna: (*col).clone(),
        });
    }

    if !numericas.is_empty() {
        let labels: Vec<String> = numericas.iter().map(|c| (*c).clone()).collect();
        let datos: Vec<f64> = numericas
            .iter()
            .map(|col| {
                registros
                    .iter()
                    .filter_map(|r| r.get(*col))
                    .filter_map(crate::stats::valor_numerico)
                    .sum()
            })
            .collect();
        salida.push(GraficoSpec {
            tipo: GraficoTipo::Bar,
            titulo: "Totales por Columna".to_string(),
            labels,
            datos,
            columna: "resumen".to_string(),
        });
    }

    salida
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn ventas() -> Vec<Map<String, Value>> {
        [
            json!({ "cliente": "ACME", "total_factura": 100.0, "fecha": "2024-03-01" }),
            json!({ "cliente": "ACME", "total_factura": 50.0, "fecha": "2024-03-15" }),
            json!({ "cliente": "Globex", "total_factura": 200.0, "fecha": "2024-04-02" }),
            json!({ "cliente": "Initech", "total_factura": 30.0, "fecha": "2024-04-20" }),
        ]
        .into_iter()
        .map(|v| v.as_object().unwrap().clone())
        .collect()
    }

    #[test]
    fn deteccion_de_solicitudes() {
        assert!(solicita_grafico("muéstrame un gráfico de ventas"));
        assert!(solicita_grafico("top 5 clientes"));
        assert!(!solicita_grafico("¿cuántos registros hay?"));
        assert!(solicita_export("exportar a excel por favor"));
        assert!(!solicita_export("¿cuál es el total?"));
    }

    #[test]
    fn limite_por_defecto_y_tope() {
        assert_eq!(detectar_limite("top clientes", GraficoTipo::Bar), 10);
        assert_eq!(detectar_limite("top 5 clientes", GraficoTipo::Bar), 5);
        assert_eq!(detectar_limite("top 50 clientes", GraficoTipo::Bar), 20);
        assert_eq!(detectar_limite("torta top 15", GraficoTipo::Pie), 8);
    }

    #[test]
    fn agrupa_por_cliente_y_suma() {
        let g = construir_grafico("top 3 clientes por facturación", &ventas()).unwrap();
        assert_eq!(g.tipo, GraficoTipo::Bar);
        assert_eq!(g.columna, "cliente");
        assert_eq!(g.labels[0], "Globex");
        assert_eq!(g.datos[0], 200.0);
        assert_eq!(g.labels[1], "ACME");
        assert_eq!(g.datos[1], 150.0);
    }

    #[test]
    fn torta_por_palabra_clave() {
        let g = construir_grafico("gráfico de torta por cliente", &ventas()).unwrap();
        assert_eq!(g.tipo, GraficoTipo::Pie);
        assert!(g.labels.len() <= LIMITE_PIE);
    }

    #[test]
    fn agrupacion_mensual_sobre_fecha() {
        let g = construir_grafico("facturación mensual", &ventas()).unwrap();
        assert_eq!(g.columna, "Meses");
        assert!(g.labels.contains(&"2024-03".to_string()));
        let idx = g.labels.iter().position(|l| l == "2024-03").unwrap();
        assert_eq!(g.datos[idx], 150.0);
    }

    #[test]
    fn sin_registros_no_hay_grafico() {
        assert!(construir_grafico("top clientes", &[]).is_none());
    }

    #[test]
    fn automaticos_incluyen_totales() {
        let graficos = graficos_automaticos(&ventas());
        assert!(graficos.iter().any(|g| g.columna == "resumen"));
        assert!(graficos
            .iter()
            .any(|g| g.tipo == GraficoTipo::Pie && g.columna == "cliente"));
    }
}
