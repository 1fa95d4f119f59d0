//! Generating workbooks: upload templates and tabular exports.

use informes_core::schema::Campo;
use rust_xlsxwriter::{Format, Workbook, Worksheet};
use serde_json::Value;

use crate::error::IngestError;

/// Generate the upload template for a report: a `Datos` sheet with one
/// header per field, an `Ejemplo` sheet with the sample values, and an
/// `Instrucciones` sheet describing the report and every field.
pub fn generar_plantilla(
    nombre: &str,
    descripcion: Option<&str>,
    contexto: Option<&str>,
    campos: &[Campo],
) -> Result<Vec<u8>, IngestError> {
    let mut libro = Workbook::new();
    let negrita = Format::new().set_bold();

    let datos = libro.add_worksheet();
    datos.set_name("Datos")?;
    escribir_encabezados(datos, campos, &negrita)?;

    let ejemplo = libro.add_worksheet();
    ejemplo.set_name("Ejemplo")?;
    escribir_encabezados(ejemplo, campos, &negrita)?;
    for (col, campo) in campos.iter().enumerate() {
        if let Some(muestra) = &campo.ejemplo {
            ejemplo.write_string(1, col as u16, muestra)?;
        }
    }

    let instrucciones = libro.add_worksheet();
    instrucciones.set_name("Instrucciones")?;
    instrucciones.write_string_with_format(0, 0, nombre, &negrita)?;
    instrucciones.write_string(0, 1, descripcion.unwrap_or_default())?;
    instrucciones.write_string_with_format(2, 0, "CONTEXTO", &negrita)?;
    instrucciones.write_string(2, 1, contexto.unwrap_or_default())?;
    instrucciones.write_string_with_format(4, 0, "CAMPOS", &negrita)?;
    instrucciones.write_string_with_format(4, 1, "Descripción", &negrita)?;

    let mut fila = 5u32;
    for campo in campos {
        let marca = if campo.obligatorio { " ✓" } else { "" };
        instrucciones.write_string(fila, 0, format!("{}{marca}", campo.etiqueta))?;
        instrucciones.write_string(
            fila,
            1,
            campo.descripcion.clone().unwrap_or_default(),
        )?;
        fila += 1;
    }

    Ok(libro.save_to_buffer()?)
}

/// Export a table of JSON values as a single-sheet workbook.
pub fn exportar_tabla(
    titulo: &str,
    columnas: &[String],
    filas: &[Vec<Value>],
) -> Result<Vec<u8>, IngestError> {
    let mut libro = Workbook::new();
    let negrita = Format::new().set_bold();

    let hoja = libro.add_worksheet();
    hoja.set_name(titulo_hoja(titulo))?;
    for (col, encabezado) in columnas.iter().enumerate() {
        hoja.write_string_with_format(0, col as u16, encabezado, &negrita)?;
    }

    for (r, fila) in filas.iter().enumerate() {
        for (c, valor) in fila.iter().enumerate() {
            let (r, c) = (r as u32 + 1, c as u16);
            match valor {
                Value::Null => {}
                Value::Number(n) => {
                    if let Some(f) = n.as_f64() {
                        hoja.write_number(r, c, f)?;
                    } else {
                        hoja.write_string(r, c, n.to_string())?;
                    }
                }
                Value::Bool(b) => {
                    hoja.write_boolean(r, c, *b)?;
                }
                Value::String(s) => {
                    hoja.write_string(r, c, s)?;
                }
                otro => {
                    hoja.write_string(r, c, otro.to_string())?;
                }
            }
        }
    }

    Ok(libro.save_to_buffer()?)
}

fn escribir_encabezados(
    hoja: &mut Worksheet,
    campos: &[Campo],
    formato: &Format,
) -> Result<(), IngestError> {
    for (col, campo) in campos.iter().enumerate() {
        hoja.write_string_with_format(0, col as u16, &campo.nombre, formato)?;
    }
    Ok(())
}

/// Sheet names are capped at 31 chars by the format.
fn titulo_hoja(titulo: &str) -> String {
    titulo.chars().take(31).collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use informes_core::schema::TipoDato;
    use serde_json::json;

    use super::*;
    use crate::lectura::{analizar_excel, leer_registros};

    fn campos() -> Vec<Campo> {
        vec![
            Campo {
                nombre: "numero_factura".to_string(),
                etiqueta: "Numero Factura".to_string(),
                tipo_dato: TipoDato::Texto,
                obligatorio: true,
                descripcion: Some("Identificador de la factura".to_string()),
                ejemplo: Some("F-001".to_string()),
                orden: 0,
                valores_permitidos: Vec::new(),
                validacion_regex: None,
            },
            Campo {
                nombre: "monto".to_string(),
                etiqueta: "Monto".to_string(),
                tipo_dato: TipoDato::Decimal,
                obligatorio: false,
                descripcion: None,
                ejemplo: Some("150.50".to_string()),
                orden: 1,
                valores_permitidos: Vec::new(),
                validacion_regex: None,
            },
        ]
    }

    #[test]
    fn plantilla_tiene_tres_hojas_legibles() {
        let bytes = generar_plantilla(
            "Facturas",
            Some("Facturación diaria"),
            Some("Ventas de la sede principal"),
            &campos(),
        )
        .unwrap();

        // The Datos sheet round-trips through the analyzer: headers are
        // the technical nombres, the Ejemplo sheet provides a data row.
        let analisis = analizar_excel(&bytes).unwrap();
        assert_eq!(analisis.total_columnas, 2);
        assert_eq!(analisis.campos[0].nombre, "numero_factura");
    }

    #[test]
    fn plantilla_rellenada_se_reingesta() {
        // Simulate a user filling the template: write data rows under the
        // generated headers.
        let mut libro = Workbook::new();
        let hoja = libro.add_worksheet();
        hoja.set_name("Datos").unwrap();
        hoja.write_string(0, 0, "numero_factura").unwrap();
        hoja.write_string(0, 1, "monto").unwrap();
        hoja.write_string(1, 0, "F-001").unwrap();
        hoja.write_number(1, 1, 150.5).unwrap();
        let bytes = libro.save_to_buffer().unwrap();

        let registros = leer_registros(&bytes, &campos()).unwrap();
        assert_eq!(registros.len(), 1);
        assert_eq!(registros[0]["monto"], json!(150.5));
    }

    #[test]
    fn exporta_tabla_con_valores_mixtos() {
        let columnas = vec!["cliente".to_string(), "monto".to_string()];
        let filas = vec![
            vec![json!("ACME"), json!(150.5)],
            vec![json!("Globex"), json!(null)],
        ];
        let bytes = exportar_tabla("Resultados", &columnas, &filas).unwrap();

        let analisis = analizar_excel(&bytes).unwrap();
        assert_eq!(analisis.total_columnas, 2);
        assert_eq!(analisis.filas_muestra, 2);
    }

    #[test]
    fn titulo_largo_se_recorta() {
        assert_eq!(titulo_hoja("x".repeat(40).as_str()).len(), 31);
    }
}
