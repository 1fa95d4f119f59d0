//! Integration tests for workbook upload and webhook ingestion.

mod common;

use axum::http::StatusCode;
use common::*;
use rust_xlsxwriter::Workbook;
use serde_json::json;
use sqlx::PgPool;

/// Build an in-memory workbook for the `crear_reporte` fixture schema.
fn libro_de_prueba(filas: &[(&str, f64)]) -> Vec<u8> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.write(0, 0, "nombre").unwrap();
    worksheet.write(0, 1, "cantidad").unwrap();
    for (i, (nombre, cantidad)) in filas.iter().enumerate() {
        let fila = (i + 1) as u32;
        worksheet.write(fila, 0, *nombre).unwrap();
        worksheet.write(fila, 1, *cantidad).unwrap();
    }
    workbook.save_to_buffer().unwrap()
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn upload_inserta_filas_y_registra_carga(pool: PgPool) {
    crear_reporte(&pool, "ventas").await;
    let (grupo_id, token) = usuario_regular(&pool, "maria").await;
    conceder_permiso(&pool, grupo_id, "ventas", true, true).await;
    let app = build_test_app(pool.clone());

    let bytes = libro_de_prueba(&[("Ana", 5.0), ("Luis", 3.0)]);
    let response = post_multipart_auth(
        app.clone(),
        "/api/reportes/ventas/upload",
        &token,
        &[],
        Some(("ventas.xlsx", &bytes)),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["insertados"], 2);
    assert_eq!(body["errores"], 0);

    let (estado, usuario): (String, String) = sqlx::query_as(
        "SELECT estado, usuario FROM cargas_log WHERE reporte_codigo = 'ventas'",
    )
    .fetch_one(&pool)
    .await
    .expect("load log row should exist");
    assert_eq!(estado, "completado");
    assert_eq!(usuario, "maria");

    // Stats reflect the load.
    let stats = get_auth(app, "/api/reportes/ventas/estadisticas", &token).await;
    assert_eq!(body_json(stats).await["total_registros"], 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn upload_rechaza_extension_no_xlsx(pool: PgPool) {
    crear_reporte(&pool, "ventas").await;
    let (grupo_id, token) = usuario_regular(&pool, "maria").await;
    conceder_permiso(&pool, grupo_id, "ventas", true, true).await;
    let app = build_test_app(pool);

    let response = post_multipart_auth(
        app,
        "/api/reportes/ventas/upload",
        &token,
        &[],
        Some(("datos.csv", b"nombre,cantidad\nAna,5")),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn upload_general_resuelve_reporte_por_campo(pool: PgPool) {
    crear_reporte(&pool, "ventas").await;
    let (grupo_id, token) = usuario_regular(&pool, "maria").await;
    conceder_permiso(&pool, grupo_id, "ventas", true, true).await;
    let app = build_test_app(pool);

    let bytes = libro_de_prueba(&[("Ana", 5.0)]);
    let response = post_multipart_auth(
        app,
        "/upload",
        &token,
        &[("reporte", "ventas")],
        Some(("ventas.xlsx", &bytes)),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["reporte"], "ventas");
    assert_eq!(body["insertados"], 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn webhook_inserta_sin_autenticacion(pool: PgPool) {
    crear_reporte(&pool, "ventas").await;
    let app = build_test_app(pool.clone());

    let response = post_json(
        app,
        "/webhook/upload/ventas",
        json!({ "datos": [
            { "nombre": "Ana", "cantidad": 5 },
            { "nombre": "Luis", "cantidad": 3 }
        ]}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["insertados"], 2);
    assert_eq!(body["errores"], 0);

    let usuario: String =
        sqlx::query_scalar("SELECT usuario FROM cargas_log WHERE reporte_codigo = 'ventas'")
            .fetch_one(&pool)
            .await
            .expect("load log row should exist");
    assert_eq!(usuario, "webhook");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn webhook_cuenta_filas_invalidas(pool: PgPool) {
    crear_reporte(&pool, "ventas").await;
    let app = build_test_app(pool.clone());

    // Second row is missing the obligatory `nombre`.
    let response = post_json(
        app,
        "/webhook/upload/ventas",
        json!({ "datos": [
            { "nombre": "Ana", "cantidad": 5 },
            { "cantidad": 9 }
        ]}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["insertados"], 1);
    assert_eq!(body["errores"], 1);
    assert!(!body["mensajes"].as_array().unwrap().is_empty());

    let estado: String =
        sqlx::query_scalar("SELECT estado FROM cargas_log WHERE reporte_codigo = 'ventas'")
            .fetch_one(&pool)
            .await
            .expect("load log row should exist");
    assert_eq!(estado, "completado_con_errores");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn webhook_sin_datos_da_400(pool: PgPool) {
    crear_reporte(&pool, "ventas").await;
    let app = build_test_app(pool);

    let response = post_json(app, "/webhook/upload/ventas", json!({ "datos": [] })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn webhook_reporte_inactivo_da_404(pool: PgPool) {
    crear_reporte(&pool, "ventas").await;
    sqlx::query("UPDATE reportes_config SET activo = FALSE WHERE codigo = 'ventas'")
        .execute(&pool)
        .await
        .expect("update should succeed");
    let app = build_test_app(pool);

    let response = post_json(
        app,
        "/webhook/upload/ventas",
        json!({ "datos": [{ "nombre": "Ana" }] }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn webhook_reporte_desconocido_da_404(pool: PgPool) {
    let app = build_test_app(pool);

    let response = post_json(
        app,
        "/webhook/upload/fantasma",
        json!({ "datos": [{ "nombre": "Ana" }] }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn analizar_excel_propone_campos(pool: PgPool) {
    let token = token_admin(&pool).await;
    let app = build_test_app(pool);

    let bytes = libro_de_prueba(&[("Ana", 5.0), ("Luis", 3.0)]);
    let response = post_multipart_auth(
        app,
        "/api/admin/analizar-excel",
        &token,
        &[],
        Some(("muestra.xlsx", &bytes)),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let campos = body["campos"].as_array().expect("campos should be a list");
    assert_eq!(campos.len(), 2);
    assert_eq!(campos[0]["nombre"], "nombre");
    assert_eq!(campos[1]["nombre"], "cantidad");
    assert_eq!(campos[1]["tipo_dato"], "numero");
}
