//! Integration tests for report definition CRUD and visibility.

mod common;

use axum::http::StatusCode;
use common::*;
use serde_json::json;
use sqlx::PgPool;

fn definicion(codigo: &str) -> serde_json::Value {
    json!({
        "codigo": codigo,
        "nombre": "Ventas Mensuales",
        "descripcion": "ventas por sucursal",
        "campos": [
            { "nombre": "sucursal", "etiqueta": "Sucursal", "tipo_dato": "texto", "obligatorio": true },
            { "nombre": "total", "etiqueta": "Total", "tipo_dato": "decimal" }
        ]
    })
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn crear_y_obtener_reporte(pool: PgPool) {
    let token = token_admin(&pool).await;
    let app = build_test_app(pool);

    let response = post_json_auth(
        app.clone(),
        "/api/admin/reportes",
        &token,
        definicion("ventas"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let creado = body_json(response).await;
    assert_eq!(creado["codigo"], "ventas");
    assert_eq!(creado["activo"], true);
    assert_eq!(creado["created_by"], "admin_test");

    let response = get_auth(app, "/api/admin/reportes/ventas", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["campos"][0]["nombre"], "sucursal");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn codigo_invalido_da_400(pool: PgPool) {
    let token = token_admin(&pool).await;
    let app = build_test_app(pool);

    let response = post_json_auth(
        app,
        "/api/admin/reportes",
        &token,
        definicion("Ventas Mensuales!"),
    )
    .await;
    assert_error_code(response, StatusCode::BAD_REQUEST, "VALIDATION_ERROR").await;
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn codigo_duplicado_da_409(pool: PgPool) {
    let token = token_admin(&pool).await;
    let app = build_test_app(pool);

    let primero =
        post_json_auth(app.clone(), "/api/admin/reportes", &token, definicion("ventas")).await;
    assert_eq!(primero.status(), StatusCode::CREATED);

    let segundo = post_json_auth(app, "/api/admin/reportes", &token, definicion("ventas")).await;
    assert_error_code(segundo, StatusCode::CONFLICT, "CONFLICT").await;
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn campos_sin_entradas_da_400(pool: PgPool) {
    let token = token_admin(&pool).await;
    let app = build_test_app(pool);

    let response = post_json_auth(
        app,
        "/api/admin/reportes",
        &token,
        json!({ "codigo": "vacio", "nombre": "Vacío", "campos": [] }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn actualizar_conserva_campos_ausentes(pool: PgPool) {
    crear_reporte(&pool, "ventas").await;
    let token = token_admin(&pool).await;
    let app = build_test_app(pool);

    let response = put_json_auth(
        app.clone(),
        "/api/admin/reportes/ventas",
        &token,
        json!({ "nombre": "Ventas v2" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["nombre"], "Ventas v2");
    // Fields not in the request keep their stored value.
    assert_eq!(body["descripcion"], "reporte de prueba");
    assert_eq!(body["campos"].as_array().map(Vec::len), Some(2));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn actualizar_inexistente_da_404(pool: PgPool) {
    let token = token_admin(&pool).await;
    let app = build_test_app(pool);

    let response = put_json_auth(
        app,
        "/api/admin/reportes/fantasma",
        &token,
        json!({ "nombre": "x" }),
    )
    .await;
    assert_error_code(response, StatusCode::NOT_FOUND, "NOT_FOUND").await;
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn borrado_logico_oculta_de_disponibles(pool: PgPool) {
    crear_reporte(&pool, "ventas").await;
    let (grupo_id, token_usuario) = usuario_regular(&pool, "maria").await;
    conceder_permiso(&pool, grupo_id, "ventas", true, false).await;
    let token = token_admin(&pool).await;
    let app = build_test_app(pool.clone());

    let antes = get_auth(app.clone(), "/api/reportes/disponibles", &token_usuario).await;
    assert_eq!(body_json(antes).await.as_array().map(Vec::len), Some(1));

    let borrado = delete_auth(app.clone(), "/api/admin/reportes/ventas", &token).await;
    assert_eq!(borrado.status(), StatusCode::NO_CONTENT);

    let despues = get_auth(app.clone(), "/api/reportes/disponibles", &token_usuario).await;
    assert_eq!(body_json(despues).await.as_array().map(Vec::len), Some(0));

    // The definition and its data survive; only the flag flips.
    let activo: bool = sqlx::query_scalar("SELECT activo FROM reportes_config WHERE codigo = 'ventas'")
        .fetch_one(&pool)
        .await
        .expect("row should remain");
    assert!(!activo);

    // Admin listing still shows it.
    let admin_list = get_auth(app, "/api/admin/reportes", &token).await;
    assert_eq!(body_json(admin_list).await.as_array().map(Vec::len), Some(1));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn borrar_inexistente_da_404(pool: PgPool) {
    let token = token_admin(&pool).await;
    let app = build_test_app(pool);

    let response = delete_auth(app, "/api/admin/reportes/fantasma", &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn reporte_inactivo_invisible_para_usuario_normal(pool: PgPool) {
    crear_reporte(&pool, "ventas").await;
    let (grupo_id, token_usuario) = usuario_regular(&pool, "maria").await;
    conceder_permiso(&pool, grupo_id, "ventas", true, false).await;
    sqlx::query("UPDATE reportes_config SET activo = FALSE WHERE codigo = 'ventas'")
        .execute(&pool)
        .await
        .expect("update should succeed");
    let app = build_test_app(pool);

    let response = get_auth(app, "/api/reportes/ventas/datos", &token_usuario).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn plantilla_descargable(pool: PgPool) {
    crear_reporte(&pool, "ventas").await;
    let (grupo_id, token) = usuario_regular(&pool, "maria").await;
    conceder_permiso(&pool, grupo_id, "ventas", true, false).await;
    let app = build_test_app(pool);

    let response = get_auth(app, "/api/reportes/ventas/descargar", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok()),
        Some("application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"),
    );
    let bytes = body_bytes(response).await;
    // xlsx files are zip archives.
    assert_eq!(&bytes[..2], b"PK");
}
