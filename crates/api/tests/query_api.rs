//! Integration tests for raw queries, exports and the AI endpoint gates.

mod common;

use axum::http::StatusCode;
use common::*;
use serde_json::json;
use sqlx::PgPool;

async fn sembrar_datos(pool: &PgPool) {
    crear_reporte(pool, "ventas").await;
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
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn consultar_devuelve_los_datos(pool: PgPool) {
    sembrar_datos(&pool).await;
    let (grupo_id, token) = usuario_regular(&pool, "maria").await;
    conceder_permiso(&pool, grupo_id, "ventas", true, false).await;
    let app = build_test_app(pool);

    let response = get_auth(app, "/api/query/ventas", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["total"], 2);
    let registros = body["registros"].as_array().expect("registros list");
    assert!(registros.iter().any(|r| r["nombre"] == "Ana"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn consultar_sin_permiso_da_403(pool: PgPool) {
    sembrar_datos(&pool).await;
    let (_, token) = usuario_regular(&pool, "maria").await;
    let app = build_test_app(pool);

    let response = get_auth(app, "/api/query/ventas", &token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn exportar_devuelve_un_libro(pool: PgPool) {
    sembrar_datos(&pool).await;
    let (grupo_id, token) = usuario_regular(&pool, "maria").await;
    conceder_permiso(&pool, grupo_id, "ventas", true, false).await;
    let app = build_test_app(pool);

    let response = get_auth(app, "/api/query/ventas/export", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok()),
        Some("application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"),
    );
    assert!(response
        .headers()
        .get("content-disposition")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.contains("consulta_ventas.xlsx")));
    let bytes = body_bytes(response).await;
    assert_eq!(&bytes[..2], b"PK");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn datos_pagina_el_listado(pool: PgPool) {
    sembrar_datos(&pool).await;
    let token = token_admin(&pool).await;
    let app = build_test_app(pool);

    let response = get_auth(app, "/api/reportes/ventas/datos?limite=1", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["total"], 2);
    assert_eq!(body["registros"].as_array().map(Vec::len), Some(1));
}

// ---- AI endpoints without a configured key ----

#[sqlx::test(migrations = "../../db/migrations")]
async fn pregunta_sin_llm_da_503(pool: PgPool) {
    sembrar_datos(&pool).await;
    let token = token_admin(&pool).await;
    let app = build_test_app(pool);

    let response = post_json_auth(
        app,
        "/api/analysis/ventas/pregunta",
        &token,
        json!({ "pregunta": "¿cuántas unidades vendió Ana?" }),
    )
    .await;
    assert_error_code(response, StatusCode::SERVICE_UNAVAILABLE, "AI_UNAVAILABLE").await;
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn pregunta_de_exportacion_no_necesita_llm(pool: PgPool) {
    sembrar_datos(&pool).await;
    let token = token_admin(&pool).await;
    let app = build_test_app(pool);

    // Export intents bypass the model entirely.
    let response = post_json_auth(
        app,
        "/api/analysis/ventas/pregunta",
        &token,
        json!({ "pregunta": "exporta los datos a excel" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok()),
        Some("application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"),
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn buscar_sin_llm_da_503(pool: PgPool) {
    sembrar_datos(&pool).await;
    let token = token_admin(&pool).await;
    let app = build_test_app(pool);

    let response = get_auth(app, "/api/analysis/ventas/buscar?q=ana", &token).await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn indexar_sin_llm_da_503(pool: PgPool) {
    sembrar_datos(&pool).await;
    let token = token_admin(&pool).await;
    let app = build_test_app(pool);

    let response = post_json_auth(app, "/api/analysis/ventas/indexar", &token, json!({})).await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn informe_sin_llm_da_503(pool: PgPool) {
    sembrar_datos(&pool).await;
    let token = token_admin(&pool).await;
    let app = build_test_app(pool);

    let response = post_json_auth(app, "/api/analysis/ventas/informe", &token, json!({})).await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}
