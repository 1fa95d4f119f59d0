//! Shared helpers for HTTP-level integration tests.
//!
//! `build_test_app` mirrors the production router so tests exercise the
//! same middleware stack. Requests go through `tower::ServiceExt::oneshot`.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, Response, StatusCode};
use axum::Router;
use informes_api::auth::jwt::{generate_access_token, JwtConfig};
use informes_api::auth::password::hash_password;
use informes_api::config::ServerConfig;
use informes_api::router::build_app_router;
use informes_api::state::AppState;
use informes_analysis::{LlmClient, LlmConfig};
use informes_core::types::DbId;
use informes_db::repositories::UsuarioRepo;
use sqlx::PgPool;
use tower::ServiceExt;

/// Fixed JWT secret for tests.
const TEST_JWT_SECRET: &str = "integration-test-secret-not-for-production";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        jwt: JwtConfig {
            secret: TEST_JWT_SECRET.to_string(),
            access_token_expiry_mins: 60,
        },
    }
}

/// Build the full application router against the given pool.
///
/// The LLM client carries no API key, so analysis endpoints fail with a
/// structured 503 instead of reaching the network.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let llm = Arc::new(LlmClient::new(LlmConfig {
        api_key: None,
        base_url: "http://localhost:0".to_string(),
        chat_model: "test".to_string(),
        embedding_model: "test".to_string(),
    }));

    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        llm,
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Users and tokens
// ---------------------------------------------------------------------------

/// Create a user in the given group and return `(user_id, access_token)`.
pub async fn crear_usuario(pool: &PgPool, username: &str, grupo_codigo: &str) -> (DbId, String) {
    let grupo_id: DbId = sqlx::query_scalar("SELECT id FROM grupos WHERE codigo = $1")
        .bind(grupo_codigo)
        .fetch_one(pool)
        .await
        .expect("seed group should exist");

    let hash = hash_password("password_de_prueba").expect("hashing should succeed");
    let usuario = UsuarioRepo::create(pool, username, &hash, username, grupo_id)
        .await
        .expect("user creation should succeed");

    let token = generate_access_token(usuario.id, username, grupo_codigo, &test_config().jwt)
        .expect("token generation should succeed");
    (usuario.id, token)
}

/// Shorthand: create an admin user and return its token.
pub async fn token_admin(pool: &PgPool) -> String {
    crear_usuario(pool, "admin_test", "admin").await.1
}

/// Shorthand: create a regular user and return `(grupo_id, token)`.
pub async fn usuario_regular(pool: &PgPool, username: &str) -> (DbId, String) {
    let (user_id, token) = crear_usuario(pool, username, "usuarios").await;
    let grupo_id: DbId = sqlx::query_scalar("SELECT grupo_id FROM usuarios WHERE id = $1")
        .bind(user_id)
        .fetch_one(pool)
        .await
        .expect("user should exist");
    (grupo_id, token)
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Insert a report definition with two fields: `nombre` (obligatory text)
/// and `cantidad` (number).
pub async fn crear_reporte(pool: &PgPool, codigo: &str) -> informes_db::models::reporte::Reporte {
    let input: informes_db::models::reporte::CreateReporte =
        serde_json::from_value(serde_json::json!({
            "codigo": codigo,
            "nombre": format!("Reporte {codigo}"),
            "descripcion": "reporte de prueba",
            "campos": [
                { "nombre": "nombre", "etiqueta": "Nombre", "tipo_dato": "texto", "obligatorio": true, "orden": 1 },
                { "nombre": "cantidad", "etiqueta": "Cantidad", "tipo_dato": "numero", "orden": 2 }
            ]
        }))
        .expect("fixture should deserialize");
    informes_db::repositories::ReporteRepo::create(pool, &input, Some("tests"))
        .await
        .expect("report creation should succeed")
}

/// Grant permissions on a report to a group.
pub async fn conceder_permiso(
    pool: &PgPool,
    grupo_id: DbId,
    reporte_codigo: &str,
    ver: bool,
    crear: bool,
) {
    let dto = informes_db::models::permiso::UpsertPermiso {
        puede_ver: Some(ver),
        puede_crear: Some(crear),
        puede_editar: None,
        puede_eliminar: None,
    };
    informes_db::repositories::PermisoRepo::upsert_parcial(pool, grupo_id, reporte_codigo, &dto)
        .await
        .expect("permission grant should succeed");
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("request should build");
    app.oneshot(request).await.expect("request should succeed")
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::builder()
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .expect("request should build");
    app.oneshot(request).await.expect("request should succeed")
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request should build");
    app.oneshot(request).await.expect("request should succeed")
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::from(body.to_string()))
        .expect("request should build");
    app.oneshot(request).await.expect("request should succeed")
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    let request = Request::builder()
        .method("PUT")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::from(body.to_string()))
        .expect("request should build");
    app.oneshot(request).await.expect("request should succeed")
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::builder()
        .method("DELETE")
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .expect("request should build");
    app.oneshot(request).await.expect("request should succeed")
}

/// POST a multipart body with a single `.xlsx` file field (plus optional
/// extra text fields).
pub async fn post_multipart_auth(
    app: Router,
    uri: &str,
    token: &str,
    campos_texto: &[(&str, &str)],
    archivo: Option<(&str, &[u8])>,
) -> Response<Body> {
    let boundary = "test-boundary-7MA4YWxkTrZu0gW";
    let mut cuerpo: Vec<u8> = Vec::new();

    for (nombre, valor) in campos_texto {
        cuerpo.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
        cuerpo.extend_from_slice(
            format!("Content-Disposition: form-data; name=\"{nombre}\"\r\n\r\n").as_bytes(),
        );
        cuerpo.extend_from_slice(valor.as_bytes());
        cuerpo.extend_from_slice(b"\r\n");
    }
    if let Some((filename, bytes)) = archivo {
        cuerpo.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
        cuerpo.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\n\
                 Content-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        cuerpo.extend_from_slice(bytes);
        cuerpo.extend_from_slice(b"\r\n");
    }
    cuerpo.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());

    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={boundary}"),
        )
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::from(cuerpo))
        .expect("request should build");
    app.oneshot(request).await.expect("request should succeed")
}

/// Collect a response body as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = http_body_util::BodyExt::collect(response.into_body())
        .await
        .expect("body should collect")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body should be JSON")
}

/// Collect a response body as raw bytes.
pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    http_body_util::BodyExt::collect(response.into_body())
        .await
        .expect("body should collect")
        .to_bytes()
        .to_vec()
}

/// Assert a response carries the standard error envelope with the given code.
pub async fn assert_error_code(response: Response<Body>, status: StatusCode, code: &str) {
    assert_eq!(response.status(), status);
    let json = body_json(response).await;
    assert_eq!(json["code"], code, "unexpected error code: {json}");
    assert!(json["error"].is_string(), "error message must be present");
}
