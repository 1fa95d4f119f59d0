//! Integration tests for the permission matrix: partial upserts never
//! clear unspecified flags, and row removal is distinct from all-false.

use informes_db::models::permiso::{Accion, UpsertPermiso};
use informes_db::repositories::PermisoRepo;
use sqlx::PgPool;

async fn grupo_usuarios(pool: &PgPool) -> i64 {
    sqlx::query_scalar("SELECT id FROM grupos WHERE codigo = 'usuarios'")
        .fetch_one(pool)
        .await
        .unwrap()
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn insert_uses_defaults_for_absent_flags(pool: PgPool) {
    let grupo = grupo_usuarios(&pool).await;
    let permiso =
        PermisoRepo::upsert_parcial(&pool, grupo, "ventas", &UpsertPermiso::default())
            .await
            .unwrap();
    assert!(permiso.puede_ver);
    assert!(!permiso.puede_crear);
    assert!(!permiso.puede_editar);
    assert!(!permiso.puede_eliminar);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn partial_update_preserves_other_flags(pool: PgPool) {
    let grupo = grupo_usuarios(&pool).await;
    PermisoRepo::upsert_parcial(
        &pool,
        grupo,
        "ventas",
        &UpsertPermiso {
            puede_ver: Some(true),
            puede_crear: Some(true),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    // Toggle editar only; ver and crear must survive.
    let permiso = PermisoRepo::upsert_parcial(
        &pool,
        grupo,
        "ventas",
        &UpsertPermiso {
            puede_editar: Some(true),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    assert!(permiso.puede_ver);
    assert!(permiso.puede_crear);
    assert!(permiso.puede_editar);
    assert!(!permiso.puede_eliminar);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn tiene_permiso_checks_single_flag(pool: PgPool) {
    let grupo = grupo_usuarios(&pool).await;
    PermisoRepo::upsert_parcial(
        &pool,
        grupo,
        "ventas",
        &UpsertPermiso {
            puede_crear: Some(true),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    assert!(PermisoRepo::tiene_permiso(&pool, grupo, "ventas", Accion::Ver).await.unwrap());
    assert!(PermisoRepo::tiene_permiso(&pool, grupo, "ventas", Accion::Crear).await.unwrap());
    assert!(!PermisoRepo::tiene_permiso(&pool, grupo, "ventas", Accion::Editar).await.unwrap());
    // No row at all means no permission.
    assert!(!PermisoRepo::tiene_permiso(&pool, grupo, "gastos", Accion::Ver).await.unwrap());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn delete_removes_the_row(pool: PgPool) {
    let grupo = grupo_usuarios(&pool).await;
    PermisoRepo::upsert_parcial(&pool, grupo, "ventas", &UpsertPermiso::default())
        .await
        .unwrap();

    assert!(PermisoRepo::delete(&pool, grupo, "ventas").await.unwrap());
    assert!(!PermisoRepo::delete(&pool, grupo, "ventas").await.unwrap());
    assert!(PermisoRepo::find(&pool, grupo, "ventas").await.unwrap().is_none());
}
