use sqlx::PgPool;

/// Full bootstrap test: connect, migrate, verify schema and seeds.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_full_bootstrap(pool: PgPool) {
    informes_db::health_check(&pool).await.unwrap();

    let tables = [
        "reportes_config",
        "datos_reportes",
        "cargas_log",
        "grupos",
        "usuarios",
        "grupos_reportes",
        "campo_aclaraciones",
        "notificaciones_admin",
        "ia_conocimiento",
        "registro_indices",
    ];

    for table in tables {
        sqlx::query(&format!("SELECT 1 FROM {table} LIMIT 1"))
            .fetch_optional(&pool)
            .await
            .unwrap_or_else(|e| panic!("{table} query failed: {e}"));
    }
}

/// The default groups are seeded by the migrations.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_default_groups_seeded(pool: PgPool) {
    let codigos: Vec<(String,)> = sqlx::query_as("SELECT codigo FROM grupos ORDER BY codigo")
        .fetch_all(&pool)
        .await
        .unwrap();
    let codigos: Vec<&str> = codigos.iter().map(|(c,)| c.as_str()).collect();
    assert_eq!(codigos, vec!["admin", "usuarios"]);
}
