use sqlx::PgPool;

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_health_check_and_schema(pool: PgPool) {
    ezemailer_db::health_check(&pool).await.unwrap();

    for table in ["users", "user_sessions", "templates", "subscriptions"] {
        let count: (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(&pool)
            .await
            .unwrap_or_else(|e| panic!("{table} query failed: {e}"));
        assert_eq!(count.0, 0, "{table} should start empty");
    }
}
