use slotboard_db::repositories::quote_request_repo::REFERENCE_CONSTRAINT;
use slotboard_db::repositories::ListingRepo;
use sqlx::PgPool;

/// Connect, migrate, answer a health check.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_full_bootstrap(pool: PgPool) {
    slotboard_db::health_check(&pool).await.unwrap();
}

/// All `id` columns must be bigint.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_all_pks_are_bigint(pool: PgPool) {
    let rows: Vec<(String, String)> = sqlx::query_as(
        "SELECT table_name, data_type
         FROM information_schema.columns
         WHERE column_name = 'id'
           AND table_schema = 'public'
           AND table_name != '_sqlx_migrations'
         ORDER BY table_name",
    )
    .fetch_all(&pool)
    .await
    .unwrap();

    assert_eq!(rows.len(), 3);
    for (table, data_type) in &rows {
        assert_eq!(data_type, "bigint", "Table {table}.id should be bigint");
    }
}

/// The load-bearing unique constraints exist under their `uq_` names.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_unique_constraints_exist(pool: PgPool) {
    for (table, constraint) in [
        ("claims", "uq_claims_listing_fingerprint"),
        ("quote_requests", REFERENCE_CONSTRAINT),
    ] {
        let found: Option<(String,)> = sqlx::query_as(
            "SELECT constraint_type
             FROM information_schema.table_constraints
             WHERE table_schema = 'public'
               AND table_name = $1
               AND constraint_name = $2",
        )
        .bind(table)
        .bind(constraint)
        .fetch_optional(&pool)
        .await
        .unwrap();

        let (kind,) = found.unwrap_or_else(|| panic!("{table} is missing {constraint}"));
        assert_eq!(kind, "UNIQUE");
    }
}

/// A raw duplicate insert is rejected by the store itself.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_duplicate_claim_rejected_by_store(pool: PgPool) {
    let listing = ListingRepo::create(&pool, "Fix a fence", "standard", 3)
        .await
        .unwrap();

    let insert = "INSERT INTO claims (listing_id, respondent_fingerprint) VALUES ($1, $2)";
    sqlx::query(insert)
        .bind(listing.id)
        .bind("alice")
        .execute(&pool)
        .await
        .unwrap();
    let err = sqlx::query(insert)
        .bind(listing.id)
        .bind("alice")
        .execute(&pool)
        .await
        .unwrap_err();

    assert!(slotboard_db::is_unique_violation(&err, "uq_claims_listing_fingerprint"));
    assert!(!slotboard_db::is_unique_violation(&err, REFERENCE_CONSTRAINT));
}

/// `consumed` can never exceed `capacity`, whatever the writer.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_consumed_bounded_by_capacity(pool: PgPool) {
    let listing = ListingRepo::create(&pool, "Fix a fence", "standard", 1)
        .await
        .unwrap();

    let result = sqlx::query("UPDATE listings SET consumed = 2 WHERE id = $1")
        .bind(listing.id)
        .execute(&pool)
        .await;
    assert!(result.is_err(), "check constraint should reject over-capacity counter");
}
