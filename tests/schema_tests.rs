//! Schema validation: table presence, key constraints, and the CHECKs
//! that back the store's invariants.

use anyhow::Result;
use sqlx::SqlitePool;

async fn table_names(pool: &SqlitePool) -> Result<Vec<String>> {
    let tables = sqlx::query_scalar::<_, String>(
        "SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
    )
    .fetch_all(pool)
    .await?;
    Ok(tables)
}

#[tokio::test]
async fn all_relation_tables_exist() -> Result<()> {
    let pool = plantbase::db::open_memory_store().await?;
    let tables = table_names(&pool).await?;

    for expected in [
        "plants",
        "plant_requirements",
        "plant_soil_types",
        "plant_growth_stages",
        "plant_interactions",
        "plant_seasonality",
        "plant_pests",
        "plant_diseases",
        "plant_nutrients",
    ] {
        assert!(
            tables.iter().any(|t| t == expected),
            "missing table '{}'",
            expected
        );
    }

    Ok(())
}

#[tokio::test]
async fn schema_creation_is_idempotent() -> Result<()> {
    let pool = plantbase::db::open_memory_store().await?;
    plantbase::db::schema::create_all_tables(&pool).await?;
    plantbase::db::schema::create_all_tables(&pool).await?;
    Ok(())
}

#[tokio::test]
async fn foreign_keys_reject_orphan_relations() -> Result<()> {
    let pool = plantbase::db::open_memory_store().await?;

    let result = sqlx::query(
        "INSERT INTO plant_requirements (plant_id, sunlight) VALUES ('ghost', 'full sun')",
    )
    .execute(&pool)
    .await;
    assert!(result.is_err(), "orphan requirement row must be rejected");

    Ok(())
}

#[tokio::test]
async fn interaction_checks_enforce_canonical_ordering() -> Result<()> {
    let pool = plantbase::db::open_memory_store().await?;
    for id in ["basil", "tomato"] {
        sqlx::query("INSERT INTO plants (plant_id, common_name) VALUES (?, ?)")
            .bind(id)
            .bind(id)
            .execute(&pool)
            .await?;
    }

    // Reversed pair violates the plant_a <= plant_b CHECK
    let reversed = sqlx::query(
        "INSERT INTO plant_interactions (plant_a, plant_b, type) VALUES ('tomato', 'basil', 'companion')",
    )
    .execute(&pool)
    .await;
    assert!(reversed.is_err());

    sqlx::query(
        "INSERT INTO plant_interactions (plant_a, plant_b, type) VALUES ('basil', 'tomato', 'companion')",
    )
    .execute(&pool)
    .await?;

    // Unknown interaction type is rejected
    let bad_type = sqlx::query(
        "INSERT INTO plant_interactions (plant_a, plant_b, type) VALUES ('basil', 'tomato', 'friendly')",
    )
    .execute(&pool)
    .await;
    assert!(bad_type.is_err());

    Ok(())
}

#[tokio::test]
async fn seasonality_checks_enforce_month_range_and_activity() -> Result<()> {
    let pool = plantbase::db::open_memory_store().await?;
    sqlx::query("INSERT INTO plants (plant_id, common_name) VALUES ('pea', 'Pea')")
        .execute(&pool)
        .await?;

    let bad_month = sqlx::query(
        "INSERT INTO plant_seasonality (plant_id, activity, start_month, end_month) VALUES ('pea', 'sowing', 13, 2)",
    )
    .execute(&pool)
    .await;
    assert!(bad_month.is_err());

    let bad_activity = sqlx::query(
        "INSERT INTO plant_seasonality (plant_id, activity, start_month, end_month) VALUES ('pea', 'pruning', 3, 5)",
    )
    .execute(&pool)
    .await;
    assert!(bad_activity.is_err());

    // Wrap-around windows (start > end) are legal
    sqlx::query(
        "INSERT INTO plant_seasonality (plant_id, activity, start_month, end_month) VALUES ('pea', 'sowing', 11, 2)",
    )
    .execute(&pool)
    .await?;

    Ok(())
}

#[tokio::test]
async fn soil_type_primary_key_deduplicates() -> Result<()> {
    let pool = plantbase::db::open_memory_store().await?;
    sqlx::query("INSERT INTO plants (plant_id, common_name) VALUES ('pea', 'Pea')")
        .execute(&pool)
        .await?;

    for _ in 0..2 {
        sqlx::query("INSERT OR IGNORE INTO plant_soil_types (plant_id, soil_type) VALUES ('pea', 'loam')")
            .execute(&pool)
            .await?;
    }

    let rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM plant_soil_types")
        .fetch_one(&pool)
        .await?;
    assert_eq!(rows, 1);

    Ok(())
}
