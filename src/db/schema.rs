//! Relational schema for the plant knowledge base
//!
//! One plant row per canonical entity, with requirement, soil type,
//! growth stage, interaction, seasonality, pest, disease and nutrient
//! relations hanging off it. All creation is `IF NOT EXISTS` and safe to
//! run repeatedly.

use crate::Result;
use sqlx::SqlitePool;

/// Tables in child-first order, used when clearing the store.
pub const TABLES_CHILD_FIRST: [&str; 9] = [
    "plant_requirements",
    "plant_soil_types",
    "plant_growth_stages",
    "plant_interactions",
    "plant_seasonality",
    "plant_pests",
    "plant_diseases",
    "plant_nutrients",
    "plants",
];

/// Create the full schema if it does not exist yet.
pub async fn create_all_tables(pool: &SqlitePool) -> Result<()> {
    create_plants_table(pool).await?;
    create_requirements_table(pool).await?;
    create_soil_types_table(pool).await?;
    create_growth_stages_table(pool).await?;
    create_interactions_table(pool).await?;
    create_seasonality_table(pool).await?;
    create_name_set_table(pool, "plant_pests").await?;
    create_name_set_table(pool, "plant_diseases").await?;
    create_name_set_table(pool, "plant_nutrients").await?;
    Ok(())
}

async fn create_plants_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS plants (
            plant_id TEXT PRIMARY KEY,
            common_name TEXT NOT NULL,
            scientific_name TEXT,
            family TEXT,
            plant_type TEXT,
            life_cycle TEXT,
            notes TEXT NOT NULL DEFAULT ''
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_plants_family ON plants(family)")
        .execute(pool)
        .await?;

    Ok(())
}

async fn create_requirements_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS plant_requirements (
            plant_id TEXT PRIMARY KEY REFERENCES plants(plant_id) ON DELETE CASCADE,
            sunlight TEXT,
            water_requirements TEXT,
            soil_ph TEXT
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_soil_types_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS plant_soil_types (
            plant_id TEXT NOT NULL REFERENCES plants(plant_id) ON DELETE CASCADE,
            soil_type TEXT NOT NULL,
            PRIMARY KEY (plant_id, soil_type)
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_growth_stages_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS plant_growth_stages (
            plant_id TEXT NOT NULL REFERENCES plants(plant_id) ON DELETE CASCADE,
            stage_order INTEGER NOT NULL,
            name TEXT NOT NULL,
            duration_days INTEGER,
            water_interval_days INTEGER,
            PRIMARY KEY (plant_id, stage_order),
            CHECK (stage_order >= 0),
            CHECK (duration_days IS NULL OR duration_days > 0),
            CHECK (water_interval_days IS NULL OR water_interval_days > 0)
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_interactions_table(pool: &SqlitePool) -> Result<()> {
    // Canonical pair ordering: plant_a <= plant_b, so reciprocal
    // declarations collapse to one row
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS plant_interactions (
            plant_a TEXT NOT NULL REFERENCES plants(plant_id) ON DELETE CASCADE,
            plant_b TEXT NOT NULL REFERENCES plants(plant_id) ON DELETE CASCADE,
            type TEXT NOT NULL CHECK (type IN ('companion', 'incompatible')),
            PRIMARY KEY (plant_a, plant_b, type),
            CHECK (plant_a <= plant_b)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_interactions_b ON plant_interactions(plant_b)")
        .execute(pool)
        .await?;

    Ok(())
}

async fn create_seasonality_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS plant_seasonality (
            plant_id TEXT NOT NULL REFERENCES plants(plant_id) ON DELETE CASCADE,
            activity TEXT NOT NULL CHECK (activity IN ('sowing', 'harvest')),
            start_month INTEGER NOT NULL CHECK (start_month BETWEEN 1 AND 12),
            end_month INTEGER NOT NULL CHECK (end_month BETWEEN 1 AND 12)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_seasonality_plant ON plant_seasonality(plant_id, activity)",
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// The pest, disease and nutrient relations share one shape: an
/// unordered set of names per plant.
async fn create_name_set_table(pool: &SqlitePool, table: &str) -> Result<()> {
    let ddl = format!(
        r#"
        CREATE TABLE IF NOT EXISTS {table} (
            plant_id TEXT NOT NULL REFERENCES plants(plant_id) ON DELETE CASCADE,
            name TEXT NOT NULL,
            PRIMARY KEY (plant_id, name)
        )
        "#
    );
    sqlx::query(&ddl).execute(pool).await?;

    Ok(())
}
