//! End-to-end pipeline tests: ingest both documents into a temp store,
//! inspect the normalized relations, and project back out.

use anyhow::Result;
use serde_json::json;
use sqlx::SqlitePool;
use std::path::PathBuf;
use tempfile::TempDir;

use plantbase::pipeline::{self, IngestOutcome};

struct Fixture {
    _dir: TempDir,
    catalog_path: PathBuf,
    kb_path: PathBuf,
    db_path: PathBuf,
}

impl Fixture {
    fn new() -> Result<Self> {
        let dir = TempDir::new()?;
        Ok(Self {
            catalog_path: dir.path().join("catalog.json"),
            kb_path: dir.path().join("plants-kb.json"),
            db_path: dir.path().join("plants.db"),
            _dir: dir,
        })
    }

    fn write_catalog(&self, value: &serde_json::Value) -> Result<()> {
        std::fs::write(&self.catalog_path, serde_json::to_string_pretty(value)?)?;
        Ok(())
    }

    fn write_kb(&self, value: &serde_json::Value) -> Result<()> {
        std::fs::write(&self.kb_path, serde_json::to_string_pretty(value)?)?;
        Ok(())
    }

    async fn ingest(&self) -> Result<IngestOutcome> {
        Ok(pipeline::ingest(&self.catalog_path, &self.kb_path, &self.db_path).await?)
    }

    async fn pool(&self) -> Result<SqlitePool> {
        Ok(plantbase::db::open_store(&self.db_path).await?)
    }
}

async fn count(pool: &SqlitePool, table: &str) -> i64 {
    let sql = format!("SELECT COUNT(*) FROM {table}");
    sqlx::query_scalar::<_, i64>(&sql)
        .fetch_one(pool)
        .await
        .unwrap()
}

fn sample_catalog() -> serde_json::Value {
    json!([
        {
            "id": "tomato",
            "name": "Tomato",
            "scientific_name": "Solanum lycopersicum",
            "family": "Solanaceae",
            "plant_type": "vegetable",
            "life_cycle": "annual",
            "notes": "Stake early.",
            "companions": ["basil"],
            "antagonists": [],
            "seasonality": {
                "sowing": { "start_month": "March", "end_month": "May" }
            },
            "requirements": {
                "sunlight": "full sun",
                "water_requirements": "regular",
                "soil_type": "loam",
                "soil_ph": "6.0-6.8"
            },
            "stages": [
                { "name": "sow", "durationDays": 10, "waterFrequencyDays": 1 },
                { "name": "grow", "durationDays": 60, "waterFrequencyDays": 2 },
                { "name": "harvest", "durationDays": 30, "waterFrequencyDays": 2 }
            ]
        },
        {
            "id": "basil",
            "name": "Basil",
            "plant_type": "herb"
        }
    ])
}

fn sample_kb() -> serde_json::Value {
    json!([
        {
            "plant_id": "tomato",
            "common_name": "Tomato",
            "family": "Nightshades",
            "type": "vegetable",
            "sunlight": "partial shade",
            "soil_type": ["sandy", "loam"],
            "companion_plants": ["basil", "marigold"],
            "incompatible_plants": ["fennel"],
            "common_pests": ["aphids", "hornworm"],
            "common_diseases": ["blight"],
            "nutrient_preferences": ["nitrogen"],
            "seasonality": {
                "sowing": { "start_month": "April", "end_month": "June" },
                "harvest": { "start_month": "July", "end_month": "September" }
            },
            "growth_stage": ["seedling", "mature"]
        },
        {
            "plant_id": "fennel",
            "common_name": "Fennel",
            "type": "herb",
            "incompatible_plants": ["tomato"]
        }
    ])
}

#[tokio::test]
async fn ingest_merges_and_normalizes() -> Result<()> {
    let fx = Fixture::new()?;
    fx.write_catalog(&sample_catalog())?;
    fx.write_kb(&sample_kb())?;

    let outcome = fx.ingest().await?;
    assert_eq!(outcome, IngestOutcome::Replaced { plants: 3 });

    let pool = fx.pool().await?;
    assert_eq!(count(&pool, "plants").await, 3);

    // Catalog wins the family conflict
    let family: Option<String> =
        sqlx::query_scalar("SELECT family FROM plants WHERE plant_id = 'tomato'")
            .fetch_one(&pool)
            .await?;
    assert_eq!(family.as_deref(), Some("Solanaceae"));

    // Catalog sunlight wins over the knowledge base value
    let sunlight: Option<String> =
        sqlx::query_scalar("SELECT sunlight FROM plant_requirements WHERE plant_id = 'tomato'")
            .fetch_one(&pool)
            .await?;
    assert_eq!(sunlight.as_deref(), Some("full sun"));

    // Soil types are the deduplicated union of both sources
    let soils: Vec<String> = sqlx::query_scalar(
        "SELECT soil_type FROM plant_soil_types WHERE plant_id = 'tomato' ORDER BY soil_type",
    )
    .fetch_all(&pool)
    .await?;
    assert_eq!(soils, vec!["loam", "sandy"]);

    pool.close().await;
    Ok(())
}

#[tokio::test]
async fn companion_set_union_collapses_duplicates() -> Result<()> {
    let fx = Fixture::new()?;
    fx.write_catalog(&sample_catalog())?;
    fx.write_kb(&sample_kb())?;
    fx.ingest().await?;

    let pool = fx.pool().await?;

    // "basil" declared by both sources yields a single companion row;
    // "marigold" is not an ingested plant, so its interaction is skipped
    let rows: Vec<(String, String, String)> = sqlx::query_as(
        "SELECT plant_a, plant_b, type FROM plant_interactions ORDER BY type, plant_a, plant_b",
    )
    .fetch_all(&pool)
    .await?;
    assert_eq!(
        rows,
        vec![
            (
                "basil".to_string(),
                "tomato".to_string(),
                "companion".to_string()
            ),
            (
                "fennel".to_string(),
                "tomato".to_string(),
                "incompatible".to_string()
            ),
        ]
    );

    pool.close().await;
    Ok(())
}

#[tokio::test]
async fn reciprocal_declarations_collapse_to_one_row() -> Result<()> {
    let fx = Fixture::new()?;
    fx.write_catalog(&json!([
        { "id": "tomato", "name": "Tomato", "companions": ["basil"] },
        { "id": "basil", "name": "Basil", "companions": ["tomato"] }
    ]))?;
    fx.write_kb(&json!([]))?;
    fx.ingest().await?;

    let pool = fx.pool().await?;
    let rows: Vec<(String, String)> =
        sqlx::query_as("SELECT plant_a, plant_b FROM plant_interactions WHERE type = 'companion'")
            .fetch_all(&pool)
            .await?;
    assert_eq!(rows, vec![("basil".to_string(), "tomato".to_string())]);

    pool.close().await;
    Ok(())
}

#[tokio::test]
async fn growth_stages_keep_merge_order() -> Result<()> {
    let fx = Fixture::new()?;
    fx.write_catalog(&sample_catalog())?;
    fx.write_kb(&sample_kb())?;
    fx.ingest().await?;

    let pool = fx.pool().await?;
    let stages: Vec<(i64, String)> = sqlx::query_as(
        "SELECT stage_order, name FROM plant_growth_stages WHERE plant_id = 'tomato' ORDER BY stage_order",
    )
    .fetch_all(&pool)
    .await?;
    assert_eq!(
        stages,
        vec![
            (0, "sow".to_string()),
            (1, "grow".to_string()),
            (2, "harvest".to_string()),
        ]
    );

    pool.close().await;
    Ok(())
}

#[tokio::test]
async fn ingest_is_idempotent() -> Result<()> {
    let fx = Fixture::new()?;
    fx.write_catalog(&sample_catalog())?;
    fx.write_kb(&sample_kb())?;

    fx.ingest().await?;
    let pool = fx.pool().await?;
    let mut first = Vec::new();
    for table in [
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
        first.push(count(&pool, table).await);
    }
    pool.close().await;

    fx.ingest().await?;
    let pool = fx.pool().await?;
    let mut second = Vec::new();
    for table in [
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
        second.push(count(&pool, table).await);
    }
    pool.close().await;

    assert_eq!(first, second);
    Ok(())
}

#[tokio::test]
async fn reingest_fully_replaces_previous_contents() -> Result<()> {
    let fx = Fixture::new()?;
    fx.write_catalog(&sample_catalog())?;
    fx.write_kb(&sample_kb())?;
    fx.ingest().await?;

    // Second snapshot contains a single plant; nothing from the first
    // run may survive
    fx.write_catalog(&json!([{ "id": "kale", "name": "Kale" }]))?;
    fx.write_kb(&json!([]))?;
    let outcome = fx.ingest().await?;
    assert_eq!(outcome, IngestOutcome::Replaced { plants: 1 });

    let pool = fx.pool().await?;
    assert_eq!(count(&pool, "plants").await, 1);
    assert_eq!(count(&pool, "plant_interactions").await, 0);
    assert_eq!(count(&pool, "plant_pests").await, 0);
    let name: String = sqlx::query_scalar("SELECT common_name FROM plants")
        .fetch_one(&pool)
        .await?;
    assert_eq!(name, "Kale");

    pool.close().await;
    Ok(())
}

#[tokio::test]
async fn ingest_without_documents_is_a_noop() -> Result<()> {
    let fx = Fixture::new()?;

    let outcome = fx.ingest().await?;
    assert_eq!(outcome, IngestOutcome::NothingToDo);
    assert!(!fx.db_path.exists());

    Ok(())
}

#[tokio::test]
async fn malformed_document_leaves_store_untouched() -> Result<()> {
    let fx = Fixture::new()?;
    fx.write_catalog(&sample_catalog())?;
    fx.write_kb(&sample_kb())?;
    fx.ingest().await?;

    std::fs::write(&fx.catalog_path, "{not json")?;
    let err = fx.ingest().await;
    assert!(err.is_err());

    // Previous contents still intact
    let pool = fx.pool().await?;
    assert_eq!(count(&pool, "plants").await, 3);
    pool.close().await;
    Ok(())
}

#[tokio::test]
async fn keyless_records_are_skipped_not_fatal() -> Result<()> {
    let fx = Fixture::new()?;
    fx.write_catalog(&json!([
        { "name": "No id here" },
        { "id": "kale", "name": "Kale" }
    ]))?;
    fx.write_kb(&json!([]))?;

    let outcome = fx.ingest().await?;
    assert_eq!(outcome, IngestOutcome::Replaced { plants: 1 });

    Ok(())
}

#[tokio::test]
async fn unknown_month_window_is_dropped() -> Result<()> {
    let fx = Fixture::new()?;
    fx.write_catalog(&json!([
        {
            "id": "pea",
            "name": "Pea",
            "seasonality": {
                "sowing": { "start_month": "Thermidor", "end_month": "May" },
                "harvest": { "start_month": "June", "end_month": "8" }
            }
        }
    ]))?;
    fx.write_kb(&json!([]))?;
    fx.ingest().await?;

    let pool = fx.pool().await?;
    let rows: Vec<(String, i64, i64)> = sqlx::query_as(
        "SELECT activity, start_month, end_month FROM plant_seasonality WHERE plant_id = 'pea'",
    )
    .fetch_all(&pool)
    .await?;
    // The sowing window had an unrecognized month and is gone; the
    // harvest window's numeric-string month decoded fine
    assert_eq!(rows, vec![("harvest".to_string(), 6, 8)]);

    pool.close().await;
    Ok(())
}

#[tokio::test]
async fn export_round_trips_both_shapes() -> Result<()> {
    let fx = Fixture::new()?;
    fx.write_catalog(&sample_catalog())?;
    fx.write_kb(&sample_kb())?;
    fx.ingest().await?;

    let catalog_out = fx.db_path.parent().unwrap().join("catalog-out.json");
    let kb_out = fx.db_path.parent().unwrap().join("kb-out.json");
    pipeline::export(&fx.db_path, &catalog_out, &kb_out).await?;

    let catalog: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&catalog_out)?)?;
    let kb: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&kb_out)?)?;

    let tomato = catalog
        .as_array()
        .unwrap()
        .iter()
        .find(|p| p["id"] == "tomato")
        .unwrap();

    // Catalog precedence held through the round trip
    assert_eq!(tomato["requirements"]["sunlight"], "full sun");
    // Single-valued soil type: lexicographically smallest of {loam, sandy}
    assert_eq!(tomato["requirements"]["soil_type"], "loam");
    // Months restored as names
    assert_eq!(tomato["seasonality"]["sowing"]["start_month"], "March");
    assert_eq!(tomato["seasonality"]["sowing"]["end_month"], "May");
    // Stage order preserved
    let stage_names: Vec<_> = tomato["stages"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["name"].as_str().unwrap())
        .collect();
    assert_eq!(stage_names, vec!["sow", "grow", "harvest"]);

    let kb_tomato = kb
        .as_array()
        .unwrap()
        .iter()
        .find(|p| p["plant_id"] == "tomato")
        .unwrap();
    assert_eq!(kb_tomato["type"], "vegetable");
    let pests: Vec<_> = kb_tomato["common_pests"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p.as_str().unwrap())
        .collect();
    assert_eq!(pests, vec!["aphids", "hornworm"]);

    Ok(())
}

#[tokio::test]
async fn export_without_store_fails() -> Result<()> {
    let fx = Fixture::new()?;
    let catalog_out = fx.db_path.parent().unwrap().join("catalog-out.json");
    let kb_out = fx.db_path.parent().unwrap().join("kb-out.json");

    let result = pipeline::export(&fx.db_path, &catalog_out, &kb_out).await;
    assert!(matches!(result, Err(plantbase::Error::NotFound(_))));

    Ok(())
}

#[tokio::test]
async fn constraint_violation_is_internal_and_rolls_back() -> Result<()> {
    use plantbase::merge::{GrowthStage, PlantEntity};
    use std::collections::BTreeMap;

    let pool = plantbase::db::open_memory_store().await?;

    let mut good = BTreeMap::new();
    good.insert(
        "kale".to_string(),
        PlantEntity {
            plant_id: "kale".to_string(),
            common_name: "Kale".to_string(),
            ..PlantEntity::default()
        },
    );
    plantbase::normalize::replace_store(&pool, &good).await?;

    // A zero-day stage violates the duration CHECK; the merge engine
    // never produces one, so this is an invariant violation
    let mut bad = BTreeMap::new();
    bad.insert(
        "pea".to_string(),
        PlantEntity {
            plant_id: "pea".to_string(),
            common_name: "Pea".to_string(),
            stages: vec![GrowthStage {
                name: "sow".to_string(),
                duration_days: Some(0),
                water_interval_days: None,
            }],
            ..PlantEntity::default()
        },
    );
    let result = plantbase::normalize::replace_store(&pool, &bad).await;
    assert!(matches!(result, Err(plantbase::Error::Internal(_))));

    // The transaction rolled back: previous contents intact
    let name: String = sqlx::query_scalar("SELECT common_name FROM plants")
        .fetch_one(&pool)
        .await?;
    assert_eq!(name, "Kale");

    pool.close().await;
    Ok(())
}

#[tokio::test]
async fn report_classifies_wrap_around_windows() -> Result<()> {
    let fx = Fixture::new()?;
    fx.write_catalog(&json!([
        {
            "id": "garlic",
            "name": "Garlic",
            "seasonality": {
                "sowing": { "start_month": "November", "end_month": "February" }
            }
        }
    ]))?;
    fx.write_kb(&json!([]))?;
    fx.ingest().await?;

    let pool = fx.pool().await?;
    for month in [11, 12, 1, 2] {
        let entries = plantbase::report::month_report(&pool, month).await?;
        assert_eq!(entries.len(), 1, "month {} should be active", month);
        assert!(entries[0].peak);
        assert_eq!(entries[0].expiring, month == 2);
    }
    for month in 3..=10 {
        let entries = plantbase::report::month_report(&pool, month).await?;
        assert!(entries.is_empty(), "month {} should be inactive", month);
    }

    pool.close().await;
    Ok(())
}
