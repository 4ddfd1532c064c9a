//! Schema normalizer
//!
//! Decomposes the canonical entity map into the relational schema with
//! full-replace semantics: every run clears the whole store and rebuilds
//! it from the current map, inside a single transaction. A reader sees
//! either the fully-previous or the fully-new state, never a partial one.
//!
//! Relations are only emitted while iterating the map's own entities, so
//! every row references a plant that exists (foreign keys stay ON).

use crate::db::schema::TABLES_CHILD_FIRST;
use crate::merge::PlantEntity;
use crate::seasonality::SeasonWindow;
use crate::source::RawWindow;
use crate::{Error, Result};
use sqlx::{Sqlite, SqlitePool, Transaction};
use std::collections::BTreeMap;
use tracing::{info, warn};

/// Clear and rebuild the entire normalized store from the canonical map.
///
/// The decomposition guarantees referential completeness, so a storage
/// constraint violation here is an internal invariant violation; it is
/// reported as such and the transaction rolls back.
pub async fn replace_store(
    pool: &SqlitePool,
    entities: &BTreeMap<String, PlantEntity>,
) -> Result<()> {
    rebuild(pool, entities).await.map_err(|err| match err {
        Error::Database(db) => constraint_as_internal(db),
        other => other,
    })
}

async fn rebuild(pool: &SqlitePool, entities: &BTreeMap<String, PlantEntity>) -> Result<()> {
    let mut tx = pool.begin().await?;

    for table in TABLES_CHILD_FIRST {
        let sql = format!("DELETE FROM {table}");
        sqlx::query(&sql).execute(&mut *tx).await?;
    }

    // All plant rows go in before any relation row so forward references
    // between plants (interactions) satisfy the foreign keys
    for entity in entities.values() {
        write_plant(&mut tx, entity).await?;
    }

    for entity in entities.values() {
        write_requirements(&mut tx, entity).await?;
        write_soil_types(&mut tx, entity).await?;
        write_growth_stages(&mut tx, entity).await?;
        write_seasonality(&mut tx, entity).await?;
        write_interactions(&mut tx, entity, entities).await?;
        write_name_set(&mut tx, "plant_pests", &entity.plant_id, &entity.pests).await?;
        write_name_set(&mut tx, "plant_diseases", &entity.plant_id, &entity.diseases).await?;
        write_name_set(&mut tx, "plant_nutrients", &entity.plant_id, &entity.nutrients).await?;
    }

    tx.commit().await?;
    info!("Normalized store replaced: {} plants", entities.len());

    Ok(())
}

async fn write_plant(tx: &mut Transaction<'_, Sqlite>, entity: &PlantEntity) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO plants (plant_id, common_name, scientific_name, family, plant_type, life_cycle, notes)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&entity.plant_id)
    .bind(&entity.common_name)
    .bind(&entity.scientific_name)
    .bind(&entity.family)
    .bind(&entity.plant_type)
    .bind(&entity.life_cycle)
    .bind(&entity.notes)
    .execute(&mut **tx)
    .await?;

    Ok(())
}

async fn write_requirements(tx: &mut Transaction<'_, Sqlite>, entity: &PlantEntity) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO plant_requirements (plant_id, sunlight, water_requirements, soil_ph)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(&entity.plant_id)
    .bind(&entity.sunlight)
    .bind(&entity.water_requirements)
    .bind(&entity.soil_ph)
    .execute(&mut **tx)
    .await?;

    Ok(())
}

async fn write_soil_types(tx: &mut Transaction<'_, Sqlite>, entity: &PlantEntity) -> Result<()> {
    for soil_type in &entity.soil_types {
        sqlx::query("INSERT OR IGNORE INTO plant_soil_types (plant_id, soil_type) VALUES (?, ?)")
            .bind(&entity.plant_id)
            .bind(soil_type)
            .execute(&mut **tx)
            .await?;
    }

    Ok(())
}

async fn write_growth_stages(tx: &mut Transaction<'_, Sqlite>, entity: &PlantEntity) -> Result<()> {
    for (stage_order, stage) in entity.stages.iter().enumerate() {
        sqlx::query(
            r#"
            INSERT INTO plant_growth_stages (plant_id, stage_order, name, duration_days, water_interval_days)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&entity.plant_id)
        .bind(stage_order as i64)
        .bind(&stage.name)
        .bind(stage.duration_days)
        .bind(stage.water_interval_days)
        .execute(&mut **tx)
        .await?;
    }

    Ok(())
}

async fn write_seasonality(tx: &mut Transaction<'_, Sqlite>, entity: &PlantEntity) -> Result<()> {
    for (activity, windows) in &entity.seasonality {
        for raw in windows {
            let Some(window) = resolve_window(raw) else {
                warn!(
                    "Plant '{}': dropping {} window with unrecognized month ({:?}..{:?})",
                    entity.plant_id, activity, raw.start_month, raw.end_month
                );
                continue;
            };
            sqlx::query(
                r#"
                INSERT INTO plant_seasonality (plant_id, activity, start_month, end_month)
                VALUES (?, ?, ?, ?)
                "#,
            )
            .bind(&entity.plant_id)
            .bind(activity.as_str())
            .bind(window.start_month as i64)
            .bind(window.end_month as i64)
            .execute(&mut **tx)
            .await?;
        }
    }

    Ok(())
}

async fn write_interactions(
    tx: &mut Transaction<'_, Sqlite>,
    entity: &PlantEntity,
    entities: &BTreeMap<String, PlantEntity>,
) -> Result<()> {
    for (partners, kind) in [
        (&entity.companions, "companion"),
        (&entity.antagonists, "incompatible"),
    ] {
        for partner in partners {
            // Foreign keys are ON; a partner outside the ingested set
            // cannot be stored
            if !entities.contains_key(partner) {
                warn!(
                    "Plant '{}': skipping {} interaction with unknown plant '{}'",
                    entity.plant_id, kind, partner
                );
                continue;
            }
            let (plant_a, plant_b) = canonical_pair(&entity.plant_id, partner);
            // Write-if-absent: reciprocal declarations collapse to one row
            sqlx::query(
                "INSERT OR IGNORE INTO plant_interactions (plant_a, plant_b, type) VALUES (?, ?, ?)",
            )
            .bind(plant_a)
            .bind(plant_b)
            .bind(kind)
            .execute(&mut **tx)
            .await?;
        }
    }

    Ok(())
}

async fn write_name_set(
    tx: &mut Transaction<'_, Sqlite>,
    table: &str,
    plant_id: &str,
    names: &std::collections::BTreeSet<String>,
) -> Result<()> {
    for name in names {
        let sql = format!("INSERT OR IGNORE INTO {table} (plant_id, name) VALUES (?, ?)");
        sqlx::query(&sql)
            .bind(plant_id)
            .bind(name)
            .execute(&mut **tx)
            .await?;
    }

    Ok(())
}

/// A key, check, or foreign-key failure means the normalizer's own
/// guarantees were broken; anything else stays a plain database error.
fn constraint_as_internal(err: sqlx::Error) -> Error {
    if let sqlx::Error::Database(ref db) = err {
        if db.is_unique_violation() || db.is_foreign_key_violation() || db.is_check_violation() {
            return Error::Internal(format!("constraint violation while rebuilding store: {db}"));
        }
    }
    Error::Database(err)
}

/// Decode a raw window's months; `None` drops the window.
fn resolve_window(raw: &RawWindow) -> Option<SeasonWindow> {
    let start = raw.start_month.as_ref()?.encode()?;
    let end = raw.end_month.as_ref()?.encode()?;
    SeasonWindow::new(start, end)
}

/// Order a symmetric pair so (a, b) and (b, a) store identically.
fn canonical_pair<'a>(x: &'a str, y: &'a str) -> (&'a str, &'a str) {
    if x <= y {
        (x, y)
    } else {
        (y, x)
    }
}
