//! Export projector
//!
//! Reconstructs the two original document shapes from the normalized
//! store. The round-trip is lossy where the store is richer than a shape
//! (catalog soil_type is single-valued) and where union merging erased
//! which source a set member came from. Interaction direction is also
//! gone: both participants of a stored pair list each other.

use crate::seasonality::Activity;
use crate::source::{
    CatalogPlant, CatalogRequirements, CatalogStage, KbPlant, MonthValue, RawSeasonality,
    RawWindow,
};
use crate::{months, Result};
use sqlx::SqlitePool;
use tracing::info;

/// Both reconstructed documents, plants in primary key order.
#[derive(Debug, Default)]
pub struct ExportedDocuments {
    pub catalog: Vec<CatalogPlant>,
    pub knowledge_base: Vec<KbPlant>,
}

/// Project the whole store back into both document shapes.
pub async fn export_documents(pool: &SqlitePool) -> Result<ExportedDocuments> {
    let plants = sqlx::query_as::<_, PlantRow>(
        r#"
        SELECT plant_id, common_name, scientific_name, family, plant_type, life_cycle, notes
        FROM plants
        ORDER BY plant_id
        "#,
    )
    .fetch_all(pool)
    .await?;

    let mut documents = ExportedDocuments::default();

    for plant in &plants {
        let requirements = load_requirements(pool, &plant.plant_id).await?;
        let soil_types = load_soil_types(pool, &plant.plant_id).await?;
        let stages = load_stages(pool, &plant.plant_id).await?;
        let seasonality = load_seasonality(pool, &plant.plant_id).await?;
        let (companions, incompatibles) = load_interactions(pool, &plant.plant_id).await?;
        let pests = load_name_set(pool, "plant_pests", &plant.plant_id).await?;
        let diseases = load_name_set(pool, "plant_diseases", &plant.plant_id).await?;
        let nutrients = load_name_set(pool, "plant_nutrients", &plant.plant_id).await?;

        documents.catalog.push(CatalogPlant {
            id: Some(plant.plant_id.clone()),
            name: Some(plant.common_name.clone()),
            scientific_name: plant.scientific_name.clone(),
            family: plant.family.clone(),
            plant_type: plant.plant_type.clone(),
            life_cycle: plant.life_cycle.clone(),
            notes: non_empty(&plant.notes),
            companions: companions.clone(),
            antagonists: incompatibles.clone(),
            seasonality: seasonality.clone(),
            requirements: Some(CatalogRequirements {
                sunlight: requirements.0.clone(),
                water_requirements: requirements.1.clone(),
                // Single-valued in this shape: lexicographically smallest
                soil_type: soil_types.first().cloned(),
                soil_ph: requirements.2.clone(),
            }),
            stages: stages
                .iter()
                .map(|(name, duration, interval)| CatalogStage {
                    id: None,
                    name: Some(name.clone()),
                    duration_days: *duration,
                    water_frequency_days: *interval,
                })
                .collect(),
        });

        documents.knowledge_base.push(KbPlant {
            plant_id: Some(plant.plant_id.clone()),
            common_name: Some(plant.common_name.clone()),
            scientific_name: plant.scientific_name.clone(),
            family: plant.family.clone(),
            plant_type: plant.plant_type.clone(),
            life_cycle: plant.life_cycle.clone(),
            notes: non_empty(&plant.notes),
            sunlight: requirements.0,
            water_requirements: requirements.1,
            soil_ph: requirements.2,
            soil_type: soil_types,
            companion_plants: companions,
            incompatible_plants: incompatibles,
            seasonality,
            common_pests: pests,
            common_diseases: diseases,
            nutrient_preferences: nutrients,
            growth_stage: stages.into_iter().map(|(name, _, _)| name).collect(),
        });
    }

    info!("Exported {} plants into both document shapes", plants.len());
    Ok(documents)
}

#[derive(Debug, sqlx::FromRow)]
struct PlantRow {
    plant_id: String,
    common_name: String,
    scientific_name: Option<String>,
    family: Option<String>,
    plant_type: Option<String>,
    life_cycle: Option<String>,
    notes: String,
}

type RequirementsRow = (Option<String>, Option<String>, Option<String>);

async fn load_requirements(pool: &SqlitePool, plant_id: &str) -> Result<RequirementsRow> {
    let row = sqlx::query_as::<_, RequirementsRow>(
        "SELECT sunlight, water_requirements, soil_ph FROM plant_requirements WHERE plant_id = ?",
    )
    .bind(plant_id)
    .fetch_optional(pool)
    .await?;

    Ok(row.unwrap_or((None, None, None)))
}

async fn load_soil_types(pool: &SqlitePool, plant_id: &str) -> Result<Vec<String>> {
    let rows = sqlx::query_scalar::<_, String>(
        "SELECT soil_type FROM plant_soil_types WHERE plant_id = ? ORDER BY soil_type",
    )
    .bind(plant_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

async fn load_stages(
    pool: &SqlitePool,
    plant_id: &str,
) -> Result<Vec<(String, Option<i64>, Option<i64>)>> {
    let rows = sqlx::query_as::<_, (String, Option<i64>, Option<i64>)>(
        r#"
        SELECT name, duration_days, water_interval_days
        FROM plant_growth_stages
        WHERE plant_id = ?
        ORDER BY stage_order
        "#,
    )
    .bind(plant_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// First stored window per activity, months rendered back to names.
/// An out-of-range stored month becomes an empty string, not an error.
async fn load_seasonality(pool: &SqlitePool, plant_id: &str) -> Result<RawSeasonality> {
    let rows = sqlx::query_as::<_, (String, i64, i64)>(
        r#"
        SELECT activity, start_month, end_month
        FROM plant_seasonality
        WHERE plant_id = ?
        ORDER BY rowid
        "#,
    )
    .bind(plant_id)
    .fetch_all(pool)
    .await?;

    let mut seasonality = RawSeasonality::new();
    for (activity, start_month, end_month) in rows {
        if Activity::parse(&activity).is_none() {
            continue;
        }
        seasonality.entry(activity).or_insert_with(|| RawWindow {
            start_month: Some(MonthValue::Name(
                months::decode_or_empty(start_month).to_string(),
            )),
            end_month: Some(MonthValue::Name(
                months::decode_or_empty(end_month).to_string(),
            )),
        });
    }

    Ok(seasonality)
}

/// Interaction partners of a plant, regardless of stored direction.
async fn load_interactions(pool: &SqlitePool, plant_id: &str) -> Result<(Vec<String>, Vec<String>)> {
    let rows = sqlx::query_as::<_, (String, String, String)>(
        r#"
        SELECT plant_a, plant_b, type
        FROM plant_interactions
        WHERE plant_a = ? OR plant_b = ?
        ORDER BY plant_a, plant_b
        "#,
    )
    .bind(plant_id)
    .bind(plant_id)
    .fetch_all(pool)
    .await?;

    let mut companions = Vec::new();
    let mut incompatibles = Vec::new();
    for (plant_a, plant_b, kind) in rows {
        let partner = if plant_a == plant_id { plant_b } else { plant_a };
        match kind.as_str() {
            "companion" => companions.push(partner),
            "incompatible" => incompatibles.push(partner),
            _ => {}
        }
    }

    Ok((companions, incompatibles))
}

async fn load_name_set(pool: &SqlitePool, table: &str, plant_id: &str) -> Result<Vec<String>> {
    let sql = format!("SELECT name FROM {table} WHERE plant_id = ? ORDER BY name");
    let rows = sqlx::query_scalar::<_, String>(&sql)
        .bind(plant_id)
        .fetch_all(pool)
        .await?;

    Ok(rows)
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}
