//! Merge engine
//!
//! Folds the two source document collections into one canonical entity
//! per plant. The catalog (Source A) seeds the map and wins field-level
//! conflicts; the knowledge base (Source B) fills gaps and broadens the
//! set-valued fields. Multi-valued fields are held as `BTreeSet`s so the
//! union is idempotent and iteration order deterministic no matter how
//! overlapping the two sources are.
//!
//! Precedence rules:
//! - Scalar identity/taxonomy fields: catalog wins if non-empty.
//! - Notes: the longer text wins (treated as more complete).
//! - Set-valued fields: union, never overwritten.
//! - Seasonality: per activity, catalog windows stand; knowledge base
//!   windows are adopted only for activities the catalog lacks.
//! - Growth stages: catalog stages win wholesale over the knowledge
//!   base's bare stage names; the two are never interleaved.

use crate::seasonality::Activity;
use crate::source::{CatalogPlant, KbPlant, RawSeasonality, RawWindow};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, warn};

/// One growth stage in canonical form, ordered by position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrowthStage {
    pub name: String,
    pub duration_days: Option<i64>,
    pub water_interval_days: Option<i64>,
}

/// The single merged representation of a plant after reconciling both
/// sources. Seasonality windows stay in raw (undecoded) month form;
/// the normalizer decodes them and drops the unrecognizable ones.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlantEntity {
    pub plant_id: String,
    pub common_name: String,
    pub scientific_name: Option<String>,
    pub family: Option<String>,
    pub plant_type: Option<String>,
    pub life_cycle: Option<String>,
    pub notes: String,
    pub sunlight: Option<String>,
    pub water_requirements: Option<String>,
    pub soil_ph: Option<String>,
    pub soil_types: BTreeSet<String>,
    pub companions: BTreeSet<String>,
    pub antagonists: BTreeSet<String>,
    pub pests: BTreeSet<String>,
    pub diseases: BTreeSet<String>,
    pub nutrients: BTreeSet<String>,
    pub stages: Vec<GrowthStage>,
    pub seasonality: BTreeMap<Activity, Vec<RawWindow>>,
}

/// Merge both source collections into the canonical entity map.
///
/// Catalog records seed the map; knowledge base records are folded in
/// afterwards. Records missing their identity key are skipped, not fatal.
pub fn merge_sources(catalog: &[CatalogPlant], kb: &[KbPlant]) -> BTreeMap<String, PlantEntity> {
    let mut entities = BTreeMap::new();

    for record in catalog {
        let Some(plant_id) = non_empty(record.id.as_deref()) else {
            warn!("Skipping catalog record without id (name: {:?})", record.name);
            continue;
        };
        entities.insert(plant_id.clone(), entity_from_catalog(plant_id, record));
    }

    for record in kb {
        let Some(plant_id) = non_empty(record.plant_id.as_deref()) else {
            warn!(
                "Skipping knowledge base record without plant_id (name: {:?})",
                record.common_name
            );
            continue;
        };
        match entities.get_mut(&plant_id) {
            Some(entity) => fold_kb(entity, record),
            None => {
                entities.insert(plant_id.clone(), entity_from_kb(plant_id, record));
            }
        }
    }

    debug!("Merged {} canonical plant entities", entities.len());
    entities
}

fn entity_from_catalog(plant_id: String, record: &CatalogPlant) -> PlantEntity {
    let requirements = record.requirements.as_ref();
    let mut entity = PlantEntity {
        common_name: non_empty(record.name.as_deref()).unwrap_or_else(|| plant_id.clone()),
        plant_id,
        scientific_name: non_empty(record.scientific_name.as_deref()),
        family: non_empty(record.family.as_deref()),
        plant_type: non_empty(record.plant_type.as_deref()),
        life_cycle: non_empty(record.life_cycle.as_deref()),
        notes: record.notes.clone().unwrap_or_default(),
        sunlight: requirements.and_then(|r| non_empty(r.sunlight.as_deref())),
        water_requirements: requirements.and_then(|r| non_empty(r.water_requirements.as_deref())),
        soil_ph: requirements.and_then(|r| non_empty(r.soil_ph.as_deref())),
        ..PlantEntity::default()
    };

    if let Some(soil) = requirements.and_then(|r| non_empty(r.soil_type.as_deref())) {
        entity.soil_types.insert(soil);
    }
    union_into(&mut entity.companions, &record.companions);
    union_into(&mut entity.antagonists, &record.antagonists);
    entity.stages = record
        .stages
        .iter()
        .filter_map(|stage| {
            Some(GrowthStage {
                name: stage.label()?.to_string(),
                duration_days: stage.duration_days,
                water_interval_days: stage.water_frequency_days,
            })
        })
        .collect();
    adopt_seasonality(&mut entity, &record.seasonality);

    entity
}

fn entity_from_kb(plant_id: String, record: &KbPlant) -> PlantEntity {
    let mut entity = PlantEntity {
        common_name: non_empty(record.common_name.as_deref()).unwrap_or_else(|| plant_id.clone()),
        plant_id,
        scientific_name: non_empty(record.scientific_name.as_deref()),
        family: non_empty(record.family.as_deref()),
        plant_type: non_empty(record.plant_type.as_deref()),
        life_cycle: non_empty(record.life_cycle.as_deref()),
        notes: record.notes.clone().unwrap_or_default(),
        sunlight: non_empty(record.sunlight.as_deref()),
        water_requirements: non_empty(record.water_requirements.as_deref()),
        soil_ph: non_empty(record.soil_ph.as_deref()),
        ..PlantEntity::default()
    };

    union_into(&mut entity.soil_types, &record.soil_type);
    union_into(&mut entity.companions, &record.companion_plants);
    union_into(&mut entity.antagonists, &record.incompatible_plants);
    union_into(&mut entity.pests, &record.common_pests);
    union_into(&mut entity.diseases, &record.common_diseases);
    union_into(&mut entity.nutrients, &record.nutrient_preferences);
    entity.stages = stages_from_names(&record.growth_stage);
    adopt_seasonality(&mut entity, &record.seasonality);

    entity
}

/// Fold a knowledge base record into an entity the catalog already seeded.
fn fold_kb(entity: &mut PlantEntity, record: &KbPlant) {
    // A catalog record without a name left the plant_id standing in for
    // common_name; a real name from the knowledge base refines it
    if entity.common_name == entity.plant_id {
        if let Some(name) = non_empty(record.common_name.as_deref()) {
            entity.common_name = name;
        }
    }

    fill_if_absent(&mut entity.scientific_name, record.scientific_name.as_deref());
    fill_if_absent(&mut entity.family, record.family.as_deref());
    fill_if_absent(&mut entity.plant_type, record.plant_type.as_deref());
    fill_if_absent(&mut entity.life_cycle, record.life_cycle.as_deref());
    fill_if_absent(&mut entity.sunlight, record.sunlight.as_deref());
    fill_if_absent(&mut entity.water_requirements, record.water_requirements.as_deref());
    fill_if_absent(&mut entity.soil_ph, record.soil_ph.as_deref());

    // Longer notes text is treated as more complete
    if let Some(notes) = record.notes.as_deref() {
        if notes.len() > entity.notes.len() {
            entity.notes = notes.to_string();
        }
    }

    union_into(&mut entity.soil_types, &record.soil_type);
    union_into(&mut entity.companions, &record.companion_plants);
    union_into(&mut entity.antagonists, &record.incompatible_plants);
    union_into(&mut entity.pests, &record.common_pests);
    union_into(&mut entity.diseases, &record.common_diseases);
    union_into(&mut entity.nutrients, &record.nutrient_preferences);

    // All-or-nothing: catalog stages stand if any were supplied
    if entity.stages.is_empty() {
        entity.stages = stages_from_names(&record.growth_stage);
    }

    adopt_seasonality(entity, &record.seasonality);
}

/// Adopt windows only for activities the entity does not already cover.
/// Window lists for a single activity are never merged across sources.
fn adopt_seasonality(entity: &mut PlantEntity, seasonality: &RawSeasonality) {
    for (activity_name, window) in seasonality {
        let Some(activity) = Activity::parse(activity_name) else {
            warn!(
                "Plant '{}': dropping seasonality for unknown activity '{}'",
                entity.plant_id, activity_name
            );
            continue;
        };
        entity
            .seasonality
            .entry(activity)
            .or_insert_with(|| vec![window.clone()]);
    }
}

fn stages_from_names(names: &[String]) -> Vec<GrowthStage> {
    names
        .iter()
        .filter(|name| !name.is_empty())
        .map(|name| GrowthStage {
            name: name.clone(),
            duration_days: None,
            water_interval_days: None,
        })
        .collect()
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value.filter(|s| !s.is_empty()).map(str::to_string)
}

fn fill_if_absent(slot: &mut Option<String>, value: Option<&str>) {
    if slot.is_none() {
        *slot = non_empty(value);
    }
}

fn union_into(set: &mut BTreeSet<String>, values: &[String]) {
    set.extend(values.iter().filter(|v| !v.is_empty()).cloned());
}
