//! Catalog document shape (Source A)
//!
//! The master plant catalog: richer per-stage detail and a structured
//! requirements sub-object, but only a single soil type per plant.

use super::RawSeasonality;
use serde::{Deserialize, Serialize};

/// One catalog record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogPlant {
    /// Identity key. Records without one are skipped at merge time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scientific_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plant_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub life_cycle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub companions: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub antagonists: Vec<String>,
    #[serde(default, skip_serializing_if = "RawSeasonality::is_empty")]
    pub seasonality: RawSeasonality,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requirements: Option<CatalogRequirements>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub stages: Vec<CatalogStage>,
}

/// Structured growing requirements sub-object.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogRequirements {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sunlight: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub water_requirements: Option<String>,
    /// Single value in this shape; multi-valued in the knowledge base.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub soil_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub soil_ph: Option<String>,
}

/// One growth stage. Some records name stages via `name`, older ones
/// only via `id`; either is accepted as the stage label.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogStage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(
        rename = "durationDays",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub duration_days: Option<i64>,
    #[serde(
        rename = "waterFrequencyDays",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub water_frequency_days: Option<i64>,
}

impl CatalogStage {
    /// Stage label: `name` preferred, `id` as fallback.
    pub fn label(&self) -> Option<&str> {
        self.name
            .as_deref()
            .filter(|s| !s.is_empty())
            .or(self.id.as_deref().filter(|s| !s.is_empty()))
    }
}
