//! Knowledge base document shape (Source B)
//!
//! Flatter than the catalog, but broader: pests, diseases, nutrient
//! preferences, and both interaction directions are declared here.

use super::RawSeasonality;
use serde::{Deserialize, Serialize};

/// One knowledge base record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KbPlant {
    /// Identity key. Records without one are skipped at merge time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plant_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub common_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scientific_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family: Option<String>,
    /// Catalog calls this `plant_type`.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub plant_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub life_cycle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sunlight: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub water_requirements: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub soil_ph: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub soil_type: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub companion_plants: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub incompatible_plants: Vec<String>,
    #[serde(default, skip_serializing_if = "RawSeasonality::is_empty")]
    pub seasonality: RawSeasonality,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub common_pests: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub common_diseases: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub nutrient_preferences: Vec<String>,
    /// Plain stage names, no durations; loses to catalog stages wholesale.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub growth_stage: Vec<String>,
}
