//! Source document schemas
//!
//! The two plant documents are independently authored and structurally
//! different. Every field that may be missing in the wild is declared
//! optional with default-absent semantics, so a record missing a field
//! deserializes cleanly and the merge engine decides what to do with it.
//! Only outright malformed JSON is fatal.

pub mod catalog;
pub mod knowledge_base;

pub use catalog::{CatalogPlant, CatalogRequirements, CatalogStage};
pub use knowledge_base::KbPlant;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A month as it appears in a document: either a canonical name
/// ("March") or a numeric the author typed directly (3 or "3").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MonthValue {
    Name(String),
    Number(i64),
}

impl MonthValue {
    /// Resolve to a 1..12 month number, `None` for unrecognized input.
    pub fn encode(&self) -> Option<u8> {
        match self {
            MonthValue::Name(name) => crate::months::encode(name),
            MonthValue::Number(n) => crate::months::encode_number(*n),
        }
    }
}

/// A seasonality window as documents declare it, months unresolved.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RawWindow {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_month: Option<MonthValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_month: Option<MonthValue>,
}

/// Document seasonality: activity name ("sowing", "harvest") to window.
///
/// Keyed by string rather than a closed enum so an unrecognized activity
/// degrades to a dropped window instead of failing the whole document.
pub type RawSeasonality = BTreeMap<String, RawWindow>;
