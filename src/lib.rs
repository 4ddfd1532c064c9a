//! # Plantbase
//!
//! Plant knowledge base ingestion pipeline:
//! - Source document schemas (catalog + knowledge base shapes)
//! - Merge engine producing one canonical entity per plant
//! - Schema normalizer writing the relational store (full replace)
//! - Seasonality window evaluation (wrap-around aware)
//! - Export projection back to both document shapes

pub mod config;
pub mod db;
pub mod error;
pub mod export;
pub mod merge;
pub mod months;
pub mod normalize;
pub mod pipeline;
pub mod report;
pub mod seasonality;
pub mod source;

pub use error::{Error, Result};
