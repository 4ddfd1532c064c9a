//! Ingest and export orchestration
//!
//! Wires the pipeline edges (document files, store file) to the core:
//! documents -> merge -> canonical map -> normalize -> store, and
//! store -> export projection -> documents. All blocking I/O happens
//! here; the merge engine and evaluator stay pure.

use crate::source::{CatalogPlant, KbPlant};
use crate::{db, export, merge, normalize, Error, Result};
use std::path::Path;
use tracing::{info, warn};

/// What an ingest run did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestOutcome {
    /// Neither source document was present; the store was not touched.
    NothingToDo,
    /// The store was cleared and rebuilt with this many plants.
    Replaced { plants: usize },
}

/// Run a full ingest: parse both documents, merge, replace the store.
///
/// A document path whose file does not exist is treated as an absent
/// source. Both sources absent is a no-op; a document that exists but
/// cannot be parsed is fatal before any storage mutation.
pub async fn ingest(
    catalog_path: &Path,
    kb_path: &Path,
    db_path: &Path,
) -> Result<IngestOutcome> {
    let catalog = read_document::<CatalogPlant>(catalog_path, "catalog")?;
    let kb = read_document::<KbPlant>(kb_path, "knowledge base")?;

    if catalog.is_none() && kb.is_none() {
        info!("No source documents present: nothing to do");
        return Ok(IngestOutcome::NothingToDo);
    }

    let entities = merge::merge_sources(
        catalog.as_deref().unwrap_or_default(),
        kb.as_deref().unwrap_or_default(),
    );

    let pool = db::open_store(db_path).await?;
    normalize::replace_store(&pool, &entities).await?;
    pool.close().await;

    Ok(IngestOutcome::Replaced {
        plants: entities.len(),
    })
}

/// Project the store back into both document shapes and write them.
pub async fn export(db_path: &Path, catalog_out: &Path, kb_out: &Path) -> Result<()> {
    if !db_path.exists() {
        return Err(Error::NotFound(format!(
            "No store at {}; run ingest first",
            db_path.display()
        )));
    }

    let pool = db::open_store(db_path).await?;
    let documents = export::export_documents(&pool).await?;
    pool.close().await;

    std::fs::write(
        catalog_out,
        serde_json::to_string_pretty(&documents.catalog)?,
    )?;
    std::fs::write(
        kb_out,
        serde_json::to_string_pretty(&documents.knowledge_base)?,
    )?;

    info!(
        "Wrote {} and {}",
        catalog_out.display(),
        kb_out.display()
    );
    Ok(())
}

/// Read and parse one source document; a missing file is an absent
/// source, a malformed one is fatal.
fn read_document<T: serde::de::DeserializeOwned>(
    path: &Path,
    label: &str,
) -> Result<Option<Vec<T>>> {
    if !path.exists() {
        warn!("{} document not present: {}", label, path.display());
        return Ok(None);
    }
    let text = std::fs::read_to_string(path)?;
    let records: Vec<T> = serde_json::from_str(&text)
        .map_err(|e| Error::InvalidDocument(format!("{}: {}", path.display(), e)))?;
    info!("Parsed {} {} records from {}", records.len(), label, path.display());
    Ok(Some(records))
}
