//! plantbase - plant knowledge base ingestion pipeline
//!
//! Merges two independently-authored plant documents (catalog +
//! knowledge base) into one canonical entity set and keeps a normalized
//! SQLite store synchronized with it. `export` projects the store back
//! into both document shapes; `report` prints a month digest.

use anyhow::Result;
use chrono::Datelike;
use clap::{Parser, Subcommand};
use plantbase::pipeline::IngestOutcome;
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "plantbase", version, about = "Plant knowledge base ingestion pipeline")]
struct Cli {
    /// Data folder holding plants.db (defaults: $PLANTBASE_ROOT, config
    /// file, then the OS data directory)
    #[arg(long, global = true)]
    root: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Read both source documents, merge, and replace the store
    Ingest {
        /// Catalog document (Source A)
        #[arg(long, default_value = "catalog.json")]
        catalog: PathBuf,
        /// Knowledge base document (Source B)
        #[arg(long, default_value = "plants-kb.json")]
        kb: PathBuf,
    },
    /// Project the store back into both document shapes
    Export {
        #[arg(long, default_value = "catalog-export.json")]
        catalog_out: PathBuf,
        #[arg(long, default_value = "plants-kb-export.json")]
        kb_out: PathBuf,
    },
    /// Print the sowing/harvest digest for a month
    Report {
        /// Query month 1..12 (defaults to the current month)
        #[arg(long, value_parser = clap::value_parser!(u8).range(1..=12))]
        month: Option<u8>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let cli = Cli::parse();

    let root_folder = plantbase::config::resolve_root_folder(cli.root.as_deref())?;
    let db_path = plantbase::config::database_path(&root_folder);
    info!("Store: {}", db_path.display());

    match cli.command {
        Command::Ingest { catalog, kb } => {
            match plantbase::pipeline::ingest(&catalog, &kb, &db_path).await? {
                IngestOutcome::NothingToDo => println!("nothing to do"),
                IngestOutcome::Replaced { plants } => {
                    println!("ingested {} plants", plants);
                }
            }
        }
        Command::Export { catalog_out, kb_out } => {
            plantbase::pipeline::export(&db_path, &catalog_out, &kb_out).await?;
        }
        Command::Report { month } => {
            if !db_path.exists() {
                anyhow::bail!("No store at {}; run ingest first", db_path.display());
            }
            let month = month.unwrap_or_else(|| chrono::Local::now().month() as u8);
            let pool = plantbase::db::open_store(&db_path).await?;
            let entries = plantbase::report::month_report(&pool, month).await?;
            pool.close().await;
            print!("{}", plantbase::report::render(month, &entries));
        }
    }

    Ok(())
}
