//! Configuration and data folder resolution

use crate::{Error, Result};
use std::path::{Path, PathBuf};

/// Database file name inside the data folder.
pub const DB_FILE_NAME: &str = "plants.db";

/// Resolve the data folder holding the store, in priority order:
/// 1. Command-line argument
/// 2. `PLANTBASE_ROOT` environment variable
/// 3. `root_folder` key in the platform config file
/// 4. OS-dependent compiled default
pub fn resolve_root_folder(cli_arg: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = cli_arg {
        return Ok(path.to_path_buf());
    }

    if let Ok(path) = std::env::var("PLANTBASE_ROOT") {
        if !path.is_empty() {
            return Ok(PathBuf::from(path));
        }
    }

    if let Ok(config_path) = find_config_file() {
        let toml_content = std::fs::read_to_string(&config_path)?;
        let config: toml::Value = toml::from_str(&toml_content)
            .map_err(|e| Error::Config(format!("{}: {}", config_path.display(), e)))?;
        if let Some(root_folder) = config.get("root_folder").and_then(|v| v.as_str()) {
            return Ok(PathBuf::from(root_folder));
        }
    }

    Ok(default_root_folder())
}

/// Path of the store inside a resolved data folder.
pub fn database_path(root_folder: &Path) -> PathBuf {
    root_folder.join(DB_FILE_NAME)
}

fn find_config_file() -> Result<PathBuf> {
    let user_config = dirs::config_dir().map(|d| d.join("plantbase").join("config.toml"));

    if let Some(path) = user_config {
        if path.exists() {
            return Ok(path);
        }
    }

    if cfg!(target_os = "linux") {
        let system_config = PathBuf::from("/etc/plantbase/config.toml");
        if system_config.exists() {
            return Ok(system_config);
        }
    }

    Err(Error::Config("No config file found".to_string()))
}

fn default_root_folder() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("plantbase"))
        .unwrap_or_else(|| PathBuf::from("./plantbase_data"))
}
