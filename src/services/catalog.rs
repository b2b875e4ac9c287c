use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::models::Requirement;

/// Catalog derived from the licensing document parser
pub const PARSED_FILE: &str = "requirements.json";
/// Curated fallback catalog shipped with the service
pub const SAMPLE_FILE: &str = "requirements.sample.json";

/// Errors that can occur when reading a catalog file
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Load the requirement catalog from the data directory.
///
/// Prefers the parsed catalog, falls back to the sample catalog, and
/// starts empty when neither is usable. Called once at startup; the
/// result is read-only for the process lifetime.
pub fn load_catalog(data_dir: &Path) -> Vec<Requirement> {
    for name in [PARSED_FILE, SAMPLE_FILE] {
        let path = data_dir.join(name);
        if !path.exists() {
            continue;
        }
        match read_catalog_file(&path) {
            Ok(requirements) => {
                tracing::info!("Loaded {} requirements from {}", requirements.len(), name);
                return requirements;
            }
            Err(e) => {
                tracing::warn!("Skipping catalog file {}: {}", name, e);
            }
        }
    }

    tracing::warn!("No requirements data found, starting with an empty catalog");
    Vec::new()
}

/// Read and parse one catalog file: a JSON array of requirement records.
pub fn read_catalog_file(path: &Path) -> Result<Vec<Requirement>, CatalogError> {
    let contents = fs::read_to_string(path).map_err(|source| CatalogError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_str(&contents).map_err(|source| CatalogError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
