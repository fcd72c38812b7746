use std::path::{Path, PathBuf};

use thiserror::Error;

use campus_core::TenantConfiguration;

#[derive(Debug, Error)]
pub enum FixtureError {
    #[error("failed to read tenant fixtures from {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid tenant fixtures in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Read a JSON array of tenant configurations.
pub fn load_fixtures(path: impl AsRef<Path>) -> Result<Vec<TenantConfiguration>, FixtureError> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path).map_err(|source| FixtureError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let configs: Vec<TenantConfiguration> =
        serde_json::from_str(&raw).map_err(|source| FixtureError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
    tracing::info!(path = %path.display(), tenants = configs.len(), "loaded tenant fixtures");
    Ok(configs)
}
