use std::path::{Path, PathBuf};
use std::sync::Arc;

use grove_store::LocalStore;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{BackingError, BackingResult};
use crate::git::GitBackingStore;
use crate::testing::TestBackingStore;
use crate::traits::BackingStore;

/// Which backend to construct, and how.
///
/// ```toml
/// [backend]
/// type = "git"
/// repository = "/srv/repos/project"
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackingConfig {
    pub backend: BackendConfig,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BackendConfig {
    /// Read from a git repository (working tree or `.git` directory).
    Git { repository: PathBuf },
    /// Serve fixtures straight from the LocalStore.
    Test,
}

impl BackingConfig {
    pub fn git(repository: impl Into<PathBuf>) -> Self {
        Self {
            backend: BackendConfig::Git {
                repository: repository.into(),
            },
        }
    }

    pub fn test() -> Self {
        Self {
            backend: BackendConfig::Test,
        }
    }

    pub fn from_toml_str(s: &str) -> BackingResult<Self> {
        toml::from_str(s).map_err(|e| BackingError::Config(e.to_string()))
    }

    /// Load a config file from disk.
    pub fn load(path: impl AsRef<Path>) -> BackingResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| BackingError::Config(format!("reading {}: {e}", path.display())))?;
        Self::from_toml_str(&text)
    }
}

/// Construct the configured backend. The variant is fixed for the lifetime
/// of the returned store.
pub fn open_backing_store(
    config: &BackingConfig,
    local_store: Arc<dyn LocalStore>,
) -> BackingResult<Arc<dyn BackingStore>> {
    debug!(?config, "opening backing store");
    let store: Arc<dyn BackingStore> = match &config.backend {
        BackendConfig::Git { repository } => {
            Arc::new(GitBackingStore::open(repository, local_store)?)
        }
        BackendConfig::Test => Arc::new(TestBackingStore::new(local_store)),
    };
    Ok(store)
}
