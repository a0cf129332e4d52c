use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::BackendError;

#[derive(Debug, clap::Parser)]
#[command(about = "Extracts draft and round records from match documents")]
pub struct Args {
    /// Run configuration, rewritten as sources get processed.
    #[arg(long, default_value = "config.json")]
    pub config: PathBuf,

    /// Matches extracted concurrently.
    #[arg(long, default_value_t = 4)]
    pub workers: usize,
}

/// Persistent run configuration.
///
/// `sources` groups match-list documents by region or circuit; every
/// document that has been fully processed is listed in `processed` and
/// skipped on later runs.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Config {
    pub folder: PathBuf,
    #[serde(default)]
    pub sources: BTreeMap<String, Vec<PathBuf>>,
    #[serde(default)]
    pub processed: Vec<String>,
}

impl Config {
    pub async fn load(path: &Path) -> Result<Self, BackendError> {
        let raw = tokio::fs::read(path).await?;
        let config = serde_json::from_slice(&raw)?;
        Ok(config)
    }

    pub async fn save(&self, path: &Path) -> Result<(), BackendError> {
        let raw = serde_json::to_vec_pretty(self)?;
        tokio::fs::write(path, raw).await?;
        Ok(())
    }

    fn source_key(source: &Path) -> String {
        source.to_string_lossy().into_owned()
    }

    /// Sources not processed yet, in group order.
    pub fn pending(&self) -> Vec<PathBuf> {
        self.sources
            .values()
            .flatten()
            .filter(|source| !self.processed.contains(&Self::source_key(source)))
            .cloned()
            .collect()
    }

    pub fn mark_processed(&mut self, source: &Path) {
        let key = Self::source_key(source);
        if !self.processed.contains(&key) {
            self.processed.push(key);
        }
    }
}
