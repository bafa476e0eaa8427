//! Indexer configuration, loaded from TOML

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use lifegraph_core::Timestamp;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::facets::facet_name;

/// 2000-01-01T00:00:00Z
pub const DEFAULT_PLAUSIBLE_MIN: Timestamp = 946_684_800_000;
/// 2100-01-01T00:00:00Z
pub const DEFAULT_PLAUSIBLE_MAX: Timestamp = 4_102_444_800_000;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// What facet derivation sees on an upsert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpdateMode {
    /// Derive from the partial update only. Facets the update omits are
    /// dropped even though the stored attributes still list them.
    #[default]
    Replace,
    /// Derive from the merged entry, so omitted facets are kept.
    Additive,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexerConfig {
    /// Tags that make the whole entry private.
    pub private_tags: Vec<String>,
    pub update_mode: UpdateMode,
    /// Lower bound for a plausible visit departure timestamp.
    pub plausible_min: Timestamp,
    /// Upper bound for a plausible visit departure timestamp.
    pub plausible_max: Timestamp,
    /// Pull `#tags` and `@mentions` out of the markdown body when the entry
    /// does not list them.
    pub extract_text_facets: bool,
}

impl Default for IndexerConfig {
    fn default() -> Self {
        Self {
            private_tags: vec!["#private".to_string(), "#nsfw".to_string()],
            update_mode: UpdateMode::default(),
            plausible_min: DEFAULT_PLAUSIBLE_MIN,
            plausible_max: DEFAULT_PLAUSIBLE_MAX,
            extract_text_facets: true,
        }
    }
}

impl IndexerConfig {
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&source)?;
        tracing::debug!("Loaded indexer config from {}", path.display());
        Ok(config)
    }

    /// Private vocabulary in normalized form (lower-case, no `#`).
    pub fn private_vocabulary(&self) -> HashSet<String> {
        self.private_tags
            .iter()
            .filter_map(|tag| facet_name(tag, '#'))
            .collect()
    }
}
