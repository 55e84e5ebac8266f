//! Pipeline-wide configuration: the process seed, row-count defaults, and
//! the auto-cardinality switch. Loaded from an already-parsed schema's
//! sibling config, or from a TOML file behind the `config-toml` feature.

use serde::{Deserialize, Serialize};

fn default_seed() -> u64 {
    0x5EED_u64
}

fn default_row_count() -> usize {
    100
}

fn default_auto_cardinality() -> bool {
    true
}

fn default_deterministic_ids() -> bool {
    false
}

/// Settings that govern a single `generate` run but are not themselves
/// part of the schema: determinism seed, row-count defaults, and whether
/// FK assignment uses cardinality-aware clustering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Seeds every deterministic PRNG the pipeline owns (power-law
    /// clustering, and UUID minting in seeded test mode). Two runs with
    /// the same seed and schema reproduce the same FK sequences.
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Row count applied to entities with no per-entity override.
    #[serde(default = "default_row_count")]
    pub default_row_count: usize,

    /// Per-entity row-count overrides, keyed by schema entity id.
    #[serde(default)]
    pub row_count_overrides: std::collections::HashMap<String, usize>,

    /// When true, `Relationship` strategy selection follows the
    /// cardinality-based clustering table; when false, every relationship
    /// round-robins regardless of classification.
    #[serde(default = "default_auto_cardinality")]
    pub auto_cardinality: bool,

    /// When true, `IDPhase` mints primary keys with `Uuid::new_v5` seeded
    /// from `seed`, the entity's name, and its row position instead of
    /// `Uuid::new_v4`, so determinism extends to PK values themselves,
    /// not just FK/field sequences. Off by default — production runs want
    /// genuinely random IDs; test/demo runs that need byte-for-byte
    /// reproducible output turn it on.
    #[serde(default = "default_deterministic_ids")]
    pub deterministic_ids: bool,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            seed: default_seed(),
            default_row_count: default_row_count(),
            row_count_overrides: std::collections::HashMap::new(),
            auto_cardinality: default_auto_cardinality(),
            deterministic_ids: default_deterministic_ids(),
        }
    }
}

impl GenerationConfig {
    /// Resolves the row-count budget for every entity in `schema`,
    /// applying per-entity overrides over the default.
    pub fn expected_volume(
        &self,
        schema: &crate::schema::SchemaInput,
    ) -> std::collections::HashMap<String, usize> {
        schema
            .entities
            .keys()
            .map(|id| {
                let count = self.row_count_overrides.get(id).copied().unwrap_or(self.default_row_count);
                (id.clone(), count)
            })
            .collect()
    }
}

#[cfg(feature = "config-toml")]
mod toml_loader {
    use super::GenerationConfig;
    use std::path::Path;

    #[derive(Debug, thiserror::Error)]
    pub enum ConfigError {
        #[error("failed to read config file {path}: {source}")]
        Read {
            path: String,
            #[source]
            source: std::io::Error,
        },
        #[error("failed to parse config file {path}: {source}")]
        Parse {
            path: String,
            #[source]
            source: toml::de::Error,
        },
    }

    impl GenerationConfig {
        pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
            let path = path.as_ref();
            let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
                path: path.display().to_string(),
                source,
            })?;
            toml::from_str(&raw).map_err(|source| ConfigError::Parse {
                path: path.display().to_string(),
                source,
            })
        }
    }
}

#[cfg(feature = "config-toml")]
pub use toml_loader::ConfigError;
