//! Simulator configuration, read from TOML.
//!
//! ```toml
//! default_house_count = 8
//! datasets = ["data/vanilla.json", "data/calamity.json"]
//!
//! [optimizer]
//! iterations = 20000
//! seed = 7
//!
//! [optimizer.pins]
//! truffle = "mushroom"
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::dataset::PreferenceDataset;
use crate::entities::NpcId;
use crate::error::{Result, RulesError};
use crate::layout::{HousingConstraints, DEFAULT_BIOME};

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulatorConfig {
    /// Houses created for a fresh layout (capped at the number of known biomes).
    pub default_house_count: usize,

    /// Biome given to new houses when the dataset names no biomes.
    pub fallback_biome: String,

    /// Dataset files merged in order; later files override earlier records.
    pub datasets: Vec<PathBuf>,

    pub optimizer: OptimizerConfig,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            default_house_count: 8,
            fallback_biome: DEFAULT_BIOME.to_string(),
            datasets: Vec::new(),
            optimizer: OptimizerConfig::default(),
        }
    }
}

impl SimulatorConfig {
    pub fn from_toml_str(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| RulesError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    /// Load and merge every configured dataset.
    pub fn load_datasets(&self) -> Result<PreferenceDataset> {
        let mut merged = PreferenceDataset::new();
        for path in &self.datasets {
            merged.merge(PreferenceDataset::load(path)?);
        }
        info!(
            files = self.datasets.len(),
            npcs = merged.len(),
            "merged preference datasets"
        );
        Ok(merged)
    }
}

/// Simulated annealing settings for the housing optimiser.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizerConfig {
    /// Iterations per restart.
    pub iterations: usize,

    pub initial_temperature: f64,

    /// Multiplied into the temperature after every iteration.
    pub cooling_rate: f64,

    /// Temperature resets per restart.
    pub reheat_cycles: usize,

    /// Independent runs; the best one wins.
    pub restarts: usize,

    /// Chance of moving one NPC instead of swapping two.
    pub move_probability: f64,

    pub min_occupants: usize,

    /// NPC -> biome it must live in.
    pub pins: BTreeMap<NpcId, String>,

    pub seed: u64,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        let mut pins = BTreeMap::new();
        pins.insert(NpcId::from("truffle"), "mushroom".to_string());

        Self {
            iterations: 10_000,
            initial_temperature: 0.05,
            cooling_rate: 0.9995,
            reheat_cycles: 3,
            restarts: 1,
            move_probability: 0.3,
            min_occupants: 2,
            pins,
            seed: 0,
        }
    }
}

impl OptimizerConfig {
    /// Constraints every optimised layout must satisfy.
    pub fn constraints(&self) -> HousingConstraints {
        HousingConstraints {
            min_occupants: self.min_occupants,
            unique_biomes: true,
            pins: self.pins.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = SimulatorConfig::from_toml_str("").unwrap();
        assert_eq!(config, SimulatorConfig::default());
        assert_eq!(config.default_house_count, 8);
        assert_eq!(config.fallback_biome, "forest");
        assert_eq!(
            config.optimizer.pins.get("truffle").map(String::as_str),
            Some("mushroom")
        );
    }

    #[test]
    fn test_partial_document() {
        let config = SimulatorConfig::from_toml_str(
            r#"
            default_house_count = 4
            datasets = ["vanilla.json", "calamity.json"]

            [optimizer]
            iterations = 500
            seed = 42

            [optimizer.pins]
            sea_king = "sulphur"
            "#,
        )
        .unwrap();

        assert_eq!(config.default_house_count, 4);
        assert_eq!(config.datasets.len(), 2);
        assert_eq!(config.optimizer.iterations, 500);
        assert_eq!(config.optimizer.seed, 42);
        assert_eq!(config.optimizer.min_occupants, 2);
        assert_eq!(config.optimizer.pins.len(), 1);
        assert!(config.optimizer.pins.contains_key("sea_king"));
    }

    #[test]
    fn test_invalid_toml_is_error() {
        let err = SimulatorConfig::from_toml_str("default_house_count = \"many\"").unwrap_err();
        assert!(matches!(err, RulesError::Toml(_)));
    }

    #[test]
    fn test_missing_dataset_file_is_io_error() {
        let config = SimulatorConfig {
            datasets: vec![PathBuf::from("definitely/not/here.json")],
            ..SimulatorConfig::default()
        };
        assert!(matches!(config.load_datasets(), Err(RulesError::Io { .. })));
    }
}
