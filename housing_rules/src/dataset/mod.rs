//! Preference dataset - the static NPC preference table the engine reads from.
//!
//! The JSON shape is one object per NPC id:
//!
//! ```json
//! { "guide": { "biome": { "forest": 2 }, "npc": { "merchant": 1 }, "has_shop": false } }
//! ```
//!
//! Missing tables, biomes and relationships read as neutral.

use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use tracing::info;

use crate::entities::{NpcId, NpcPreferences, SpecialBehavior};
use crate::error::{Result, RulesError};
use crate::mechanics::Affinity;

/// Canonical id of the NPC that gets the lonely-hater behaviour by default.
pub const LONELY_HATER_ID: &str = "princess";

#[derive(Debug, Deserialize)]
struct RawNpcRecord {
    #[serde(default)]
    biome: BTreeMap<String, i64>,
    #[serde(default)]
    npc: BTreeMap<String, i64>,
    #[serde(default, alias = "hasShop")]
    has_shop: bool,
    #[serde(default)]
    special: Option<SpecialBehavior>,
}

impl RawNpcRecord {
    fn into_preferences(self, id: String) -> Result<NpcPreferences> {
        let special = self.special.unwrap_or(if id == LONELY_HATER_ID {
            SpecialBehavior::LovesAllNeighborsLonelyHater
        } else {
            SpecialBehavior::None
        });

        let mut record = NpcPreferences::new(id.as_str())
            .with_shop(self.has_shop)
            .with_special(special);

        for (biome, value) in self.biome {
            let affinity = parse_affinity(&id, &biome, value)?;
            record = record.with_biome(biome, affinity);
        }
        for (other, value) in self.npc {
            let affinity = parse_affinity(&id, &other, value)?;
            record = record.with_npc(other, affinity);
        }

        Ok(record)
    }
}

fn parse_affinity(npc: &str, target: &str, value: i64) -> Result<Affinity> {
    Affinity::try_from(value).map_err(|_| RulesError::InvalidAffinity {
        npc: npc.to_string(),
        target: target.to_string(),
        value,
    })
}

/// Immutable lookup table from NPC id to preferences.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PreferenceDataset {
    records: BTreeMap<NpcId, NpcPreferences>,
}

impl PreferenceDataset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a dataset from a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let raw: BTreeMap<String, RawNpcRecord> = serde_json::from_str(json)?;
        Self::from_raw(raw)
    }

    /// Build a dataset from an already parsed JSON value.
    pub fn from_json_value(value: serde_json::Value) -> Result<Self> {
        let raw: BTreeMap<String, RawNpcRecord> = serde_json::from_value(value)?;
        Self::from_raw(raw)
    }

    /// Read and parse a dataset file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| RulesError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let dataset = Self::from_json_str(&json)?;
        info!(path = %path.display(), npcs = dataset.len(), "loaded preference dataset");
        Ok(dataset)
    }

    fn from_raw(raw: BTreeMap<String, RawNpcRecord>) -> Result<Self> {
        let mut dataset = Self::new();
        for (id, record) in raw {
            dataset.insert(record.into_preferences(id)?);
        }
        Ok(dataset)
    }

    /// Add or replace a record.
    pub fn insert(&mut self, record: NpcPreferences) {
        self.records.insert(record.id.clone(), record);
    }

    /// Overlay another dataset; its records replace ours on id clashes.
    pub fn merge(&mut self, other: PreferenceDataset) {
        self.records.extend(other.records);
    }

    pub fn get(&self, id: &str) -> Option<&NpcPreferences> {
        self.records.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.records.contains_key(id)
    }

    /// All NPC ids in ascending order.
    pub fn npc_ids(&self) -> impl Iterator<Item = &NpcId> {
        self.records.keys()
    }

    pub fn records(&self) -> impl Iterator<Item = &NpcPreferences> {
        self.records.values()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Every biome mentioned by any record, sorted and deduplicated.
    pub fn known_biomes(&self) -> Vec<String> {
        self.records
            .values()
            .flat_map(|record| record.biome.keys().cloned())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

/// Turn an id such as `tax_collector` into "Tax Collector".
pub fn display_name(id: &str) -> String {
    id.split(['_', '-', ' '])
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}
