//! NPC preference records.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::NpcId;
use crate::mechanics::Affinity;

/// Behaviour overrides that replace the generic happiness rules for an NPC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SpecialBehavior {
    #[default]
    None,
    /// Ignores biomes, loves up to three housemates, likes everyone next door,
    /// and is miserable with fewer than two housemates.
    #[serde(alias = "princess")]
    LovesAllNeighborsLonelyHater,
}

/// Everything the engine knows about one NPC.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NpcPreferences {
    pub id: NpcId,

    /// Biome name -> affinity. Missing biomes are neutral.
    pub biome: BTreeMap<String, Affinity>,

    /// Other NPC -> affinity. Missing NPCs are neutral.
    pub npc: BTreeMap<NpcId, Affinity>,

    /// Whether this NPC runs a shop (only matters for pylon eligibility).
    pub has_shop: bool,

    pub special: SpecialBehavior,
}

impl NpcPreferences {
    /// Create a record with no preferences.
    pub fn new(id: impl Into<NpcId>) -> Self {
        Self {
            id: id.into(),
            biome: BTreeMap::new(),
            npc: BTreeMap::new(),
            has_shop: false,
            special: SpecialBehavior::None,
        }
    }

    pub fn with_biome(mut self, biome: impl Into<String>, affinity: Affinity) -> Self {
        self.biome.insert(biome.into(), affinity);
        self
    }

    /// Add a relationship. Relationships to self are ignored.
    pub fn with_npc(mut self, other: impl Into<NpcId>, affinity: Affinity) -> Self {
        let other = other.into();
        if other != self.id {
            self.npc.insert(other, affinity);
        }
        self
    }

    pub fn with_shop(mut self, has_shop: bool) -> Self {
        self.has_shop = has_shop;
        self
    }

    pub fn with_special(mut self, special: SpecialBehavior) -> Self {
        self.special = special;
        self
    }

    /// Affinity towards a biome.
    pub fn biome_affinity(&self, biome: &str) -> Affinity {
        self.biome.get(biome).copied().unwrap_or_default()
    }

    /// Affinity towards another NPC.
    pub fn npc_affinity(&self, other: &str) -> Affinity {
        self.npc.get(other).copied().unwrap_or_default()
    }

    pub fn is_lonely_hater(&self) -> bool {
        self.special == SpecialBehavior::LovesAllNeighborsLonelyHater
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_entries_are_neutral() {
        let npc = NpcPreferences::new("guide").with_biome("forest", Affinity::Loves);
        assert_eq!(npc.biome_affinity("forest"), Affinity::Loves);
        assert_eq!(npc.biome_affinity("desert"), Affinity::Neutral);
        assert_eq!(npc.npc_affinity("merchant"), Affinity::Neutral);
    }

    #[test]
    fn test_self_relationship_is_dropped() {
        let npc = NpcPreferences::new("guide")
            .with_npc("guide", Affinity::Loves)
            .with_npc("merchant", Affinity::Likes);
        assert_eq!(npc.npc.len(), 1);
        assert_eq!(npc.npc_affinity("guide"), Affinity::Neutral);
    }

    #[test]
    fn test_special_behavior_accepts_princess_alias() {
        let special: SpecialBehavior = serde_json::from_str("\"princess\"").unwrap();
        assert_eq!(special, SpecialBehavior::LovesAllNeighborsLonelyHater);
        let special: SpecialBehavior = serde_json::from_str("\"none\"").unwrap();
        assert_eq!(special, SpecialBehavior::None);
    }
}
