//! The house layout - the mutable board the player edits.
//!
//! Every mutation is a no-op on unknown ids and reports whether it changed anything.
//! Houses keep their insertion order here; neighbour rules always go by ascending id.

mod biomes;
mod validate;

pub use biomes::*;
pub use validate::*;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::SimulatorConfig;
use crate::entities::{House, HouseId, NpcId};

/// All houses on the board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Layout {
    houses: Vec<House>,

    /// Next id to hand out. May be stale after deserialisation; see [`Layout::add_house`].
    #[serde(default)]
    next_house_id: u32,
}

impl Layout {
    /// Create an empty layout.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a layout from existing houses (e.g. a saved board).
    pub fn from_houses(houses: Vec<House>) -> Self {
        let next_house_id = houses
            .iter()
            .map(|h| h.id.0.saturating_add(1))
            .max()
            .unwrap_or(0);
        Self {
            houses,
            next_house_id,
        }
    }

    /// Create a layout with `count` houses, capped at one per known biome.
    pub fn with_default_houses(known_biomes: &[String], count: usize) -> Self {
        let mut layout = Self::new();
        for _ in 0..count.min(known_biomes.len()) {
            layout.add_house(known_biomes);
        }
        layout
    }

    /// Fresh layout sized by `config.default_house_count`. With no known biomes a
    /// single house is created in `config.fallback_biome`.
    pub fn from_config(config: &SimulatorConfig, known_biomes: &[String]) -> Self {
        let count = config.default_house_count.min(known_biomes.len().max(1));
        let mut layout = Self::new();
        for _ in 0..count {
            layout.add_house_or(known_biomes, &config.fallback_biome);
        }
        layout
    }

    pub fn houses(&self) -> &[House] {
        &self.houses
    }

    /// Houses ordered by ascending id.
    pub fn sorted_houses(&self) -> Vec<&House> {
        let mut houses: Vec<&House> = self.houses.iter().collect();
        houses.sort_by_key(|h| h.id);
        houses
    }

    pub fn house(&self, id: HouseId) -> Option<&House> {
        self.houses.iter().find(|h| h.id == id)
    }

    fn house_mut(&mut self, id: HouseId) -> Option<&mut House> {
        self.houses.iter_mut().find(|h| h.id == id)
    }

    pub fn len(&self) -> usize {
        self.houses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.houses.is_empty()
    }

    /// House currently holding `npc`.
    pub fn house_of(&self, npc: &str) -> Option<&House> {
        self.houses.iter().find(|h| h.contains(npc))
    }

    /// Every placed NPC, in house order.
    pub fn occupied_npcs(&self) -> impl Iterator<Item = &NpcId> {
        self.houses.iter().flat_map(|h| h.occupants.iter())
    }

    fn allocate_id(&mut self) -> HouseId {
        let floor = self
            .houses
            .iter()
            .map(|h| h.id.0.saturating_add(1))
            .max()
            .unwrap_or(0);
        let id = self.next_house_id.max(floor);
        if self.house(HouseId(id)).is_none() {
            self.next_house_id = id.saturating_add(1);
            return HouseId(id);
        }

        // Only reachable once `u32::MAX` is in use.
        let free = self.lowest_free_id();
        warn!(house = %free, "house ids exhausted, reusing lowest free id");
        free
    }

    fn lowest_free_id(&self) -> HouseId {
        let mut ids: Vec<u32> = self.houses.iter().map(|h| h.id.0).collect();
        ids.sort_unstable();
        let mut free = 0u32;
        for id in ids {
            match id.cmp(&free) {
                std::cmp::Ordering::Equal => free = free.saturating_add(1),
                std::cmp::Ordering::Greater => break,
                std::cmp::Ordering::Less => {}
            }
        }
        HouseId(free)
    }

    /// Add an empty house in the least used known biome.
    pub fn add_house(&mut self, known_biomes: &[String]) -> HouseId {
        let biome = next_unused_biome(known_biomes, &self.houses);
        self.add_house_with_biome(biome)
    }

    /// Like [`Layout::add_house`] but with a custom fallback biome.
    pub fn add_house_or(&mut self, known_biomes: &[String], fallback: &str) -> HouseId {
        let biome = next_unused_biome_or(known_biomes, &self.houses, fallback);
        self.add_house_with_biome(biome)
    }

    /// Add an empty house in a specific biome.
    pub fn add_house_with_biome(&mut self, biome: impl Into<String>) -> HouseId {
        let id = self.allocate_id();
        self.houses.push(House::new(id, biome));
        id
    }

    /// Remove a house and evict its occupants. Ids are never renumbered.
    pub fn remove_house(&mut self, id: HouseId) -> bool {
        let before = self.houses.len();
        self.houses.retain(|h| h.id != id);
        let removed = self.houses.len() != before;
        if !removed {
            warn!(house = %id, "remove_house: unknown house");
        }
        removed
    }

    /// Move `npc` into `house_id`, leaving any previous house first.
    pub fn place_npc(&mut self, npc: impl Into<NpcId>, house_id: HouseId) -> bool {
        let npc = npc.into();
        let Some(target) = self.house(house_id) else {
            warn!(house = %house_id, npc = %npc, "place_npc: unknown house");
            return false;
        };
        if target.contains(npc.as_str()) {
            return false;
        }

        for house in self.houses.iter_mut().filter(|h| h.id != house_id) {
            let before = house.occupants.len();
            house.occupants.retain(|o| *o != npc);
            if house.occupants.len() != before && house.is_empty() {
                house.reset_prices();
            }
        }

        match self.house_mut(house_id) {
            Some(target) => {
                target.occupants.push(npc);
                true
            }
            None => false,
        }
    }

    /// Remove one occupant, or everyone when `npc` is `None`.
    pub fn remove_npc(&mut self, house_id: HouseId, npc: Option<&str>) -> bool {
        let Some(house) = self.house_mut(house_id) else {
            warn!(house = %house_id, "remove_npc: unknown house");
            return false;
        };

        let before = house.occupants.len();
        match npc {
            Some(npc) => house.occupants.retain(|o| o.as_str() != npc),
            None => house.occupants.clear(),
        }
        let changed = house.occupants.len() != before;
        if house.is_empty() {
            house.reset_prices();
        }
        changed
    }

    /// Change a house's biome. The biome is not checked against the known list.
    pub fn change_biome(&mut self, house_id: HouseId, biome: impl Into<String>) -> bool {
        match self.house_mut(house_id) {
            Some(house) => {
                house.biome = biome.into();
                true
            }
            None => {
                warn!(house = %house_id, "change_biome: unknown house");
                false
            }
        }
    }

    /// Swap two placed NPCs, each taking the other's slot.
    /// Does nothing if either is unplaced or both share a house.
    pub fn swap_npcs(&mut self, a: &str, b: &str) -> bool {
        let (Some((house_a, slot_a)), Some((house_b, slot_b))) = (self.slot_of(a), self.slot_of(b))
        else {
            return false;
        };
        if house_a == house_b {
            return false;
        }

        let npc_a = std::mem::replace(&mut self.houses[house_a].occupants[slot_a], NpcId::from(b));
        self.houses[house_b].occupants[slot_b] = npc_a;
        true
    }

    /// (house index, occupant index) of a placed NPC.
    fn slot_of(&self, npc: &str) -> Option<(usize, usize)> {
        self.houses.iter().enumerate().find_map(|(house_idx, house)| {
            house
                .occupants
                .iter()
                .position(|o| o.as_str() == npc)
                .map(|slot| (house_idx, slot))
        })
    }

    /// Store engine output on a house.
    pub fn set_house_summary(
        &mut self,
        house_id: HouseId,
        buy_price: f64,
        sell_price: f64,
        pylon_eligible: bool,
    ) -> bool {
        match self.house_mut(house_id) {
            Some(house) => {
                house.buy_price = buy_price;
                house.sell_price = sell_price;
                house.pylon_eligible = pylon_eligible;
                true
            }
            None => false,
        }
    }
}
