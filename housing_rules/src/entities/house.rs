//! House definitions.

use serde::{Deserialize, Serialize};

use super::{HouseId, NpcId};

fn default_price() -> f64 {
    1.0
}

/// A placed dwelling: one biome and an ordered list of occupants.
///
/// `buy_price`, `sell_price` and `pylon_eligible` are derived by the engine and written back
/// after every recomputation; they are never edited directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct House {
    pub id: HouseId,
    pub biome: String,
    #[serde(default)]
    pub occupants: Vec<NpcId>,

    #[serde(default = "default_price")]
    pub buy_price: f64,
    #[serde(default = "default_price")]
    pub sell_price: f64,
    #[serde(default)]
    pub pylon_eligible: bool,
}

impl House {
    /// Create an empty house.
    pub fn new(id: HouseId, biome: impl Into<String>) -> Self {
        Self {
            id,
            biome: biome.into(),
            occupants: Vec::new(),
            buy_price: 1.0,
            sell_price: 1.0,
            pylon_eligible: false,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.occupants.is_empty()
    }

    pub fn contains(&self, npc: &str) -> bool {
        self.occupants.iter().any(|o| o.as_str() == npc)
    }

    /// Restore the derived outputs to their empty-house values.
    pub fn reset_prices(&mut self) {
        self.buy_price = 1.0;
        self.sell_price = 1.0;
        self.pylon_eligible = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_house_is_empty() {
        let house = House::new(HouseId(3), "forest");
        assert!(house.is_empty());
        assert_eq!(house.buy_price, 1.0);
        assert_eq!(house.sell_price, 1.0);
        assert!(!house.pylon_eligible);
    }

    #[test]
    fn test_derived_fields_default_when_missing() {
        let house: House =
            serde_json::from_str(r#"{"id": 2, "biome": "snow", "occupants": ["guide"]}"#).unwrap();
        assert_eq!(house.id, HouseId(2));
        assert!(house.contains("guide"));
        assert_eq!(house.buy_price, 1.0);
        assert_eq!(house.sell_price, 1.0);
    }
}
