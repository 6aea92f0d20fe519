//! Game mechanics: the affinity scale, price multipliers, and house thresholds.

use serde::{Deserialize, Serialize};

/// Buy price for a lonely-hater NPC with too few housemates (replaces everything before it).
pub const LONELY_BUY_PRICE: f64 = 1.5;
/// Sell price for a lonely-hater NPC with too few housemates.
pub const LONELY_SELL_PRICE: f64 = 0.5;
/// Housemates below which a lonely-hater NPC is penalised.
pub const LONELY_MIN_NEIGHBOURS: usize = 2;
/// Housemates a lonely-hater NPC loves unconditionally.
pub const LOVED_NEIGHBOUR_LIMIT: usize = 3;
/// Housemate count with neither solitude bonus nor crowding penalty.
pub const COMFORTABLE_NEIGHBOURS: usize = 3;
/// A shop owner at or below this buy price unlocks the pylon.
pub const PYLON_BUY_THRESHOLD: f64 = 0.9;
/// Occupants a house needs before a pylon is possible.
pub const PYLON_MIN_OCCUPANTS: usize = 2;

/// The five-step preference scale used for biomes and relationships.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum Affinity {
    Hates,
    Dislikes,
    #[default]
    Neutral,
    Likes,
    Loves,
}

/// Integer outside the -2..=2 affinity scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("affinity {0} is outside -2..=2")]
pub struct AffinityOutOfRange(pub i64);

impl TryFrom<i64> for Affinity {
    type Error = AffinityOutOfRange;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            -2 => Ok(Affinity::Hates),
            -1 => Ok(Affinity::Dislikes),
            0 => Ok(Affinity::Neutral),
            1 => Ok(Affinity::Likes),
            2 => Ok(Affinity::Loves),
            other => Err(AffinityOutOfRange(other)),
        }
    }
}

impl From<Affinity> for i64 {
    fn from(affinity: Affinity) -> Self {
        affinity.value()
    }
}

impl Affinity {
    pub fn value(&self) -> i64 {
        match self {
            Affinity::Hates => -2,
            Affinity::Dislikes => -1,
            Affinity::Neutral => 0,
            Affinity::Likes => 1,
            Affinity::Loves => 2,
        }
    }

    /// Verb used in factor text ("Loves Forest biome").
    pub fn label(&self) -> &'static str {
        match self {
            Affinity::Hates => "Hates",
            Affinity::Dislikes => "Dislikes",
            Affinity::Neutral => "Neutral",
            Affinity::Likes => "Likes",
            Affinity::Loves => "Loves",
        }
    }

    /// Multiplier for a biome or a housemate. `None` when neutral.
    pub fn modifier(&self) -> Option<PriceModifier> {
        match self {
            Affinity::Hates => Some(PriceModifier::HATES),
            Affinity::Dislikes => Some(PriceModifier::DISLIKES),
            Affinity::Neutral => None,
            Affinity::Likes => Some(PriceModifier::LIKES),
            Affinity::Loves => Some(PriceModifier::LOVES),
        }
    }

    /// Weaker multiplier for an NPC living in an adjacent house.
    /// Loves and likes share one tier, as do hates and dislikes.
    pub fn nearby_modifier(&self) -> Option<PriceModifier> {
        match self {
            Affinity::Hates | Affinity::Dislikes => Some(PriceModifier::NEARBY_HOSTILE),
            Affinity::Neutral => None,
            Affinity::Likes | Affinity::Loves => Some(PriceModifier::NEARBY_FRIENDLY),
        }
    }
}

/// A buy/sell multiplier pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceModifier {
    pub buy: f64,
    pub sell: f64,
}

impl PriceModifier {
    pub const LOVES: Self = Self::new(0.88, 1.14);
    pub const LIKES: Self = Self::new(0.94, 1.06);
    pub const DISLIKES: Self = Self::new(1.06, 0.94);
    pub const HATES: Self = Self::new(1.12, 0.89);

    pub const SOLITUDE: Self = Self::new(0.95, 1.05);
    /// Applied once per housemate beyond the comfortable count.
    pub const OVERCROWDING: Self = Self::new(1.05, 0.95);

    pub const NEARBY_FRIENDLY: Self = Self::new(0.94, 1.06);
    pub const NEARBY_HOSTILE: Self = Self::new(1.06, 0.94);

    /// Lonely-hater bonus per loved housemate.
    pub const LOVED_NEIGHBOUR: Self = Self::new(0.88, 1.14);
    /// Lonely-hater bonus per NPC next door, whatever the relationship.
    pub const LIKED_NEARBY: Self = Self::new(0.94, 1.14);

    pub const fn new(buy: f64, sell: f64) -> Self {
        Self { buy, sell }
    }
}

/// Running buy/sell multipliers for one NPC.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Prices {
    pub buy: f64,
    pub sell: f64,
}

impl Default for Prices {
    fn default() -> Self {
        Self { buy: 1.0, sell: 1.0 }
    }
}

impl Prices {
    pub fn new(buy: f64, sell: f64) -> Self {
        Self { buy, sell }
    }

    pub fn apply(&mut self, modifier: PriceModifier) {
        self.buy *= modifier.buy;
        self.sell *= modifier.sell;
    }

    /// Apply the same modifier `times` times (compounded).
    pub fn apply_times(&mut self, modifier: PriceModifier, times: usize) {
        for _ in 0..times {
            self.apply(modifier);
        }
    }

    pub fn rounded(&self) -> Self {
        Self {
            buy: round_price(self.buy),
            sell: round_price(self.sell),
        }
    }
}

/// Round a price multiplier to two decimal places.
pub fn round_price(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_affinity_scale_bounds() {
        assert_eq!(Affinity::try_from(2), Ok(Affinity::Loves));
        assert_eq!(Affinity::try_from(-2), Ok(Affinity::Hates));
        assert_eq!(Affinity::try_from(3), Err(AffinityOutOfRange(3)));
        assert_eq!(Affinity::default(), Affinity::Neutral);
    }

    #[test]
    fn test_affinity_serializes_as_integer() {
        let json = serde_json::to_string(&Affinity::Dislikes).unwrap();
        assert_eq!(json, "-1");
        assert!(serde_json::from_str::<Affinity>("5").is_err());
    }

    #[test]
    fn test_same_house_tiers() {
        assert_eq!(Affinity::Loves.modifier(), Some(PriceModifier::new(0.88, 1.14)));
        assert_eq!(Affinity::Likes.modifier(), Some(PriceModifier::new(0.94, 1.06)));
        assert_eq!(Affinity::Dislikes.modifier(), Some(PriceModifier::new(1.06, 0.94)));
        assert_eq!(Affinity::Hates.modifier(), Some(PriceModifier::new(1.12, 0.89)));
        assert_eq!(Affinity::Neutral.modifier(), None);
    }

    #[test]
    fn test_nearby_tiers_ignore_intensity() {
        assert_eq!(Affinity::Loves.nearby_modifier(), Affinity::Likes.nearby_modifier());
        assert_eq!(Affinity::Hates.nearby_modifier(), Affinity::Dislikes.nearby_modifier());
        assert_eq!(
            Affinity::Loves.nearby_modifier(),
            Some(PriceModifier::new(0.94, 1.06))
        );
        assert_eq!(Affinity::Neutral.nearby_modifier(), None);
    }

    #[test]
    fn test_prices_compound() {
        let mut prices = Prices::default();
        prices.apply_times(PriceModifier::OVERCROWDING, 2);
        assert!((prices.buy - 1.1025).abs() < 1e-9);
        assert!((prices.sell - 0.9025).abs() < 1e-9);
    }

    #[test]
    fn test_round_price() {
        assert_eq!(round_price(0.836), 0.84);
        assert_eq!(round_price(1.197), 1.2);
        assert_eq!(round_price(1.5), 1.5);
    }
}
