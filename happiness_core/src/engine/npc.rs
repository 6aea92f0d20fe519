//! Per-NPC price computation.

use housing_rules::{
    display_name, House, Layout, NpcId, PreferenceDataset, PriceModifier, Prices,
    COMFORTABLE_NEIGHBOURS, LONELY_BUY_PRICE, LONELY_MIN_NEIGHBOURS, LONELY_SELL_PRICE,
    LOVED_NEIGHBOUR_LIMIT,
};
use tracing::warn;

use super::neighbors::adjacent_occupied_houses;
use super::NpcResult;

/// Collects multipliers and their explanations in evaluation order.
struct Tally {
    prices: Prices,
    factors: Vec<String>,
}

impl Tally {
    fn new() -> Self {
        Self {
            prices: Prices::default(),
            factors: Vec::new(),
        }
    }

    fn apply(&mut self, modifier: PriceModifier, factor: String) {
        self.prices.apply(modifier);
        self.factors.push(factor);
    }

    fn finish(self) -> NpcResult {
        let prices = self.prices.rounded();
        NpcResult {
            buy_price: prices.buy,
            sell_price: prices.sell,
            factors: self.factors,
        }
    }
}

/// Compute one NPC's prices while living in `house`.
///
/// Order of evaluation:
/// 1. biome
/// 2. solitude / overcrowding (a lonely-hater with too few housemates stops here)
/// 3. lonely-hater love for the first housemates
/// 4. relationships with each housemate
/// 5. relationships with NPCs in adjacent houses
///
/// Unknown NPCs get neutral prices and no factors.
pub fn compute_npc(
    npc_id: &str,
    house: &House,
    layout: &Layout,
    dataset: &PreferenceDataset,
) -> NpcResult {
    let Some(npc) = dataset.get(npc_id) else {
        warn!(npc = npc_id, house = %house.id, "no preferences for NPC, treating as neutral");
        return NpcResult::neutral();
    };
    let lonely_hater = npc.is_lonely_hater();
    let mut tally = Tally::new();

    if !lonely_hater {
        let affinity = npc.biome_affinity(&house.biome);
        if let Some(modifier) = affinity.modifier() {
            let factor = format!("{} {} biome", affinity.label(), display_name(&house.biome));
            tally.apply(modifier, factor);
        }
    }

    let neighbours: Vec<&NpcId> = house
        .occupants
        .iter()
        .filter(|o| o.as_str() != npc_id)
        .collect();
    let count = neighbours.len();

    if lonely_hater && count < LONELY_MIN_NEIGHBOURS {
        tally.prices = Prices::new(LONELY_BUY_PRICE, LONELY_SELL_PRICE);
        tally
            .factors
            .push(format!("Princess solitude penalty: Only {} neighbours", count));
        return tally.finish();
    } else if count < COMFORTABLE_NEIGHBOURS {
        tally.apply(
            PriceModifier::SOLITUDE,
            format!("Solitude bonus: Only {} neighbours", count),
        );
    } else if count > COMFORTABLE_NEIGHBOURS {
        tally
            .prices
            .apply_times(PriceModifier::OVERCROWDING, count - COMFORTABLE_NEIGHBOURS);
        tally
            .factors
            .push(format!("Overcrowding penalty: {} neighbours", count));
    }

    if lonely_hater {
        for neighbour in neighbours.iter().take(LOVED_NEIGHBOUR_LIMIT) {
            tally.apply(
                PriceModifier::LOVED_NEIGHBOUR,
                format!(
                    "Princess loves up to 3 neighbours ({})",
                    display_name(neighbour.as_str())
                ),
            );
        }
    }

    for neighbour in &neighbours {
        let affinity = npc.npc_affinity(neighbour.as_str());
        if let Some(modifier) = affinity.modifier() {
            let factor = format!("{} {}", affinity.label(), display_name(neighbour.as_str()));
            tally.apply(modifier, factor);
        }
    }

    for adjacent in adjacent_occupied_houses(layout, house.id) {
        for other in &adjacent.occupants {
            let name = display_name(other.as_str());
            if lonely_hater {
                tally.apply(
                    PriceModifier::LIKED_NEARBY,
                    format!("Princess likes nearby {}", name),
                );
                continue;
            }

            let affinity = npc.npc_affinity(other.as_str());
            if let Some(modifier) = affinity.nearby_modifier() {
                tally.apply(modifier, format!("{} {} next door", affinity.label(), name));
            }
        }
    }

    tally.finish()
}
