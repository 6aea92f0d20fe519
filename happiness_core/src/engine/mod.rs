//! Happiness engine - turns a layout into prices, factors and pylon flags.
//!
//! The engine keeps no state between calls. Every call recomputes the whole layout,
//! so a freshly deserialised layout yields the same result as a live one.

mod neighbors;
mod npc;
mod pylon;

pub use neighbors::*;
pub use npc::*;
pub use pylon::*;

use housing_rules::{round_price, HouseId, Layout, NpcId, PreferenceDataset};
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Prices and explanations for one NPC.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NpcResult {
    pub buy_price: f64,
    pub sell_price: f64,
    /// Human-readable reasons, in the order they were applied.
    pub factors: Vec<String>,
}

impl NpcResult {
    /// Prices of an NPC nothing applies to.
    pub fn neutral() -> Self {
        Self {
            buy_price: 1.0,
            sell_price: 1.0,
            factors: Vec::new(),
        }
    }
}

/// An occupant and their result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OccupantResult {
    pub npc: NpcId,
    #[serde(flatten)]
    pub result: NpcResult,
}

/// Aggregates for one house.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HouseResult {
    pub house_id: HouseId,
    pub biome: String,
    /// Mean occupant buy price; 1.0 when empty.
    pub buy_price: f64,
    /// Mean occupant sell price; 1.0 when empty.
    pub sell_price: f64,
    pub pylon_eligible: bool,
    /// Same order as the house's occupants.
    pub occupants: Vec<OccupantResult>,
}

impl HouseResult {
    pub fn is_empty(&self) -> bool {
        self.occupants.is_empty()
    }
}

/// Output of one full pass. Houses are ordered by id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct LayoutResult {
    pub houses: Vec<HouseResult>,
}

impl LayoutResult {
    pub fn house(&self, id: HouseId) -> Option<&HouseResult> {
        self.houses.iter().find(|h| h.house_id == id)
    }

    /// Result for a placed NPC.
    pub fn npc(&self, id: &str) -> Option<&NpcResult> {
        self.houses
            .iter()
            .flat_map(|h| h.occupants.iter())
            .find(|o| o.npc.as_str() == id)
            .map(|o| &o.result)
    }

    /// Mean of the (rounded) house sell prices over occupied houses; 0.0 when none are
    /// occupied. Not rounded again.
    pub fn mean_sell_price(&self) -> f64 {
        let occupied: Vec<f64> = self
            .houses
            .iter()
            .filter(|h| !h.is_empty())
            .map(|h| h.sell_price)
            .collect();
        if occupied.is_empty() {
            return 0.0;
        }
        occupied.iter().sum::<f64>() / occupied.len() as f64
    }

    /// Average happiness across occupied houses, rounded to two decimals.
    pub fn average_happiness(&self) -> f64 {
        round_price(self.mean_sell_price())
    }

    pub fn pylon_count(&self) -> usize {
        self.houses.iter().filter(|h| h.pylon_eligible).count()
    }
}

/// Compute every NPC and house in the layout.
pub fn compute(layout: &Layout, dataset: &PreferenceDataset) -> LayoutResult {
    let houses: Vec<HouseResult> = layout
        .sorted_houses()
        .into_iter()
        .map(|house| {
            let occupants: Vec<OccupantResult> = house
                .occupants
                .iter()
                .map(|npc| OccupantResult {
                    npc: npc.clone(),
                    result: compute_npc(npc.as_str(), house, layout, dataset),
                })
                .collect();

            let (buy_price, sell_price) = average_prices(&occupants);
            HouseResult {
                house_id: house.id,
                biome: house.biome.clone(),
                buy_price,
                sell_price,
                pylon_eligible: check_pylon_eligibility(&occupants, dataset),
                occupants,
            }
        })
        .collect();

    let result = LayoutResult { houses };
    trace!(
        houses = result.houses.len(),
        pylons = result.pylon_count(),
        average_happiness = result.average_happiness(),
        "computed layout"
    );
    result
}

/// Run the engine and store house aggregates back on the layout.
pub fn recompute(layout: &mut Layout, dataset: &PreferenceDataset) -> LayoutResult {
    let result = compute(layout, dataset);
    for house in &result.houses {
        layout.set_house_summary(
            house.house_id,
            house.buy_price,
            house.sell_price,
            house.pylon_eligible,
        );
    }
    result
}

fn average_prices(occupants: &[OccupantResult]) -> (f64, f64) {
    if occupants.is_empty() {
        return (1.0, 1.0);
    }
    let count = occupants.len() as f64;
    let buy: f64 = occupants.iter().map(|o| o.result.buy_price).sum();
    let sell: f64 = occupants.iter().map(|o| o.result.sell_price).sum();
    (round_price(buy / count), round_price(sell / count))
}
