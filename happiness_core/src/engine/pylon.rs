//! Pylon eligibility.

use housing_rules::{PreferenceDataset, PYLON_BUY_THRESHOLD, PYLON_MIN_OCCUPANTS};

use super::OccupantResult;

/// A house can hold a pylon when it has at least two occupants and one of its shop owners
/// sells at a buy price of 0.9 or lower.
pub fn check_pylon_eligibility(occupants: &[OccupantResult], dataset: &PreferenceDataset) -> bool {
    if occupants.len() < PYLON_MIN_OCCUPANTS {
        return false;
    }

    occupants
        .iter()
        .filter(|o| dataset.get(o.npc.as_str()).is_some_and(|npc| npc.has_shop))
        .any(|o| o.result.buy_price <= PYLON_BUY_THRESHOLD)
}
