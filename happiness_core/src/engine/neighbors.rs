//! House adjacency.
//!
//! Houses sit on a line ordered by id. A house's neighbours are the houses directly before
//! and after it, and only when they are occupied. An empty house is not skipped over.

use housing_rules::{House, HouseId, Layout};

/// Occupied houses adjacent to `house_id`, left first.
pub fn adjacent_occupied_houses(layout: &Layout, house_id: HouseId) -> Vec<&House> {
    let sorted = layout.sorted_houses();
    let Some(index) = sorted.iter().position(|h| h.id == house_id) else {
        return Vec::new();
    };

    let left = index.checked_sub(1).and_then(|i| sorted.get(i));
    let right = sorted.get(index + 1);

    [left, right]
        .into_iter()
        .flatten()
        .filter(|h| !h.is_empty())
        .copied()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use housing_rules::NpcId;

    fn house(id: u32, npcs: &[&str]) -> House {
        let mut house = House::new(HouseId(id), "forest");
        house.occupants = npcs.iter().map(|n| NpcId::from(*n)).collect();
        house
    }

    fn ids(houses: Vec<&House>) -> Vec<u32> {
        houses.iter().map(|h| h.id.0).collect()
    }

    #[test]
    fn test_both_sides() {
        let layout = Layout::from_houses(vec![
            house(2, &["nurse"]),
            house(0, &["guide"]),
            house(1, &["merchant"]),
        ]);
        assert_eq!(ids(adjacent_occupied_houses(&layout, HouseId(1))), vec![0, 2]);
        assert_eq!(ids(adjacent_occupied_houses(&layout, HouseId(0))), vec![1]);
    }

    #[test]
    fn test_empty_neighbour_is_not_skipped() {
        let layout = Layout::from_houses(vec![
            house(0, &["guide"]),
            house(1, &[]),
            house(2, &["merchant"]),
        ]);
        assert!(adjacent_occupied_houses(&layout, HouseId(0)).is_empty());
        assert!(adjacent_occupied_houses(&layout, HouseId(2)).is_empty());
    }

    #[test]
    fn test_adjacency_uses_sorted_position_not_id_gap() {
        let layout = Layout::from_houses(vec![house(3, &["guide"]), house(10, &["merchant"])]);
        assert_eq!(ids(adjacent_occupied_houses(&layout, HouseId(3))), vec![10]);
    }

    #[test]
    fn test_unknown_house() {
        let layout = Layout::from_houses(vec![house(0, &["guide"])]);
        assert!(adjacent_occupied_houses(&layout, HouseId(7)).is_empty());
    }
}
