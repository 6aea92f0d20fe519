//! Default biome selection for newly created houses.

use std::collections::HashMap;

use crate::entities::House;

/// Biome handed out when no biomes are known at all.
pub const DEFAULT_BIOME: &str = "forest";

/// Pick the least used biome among `houses`, falling back to [`DEFAULT_BIOME`].
pub fn next_unused_biome(known_biomes: &[String], houses: &[House]) -> String {
    next_unused_biome_or(known_biomes, houses, DEFAULT_BIOME)
}

/// Pick the least used biome among `houses`. Ties go to the biome listed first in
/// `known_biomes`. Houses with biomes outside `known_biomes` are not counted.
pub fn next_unused_biome_or(known_biomes: &[String], houses: &[House], fallback: &str) -> String {
    let mut usage: HashMap<&str, usize> = known_biomes.iter().map(|b| (b.as_str(), 0)).collect();
    for house in houses {
        if let Some(count) = usage.get_mut(house.biome.as_str()) {
            *count += 1;
        }
    }

    let mut best: Option<(&str, usize)> = None;
    for biome in known_biomes {
        let count = usage.get(biome.as_str()).copied().unwrap_or(0);
        match best {
            Some((_, best_count)) if best_count <= count => {}
            _ => best = Some((biome.as_str(), count)),
        }
    }

    best.map(|(biome, _)| biome.to_string())
        .unwrap_or_else(|| fallback.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::HouseId;

    fn biomes(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn houses(names: &[&str]) -> Vec<House> {
        names
            .iter()
            .enumerate()
            .map(|(i, biome)| House::new(HouseId(i as u32), *biome))
            .collect()
    }

    #[test]
    fn test_picks_least_used() {
        let known = biomes(&["forest", "desert", "snow"]);
        let existing = houses(&["forest", "desert", "forest", "snow", "desert"]);
        assert_eq!(next_unused_biome(&known, &existing), "snow");
    }

    #[test]
    fn test_tie_goes_to_first_listed() {
        let known = biomes(&["jungle", "ocean", "hallow"]);
        assert_eq!(next_unused_biome(&known, &[]), "jungle");

        let existing = houses(&["jungle"]);
        assert_eq!(next_unused_biome(&known, &existing), "ocean");
    }

    #[test]
    fn test_unknown_house_biomes_are_ignored() {
        let known = biomes(&["forest", "desert"]);
        let existing = houses(&["mushroom", "forest"]);
        assert_eq!(next_unused_biome(&known, &existing), "desert");
    }

    #[test]
    fn test_fallback_when_no_biomes_known() {
        assert_eq!(next_unused_biome(&[], &houses(&["snow"])), DEFAULT_BIOME);
        assert_eq!(next_unused_biome_or(&[], &[], "ocean"), "ocean");
    }
}
