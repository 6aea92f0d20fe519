//! Layout validation against housing constraints.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

use super::Layout;
use crate::entities::{HouseId, NpcId};

/// Constraints a finished layout should satisfy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HousingConstraints {
    /// Minimum occupants per house.
    pub min_occupants: usize,

    /// At most one house per biome.
    pub unique_biomes: bool,

    /// NPC -> biome it must live in. Only checked for NPCs that are placed.
    pub pins: BTreeMap<NpcId, String>,
}

impl Default for HousingConstraints {
    fn default() -> Self {
        Self {
            min_occupants: 2,
            unique_biomes: true,
            pins: BTreeMap::new(),
        }
    }
}

/// A single constraint violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LayoutIssue {
    TooFewOccupants { house: HouseId, occupants: usize },
    DuplicateNpc { npc: NpcId },
    DuplicateBiome { biome: String },
    PinViolated { npc: NpcId, required: String, actual: String },
}

impl std::fmt::Display for LayoutIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LayoutIssue::TooFewOccupants { house, occupants } => {
                write!(f, "house {} has only {} occupants", house, occupants)
            }
            LayoutIssue::DuplicateNpc { npc } => write!(f, "{} lives in more than one house", npc),
            LayoutIssue::DuplicateBiome { biome } => {
                write!(f, "more than one house in the {} biome", biome)
            }
            LayoutIssue::PinViolated {
                npc,
                required,
                actual,
            } => write!(f, "{} must live in {} but lives in {}", npc, required, actual),
        }
    }
}

impl HousingConstraints {
    pub fn with_pin(mut self, npc: impl Into<NpcId>, biome: impl Into<String>) -> Self {
        self.pins.insert(npc.into(), biome.into());
        self
    }

    /// Collect every violation, in house order.
    pub fn violations(&self, layout: &Layout) -> Vec<LayoutIssue> {
        let mut issues = Vec::new();
        let mut seen_npcs = HashSet::new();
        let mut seen_biomes = HashSet::new();

        for house in layout.sorted_houses() {
            if house.occupants.len() < self.min_occupants {
                issues.push(LayoutIssue::TooFewOccupants {
                    house: house.id,
                    occupants: house.occupants.len(),
                });
            }

            if self.unique_biomes && !seen_biomes.insert(house.biome.as_str()) {
                issues.push(LayoutIssue::DuplicateBiome {
                    biome: house.biome.clone(),
                });
            }

            for npc in &house.occupants {
                if !seen_npcs.insert(npc) {
                    issues.push(LayoutIssue::DuplicateNpc { npc: npc.clone() });
                }
                if let Some(required) = self.pins.get(npc) {
                    if *required != house.biome {
                        issues.push(LayoutIssue::PinViolated {
                            npc: npc.clone(),
                            required: required.clone(),
                            actual: house.biome.clone(),
                        });
                    }
                }
            }
        }

        issues
    }

    pub fn is_satisfied(&self, layout: &Layout) -> bool {
        self.violations(layout).is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::House;

    fn house(id: u32, biome: &str, npcs: &[&str]) -> House {
        let mut house = House::new(HouseId(id), biome);
        house.occupants = npcs.iter().map(|n| NpcId::from(*n)).collect();
        house
    }

    #[test]
    fn test_valid_layout() {
        let layout = Layout::from_houses(vec![
            house(0, "mushroom", &["truffle", "guide"]),
            house(1, "forest", &["merchant", "nurse"]),
        ]);
        let constraints = HousingConstraints::default().with_pin("truffle", "mushroom");
        assert!(constraints.is_satisfied(&layout));
    }

    #[test]
    fn test_reports_each_violation() {
        let layout = Layout::from_houses(vec![
            house(0, "forest", &["truffle", "guide"]),
            house(1, "forest", &["guide"]),
        ]);
        let constraints = HousingConstraints::default().with_pin("truffle", "mushroom");
        let issues = constraints.violations(&layout);

        assert!(issues.contains(&LayoutIssue::PinViolated {
            npc: NpcId::from("truffle"),
            required: "mushroom".to_string(),
            actual: "forest".to_string(),
        }));
        assert!(issues.contains(&LayoutIssue::TooFewOccupants {
            house: HouseId(1),
            occupants: 1,
        }));
        assert!(issues.contains(&LayoutIssue::DuplicateBiome {
            biome: "forest".to_string()
        }));
        assert!(issues.contains(&LayoutIssue::DuplicateNpc {
            npc: NpcId::from("guide")
        }));
        assert_eq!(issues.len(), 4);
    }

    #[test]
    fn test_issue_display() {
        let issue = LayoutIssue::TooFewOccupants {
            house: HouseId(3),
            occupants: 1,
        };
        assert_eq!(issue.to_string(), "house 3 has only 1 occupants");
    }
}
