//! Housing optimiser - searches for the happiest layout with simulated annealing.
//!
//! The search works on complete layouts with one house per biome. Each step either swaps
//! two NPCs between houses or moves one NPC from a larger house to a smaller one. Candidates
//! that break the housing constraints are discarded; the rest are scored by the engine's
//! average happiness and accepted with the Metropolis rule.

mod moves;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info};

use housing_rules::{HousingConstraints, Layout, NpcId, OptimizerConfig, PreferenceDataset};

use crate::engine::{compute, recompute, LayoutResult};
use moves::{initial_layout, relocate_move, swap_move};

/// Reheat strength: cycle `n` restarts at `initial_temperature * REHEAT_DECAY^n`.
const REHEAT_DECAY: f64 = 0.8;

#[derive(Debug, thiserror::Error)]
pub enum OptimizeError {
    #[error("{npcs} NPCs cannot fill {houses} houses with at least {min_occupants} each")]
    Infeasible {
        npcs: usize,
        houses: usize,
        min_occupants: usize,
    },

    #[error("'{npc}' is pinned to '{biome}', which is not an available biome")]
    UnknownPinBiome { npc: NpcId, biome: String },

    #[error("could not build a starting layout: {}", .issues.join("; "))]
    NoValidLayout { issues: Vec<String> },
}

pub type Result<T> = std::result::Result<T, OptimizeError>;

/// The best layout found and its evaluation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizedLayout {
    /// Layout with house aggregates already written back.
    pub layout: Layout,
    pub result: LayoutResult,
    /// [`LayoutResult::mean_sell_price`] of the best layout.
    pub score: f64,
}

/// Search for the layout with the highest average happiness.
///
/// Deterministic for a fixed `config.seed`.
pub fn optimize(
    dataset: &PreferenceDataset,
    biomes: &[String],
    config: &OptimizerConfig,
) -> Result<OptimizedLayout> {
    let mut unique_biomes: Vec<String> = Vec::with_capacity(biomes.len());
    for biome in biomes {
        if !unique_biomes.contains(biome) {
            unique_biomes.push(biome.clone());
        }
    }

    let houses = unique_biomes.len();
    if houses == 0 || dataset.len() < houses * config.min_occupants {
        return Err(OptimizeError::Infeasible {
            npcs: dataset.len(),
            houses,
            min_occupants: config.min_occupants,
        });
    }

    let mut pins = BTreeMap::new();
    for (npc, biome) in &config.pins {
        if !dataset.contains(npc.as_str()) {
            continue;
        }
        if !unique_biomes.contains(biome) {
            return Err(OptimizeError::UnknownPinBiome {
                npc: npc.clone(),
                biome: biome.clone(),
            });
        }
        pins.insert(npc.clone(), biome.clone());
    }
    let constraints = HousingConstraints {
        pins,
        ..config.constraints()
    };

    info!(
        npcs = dataset.len(),
        houses,
        iterations = config.iterations,
        restarts = config.restarts,
        "starting housing optimisation"
    );

    let mut best: Option<OptimizedLayout> = None;
    for restart in 0..config.restarts.max(1) {
        let mut rng = StdRng::seed_from_u64(config.seed.wrapping_add(restart as u64));
        let candidate = anneal(dataset, &unique_biomes, &constraints, config, &mut rng)?;
        info!(restart, score = candidate.score, "optimisation run finished");

        if best.as_ref().map_or(true, |b| candidate.score > b.score) {
            best = Some(candidate);
        }
    }

    best.ok_or_else(|| OptimizeError::NoValidLayout { issues: Vec::new() })
}

fn score(layout: &Layout, dataset: &PreferenceDataset) -> f64 {
    compute(layout, dataset).mean_sell_price()
}

fn anneal<R: Rng>(
    dataset: &PreferenceDataset,
    biomes: &[String],
    constraints: &HousingConstraints,
    config: &OptimizerConfig,
    rng: &mut R,
) -> Result<OptimizedLayout> {
    let mut current = initial_layout(dataset, biomes, &constraints.pins, rng);
    let issues = constraints.violations(&current);
    if !issues.is_empty() {
        return Err(OptimizeError::NoValidLayout {
            issues: issues.iter().map(ToString::to_string).collect(),
        });
    }

    let mut current_score = score(&current, dataset);
    let mut best = current.clone();
    let mut best_score = current_score;
    let mut accepted = 0usize;
    let mut improvements = 0usize;

    let cycle_len = (config.iterations / config.reheat_cycles.max(1)).max(1);
    let mut temperature = config.initial_temperature;

    for iteration in 0..config.iterations {
        if iteration > 0 && iteration % cycle_len == 0 {
            let cycle = (iteration / cycle_len) as i32;
            temperature = config.initial_temperature * REHEAT_DECAY.powi(cycle);
            debug!(iteration, temperature, best_score, "reheating");
        }

        let mut candidate = current.clone();
        let moved = if rng.gen::<f64>() < config.move_probability {
            relocate_move(&mut candidate, &constraints.pins, config.min_occupants, rng)
        } else {
            swap_move(&mut candidate, &constraints.pins, rng)
        };

        if moved && constraints.is_satisfied(&candidate) {
            let candidate_score = score(&candidate, dataset);
            let delta = candidate_score - current_score;
            let accept = delta >= 0.0
                || (temperature > 0.0 && rng.gen::<f64>() < (delta / temperature).exp());

            if accept {
                current = candidate;
                current_score = candidate_score;
                accepted += 1;

                if current_score > best_score {
                    best = current.clone();
                    best_score = current_score;
                    improvements += 1;
                }
            }
        }

        temperature *= config.cooling_rate;
    }

    debug!(accepted, improvements, best_score, "annealing finished");

    let result = recompute(&mut best, dataset);
    Ok(OptimizedLayout {
        layout: best,
        result,
        score: best_score,
    })
}
