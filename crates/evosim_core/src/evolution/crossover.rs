use crate::brain::NetworkLogic;
use crate::config::AppConfig;
use crate::genome::GenomeLogic;
use evosim_data::{Genome, NeuronId};
use rand::Rng;
use std::collections::HashMap;

const DISJOINT_COEFF: f64 = 1.0;
const WEIGHT_COEFF: f64 = 0.5;
const NEURON_COEFF: f64 = 0.3;

/// Copies the fitter parent (ties go to `a`). Each connection pair the other
/// parent also has takes that parent's weight and enabled flag with even odds.
pub fn crossover<R: Rng>(a: &Genome, b: &Genome, rng: &mut R) -> Genome {
    let (primary, secondary) = if b.fitness > a.fitness { (b, a) } else { (a, b) };
    let mut child = primary.copy();

    let donor: HashMap<(NeuronId, NeuronId), (f32, bool)> = secondary
        .network
        .connections
        .iter()
        .map(|c| ((c.from, c.to), (c.weight, c.enabled)))
        .collect();

    for conn in &mut child.network.connections {
        if let Some(&(weight, enabled)) = donor.get(&(conn.from, conn.to)) {
            if rng.gen_bool(0.5) {
                conn.weight = weight;
                conn.enabled = enabled;
            }
        }
    }
    child.network.compile();
    child
}

/// Disjoint-connection share, mean weight difference of shared connections,
/// and neuron count difference, combined linearly.
#[must_use]
pub fn compatibility_distance(a: &Genome, b: &Genome) -> f64 {
    let a_weights: HashMap<(NeuronId, NeuronId), f32> = a
        .network
        .connections
        .iter()
        .map(|c| ((c.from, c.to), c.weight))
        .collect();

    let mut matching = 0usize;
    let mut weight_diff = 0.0f64;
    for c in &b.network.connections {
        if let Some(w) = a_weights.get(&(c.from, c.to)) {
            matching += 1;
            weight_diff += f64::from((w - c.weight).abs());
        }
    }

    let total = a.network.connections.len() + b.network.connections.len();
    let disjoint = total.saturating_sub(2 * matching) as f64;
    let n = a
        .network
        .connections
        .len()
        .max(b.network.connections.len())
        .max(1) as f64;
    let avg_weight_diff = weight_diff / matching.max(1) as f64;
    let neuron_diff = a.network.neuron_count().abs_diff(b.network.neuron_count()) as f64;

    DISJOINT_COEFF * disjoint / n + WEIGHT_COEFF * avg_weight_diff + NEURON_COEFF * neuron_diff
}

/// Mutates each genome with probability `evolution.mutation_rate`.
/// Returns how many were mutated.
pub fn mutate_population<R: Rng>(genomes: &mut [Genome], config: &AppConfig, rng: &mut R) -> usize {
    let mut mutated = 0;
    for genome in genomes.iter_mut() {
        if rng.gen::<f64>() < config.evolution.mutation_rate {
            genome.mutate(config, rng);
            mutated += 1;
        }
    }
    mutated
}
