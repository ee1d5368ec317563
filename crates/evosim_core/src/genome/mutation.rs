use crate::brain::{NetworkLogic, BIAS_RANGE, WEIGHT_LIMIT};
use crate::config::AppConfig;
use evosim_data::{Genome, NeuralNetwork, NeuronRole};
use rand::seq::SliceRandom;
use rand::Rng;
use rand_distr::{Distribution, Normal};

/// Applies, in order: weight perturbation, bias jitter, add-neuron,
/// remove-neuron, add-connection. Recompiles at the end.
pub fn mutate<R: Rng>(genome: &mut Genome, config: &AppConfig, rng: &mut R) {
    let evo = &config.evolution;
    let network = &mut genome.network;

    if rng.gen::<f64>() < evo.weight_mutation_rate {
        mutate_weights(network, evo.weight_mutation_strength, rng);
    }
    mutate_biases(
        network,
        evo.weight_mutation_rate * 0.5,
        evo.weight_mutation_strength,
        rng,
    );

    if rng.gen::<f64>() < evo.add_neuron_rate {
        add_neuron(network, config.neural_network.max_neurons, rng);
    }
    if rng.gen::<f64>() < evo.remove_neuron_rate {
        remove_neuron(network, rng);
    }
    if rng.gen::<f64>() < evo.add_connection_rate {
        add_connection(network, rng);
    }

    network.compile();
}

/// Every enabled connection gets either Gaussian jitter or a fresh uniform
/// weight, with equal chance.
pub fn mutate_weights<R: Rng>(network: &mut NeuralNetwork, strength: f64, rng: &mut R) {
    let Ok(jitter) = Normal::new(0.0, strength) else {
        return;
    };
    for conn in network.connections.iter_mut().filter(|c| c.enabled) {
        if rng.gen_bool(0.5) {
            conn.weight += jitter.sample(rng) as f32;
        } else {
            conn.weight = rng.gen_range(-1.0..1.0);
        }
        conn.weight = conn.weight.clamp(-WEIGHT_LIMIT, WEIGHT_LIMIT);
    }
    network.mark_dirty();
}

pub fn mutate_biases<R: Rng>(network: &mut NeuralNetwork, rate: f64, strength: f64, rng: &mut R) {
    let Ok(jitter) = Normal::new(0.0, strength) else {
        return;
    };
    for neuron in network.neurons.values_mut() {
        if rng.gen::<f64>() < rate {
            neuron.bias = (neuron.bias + jitter.sample(rng) as f32).clamp(-BIAS_RANGE, BIAS_RANGE);
        }
    }
    network.mark_dirty();
}

/// Disables a random connection and routes it through a new hidden neuron:
/// `from -> new` with weight 1 and `new -> to` with the old weight.
pub fn add_neuron<R: Rng>(network: &mut NeuralNetwork, max_neurons: usize, rng: &mut R) -> bool {
    if network.neuron_count() >= max_neurons || network.connections.is_empty() {
        return false;
    }

    let enabled: Vec<usize> = network
        .connections
        .iter()
        .enumerate()
        .filter(|(_, c)| c.enabled)
        .map(|(i, _)| i)
        .collect();
    let idx = match enabled.choose(rng) {
        Some(&i) => i,
        None => rng.gen_range(0..network.connections.len()),
    };

    network.connections[idx].enabled = false;
    let from = network.connections[idx].from;
    let to = network.connections[idx].to;
    let weight = network.connections[idx].weight;

    let hidden = network.add_neuron(NeuronRole::Hidden, rng);
    network.add_connection(from, hidden, 1.0, true);
    network.add_connection(hidden, to, weight, true);
    true
}

pub fn remove_neuron<R: Rng>(network: &mut NeuralNetwork, rng: &mut R) -> bool {
    let hidden: Vec<_> = network
        .neurons
        .values()
        .filter(|n| n.role == NeuronRole::Hidden)
        .map(|n| n.id)
        .collect();
    match hidden.choose(rng) {
        Some(&id) => network.remove_neuron(id),
        None => false,
    }
}

pub fn add_connection<R: Rng>(network: &mut NeuralNetwork, rng: &mut R) -> bool {
    let ids: Vec<_> = network.neurons.keys().copied().collect();
    if ids.len() < 2 {
        return false;
    }
    let mut pair = ids.choose_multiple(rng, 2);
    let (Some(&from), Some(&to)) = (pair.next(), pair.next()) else {
        return false;
    };
    let weight = rng.gen_range(-1.0..1.0);
    network.add_connection(from, to, weight, true)
}
