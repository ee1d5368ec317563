use crate::brain::{NetworkLogic, IN_PREY_DX, IN_PREY_DY, OUT_SPEED, OUT_TURN};
use crate::config::NetworkConfig;
use evosim_data::{CreatureKind, Genome, NeuralNetwork, NeuronRole};
use rand::Rng;

/// Creates a genome whose network connects every input to every output.
///
/// Input neurons take the lowest ids, output neurons the next ones.
pub fn create_genome<R: Rng>(kind: CreatureKind, config: &NetworkConfig, rng: &mut R) -> Genome {
    let mut network = NeuralNetwork::default();
    let inputs: Vec<_> = (0..config.input_neurons)
        .map(|_| network.add_neuron(NeuronRole::Input, rng))
        .collect();
    let outputs: Vec<_> = (0..config.output_neurons)
        .map(|_| network.add_neuron(NeuronRole::Output, rng))
        .collect();

    for (input_slot, &from) in inputs.iter().enumerate() {
        for (output_slot, &to) in outputs.iter().enumerate() {
            let weight = initial_weight(kind, input_slot, output_slot, rng);
            network.add_connection(from, to, weight, true);
        }
    }
    network.compile();

    Genome {
        network,
        kind,
        fitness: 0.0,
        species_id: None,
    }
}

/// Carnivores start strongly steered by the prey direction inputs; every
/// other pair gets a mild forward bias on speed and near-zero turn.
fn initial_weight<R: Rng>(
    kind: CreatureKind,
    input_slot: usize,
    output_slot: usize,
    rng: &mut R,
) -> f32 {
    let prey_input = kind == CreatureKind::Carnivore
        && (input_slot == IN_PREY_DX || input_slot == IN_PREY_DY);

    match (prey_input, output_slot) {
        (true, OUT_TURN | OUT_SPEED) => rng.gen_range(2.0..4.0),
        (true, _) => rng.gen_range(1.0..2.5),
        (false, OUT_TURN) => rng.gen_range(-0.5..0.5),
        (false, OUT_SPEED) => rng.gen_range(0.8..2.0),
        (false, _) => rng.gen_range(-1.0..1.0),
    }
}
