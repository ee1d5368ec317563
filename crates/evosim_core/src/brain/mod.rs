pub mod compile;
pub mod forward;

pub use evosim_data::{CompiledNetwork, Connection, NeuralNetwork, Neuron, NeuronId, NeuronRole};
use rand::Rng;

/// Range of freshly drawn biases.
pub const BIAS_RANGE: f32 = 2.0;
/// Weights are clamped to `[-WEIGHT_LIMIT, WEIGHT_LIMIT]` after mutation.
pub const WEIGHT_LIMIT: f32 = 2.0;

pub const INPUT_LABELS: [&str; 11] = [
    "Bias", "Energy", "FoodDX", "FoodDY", "ThreatDX", "ThreatDY", "PreyDX", "PreyDY", "Density",
    "Scarcity", "Readiness",
];

pub const OUTPUT_LABELS: [&str; 4] = ["Turn", "Speed", "Reproduce", "Migrate"];

pub const IN_BIAS: usize = 0;
pub const IN_ENERGY: usize = 1;
pub const IN_FOOD_DX: usize = 2;
pub const IN_FOOD_DY: usize = 3;
pub const IN_THREAT_DX: usize = 4;
pub const IN_THREAT_DY: usize = 5;
pub const IN_PREY_DX: usize = 6;
pub const IN_PREY_DY: usize = 7;
pub const IN_DENSITY: usize = 8;
pub const IN_SCARCITY: usize = 9;
pub const IN_READINESS: usize = 10;

pub const OUT_TURN: usize = 0;
pub const OUT_SPEED: usize = 1;
pub const OUT_REPRODUCE: usize = 2;
pub const OUT_MIGRATE: usize = 3;

/// Trait defining the structural and inference operations of a network.
pub trait NetworkLogic {
    /// Appends a neuron with the given bias and returns its id.
    fn add_neuron_with_bias(&mut self, role: NeuronRole, bias: f32) -> NeuronId;

    /// Appends a neuron with a bias drawn from `[-BIAS_RANGE, BIAS_RANGE)`.
    fn add_neuron<R: Rng>(&mut self, role: NeuronRole, rng: &mut R) -> NeuronId;

    /// Adds `from -> to` unless that pair already exists or an endpoint is
    /// unknown. Returns whether a connection was added.
    fn add_connection(&mut self, from: NeuronId, to: NeuronId, weight: f32, enabled: bool) -> bool;

    /// Removes a hidden neuron and every connection touching it.
    fn remove_neuron(&mut self, id: NeuronId) -> bool;

    /// Rebuilds the dense inference arrays and clears the dirty flag.
    fn compile(&mut self);

    /// Compiles only when dirty.
    fn ensure_compiled(&mut self);

    /// Runs inference, compiling first if needed.
    fn forward(&mut self, inputs: &[f32]) -> Vec<f32>;

    /// Runs inference against the existing cache without mutating.
    /// Returns `None` when the cache is missing or out of date.
    #[must_use]
    fn forward_compiled(&self, inputs: &[f32]) -> Option<Vec<f32>>;

    /// Read-only inference that never uses stale arrays: the cache when it
    /// is current, otherwise a throwaway compilation.
    #[must_use]
    fn infer(&self, inputs: &[f32]) -> Vec<f32>;

    fn mark_dirty(&mut self);

    /// Deep copy of neurons and connections; the compiled cache is not copied.
    #[must_use]
    fn copy(&self) -> NeuralNetwork;

    #[must_use]
    fn hidden_count(&self) -> usize;

    #[must_use]
    fn enabled_connection_count(&self) -> usize;
}

impl NetworkLogic for NeuralNetwork {
    fn add_neuron_with_bias(&mut self, role: NeuronRole, bias: f32) -> NeuronId {
        let id = self.next_neuron_id;
        self.next_neuron_id += 1;
        self.neurons.insert(id, Neuron { id, role, bias });
        self.dirty = true;
        id
    }

    fn add_neuron<R: Rng>(&mut self, role: NeuronRole, rng: &mut R) -> NeuronId {
        let bias = rng.gen_range(-BIAS_RANGE..BIAS_RANGE);
        self.add_neuron_with_bias(role, bias)
    }

    fn add_connection(&mut self, from: NeuronId, to: NeuronId, weight: f32, enabled: bool) -> bool {
        if !self.neurons.contains_key(&from)
            || !self.neurons.contains_key(&to)
            || self.has_connection(from, to)
        {
            return false;
        }
        self.connections.push(Connection {
            from,
            to,
            weight,
            enabled,
        });
        self.dirty = true;
        true
    }

    fn remove_neuron(&mut self, id: NeuronId) -> bool {
        match self.neurons.get(&id) {
            Some(neuron) if neuron.role == NeuronRole::Hidden => {}
            _ => return false,
        }
        self.neurons.remove(&id);
        self.connections.retain(|c| c.from != id && c.to != id);
        self.dirty = true;
        true
    }

    fn compile(&mut self) {
        self.compiled = Some(compile::compile(self));
        self.dirty = false;
    }

    fn ensure_compiled(&mut self) {
        if self.dirty || self.compiled.is_none() {
            self.compile();
        }
    }

    fn forward(&mut self, inputs: &[f32]) -> Vec<f32> {
        self.ensure_compiled();
        self.infer(inputs)
    }

    fn forward_compiled(&self, inputs: &[f32]) -> Option<Vec<f32>> {
        if self.dirty {
            return None;
        }
        self.compiled
            .as_ref()
            .map(|compiled| forward::forward(compiled, inputs))
    }

    fn infer(&self, inputs: &[f32]) -> Vec<f32> {
        self.forward_compiled(inputs)
            .unwrap_or_else(|| forward::forward(&compile::compile(self), inputs))
    }

    fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    fn copy(&self) -> NeuralNetwork {
        self.clone()
    }

    fn hidden_count(&self) -> usize {
        self.count_role(NeuronRole::Hidden)
    }

    fn enabled_connection_count(&self) -> usize {
        self.connections.iter().filter(|c| c.enabled).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn two_in_one_out() -> NeuralNetwork {
        let mut net = NeuralNetwork::default();
        let a = net.add_neuron_with_bias(NeuronRole::Input, 0.0);
        let b = net.add_neuron_with_bias(NeuronRole::Input, 0.0);
        let out = net.add_neuron_with_bias(NeuronRole::Output, 0.0);
        net.add_connection(a, out, 1.0, true);
        net.add_connection(b, out, 1.0, true);
        net
    }

    #[test]
    fn test_forward_known_value() {
        let mut net = two_in_one_out();
        let out = net.forward(&[0.5, 0.5]);
        assert_eq!(out.len(), 1);
        assert!((out[0] - 0.731_058_6).abs() < 1e-4);
    }

    #[test]
    fn test_duplicate_connection_is_noop() {
        let mut net = two_in_one_out();
        assert!(!net.add_connection(0, 2, -1.0, true));
        assert_eq!(net.connection_count(), 2);
        assert_eq!(net.connections[0].weight, 1.0);
    }

    #[test]
    fn test_connection_to_unknown_neuron_rejected() {
        let mut net = two_in_one_out();
        assert!(!net.add_connection(0, 99, 1.0, true));
    }

    #[test]
    fn test_ids_never_reused() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut net = two_in_one_out();
        let h = net.add_neuron(NeuronRole::Hidden, &mut rng);
        assert!(net.remove_neuron(h));
        let h2 = net.add_neuron(NeuronRole::Hidden, &mut rng);
        assert!(h2 > h);
    }

    #[test]
    fn test_remove_neuron_cascades() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut net = two_in_one_out();
        let h = net.add_neuron(NeuronRole::Hidden, &mut rng);
        net.add_connection(0, h, 0.5, true);
        net.add_connection(h, 2, 0.5, true);
        assert_eq!(net.connection_count(), 4);
        assert!(net.remove_neuron(h));
        assert_eq!(net.connection_count(), 2);
        assert!(net.connections.iter().all(|c| c.from != h && c.to != h));
    }

    #[test]
    fn test_remove_non_hidden_refused() {
        let mut net = two_in_one_out();
        assert!(!net.remove_neuron(0));
        assert!(!net.remove_neuron(2));
        assert!(!net.remove_neuron(42));
        assert_eq!(net.neuron_count(), 3);
    }

    #[test]
    fn test_mutation_marks_dirty() {
        let mut net = two_in_one_out();
        net.compile();
        assert!(!net.dirty);
        net.add_connection(2, 0, 0.1, true);
        assert!(net.dirty);
    }

    #[test]
    fn test_copy_drops_cache() {
        let mut net = two_in_one_out();
        net.compile();
        let copy = net.copy();
        assert!(copy.compiled.is_none());
        assert!(copy.dirty);
        assert_eq!(copy.connections, net.connections);
        assert_eq!(copy.next_neuron_id, net.next_neuron_id);
    }

    #[test]
    fn test_forward_compiled_without_cache_is_none() {
        let net = two_in_one_out();
        assert!(net.forward_compiled(&[1.0, 1.0]).is_none());
        let out = net.infer(&[0.5, 0.5]);
        assert!((out[0] - 0.731_058_6).abs() < 1e-4);
    }

    #[test]
    fn test_stale_cache_is_never_used() {
        let mut net = two_in_one_out();
        net.compile();
        for c in net.connections.iter_mut() {
            c.weight = 0.0;
        }
        net.mark_dirty();

        assert!(net.forward_compiled(&[1.0, 1.0]).is_none());
        assert!((net.infer(&[1.0, 1.0])[0] - 0.5).abs() < 1e-6);
        assert!((net.forward(&[1.0, 1.0])[0] - 0.5).abs() < 1e-6);
        assert!(net.forward_compiled(&[1.0, 1.0]).is_some());
    }
}
