use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Stable neuron identifier. Assigned monotonically per network, never reused.
pub type NeuronId = usize;

/// Role of a neuron in the network.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum NeuronRole {
    /// Receives a sensory value directly.
    Input,
    /// Internal processing node created by mutation.
    Hidden,
    /// Produces an action value.
    Output,
}

/// A neuron owned by a [`NeuralNetwork`].
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Neuron {
    /// Unique neuron identifier.
    pub id: NeuronId,
    /// Role of the neuron.
    pub role: NeuronRole,
    /// Bias added before activation.
    pub bias: f32,
}

/// A directed, weighted connection between two neurons.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Connection {
    /// Source neuron ID.
    pub from: NeuronId,
    /// Destination neuron ID.
    pub to: NeuronId,
    /// Connection weight.
    pub weight: f32,
    /// Whether the connection takes part in inference.
    pub enabled: bool,
}

/// Dense, index-based view of a network used for inference.
///
/// Neurons are addressed by their position in ascending-id order; connections
/// keep the order of [`NeuralNetwork::connections`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CompiledNetwork {
    /// Bias per dense neuron index.
    pub biases: Vec<f32>,
    /// Role per dense neuron index.
    pub roles: Vec<NeuronRole>,
    /// Source dense index per connection.
    pub conn_from: Vec<usize>,
    /// Destination dense index per connection.
    pub conn_to: Vec<usize>,
    /// Weight per connection.
    pub conn_weight: Vec<f32>,
    /// Enabled flag per connection.
    pub conn_enabled: Vec<bool>,
    /// Number of input neurons.
    pub input_count: usize,
    /// Number of output neurons.
    pub output_count: usize,
    /// Dense indices of input neurons, ascending id.
    pub input_indices: Vec<usize>,
    /// Dense indices of output neurons, ascending id.
    pub output_indices: Vec<usize>,
    /// Evaluation order of every non-input neuron.
    pub eval_order: Vec<usize>,
    /// `incoming[incoming_offsets[i]..incoming_offsets[i + 1]]` lists the
    /// enabled connection indices ending at dense neuron `i`.
    pub incoming_offsets: Vec<usize>,
    /// Flattened enabled connection indices grouped by destination.
    pub incoming: Vec<usize>,
}

/// A mutable-topology neural network.
#[derive(Debug, Serialize, Deserialize)]
pub struct NeuralNetwork {
    /// All neurons keyed by id.
    pub neurons: BTreeMap<NeuronId, Neuron>,
    /// All connections, in insertion order.
    pub connections: Vec<Connection>,
    /// Next id handed out by `add_neuron`.
    pub next_neuron_id: NeuronId,
    /// Compiled inference arrays (not serialized).
    #[serde(skip)]
    pub compiled: Option<CompiledNetwork>,
    /// Set whenever topology, weights or biases change (not serialized).
    #[serde(skip, default = "dirty_by_default")]
    pub dirty: bool,
}

fn dirty_by_default() -> bool {
    true
}

impl Default for NeuralNetwork {
    fn default() -> Self {
        Self {
            neurons: BTreeMap::new(),
            connections: Vec::new(),
            next_neuron_id: 0,
            compiled: None,
            dirty: true,
        }
    }
}

// The compiled cache is rebuilt lazily on the copy.
impl Clone for NeuralNetwork {
    fn clone(&self) -> Self {
        Self {
            neurons: self.neurons.clone(),
            connections: self.connections.clone(),
            next_neuron_id: self.next_neuron_id,
            compiled: None,
            dirty: true,
        }
    }
}

impl NeuralNetwork {
    #[must_use]
    pub fn neuron_count(&self) -> usize {
        self.neurons.len()
    }

    #[must_use]
    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    #[must_use]
    pub fn count_role(&self, role: NeuronRole) -> usize {
        self.neurons.values().filter(|n| n.role == role).count()
    }

    #[must_use]
    pub fn has_connection(&self, from: NeuronId, to: NeuronId) -> bool {
        self.connections.iter().any(|c| c.from == from && c.to == to)
    }
}
