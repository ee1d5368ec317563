use evosim_data::{CompiledNetwork, NeuralNetwork, NeuronId, NeuronRole};
use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::HashMap;

/// Builds the dense inference arrays for `network`.
///
/// Neurons are laid out in ascending id order. Connections whose endpoints
/// are missing are skipped.
#[must_use]
pub fn compile(network: &NeuralNetwork) -> CompiledNetwork {
    let neuron_count = network.neurons.len();
    let mut index_of: HashMap<NeuronId, usize> = HashMap::with_capacity(neuron_count);
    let mut biases = Vec::with_capacity(neuron_count);
    let mut roles = Vec::with_capacity(neuron_count);

    for (idx, neuron) in network.neurons.values().enumerate() {
        index_of.insert(neuron.id, idx);
        biases.push(neuron.bias);
        roles.push(neuron.role);
    }

    let mut conn_from = Vec::with_capacity(network.connections.len());
    let mut conn_to = Vec::with_capacity(network.connections.len());
    let mut conn_weight = Vec::with_capacity(network.connections.len());
    let mut conn_enabled = Vec::with_capacity(network.connections.len());

    for conn in &network.connections {
        if let (Some(&f), Some(&t)) = (index_of.get(&conn.from), index_of.get(&conn.to)) {
            conn_from.push(f);
            conn_to.push(t);
            conn_weight.push(conn.weight);
            conn_enabled.push(conn.enabled);
        }
    }

    let input_indices: Vec<usize> = roles
        .iter()
        .enumerate()
        .filter(|(_, r)| **r == NeuronRole::Input)
        .map(|(i, _)| i)
        .collect();
    let output_indices: Vec<usize> = roles
        .iter()
        .enumerate()
        .filter(|(_, r)| **r == NeuronRole::Output)
        .map(|(i, _)| i)
        .collect();

    let eval_order = evaluation_order(&roles, &conn_from, &conn_to, &conn_enabled);

    let mut incoming_offsets = vec![0usize; neuron_count + 1];
    for (k, &to) in conn_to.iter().enumerate() {
        if conn_enabled[k] {
            incoming_offsets[to + 1] += 1;
        }
    }
    for i in 0..neuron_count {
        incoming_offsets[i + 1] += incoming_offsets[i];
    }
    let mut cursor = incoming_offsets.clone();
    let mut incoming = vec![0usize; incoming_offsets[neuron_count]];
    for (k, &to) in conn_to.iter().enumerate() {
        if conn_enabled[k] {
            incoming[cursor[to]] = k;
            cursor[to] += 1;
        }
    }

    CompiledNetwork {
        input_count: input_indices.len(),
        output_count: output_indices.len(),
        biases,
        roles,
        conn_from,
        conn_to,
        conn_weight,
        conn_enabled,
        input_indices,
        output_indices,
        eval_order,
        incoming_offsets,
        incoming,
    }
}

/// Order in which non-input neurons are evaluated.
///
/// Strongly connected components of the enabled-connection graph are visited
/// in topological order, so every acyclic source is computed before its
/// destination. Members of a cycle are visited in ascending id order; a
/// back-edge inside a cycle reads the source's not-yet-computed value (0).
fn evaluation_order(
    roles: &[NeuronRole],
    conn_from: &[usize],
    conn_to: &[usize],
    conn_enabled: &[bool],
) -> Vec<usize> {
    let mut graph: DiGraph<usize, ()> = DiGraph::with_capacity(roles.len(), conn_from.len());
    let nodes: Vec<NodeIndex> = (0..roles.len()).map(|i| graph.add_node(i)).collect();
    for k in 0..conn_from.len() {
        if conn_enabled[k] {
            graph.add_edge(nodes[conn_from[k]], nodes[conn_to[k]], ());
        }
    }

    // tarjan_scc yields components in reverse topological order.
    let mut components = tarjan_scc(&graph);
    components.reverse();

    let mut order = Vec::with_capacity(roles.len());
    for component in components {
        let mut members: Vec<usize> = component.into_iter().map(|n| graph[n]).collect();
        members.sort_unstable();
        order.extend(
            members
                .into_iter()
                .filter(|&idx| roles[idx] != NeuronRole::Input),
        );
    }
    order
}
