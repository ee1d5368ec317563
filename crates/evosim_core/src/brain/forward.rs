use evosim_data::CompiledNetwork;

/// Saturating logistic activation. The argument is clamped to `[-20, 20]`.
#[inline]
#[must_use]
pub fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x.clamp(-20.0, 20.0)).exp())
}

/// Evaluates a compiled network.
///
/// `inputs` is padded with zeros or truncated to the input count. Output
/// values are returned in ascending output-neuron id order.
#[must_use]
pub fn forward(compiled: &CompiledNetwork, inputs: &[f32]) -> Vec<f32> {
    let mut values = vec![0.0f32; compiled.biases.len()];

    for (k, &idx) in compiled.input_indices.iter().enumerate() {
        values[idx] = inputs.get(k).copied().unwrap_or(0.0);
    }

    for &idx in &compiled.eval_order {
        let start = compiled.incoming_offsets[idx];
        let end = compiled.incoming_offsets[idx + 1];
        let mut sum = compiled.biases[idx];
        for &conn in &compiled.incoming[start..end] {
            sum += compiled.conn_weight[conn] * values[compiled.conn_from[conn]];
        }
        values[idx] = sigmoid(sum);
    }

    compiled
        .output_indices
        .iter()
        .map(|&idx| values[idx])
        .collect()
}
