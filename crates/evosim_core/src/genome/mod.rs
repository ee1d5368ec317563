pub mod init;
pub mod mutation;

use crate::config::AppConfig;
use crate::error::{Result, SimError};
use crate::evolution::crossover;
use crate::brain::NetworkLogic;
pub use evosim_data::{CreatureKind, Genome};
use rand::Rng;

/// Trait defining the genetic operations on a [`Genome`].
pub trait GenomeLogic {
    /// Fully connected input-to-output genome with kind-biased weights.
    fn new_random<R: Rng>(kind: CreatureKind, config: &AppConfig, rng: &mut R) -> Self;

    /// Applies the full mutation sequence and recompiles.
    fn mutate<R: Rng>(&mut self, config: &AppConfig, rng: &mut R);

    /// Splits a connection with a new hidden neuron.
    fn mutate_add_neuron<R: Rng>(&mut self, max_neurons: usize, rng: &mut R) -> bool;

    /// Removes a random hidden neuron.
    fn mutate_remove_neuron<R: Rng>(&mut self, rng: &mut R) -> bool;

    /// Connects two random distinct neurons.
    fn mutate_add_connection<R: Rng>(&mut self, rng: &mut R) -> bool;

    /// Deep copy with fitness reset; keeps the species cluster id.
    #[must_use]
    fn copy(&self) -> Self;

    #[must_use]
    fn crossover_with_rng<R: Rng>(&self, other: &Genome, rng: &mut R) -> Genome;

    /// Structural and weight distance used for speciation.
    #[must_use]
    fn distance(&self, other: &Genome) -> f64;

    fn to_hex(&self) -> String;
    fn from_hex(hex_str: &str) -> Result<Self>
    where
        Self: Sized;
}

impl GenomeLogic for Genome {
    fn new_random<R: Rng>(kind: CreatureKind, config: &AppConfig, rng: &mut R) -> Self {
        init::create_genome(kind, &config.neural_network, rng)
    }

    fn mutate<R: Rng>(&mut self, config: &AppConfig, rng: &mut R) {
        mutation::mutate(self, config, rng)
    }

    fn mutate_add_neuron<R: Rng>(&mut self, max_neurons: usize, rng: &mut R) -> bool {
        mutation::add_neuron(&mut self.network, max_neurons, rng)
    }

    fn mutate_remove_neuron<R: Rng>(&mut self, rng: &mut R) -> bool {
        mutation::remove_neuron(&mut self.network, rng)
    }

    fn mutate_add_connection<R: Rng>(&mut self, rng: &mut R) -> bool {
        mutation::add_connection(&mut self.network, rng)
    }

    fn copy(&self) -> Self {
        Genome {
            network: self.network.copy(),
            kind: self.kind,
            fitness: 0.0,
            species_id: self.species_id,
        }
    }

    fn crossover_with_rng<R: Rng>(&self, other: &Genome, rng: &mut R) -> Genome {
        crossover::crossover(self, other, rng)
    }

    fn distance(&self, other: &Genome) -> f64 {
        crossover::compatibility_distance(self, other)
    }

    fn to_hex(&self) -> String {
        match serde_json::to_vec(self) {
            Ok(bytes) => hex::encode(bytes),
            Err(e) => {
                tracing::error!(error = %e, "Failed to serialize genome to JSON");
                String::new()
            }
        }
    }

    fn from_hex(hex_str: &str) -> Result<Self> {
        let bytes = hex::decode(hex_str)
            .map_err(|e| SimError::genome_decode(format!("Invalid hex encoding: {e}")))?;

        if bytes.is_empty() {
            return Err(SimError::genome_decode("Empty hex string"));
        }

        let mut genome: Genome = serde_json::from_slice(&bytes)
            .map_err(|e| SimError::genome_decode(format!("Failed to deserialize genome: {e}")))?;
        genome.network.compile();
        Ok(genome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_copy_resets_fitness_keeps_species() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let config = AppConfig::default();
        let mut genome = Genome::new_random(CreatureKind::Herbivore, &config, &mut rng);
        genome.fitness = 12.5;
        genome.species_id = Some(4);

        let copy = genome.copy();
        assert_eq!(copy.fitness, 0.0);
        assert_eq!(copy.species_id, Some(4));
        assert_eq!(copy.kind, CreatureKind::Herbivore);
        assert_eq!(copy.network.connections, genome.network.connections);
    }

    #[test]
    fn test_hex_roundtrip_restores_inference() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let config = AppConfig::default();
        let mut genome = Genome::new_random(CreatureKind::Carnivore, &config, &mut rng);

        let hex = genome.to_hex();
        let mut restored = Genome::from_hex(&hex).expect("Should deserialize successfully");

        assert_eq!(restored.kind, CreatureKind::Carnivore);
        assert!(!restored.network.dirty);
        let inputs = [0.3f32; 11];
        assert_eq!(genome.network.forward(&inputs), restored.network.forward(&inputs));
    }

    #[test]
    fn test_from_hex_rejects_garbage() {
        assert!(matches!(
            Genome::from_hex("zz"),
            Err(SimError::GenomeDecode(_))
        ));
        assert!(Genome::from_hex("").is_err());
        assert!(Genome::from_hex("7b7d").is_err());
    }
}
