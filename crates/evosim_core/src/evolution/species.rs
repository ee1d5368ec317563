use crate::genome::GenomeLogic;
use evosim_data::Genome;
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::BTreeMap;

/// A population member assigned to a species, by index into the population
/// slice passed to [`SpeciesManager::speciate`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpeciesMember {
    pub index: usize,
    pub fitness: f64,
}

/// A cluster of structurally similar genomes.
#[derive(Clone, Debug)]
pub struct Species {
    pub id: u32,
    pub representative: Genome,
    pub members: Vec<SpeciesMember>,
    /// Best member fitness ever observed.
    pub max_fitness: f64,
    pub avg_fitness: f64,
    pub generations_without_improvement: u32,
}

impl Species {
    #[must_use]
    pub fn new(id: u32, representative: Genome) -> Self {
        Self {
            id,
            representative,
            members: Vec::new(),
            max_fitness: f64::NEG_INFINITY,
            avg_fitness: 0.0,
            generations_without_improvement: 0,
        }
    }

    /// Recomputes the average and tracks stagnation of the best fitness.
    pub fn update_fitness(&mut self) {
        if self.members.is_empty() {
            self.avg_fitness = 0.0;
            self.generations_without_improvement += 1;
            return;
        }
        let best = self
            .members
            .iter()
            .map(|m| m.fitness)
            .fold(f64::NEG_INFINITY, f64::max);
        self.avg_fitness =
            self.members.iter().map(|m| m.fitness).sum::<f64>() / self.members.len() as f64;
        if best > self.max_fitness {
            self.max_fitness = best;
            self.generations_without_improvement = 0;
        } else {
            self.generations_without_improvement += 1;
        }
    }

    /// Keeps the fittest `survival_rate` share of members, rounded down but
    /// never below one.
    pub fn cull_weak_members(&mut self, survival_rate: f64) {
        if self.members.is_empty() {
            return;
        }
        self.members
            .sort_by(|a, b| b.fitness.total_cmp(&a.fitness));
        let keep = ((self.members.len() as f64 * survival_rate).floor() as usize).max(1);
        self.members.truncate(keep);
    }

    /// Replaces the representative with a random current member.
    pub fn select_new_representative<R: Rng>(&mut self, population: &[Genome], rng: &mut R) {
        if let Some(member) = self.members.choose(rng) {
            if let Some(genome) = population.get(member.index) {
                self.representative = genome.copy();
            }
        }
    }

    #[must_use]
    pub fn size(&self) -> usize {
        self.members.len()
    }
}

/// Assigns genomes to species by compatibility distance.
#[derive(Clone, Debug)]
pub struct SpeciesManager {
    pub threshold: f64,
    pub species: BTreeMap<u32, Species>,
    next_id: u32,
}

impl SpeciesManager {
    #[must_use]
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            species: BTreeMap::new(),
            next_id: 0,
        }
    }

    /// Assigns every genome to the first species whose representative is
    /// within the threshold, founding a new species otherwise. Sets each
    /// genome's `species_id` and drops species left without members.
    pub fn speciate(&mut self, population: &mut [Genome]) {
        for species in self.species.values_mut() {
            species.members.clear();
        }

        for (index, genome) in population.iter_mut().enumerate() {
            let found = self
                .species
                .values()
                .find(|s| genome.distance(&s.representative) < self.threshold)
                .map(|s| s.id);

            let id = match found {
                Some(id) => id,
                None => {
                    let id = self.next_id;
                    self.next_id += 1;
                    self.species.insert(id, Species::new(id, genome.copy()));
                    id
                }
            };
            genome.species_id = Some(id);
            if let Some(species) = self.species.get_mut(&id) {
                species.members.push(SpeciesMember {
                    index,
                    fitness: genome.fitness,
                });
            }
        }

        self.species.retain(|_, s| !s.members.is_empty());
        for species in self.species.values_mut() {
            species.update_fitness();
        }
    }

    /// Fitness sharing: divides each member's fitness by its species size.
    pub fn adjust_fitness(&self, population: &mut [Genome]) {
        for species in self.species.values() {
            let size = species.members.len() as f64;
            for member in &species.members {
                if let Some(genome) = population.get_mut(member.index) {
                    genome.fitness /= size;
                }
            }
        }
    }

    /// Removes species stagnant for at least `stagnation_limit` generations.
    /// Nothing is removed when every species is stagnant. Returns the number
    /// removed.
    pub fn cull_species(&mut self, stagnation_limit: u32) -> usize {
        let stale: Vec<u32> = self
            .species
            .values()
            .filter(|s| s.generations_without_improvement >= stagnation_limit)
            .map(|s| s.id)
            .collect();

        if stale.len() == self.species.len() {
            if !stale.is_empty() {
                tracing::debug!(species = stale.len(), "Every species stagnated, culling skipped");
            }
            return 0;
        }

        for id in &stale {
            self.species.remove(id);
        }
        stale.len()
    }

    pub fn refresh_representatives<R: Rng>(&mut self, population: &[Genome], rng: &mut R) {
        for species in self.species.values_mut() {
            species.select_new_representative(population, rng);
        }
    }

    #[must_use]
    pub fn species_count(&self) -> usize {
        self.species.len()
    }

    /// `(species id, member count)` in id order.
    #[must_use]
    pub fn species_sizes(&self) -> Vec<(u32, usize)> {
        self.species.values().map(|s| (s.id, s.size())).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use evosim_data::CreatureKind;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn population(n: usize, seed: u64) -> Vec<Genome> {
        let config = AppConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        (0..n)
            .map(|i| {
                let mut g = Genome::new_random(CreatureKind::Herbivore, &config, &mut rng);
                g.fitness = i as f64;
                g
            })
            .collect()
    }

    #[test]
    fn test_identical_genomes_share_species() {
        let base = population(1, 1).remove(0);
        let mut pop = vec![base.clone(), base.clone(), base];
        let mut manager = SpeciesManager::new(0.5);
        manager.speciate(&mut pop);
        assert_eq!(manager.species_count(), 1);
        assert!(pop.iter().all(|g| g.species_id == pop[0].species_id));
        assert_eq!(manager.species_sizes(), vec![(0, 3)]);
    }

    #[test]
    fn test_zero_threshold_separates_everyone() {
        let mut pop = population(4, 2);
        let mut manager = SpeciesManager::new(0.0);
        manager.speciate(&mut pop);
        assert_eq!(manager.species_count(), 4);
    }

    #[test]
    fn test_adjust_fitness_divides_by_size() {
        let base = population(1, 3).remove(0);
        let mut pop: Vec<Genome> = (0..4)
            .map(|_| {
                let mut g = base.clone();
                g.fitness = 8.0;
                g
            })
            .collect();
        let mut manager = SpeciesManager::new(1.0);
        manager.speciate(&mut pop);
        manager.adjust_fitness(&mut pop);
        assert!(pop.iter().all(|g| (g.fitness - 2.0).abs() < 1e-9));
    }

    #[test]
    fn test_all_stagnant_species_survive_culling() {
        let mut pop = population(3, 4);
        let mut manager = SpeciesManager::new(1e-9);
        for _ in 0..5 {
            manager.speciate(&mut pop);
        }
        assert!(manager
            .species
            .values()
            .all(|s| s.generations_without_improvement == 4));
        assert_eq!(manager.cull_species(3), 0);
        assert_eq!(manager.species_count(), 3);
    }

    #[test]
    fn test_cull_removes_only_stagnant_species() {
        let mut pop = population(3, 4);
        let mut manager = SpeciesManager::new(1e-9);
        for _ in 0..5 {
            manager.speciate(&mut pop);
        }
        pop[0].fitness = 100.0;
        manager.speciate(&mut pop);

        let improving = pop[0].species_id.expect("assigned");
        assert_eq!(manager.cull_species(3), 2);
        assert_eq!(manager.species_count(), 1);
        assert!(manager.species.contains_key(&improving));
    }

    #[test]
    fn test_cull_weak_members_keeps_best() {
        let mut species = Species::new(0, population(1, 5).remove(0));
        for (i, f) in [3.0, 9.0, 1.0, 5.0].into_iter().enumerate() {
            species.members.push(SpeciesMember { index: i, fitness: f });
        }
        species.cull_weak_members(0.5);
        let kept: Vec<f64> = species.members.iter().map(|m| m.fitness).collect();
        assert_eq!(kept, vec![9.0, 5.0]);

        species.cull_weak_members(0.0);
        assert_eq!(species.size(), 1);
    }

    #[test]
    fn test_cull_weak_members_rounds_down() {
        let mut species = Species::new(0, population(1, 5).remove(0));
        for (i, f) in [2.0, 7.0, 4.0].into_iter().enumerate() {
            species.members.push(SpeciesMember { index: i, fitness: f });
        }
        species.cull_weak_members(0.5);
        let kept: Vec<f64> = species.members.iter().map(|m| m.fitness).collect();
        assert_eq!(kept, vec![7.0]);
    }

    #[test]
    fn test_select_new_representative_from_members() {
        let pop = population(3, 6);
        let mut species = Species::new(0, pop[0].copy());
        species.members.push(SpeciesMember { index: 2, fitness: 2.0 });
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        species.select_new_representative(&pop, &mut rng);
        assert_eq!(
            species.representative.network.connections,
            pop[2].network.connections
        );
    }
}
