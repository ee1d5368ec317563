use evosim_data::Genome;
use rand::seq::SliceRandom;
use rand::Rng;

/// Parent selection strategy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectionMethod {
    /// Best of a random sample of the given size.
    Tournament(usize),
    /// Fitness-proportionate.
    Roulette,
    /// Proportionate to rank (1 for the least fit).
    Rank,
    /// Uniform.
    Random,
}

/// Fittest genome out of `size` distinct random picks.
pub fn tournament<'a, R: Rng>(genomes: &'a [Genome], size: usize, rng: &mut R) -> Option<&'a Genome> {
    genomes
        .choose_multiple(rng, size.clamp(1, genomes.len().max(1)))
        .max_by(|a, b| a.fitness.total_cmp(&b.fitness))
}

/// Fitness-proportionate pick. Negative fitness is shifted so the least fit
/// genome weighs 1; an all-zero population is picked uniformly.
pub fn roulette<'a, R: Rng>(genomes: &'a [Genome], rng: &mut R) -> Option<&'a Genome> {
    let min = genomes
        .iter()
        .map(|g| g.fitness)
        .fold(f64::INFINITY, f64::min);
    let shift = if min < 0.0 { -min + 1.0 } else { 0.0 };
    let weights: Vec<f64> = genomes.iter().map(|g| g.fitness + shift).collect();
    weighted_pick(genomes, &weights, rng)
}

/// Rank-proportionate pick.
pub fn rank<'a, R: Rng>(genomes: &'a [Genome], rng: &mut R) -> Option<&'a Genome> {
    let mut order: Vec<usize> = (0..genomes.len()).collect();
    order.sort_by(|&a, &b| genomes[a].fitness.total_cmp(&genomes[b].fitness));
    let mut weights = vec![0.0; genomes.len()];
    for (rank, &idx) in order.iter().enumerate() {
        weights[idx] = (rank + 1) as f64;
    }
    weighted_pick(genomes, &weights, rng)
}

/// The `count` fittest genomes, best first.
#[must_use]
pub fn elitism(genomes: &[Genome], count: usize) -> Vec<&Genome> {
    let mut sorted: Vec<&Genome> = genomes.iter().collect();
    sorted.sort_by(|a, b| b.fitness.total_cmp(&a.fitness));
    sorted.truncate(count);
    sorted
}

pub fn select<'a, R: Rng>(
    genomes: &'a [Genome],
    method: SelectionMethod,
    rng: &mut R,
) -> Option<&'a Genome> {
    match method {
        SelectionMethod::Tournament(size) => tournament(genomes, size, rng),
        SelectionMethod::Roulette => roulette(genomes, rng),
        SelectionMethod::Rank => rank(genomes, rng),
        SelectionMethod::Random => genomes.choose(rng),
    }
}

/// Two independent picks. `None` for an empty population.
pub fn select_parents<'a, R: Rng>(
    genomes: &'a [Genome],
    method: SelectionMethod,
    rng: &mut R,
) -> Option<(&'a Genome, &'a Genome)> {
    let first = select(genomes, method, rng)?;
    let second = select(genomes, method, rng)?;
    Some((first, second))
}

fn weighted_pick<'a, R: Rng>(genomes: &'a [Genome], weights: &[f64], rng: &mut R) -> Option<&'a Genome> {
    if genomes.is_empty() {
        return None;
    }
    let total: f64 = weights.iter().sum();
    if total <= 0.0 || !total.is_finite() {
        return genomes.choose(rng);
    }
    let mut target = rng.gen_range(0.0..total);
    for (genome, &w) in genomes.iter().zip(weights) {
        if target < w {
            return Some(genome);
        }
        target -= w;
    }
    genomes.last()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::genome::GenomeLogic;
    use evosim_data::CreatureKind;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn population(fitness: &[f64]) -> Vec<Genome> {
        let config = AppConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        fitness
            .iter()
            .map(|&f| {
                let mut g = Genome::new_random(CreatureKind::Herbivore, &config, &mut rng);
                g.fitness = f;
                g
            })
            .collect()
    }

    #[test]
    fn test_empty_population_yields_none() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let empty: Vec<Genome> = Vec::new();
        assert!(tournament(&empty, 3, &mut rng).is_none());
        assert!(roulette(&empty, &mut rng).is_none());
        assert!(rank(&empty, &mut rng).is_none());
        assert!(select_parents(&empty, SelectionMethod::Random, &mut rng).is_none());
    }

    #[test]
    fn test_full_tournament_picks_best() {
        let pop = population(&[1.0, 5.0, 3.0]);
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let best = tournament(&pop, 3, &mut rng).expect("non-empty");
        assert_eq!(best.fitness, 5.0);
    }

    #[test]
    fn test_roulette_ignores_zero_weight() {
        let pop = population(&[0.0, 10.0]);
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for _ in 0..50 {
            assert_eq!(roulette(&pop, &mut rng).map(|g| g.fitness), Some(10.0));
        }
    }

    #[test]
    fn test_roulette_handles_negative_and_zero_totals() {
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let negative = population(&[-5.0, -1.0]);
        assert!(roulette(&negative, &mut rng).is_some());
        let zeros = population(&[0.0, 0.0, 0.0]);
        assert!(roulette(&zeros, &mut rng).is_some());
    }

    #[test]
    fn test_elitism_order() {
        let pop = population(&[2.0, 9.0, 4.0, 7.0]);
        let elite: Vec<f64> = elitism(&pop, 2).iter().map(|g| g.fitness).collect();
        assert_eq!(elite, vec![9.0, 7.0]);
        assert_eq!(elitism(&pop, 10).len(), 4);
    }
}
