use anyhow::{Context, Result};
use serde::Serialize;
use std::fmt;
use std::path::Path;
use std::time::Instant;

use crate::model::config::AppConfig;
use crate::model::history::EvolutionTracker;
use crate::model::world::{TickOutcome, World};
use evosim_core::metrics::Metrics;
use evosim_data::CreatureKind;

/// Headless driver: owns the world and everything that observes it.
pub struct App {
    pub world: World,
    pub tracker: EvolutionTracker,
    pub metrics: Metrics,
    pub fingerprint: String,
}

/// End-of-run statistics.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub ticks: u64,
    pub herbivores: usize,
    pub carnivores: usize,
    pub plants: usize,
    pub births: u64,
    pub deaths: u64,
    pub reinforcements: u64,
    pub max_generation: u32,
    pub best_herbivore_fitness: Option<f64>,
    pub best_carnivore_fitness: Option<f64>,
    pub longest_lifespan: Option<u64>,
    pub mean_tick_micros: u128,
    pub config_fingerprint: String,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "ticks:           {}", self.ticks)?;
        writeln!(f, "herbivores:      {}", self.herbivores)?;
        writeln!(f, "carnivores:      {}", self.carnivores)?;
        writeln!(f, "plants:          {}", self.plants)?;
        writeln!(f, "births/deaths:   {}/{}", self.births, self.deaths)?;
        writeln!(f, "reinforcements:  {}", self.reinforcements)?;
        writeln!(f, "max generation:  {}", self.max_generation)?;
        if let Some(best) = self.best_herbivore_fitness {
            writeln!(f, "best herbivore:  {best:.2}")?;
        }
        if let Some(best) = self.best_carnivore_fitness {
            writeln!(f, "best carnivore:  {best:.2}")?;
        }
        if let Some(age) = self.longest_lifespan {
            writeln!(f, "longest life:    {age}")?;
        }
        write!(f, "mean tick:       {}µs", self.mean_tick_micros)
    }
}

impl App {
    /// Reads a TOML config, falling back to defaults when the file does not
    /// exist. A file that exists but fails to parse or validate is an error.
    pub fn load_config(path: &Path) -> Result<AppConfig> {
        if !path.exists() {
            tracing::warn!(path = %path.display(), "Config file not found, using defaults");
            return Ok(AppConfig::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = AppConfig::from_toml(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        Ok(config)
    }

    pub fn new(config: AppConfig) -> Result<Self> {
        let fingerprint = config.fingerprint();
        let world = World::new(config).context("Failed to create world")?;
        let mut tracker = EvolutionTracker::new();
        for c in &world.creatures {
            tracker.register_birth(c, 0);
        }
        tracker.record_tick(&world.creatures);
        tracing::info!(fingerprint = %fingerprint, "Simulation ready");
        Ok(Self {
            world,
            tracker,
            metrics: Metrics::new(),
            fingerprint,
        })
    }

    /// Runs one tick and feeds its outcome to the tracker and metrics.
    pub fn step(&mut self) -> TickOutcome {
        let start = Instant::now();
        let outcome = self.world.update();
        let elapsed = start.elapsed();

        // Offspring and reinforcements both show up as unknown ids.
        for c in &self.world.creatures {
            self.tracker.register_birth(c, outcome.tick);
        }
        for c in &outcome.dead {
            self.tracker.register_death(c, outcome.tick);
        }
        self.tracker.record_tick(&self.world.creatures);

        self.metrics
            .record_tick(elapsed, self.world.creatures.len(), self.world.plants.len());
        self.metrics.add_to_counter("births", outcome.born.len() as u64);
        self.metrics.add_to_counter("deaths", outcome.dead.len() as u64);
        self.metrics.add_to_counter(
            "reinforcements",
            (outcome.reinforced_herbivores + outcome.reinforced_carnivores) as u64,
        );
        self.metrics
            .add_to_counter("plants_eaten", outcome.plants_eaten as u64);
        outcome
    }

    pub fn run(&mut self, ticks: u64) -> RunSummary {
        for _ in 0..ticks {
            self.step();
        }
        self.summary()
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary {
            ticks: self.world.tick,
            herbivores: self.world.count_kind(CreatureKind::Herbivore),
            carnivores: self.world.count_kind(CreatureKind::Carnivore),
            plants: self.world.plants.len(),
            births: self.metrics.counter("births"),
            deaths: self.metrics.counter("deaths"),
            reinforcements: self.metrics.counter("reinforcements"),
            max_generation: self.tracker.max_generation(),
            best_herbivore_fitness: self.tracker.best_herbivore().map(|r| r.fitness),
            best_carnivore_fitness: self.tracker.best_carnivore().map(|r| r.fitness),
            longest_lifespan: self.tracker.longest_lived().map(|r| r.lifespan),
            mean_tick_micros: self.metrics.mean_tick_duration().as_micros(),
            config_fingerprint: self.fingerprint.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config() -> AppConfig {
        let mut config = AppConfig::default();
        config.world.width = 400.0;
        config.world.height = 300.0;
        config.world.initial_plants = 30;
        config.creatures.initial_herbivores = 8;
        config.creatures.initial_carnivores = 3;
        config
    }

    #[test]
    fn test_missing_config_falls_back_to_defaults() {
        let config = App::load_config(Path::new("definitely/not/here.toml"))
            .expect("missing file is not an error");
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_step_keeps_counters_consistent() {
        let mut app = App::new(small_config()).expect("Failed to create app");
        let summary = app.run(50);
        assert_eq!(summary.ticks, 50);
        assert_eq!(app.metrics.tick_count(), 50);
        assert_eq!(app.tracker.total_deaths(), summary.deaths);
        assert!(app.tracker.total_births() >= 11);
        assert!(!summary.to_string().is_empty());
    }
}
