pub mod macros;

use evosim_data::{Creature, CreatureKind, Genome, NeuronRole};
use evosim_lib::model::config::AppConfig;
use evosim_lib::model::lifecycle;
use evosim_lib::model::world::World;
use evosim_lib::model::NetworkLogic;

type WorldMod = Box<dyn FnOnce(&mut World)>;

/// Network outputs that keep a creature still and uninterested in
/// reproducing or migrating.
#[allow(dead_code)]
pub const IDLE: [f32; 4] = [0.5, 0.0, 0.0, 0.0];

/// Builds an empty, quiet world: no initial population, no regrowth and no
/// extinction reinforcement unless asked for.
#[allow(dead_code)]
pub struct WorldBuilder {
    config: AppConfig,
    mods: Vec<WorldMod>,
}

#[allow(dead_code)]
impl WorldBuilder {
    pub fn new() -> Self {
        let mut config = AppConfig::default();
        config.world.initial_plants = 0;
        config.world.plant_growth_rate = 0.0;
        config.creatures.initial_herbivores = 0;
        config.creatures.initial_carnivores = 0;
        config.population.min_population = 0;
        Self {
            config,
            mods: Vec::new(),
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.config.world.seed = seed;
        self
    }

    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.config.world.width = width;
        self.config.world.height = height;
        self
    }

    pub fn with_config<F>(mut self, modifier: F) -> Self
    where
        F: FnOnce(&mut AppConfig),
    {
        modifier(&mut self.config);
        self
    }

    pub fn with_extinction_prevention(mut self) -> Self {
        self.config.population.min_population = 2;
        self
    }

    /// Creature with a freshly initialized genome.
    pub fn with_creature(mut self, kind: CreatureKind, x: f64, y: f64) -> Self {
        self.mods.push(Box::new(move |world| {
            let c = lifecycle::create_creature(
                kind,
                x,
                y,
                &world.config,
                &mut world.creature_ids,
                &mut world.rng,
            );
            world.creatures.push(c);
        }));
        self
    }

    /// Creature whose network always produces `outputs`, adjusted by `tweak`.
    pub fn with_scripted<F>(
        mut self,
        kind: CreatureKind,
        x: f64,
        y: f64,
        outputs: [f32; 4],
        tweak: F,
    ) -> Self
    where
        F: FnOnce(&mut Creature) + 'static,
    {
        self.mods.push(Box::new(move |world| {
            let genome = scripted_genome(kind, &world.config, outputs);
            let mut c = lifecycle::create_creature_with_genome(
                &mut world.creature_ids,
                x,
                y,
                genome,
                &world.config,
                &mut world.rng,
            );
            tweak(&mut c);
            world.creatures.push(c);
        }));
        self
    }

    pub fn with_plant(mut self, x: f64, y: f64) -> Self {
        self.mods.push(Box::new(move |world| {
            let plant = lifecycle::create_plant(&mut world.plant_ids, x, y);
            world.plants.push(plant);
        }));
        self
    }

    pub fn build(self) -> World {
        let mut world = World::new(self.config).expect("Failed to create world in test builder");
        for modifier in self.mods {
            modifier(&mut world);
        }
        world
    }
}

/// A genome without connections: every output is fixed by its bias, so the
/// creature ignores its inputs.
#[allow(dead_code)]
pub fn scripted_genome(kind: CreatureKind, config: &AppConfig, outputs: [f32; 4]) -> Genome {
    let mut genome = Genome {
        network: Default::default(),
        kind,
        fitness: 0.0,
        species_id: None,
    };
    let net = &mut genome.network;
    for _ in 0..config.neural_network.input_neurons {
        net.add_neuron_with_bias(NeuronRole::Input, 0.0);
    }
    for value in outputs {
        // Inverse sigmoid.
        let v = value.clamp(1.0e-6, 1.0 - 1.0e-6);
        net.add_neuron_with_bias(NeuronRole::Output, (v / (1.0 - v)).ln());
    }
    net.compile();
    genome
}
