use rand::Rng;
use serde::{Deserialize, Serialize};

/// The 'DNA' of an individual.
/// Carries its own lineage tag and fitness slot so the driver can write the
/// evaluation result straight back onto it.
pub trait Genotype: Clone + Serialize + for<'de> Deserialize<'de> + Send + Sync {
    /// Fresh individual sampled from the whole search space.
    fn random<R: Rng>(rng: &mut R, generation_num: Option<u32>) -> Self;

    /// Child of `self` and `other`. Neither parent is touched.
    fn crossover<R: Rng>(&self, other: &Self, rng: &mut R, generation_num: Option<u32>) -> Self;

    /// Mutated copy of `self`. The receiver is left as it was.
    fn mutate<R: Rng>(&self, rng: &mut R, probability: f64, coefficient: f64) -> Self;

    fn fitness(&self) -> Option<f64>;
    fn set_fitness(&mut self, fitness: f64);
    fn generation_num(&self) -> Option<u32>;

    /// Distance metric for diversity tracking.
    fn distance(&self, other: &Self) -> f64;
}

/// A trait for systems that can turn DNA into a Body and evaluate it.
pub trait Evaluator<G: Genotype> {
    /// Express DNA and return its fitness.
    /// This is where the 'Physics' happens; `rng` feeds any sensor noise.
    fn evaluate<R: Rng>(&self, genotype: &G, rng: &mut R) -> f64;
}

/// The master engine trait.
pub trait Evolver<G: Genotype> {
    fn step<E: Evaluator<G>>(&mut self, evaluator: &E) -> evolution::GenerationReport;
    fn population(&self) -> &[G];
}

pub mod bounds;
pub mod config;
pub mod error;
pub mod evolution;
pub mod genome;
pub mod geometry;
pub mod phenotype;
pub mod robot;
pub mod scene;
pub mod simulation;

pub use bounds::{GENE_COUNT, Gene, GeneBounds};
pub use config::{EvolutionConfig, ExperimentConfig, SimulationConfig};
pub use error::{Error, Result};
pub use evolution::{Evolution, GenerationReport};
pub use genome::Genome;
pub use phenotype::build_obstacle_avoidance_robot;
pub use robot::{Actuator, MotorController, ProximitySensor, SensorDrivenRobot};
pub use scene::{Environment, Scene, SceneObject, SensorId};
pub use simulation::{ObstacleAvoidanceEvaluator, Simulation};

