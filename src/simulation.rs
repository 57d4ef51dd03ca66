//! Fixed-step rollout of one robot in a scene, and the fitness built on it.

use crate::Evaluator;
use crate::config::SimulationConfig;
use crate::genome::Genome;
use crate::robot::SensorDrivenRobot;
use crate::scene::Scene;
use log::debug;
use rand::Rng;

/// One robot driving through its own copy of a scene.
#[derive(Debug, Clone)]
pub struct Simulation {
    scene: Scene,
    robot: SensorDrivenRobot,
    dt: f64,
    ticks: usize,
    distance_travelled: f64,
    collided: bool,
}

impl Simulation {
    pub fn new(scene: Scene, robot: SensorDrivenRobot, dt: f64) -> Self {
        Self {
            scene,
            robot,
            dt,
            ticks: 0,
            distance_travelled: 0.0,
            collided: false,
        }
    }

    /// Builds the phenotype of `genome` inside `scene` using `config`'s placement.
    pub fn for_genome(genome: &Genome, mut scene: Scene, config: &SimulationConfig) -> Self {
        let mut robot = genome.build_obstacle_avoidance_robot(
            config.start_x,
            config.start_y,
            config.robot_size,
            config.sensor_error,
            &mut scene,
        );
        robot.pose.heading = config.start_heading;
        Self::new(scene, robot, config.dt)
    }

    /// Advances one tick. Returns `false` once the robot has hit something;
    /// further calls are no-ops.
    pub fn step<R: Rng>(&mut self, rng: &mut R) -> bool {
        if self.collided {
            return false;
        }
        let moved = self.robot.step(&self.scene, self.dt, rng);
        self.ticks += 1;
        if self.robot.collides(&self.scene) {
            let at = self.robot.pose.position;
            debug!("Collision at tick {} ({:.1}, {:.1})", self.ticks, at.x, at.y);
            self.collided = true;
            return false;
        }
        self.distance_travelled += moved;
        true
    }

    /// Runs up to `ticks` steps, stopping early on collision.
    pub fn run<R: Rng>(&mut self, ticks: usize, rng: &mut R) {
        for _ in 0..ticks {
            if !self.step(rng) {
                break;
            }
        }
    }

    pub fn robot(&self) -> &SensorDrivenRobot {
        &self.robot
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn ticks(&self) -> usize {
        self.ticks
    }

    pub fn distance_travelled(&self) -> f64 {
        self.distance_travelled
    }

    pub fn collided(&self) -> bool {
        self.collided
    }
}

/// Scores a genome by how far its robot drives before the first collision.
#[derive(Debug, Clone)]
pub struct ObstacleAvoidanceEvaluator {
    scene: Scene,
    config: SimulationConfig,
}

impl ObstacleAvoidanceEvaluator {
    pub fn new(scene: Scene, config: SimulationConfig) -> Self {
        Self { scene, config }
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Full rollout, for callers that want more than the score.
    pub fn rollout<R: Rng>(&self, genome: &Genome, rng: &mut R) -> Simulation {
        let mut sim = Simulation::for_genome(genome, self.scene.clone(), &self.config);
        sim.run(self.config.ticks, rng);
        sim
    }
}

impl Evaluator<Genome> for ObstacleAvoidanceEvaluator {
    fn evaluate<R: Rng>(&self, genotype: &Genome, rng: &mut R) -> f64 {
        let sim = self.rollout(genotype, rng);
        debug!(
            "{} drove {:.2} in {} ticks{}",
            genotype.summary(),
            sim.distance_travelled(),
            sim.ticks(),
            if sim.collided() { " (collided)" } else { "" }
        );
        sim.distance_travelled()
    }
}
