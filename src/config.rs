//! Experiment configuration, stored as TOML.
//!
//! ```toml
//! [evolution]
//! population_size = 20
//! generations = 30
//! elitism = 2
//! tournament_size = 3
//! mutation_probability = 0.1
//! mutation_coefficient = 0.2
//!
//! [simulation]
//! robot_size = 30.0
//! sensor_error = 0.05
//! start_x = 100.0
//! start_y = 100.0
//! start_heading = 0.0
//! dt = 0.05
//! ticks = 600
//! ```

use crate::error::{Error, Result};
use log::info;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvolutionConfig {
    pub population_size: usize,
    pub generations: usize,
    pub elitism: usize,
    pub tournament_size: usize,
    pub mutation_probability: f64,
    pub mutation_coefficient: f64,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            population_size: 20,
            generations: 30,
            elitism: 2,
            tournament_size: 3,
            mutation_probability: 0.1,
            mutation_coefficient: 0.2,
        }
    }
}

impl EvolutionConfig {
    pub fn validate(&self) -> Result<()> {
        if self.population_size < 2 {
            return Err(Error::Config(
                "Population size must be at least 2".to_string(),
            ));
        }
        if self.elitism > self.population_size {
            return Err(Error::Config(format!(
                "Elitism ({}) cannot exceed population size ({})",
                self.elitism, self.population_size
            )));
        }
        if self.tournament_size == 0 {
            return Err(Error::Config(
                "Tournament size must be at least 1".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.mutation_probability) {
            return Err(Error::Config(
                "Mutation probability must be between 0 and 1".to_string(),
            ));
        }
        if !(self.mutation_coefficient >= 0.0) {
            return Err(Error::Config(
                "Mutation coefficient must be non-negative".to_string(),
            ));
        }
        Ok(())
    }
}

/// Parameters of one fitness rollout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub robot_size: f64,
    pub sensor_error: f64,
    pub start_x: f64,
    pub start_y: f64,
    pub start_heading: f64,
    pub dt: f64,
    pub ticks: usize,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            robot_size: 30.0,
            sensor_error: 0.05,
            start_x: 100.0,
            start_y: 100.0,
            start_heading: 0.0,
            dt: 0.05,
            ticks: 600,
        }
    }
}

impl SimulationConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.dt > 0.0) {
            return Err(Error::Config("Time step must be positive".to_string()));
        }
        if self.ticks == 0 {
            return Err(Error::Config("Rollout needs at least one tick".to_string()));
        }
        if !(self.sensor_error >= 0.0) {
            return Err(Error::Config(
                "Sensor error must be non-negative".to_string(),
            ));
        }
        if !(self.robot_size > 0.0) {
            return Err(Error::Config("Robot size must be positive".to_string()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperimentConfig {
    pub evolution: EvolutionConfig,
    pub simulation: SimulationConfig,
}

impl ExperimentConfig {
    pub fn validate(&self) -> Result<()> {
        self.evolution.validate()?;
        self.simulation.validate()?;
        Ok(())
    }

    /// Parses and validates. Missing keys fall back to their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: ExperimentConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_toml_str(&text)?;
        info!("Loaded configuration from {}", path.as_ref().display());
        Ok(config)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let text = toml::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), text)?;
        Ok(())
    }
}
