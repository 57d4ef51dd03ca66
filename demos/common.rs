//! Setup shared by the demos, so a replay runs in the arena and with the
//! rollout settings that evolution scored genomes in.

#![allow(dead_code)]

use braitenberg_evo::{Error, ExperimentConfig, Genome, Result, Scene};
use std::cmp::Ordering;

pub fn default_config() -> Result<ExperimentConfig> {
    ExperimentConfig::from_toml_str(include_str!("experiment.toml"))
}

pub fn default_scene() -> Result<Scene> {
    include_str!("arena.txt").parse()
}

/// `path` when given, otherwise `demos/experiment.toml`.
pub fn load_config(path: Option<&String>) -> Result<ExperimentConfig> {
    match path {
        Some(path) => ExperimentConfig::load(path),
        None => default_config(),
    }
}

/// `path` when given, otherwise `demos/arena.txt`.
pub fn load_scene(path: Option<&String>) -> Result<Scene> {
    match path {
        Some(path) => Scene::load(path),
        None => default_scene(),
    }
}

/// Highest scored genome, or the first one when none has been scored.
pub fn fittest<'a>(population: &'a [Genome], source: &str) -> Result<&'a Genome> {
    population
        .iter()
        .filter(|g| g.fitness().is_some())
        .max_by(|a, b| a.fitness().partial_cmp(&b.fitness()).unwrap_or(Ordering::Equal))
        .or_else(|| population.first())
        .ok_or_else(|| Error::Config(format!("population file {} contains no genomes", source)))
}
