//! Generational driver: evaluate, keep the elite, breed the rest.
//!
//! Each [`Evolution::step`]:
//! 1. evaluates every genome that has no fitness yet,
//! 2. sorts by fitness (NaN last) and copies the `elitism` best unchanged,
//! 3. fills the population with children of two tournament winners,
//!    bred with [`Genotype::crossover`] then [`Genotype::mutate`].
//!
//! Elites keep their fitness and are not re-evaluated.

use crate::config::EvolutionConfig;
use crate::error::{Error, Result};
use crate::genome::Genome;
use crate::{Evaluator, Evolver, Genotype};
use log::{debug, info, warn};
use rand::prelude::{IndexedRandom, SeedableRng};
use rand_pcg::Pcg64; // Specific, serializable generator
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// Compare two fitness values, treating NaN (and absent) as less than all others.
/// This ensures unscored individuals sort to the end (lowest priority).
fn cmp_fitness_nan_last(a: Option<f64>, b: Option<f64>) -> Ordering {
    let a = a.unwrap_or(f64::NAN);
    let b = b.unwrap_or(f64::NAN);
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
    }
}

/// Summary of one generation, as logged by the driver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationReport {
    /// Generation that was evaluated.
    pub generation: u32,
    pub best_fitness: f64,
    pub mean_fitness: f64,
    /// Mean pairwise [`Genotype::distance`] of the evaluated population.
    pub diversity: f64,
}

#[derive(Serialize, Deserialize)]
#[serde(bound = "G: Genotype")]
pub struct Evolution<G: Genotype> {
    population: Vec<G>,
    config: EvolutionConfig,
    generation: u32,
    rng: Pcg64,
}

impl<G: Genotype> Evolution<G> {
    /// Samples a random generation-0 population of `config.population_size`.
    pub fn new(config: EvolutionConfig, seed: u64) -> Self {
        let mut rng = Pcg64::seed_from_u64(seed);
        let population = (0..config.population_size)
            .map(|_| G::random(&mut rng, Some(0)))
            .collect();
        Self {
            population,
            config,
            generation: 0,
            rng,
        }
    }

    /// Resumes from an existing population. The generation counter continues
    /// from the highest generation tag found.
    pub fn from_population(initial_pop: Vec<G>, config: EvolutionConfig, seed: u64) -> Self {
        let generation = initial_pop
            .iter()
            .filter_map(Genotype::generation_num)
            .max()
            .unwrap_or(0);
        Self {
            population: initial_pop,
            config,
            generation,
            rng: Pcg64::seed_from_u64(seed),
        }
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }

    pub fn config(&self) -> &EvolutionConfig {
        &self.config
    }

    /// Highest-fitness genome among those already evaluated.
    pub fn best(&self) -> Option<&G> {
        self.population
            .iter()
            .filter(|g| g.fitness().is_some_and(|f| !f.is_nan()))
            .max_by(|a, b| cmp_fitness_nan_last(a.fitness(), b.fitness()))
    }

    fn evaluate_population<E: Evaluator<G>>(&mut self, evaluator: &E) {
        for genome in &mut self.population {
            if genome.fitness().is_none() {
                let fitness = evaluator.evaluate(genome, &mut self.rng);
                if fitness.is_nan() {
                    warn!("Evaluator returned NaN fitness in generation {}", self.generation);
                }
                genome.set_fitness(fitness);
            }
        }
    }

    fn report(&self) -> GenerationReport {
        let scores: Vec<f64> = self
            .population
            .iter()
            .filter_map(Genotype::fitness)
            .filter(|f| !f.is_nan())
            .collect();
        let best_fitness = scores.iter().copied().fold(f64::NAN, f64::max);
        let mean_fitness = if scores.is_empty() {
            f64::NAN
        } else {
            scores.iter().sum::<f64>() / scores.len() as f64
        };

        let n = self.population.len();
        let mut total = 0.0;
        let mut pairs = 0usize;
        for i in 0..n {
            for j in (i + 1)..n {
                total += self.population[i].distance(&self.population[j]);
                pairs += 1;
            }
        }
        let diversity = if pairs == 0 { 0.0 } else { total / pairs as f64 };

        GenerationReport {
            generation: self.generation,
            best_fitness,
            mean_fitness,
            diversity,
        }
    }
}

impl<G: Genotype> Evolver<G> for Evolution<G> {
    fn step<E: Evaluator<G>>(&mut self, evaluator: &E) -> GenerationReport {
        self.evaluate_population(evaluator);
        let report = self.report();
        info!(
            "Generation {}: best {:.2}, mean {:.2}, diversity {:.3}",
            report.generation, report.best_fitness, report.mean_fitness, report.diversity
        );

        if self.population.is_empty() {
            self.generation += 1;
            return report;
        }

        // Sort by fitness descending, with NaN values pushed to the end
        self.population
            .sort_by(|a, b| cmp_fitness_nan_last(b.fitness(), a.fitness()));

        let pop_size = self.config.population_size;
        let effective_elitism = self.config.elitism.min(pop_size).min(self.population.len());
        let mut next_gen = self.population[..effective_elitism].to_vec();

        let child_generation = Some(self.generation + 1);
        let tournament_size = self.config.tournament_size.clamp(1, self.population.len());
        while next_gen.len() < pop_size {
            let Some(p_a) = tournament(&self.population, tournament_size, &mut self.rng) else {
                break;
            };
            let Some(p_b) = tournament(&self.population, tournament_size, &mut self.rng) else {
                break;
            };
            let child = p_a
                .crossover(p_b, &mut self.rng, child_generation)
                .mutate(
                    &mut self.rng,
                    self.config.mutation_probability,
                    self.config.mutation_coefficient,
                );
            next_gen.push(child);
        }
        debug!(
            "Bred {} children, kept {} elites",
            next_gen.len() - effective_elitism,
            effective_elitism
        );

        self.population = next_gen;
        self.generation += 1;
        report
    }

    fn population(&self) -> &[G] {
        &self.population
    }
}

fn tournament<'a, G: Genotype>(population: &'a [G], size: usize, rng: &mut Pcg64) -> Option<&'a G> {
    population
        .choose_multiple(rng, size)
        .max_by(|a, b| cmp_fitness_nan_last(a.fitness(), b.fitness()))
}

/// Writes one [`Genome::saved_repr`] line per genome.
pub fn save_population<P: AsRef<Path>>(population: &[Genome], path: P) -> Result<()> {
    let file = std::fs::File::create(path.as_ref())?;
    let mut out = BufWriter::new(file);
    for genome in population {
        writeln!(out, "{}", genome.saved_repr())?;
    }
    out.flush()?;
    info!(
        "Saved {} genomes to {}",
        population.len(),
        path.as_ref().display()
    );
    Ok(())
}

/// Reads genomes written by [`save_population`]. Blank lines are skipped.
pub fn read_population<R: BufRead>(reader: R) -> Result<Vec<Genome>> {
    let mut population = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let genome = line.parse::<Genome>().map_err(|err| match err {
            Error::ParseGenome { reason, .. } => Error::ParseGenome {
                line: idx + 1,
                reason,
            },
            other => other,
        })?;
        population.push(genome);
    }
    Ok(population)
}

pub fn load_population<P: AsRef<Path>>(path: P) -> Result<Vec<Genome>> {
    let file = std::fs::File::open(path.as_ref())?;
    let population = read_population(BufReader::new(file))?;
    info!(
        "Loaded {} genomes from {}",
        population.len(),
        path.as_ref().display()
    );
    Ok(population)
}
