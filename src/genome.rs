//! The obstacle-avoidance genome and its evolutionary operators.
//!
//! A [`Genome`] carries the six controller genes in [`Gene::ALL`] order plus a
//! generation tag and an optional fitness score. Every genome that leaves one
//! of the operators below has all of its genes inside their [`Gene::bounds`]:
//!
//! - [`Genome::random`] samples inside the bounds,
//! - [`Genome::crossover`] only copies values from two valid parents,
//! - [`Genome::mutate`] clamps after perturbing.
//!
//! Genomes parsed from a persisted line ([`Genome::from_str`]) are taken
//! verbatim and are the caller's responsibility.

use crate::Genotype;
use crate::bounds::{GENE_COUNT, Gene};
use crate::error::Error;
use rand::Rng;
use rand_distr::{Distribution, StandardNormal};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Textual marker for an absent generation number or fitness.
pub const ABSENT: &str = "None";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Genome {
    genes: [f64; GENE_COUNT],
    generation_num: Option<u32>,
    fitness: Option<f64>,
}

impl Genome {
    /// Builds a genome from raw gene values in [`Gene::ALL`] order.
    /// Values are stored as given; fitness starts absent.
    pub fn new(genes: [f64; GENE_COUNT], generation_num: Option<u32>) -> Self {
        Self {
            genes,
            generation_num,
            fitness: None,
        }
    }

    /// Samples every gene independently and uniformly from its interval.
    pub fn random<R: Rng>(rng: &mut R, generation_num: Option<u32>) -> Self {
        let genes = Gene::ALL.map(|gene| gene.bounds().sample(rng));
        Self::new(genes, generation_num)
    }

    /// Uniform crossover: each gene comes from `self` or `other` on a fair
    /// coin flip. No clamping is needed since both parents are valid.
    pub fn crossover<R: Rng>(
        &self,
        other: &Genome,
        rng: &mut R,
        generation_num: Option<u32>,
    ) -> Genome {
        let mut genes = [0.0; GENE_COUNT];
        for (i, gene) in genes.iter_mut().enumerate() {
            *gene = if rng.random_bool(0.5) {
                self.genes[i]
            } else {
                other.genes[i]
            };
        }
        Genome::new(genes, generation_num)
    }

    /// Returns a mutated copy of this genome.
    ///
    /// Each gene is selected with probability `probability`; a selected gene
    /// is redrawn from a normal distribution centred on its value with
    /// standard deviation `coefficient * value`. All genes are clamped once
    /// every gene has been visited.
    ///
    /// A gene sitting at exactly `0.0` has zero spread and cannot leave
    /// zero through mutation. This matters for
    /// [`Gene::SensorDeltaDirection`], whose lower bound is `0.0`.
    pub fn mutate<R: Rng>(&self, rng: &mut R, probability: f64, coefficient: f64) -> Genome {
        let mut child = self.clone();
        child.mutate_in_place(rng, probability, coefficient);
        child
    }

    fn mutate_in_place<R: Rng>(&mut self, rng: &mut R, probability: f64, coefficient: f64) {
        for value in self.genes.iter_mut() {
            *value = mutate_with_probability(*value, rng, probability, coefficient);
        }
        self.check_parameter_bounds();
    }

    /// Saturating clamp of every gene into its interval. Idempotent.
    pub fn check_parameter_bounds(&mut self) {
        for gene in Gene::ALL {
            let i = gene.index();
            self.genes[i] = gene.bounds().clamp(self.genes[i]);
        }
    }

    /// Clamped copy, see [`Genome::check_parameter_bounds`].
    pub fn clamped(&self) -> Genome {
        let mut copy = self.clone();
        copy.check_parameter_bounds();
        copy
    }

    pub fn is_within_bounds(&self) -> bool {
        Gene::ALL
            .iter()
            .all(|gene| gene.bounds().contains(self.genes[gene.index()]))
    }

    pub fn gene(&self, gene: Gene) -> f64 {
        self.genes[gene.index()]
    }

    pub fn set_gene(&mut self, gene: Gene, value: f64) {
        self.genes[gene.index()] = value;
    }

    pub fn genes(&self) -> &[f64; GENE_COUNT] {
        &self.genes
    }

    pub fn robot_wheel_radius(&self) -> f64 {
        self.gene(Gene::RobotWheelRadius)
    }

    pub fn motor_ctrl_coefficient(&self) -> f64 {
        self.gene(Gene::MotorCtrlCoefficient)
    }

    pub fn motor_ctrl_min_actuator_value(&self) -> f64 {
        self.gene(Gene::MotorCtrlMinActuatorValue)
    }

    pub fn sensor_delta_direction(&self) -> f64 {
        self.gene(Gene::SensorDeltaDirection)
    }

    pub fn sensor_saturation_value(&self) -> f64 {
        self.gene(Gene::SensorSaturationValue)
    }

    pub fn sensor_max_distance(&self) -> f64 {
        self.gene(Gene::SensorMaxDistance)
    }

    pub fn generation_num(&self) -> Option<u32> {
        self.generation_num
    }

    pub fn fitness(&self) -> Option<f64> {
        self.fitness
    }

    pub fn set_fitness(&mut self, fitness: f64) {
        self.fitness = Some(fitness);
    }

    /// Euclidean distance with every gene scaled to `[0, 1]` by its interval.
    pub fn distance(&self, other: &Genome) -> f64 {
        Gene::ALL
            .iter()
            .map(|gene| {
                let width = gene.bounds().width();
                let i = gene.index();
                if width > 0.0 {
                    ((self.genes[i] - other.genes[i]) / width).powi(2)
                } else {
                    0.0
                }
            })
            .sum::<f64>()
            .sqrt()
    }

    /// Short form for log lines: fitness and generation only.
    pub fn summary(&self) -> String {
        format!(
            "Genome(fitness:{} generation_num:{})",
            fmt_rounded(self.fitness),
            fmt_generation(self.generation_num)
        )
    }

    /// Persisted line: six raw genes, generation, fitness, space separated.
    /// Values keep full precision so [`Genome::from_str`] restores them exactly.
    pub fn saved_repr(&self) -> String {
        let mut fields: Vec<String> = self.genes.iter().map(|v| v.to_string()).collect();
        fields.push(fmt_generation(self.generation_num));
        fields.push(
            self.fitness
                .map_or_else(|| ABSENT.to_string(), |f| f.to_string()),
        );
        fields.join(" ")
    }
}

fn mutate_with_probability<R: Rng>(value: f64, rng: &mut R, probability: f64, coefficient: f64) -> f64 {
    if rng.random::<f64>() < probability {
        let z: f64 = StandardNormal.sample(rng);
        value + coefficient * value * z
    } else {
        value
    }
}

fn fmt_generation(generation_num: Option<u32>) -> String {
    generation_num.map_or_else(|| ABSENT.to_string(), |g| g.to_string())
}

/// Two-decimal rounding printed in shortest form: `20.0`, `0.5`, `12.35`.
fn round2(value: f64) -> String {
    format!("{:?}", (value * 100.0).round() / 100.0)
}

fn fmt_rounded(value: Option<f64>) -> String {
    value.map_or_else(|| ABSENT.to_string(), round2)
}

/// Diagnostic form; every number rounded to two decimals.
impl fmt::Display for Genome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Genome(fitness:{} generation_num:{}",
            fmt_rounded(self.fitness),
            fmt_generation(self.generation_num)
        )?;
        for gene in Gene::ALL {
            write!(f, " {}:{}", gene.name(), round2(self.gene(gene)))?;
        }
        f.write_str(")")
    }
}

/// Parses a line produced by [`Genome::saved_repr`].
///
/// The error carries `line: 0`; callers reading files replace it with the
/// real line number.
impl FromStr for Genome {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fields: Vec<&str> = s.split_whitespace().collect();
        if fields.len() != GENE_COUNT + 2 {
            return Err(parse_error(format!(
                "expected {} fields, found {}",
                GENE_COUNT + 2,
                fields.len()
            )));
        }

        let mut genes = [0.0; GENE_COUNT];
        for gene in Gene::ALL {
            let raw = fields[gene.index()];
            genes[gene.index()] = raw
                .parse::<f64>()
                .map_err(|_| parse_error(format!("{} is not a number: {:?}", gene, raw)))?;
        }

        let generation_num = match fields[GENE_COUNT] {
            ABSENT => None,
            raw => Some(
                raw.parse::<u32>()
                    .map_err(|_| parse_error(format!("bad generation number: {:?}", raw)))?,
            ),
        };
        let fitness = match fields[GENE_COUNT + 1] {
            ABSENT => None,
            raw => Some(
                raw.parse::<f64>()
                    .map_err(|_| parse_error(format!("bad fitness: {:?}", raw)))?,
            ),
        };

        Ok(Genome {
            genes,
            generation_num,
            fitness,
        })
    }
}

fn parse_error(reason: String) -> Error {
    Error::ParseGenome { line: 0, reason }
}

impl Genotype for Genome {
    fn random<R: Rng>(rng: &mut R, generation_num: Option<u32>) -> Self {
        Genome::random(rng, generation_num)
    }

    fn crossover<R: Rng>(&self, other: &Self, rng: &mut R, generation_num: Option<u32>) -> Self {
        Genome::crossover(self, other, rng, generation_num)
    }

    fn mutate<R: Rng>(&self, rng: &mut R, probability: f64, coefficient: f64) -> Self {
        Genome::mutate(self, rng, probability, coefficient)
    }

    fn fitness(&self) -> Option<f64> {
        self.fitness
    }

    fn set_fitness(&mut self, fitness: f64) {
        self.fitness = Some(fitness);
    }

    fn generation_num(&self) -> Option<u32> {
        self.generation_num
    }

    fn distance(&self, other: &Self) -> f64 {
        Genome::distance(self, other)
    }
}
