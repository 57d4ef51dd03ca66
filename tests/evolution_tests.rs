use braitenberg_evo::evolution::{load_population, read_population, save_population};
use braitenberg_evo::{
    Error, Evaluator, Evolution, EvolutionConfig, Evolver, Gene, Genome, Genotype,
    ObstacleAvoidanceEvaluator, Scene, SceneObject, SimulationConfig,
};
use rand::Rng;
use serde::{Deserialize, Serialize};

// --- Mock Infrastructure ---

#[derive(Clone, Serialize, Deserialize, PartialEq, Debug)]
struct MockDNA {
    value: f64,
    generation_num: Option<u32>,
    fitness: Option<f64>,
}

impl Genotype for MockDNA {
    fn random<R: Rng>(rng: &mut R, generation_num: Option<u32>) -> Self {
        MockDNA {
            value: rng.random_range(0.0..10.0),
            generation_num,
            fitness: None,
        }
    }
    fn crossover<R: Rng>(&self, other: &Self, rng: &mut R, generation_num: Option<u32>) -> Self {
        MockDNA {
            value: if rng.random_bool(0.5) {
                self.value
            } else {
                other.value
            },
            generation_num,
            fitness: None,
        }
    }
    fn mutate<R: Rng>(&self, rng: &mut R, probability: f64, _coefficient: f64) -> Self {
        let mut child = self.clone();
        if rng.random::<f64>() < probability {
            child.value += 1.0;
        }
        child
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
        (self.value - other.value).abs()
    }
}

struct ValueEval;
impl Evaluator<MockDNA> for ValueEval {
    fn evaluate<R: Rng>(&self, genotype: &MockDNA, _rng: &mut R) -> f64 {
        genotype.value
    }
}

struct NaNEval;
impl Evaluator<MockDNA> for NaNEval {
    fn evaluate<R: Rng>(&self, _genotype: &MockDNA, _rng: &mut R) -> f64 {
        f64::NAN
    }
}

fn config(population_size: usize, elitism: usize) -> EvolutionConfig {
    EvolutionConfig {
        population_size,
        elitism,
        tournament_size: 3,
        mutation_probability: 0.2,
        mutation_coefficient: 0.1,
        ..EvolutionConfig::default()
    }
}

#[test]
fn test_initial_population_is_generation_zero() {
    let engine = Evolution::<Genome>::new(config(12, 2), 42);
    assert_eq!(engine.population().len(), 12);
    assert_eq!(engine.generation(), 0);
    for g in engine.population() {
        assert_eq!(g.generation_num(), Some(0));
        assert_eq!(g.fitness(), None);
        assert!(g.is_within_bounds());
    }
}

#[test]
fn test_step_keeps_population_size_and_tags_children() {
    let mut engine = Evolution::<MockDNA>::new(config(10, 2), 1);
    let report = engine.step(&ValueEval);

    assert_eq!(report.generation, 0);
    assert_eq!(engine.generation(), 1);
    assert_eq!(engine.population().len(), 10);

    let children: Vec<_> = engine
        .population()
        .iter()
        .filter(|g| g.fitness.is_none())
        .collect();
    assert_eq!(children.len(), 8);
    assert!(children.iter().all(|g| g.generation_num == Some(1)));
}

#[test]
fn test_elites_survive_unchanged() {
    let mut engine = Evolution::<MockDNA>::new(config(10, 3), 5);
    let report = engine.step(&ValueEval);

    let elites: Vec<_> = engine
        .population()
        .iter()
        .filter(|g| g.fitness.is_some())
        .collect();
    assert_eq!(elites.len(), 3);
    assert_eq!(elites[0].fitness, Some(report.best_fitness));
    assert_eq!(elites[0].generation_num, Some(0));
}

#[test]
fn test_best_fitness_never_decreases_with_elitism() {
    let mut engine = Evolution::<MockDNA>::new(config(16, 1), 9);
    let mut last = f64::NEG_INFINITY;
    for _ in 0..20 {
        let report = engine.step(&ValueEval);
        assert!(report.best_fitness >= last);
        last = report.best_fitness;
    }
    assert!(engine.best().is_some());
}

#[test]
fn test_nan_fitness_does_not_panic() {
    let mut engine = Evolution::<MockDNA>::new(config(8, 2), 3);
    let report = engine.step(&NaNEval);
    assert!(report.best_fitness.is_nan());
    assert_eq!(engine.population().len(), 8);
    assert!(engine.best().is_none());
}

#[test]
fn test_elitism_larger_than_population_is_clamped() {
    let cfg = EvolutionConfig {
        elitism: 50,
        ..config(4, 0)
    };
    let mut engine = Evolution::<MockDNA>::new(cfg, 2);
    engine.step(&ValueEval);
    assert_eq!(engine.population().len(), 4);
}

#[test]
fn test_same_seed_same_history() {
    let run = || {
        let mut engine = Evolution::<MockDNA>::new(config(10, 2), 77);
        (0..5).map(|_| engine.step(&ValueEval)).collect::<Vec<_>>()
    };
    assert_eq!(run(), run());
}

#[test]
fn test_snapshot_resumes_identically() {
    let mut engine = Evolution::<MockDNA>::new(config(10, 2), 31);
    engine.step(&ValueEval);

    let bytes = bincode::serialize(&engine).unwrap();
    let mut restored: Evolution<MockDNA> = bincode::deserialize(&bytes).unwrap();

    let a = engine.step(&ValueEval);
    let b = restored.step(&ValueEval);
    assert_eq!(a, b);
    assert_eq!(engine.population(), restored.population());
}

#[test]
fn test_resume_from_population_continues_generation_count() {
    let pop = vec![
        Genome::new([20.0, 300.0, 25.0, 0.5, 60.0, 80.0], Some(6)),
        Genome::new([10.0, 100.0, 15.0, 0.2, 30.0, 40.0], Some(7)),
    ];
    let engine = Evolution::from_population(pop, config(2, 1), 0);
    assert_eq!(engine.generation(), 7);
}

#[test]
fn test_obstacle_avoidance_run_end_to_end() {
    let mut scene = Scene::new(400.0, 300.0);
    scene.put(SceneObject::Box {
        x: 250.0,
        y: 150.0,
        size: 60.0,
    });
    let evaluator = ObstacleAvoidanceEvaluator::new(
        scene,
        SimulationConfig {
            ticks: 100,
            ..SimulationConfig::default()
        },
    );
    let mut engine = Evolution::<Genome>::new(config(8, 2), 2024);

    for _ in 0..3 {
        let report = engine.step(&evaluator);
        assert!(report.best_fitness >= 0.0);
        assert!(report.mean_fitness <= report.best_fitness);
        assert!(report.diversity >= 0.0);
    }
    for g in engine.population() {
        assert!(g.is_within_bounds());
        assert!(g.generation_num().is_some_and(|n| n <= 3));
    }
}

#[test]
fn test_population_file_round_trip() {
    let mut engine = Evolution::<Genome>::new(config(6, 1), 4);
    engine.step(&ConstEval);
    assert!(engine.population().iter().any(|g| g.fitness().is_some()));
    assert!(engine.population().iter().any(|g| g.fitness().is_none()));

    let path = std::env::temp_dir().join(format!("braitenberg_evo_pop_{}.txt", std::process::id()));
    save_population(engine.population(), &path).unwrap();
    let loaded = load_population(&path).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(loaded, engine.population());
}

struct ConstEval;
impl Evaluator<Genome> for ConstEval {
    fn evaluate<R: Rng>(&self, genotype: &Genome, _rng: &mut R) -> f64 {
        genotype.gene(Gene::RobotWheelRadius)
    }
}

#[test]
fn test_read_population_reports_line_numbers() {
    let text = "20 300 25 0.5 60 80 3 None\n\n20 300 25 0.5 60\n";
    let err = read_population(text.as_bytes()).unwrap_err();
    assert!(matches!(err, Error::ParseGenome { line: 3, .. }), "{}", err);
}

#[test]
fn test_read_population_skips_blank_lines() {
    let text = "20 300 25 0.5 60 80 3 None\n\n8 50 10 0 20 20 None 1.5\n";
    let pop = read_population(text.as_bytes()).unwrap();
    assert_eq!(pop.len(), 2);
    assert_eq!(pop[1].fitness(), Some(1.5));
    assert_eq!(pop[1].generation_num(), None);
}
