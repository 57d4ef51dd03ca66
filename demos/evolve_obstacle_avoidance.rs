//! Evolves obstacle-avoidance controllers and saves the final population.
//!
//! ```text
//! RUST_LOG=info cargo run --example evolve_obstacle_avoidance -- [config.toml] [scene.txt] [out.txt]
//! ```

mod common;

use braitenberg_evo::evolution::save_population;
use braitenberg_evo::{Evolution, Evolver, Genome, ObstacleAvoidanceEvaluator};

fn main() -> braitenberg_evo::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = common::load_config(args.first())?;
    let scene = common::load_scene(args.get(1))?;
    let out_path = args
        .get(2)
        .cloned()
        .unwrap_or_else(|| "population.txt".to_string());

    let evaluator = ObstacleAvoidanceEvaluator::new(scene, config.simulation.clone());
    let mut engine = Evolution::<Genome>::new(config.evolution.clone(), 42);

    println!(
        "{:<6} | {:<10} | {:<10} | {:<10}",
        "Gen", "Best", "Mean", "Diversity"
    );
    println!("-----------------------------------------------");
    for _ in 0..config.evolution.generations {
        let report = engine.step(&evaluator);
        println!(
            "{:<6} | {:<10.2} | {:<10.2} | {:<10.3}",
            report.generation, report.best_fitness, report.mean_fitness, report.diversity
        );
    }

    if let Some(best) = engine.best() {
        println!("\nBest: {}", best);
    }
    save_population(engine.population(), &out_path)?;
    Ok(())
}
