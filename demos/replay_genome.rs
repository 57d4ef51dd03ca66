//! Replays the fittest genome of a saved population and prints its path.
//!
//! Pass the same config and scene given to `evolve_obstacle_avoidance`; both
//! demos default to `demos/experiment.toml` and `demos/arena.txt`.
//!
//! ```text
//! cargo run --example replay_genome -- population.txt [config.toml] [scene.txt]
//! ```

mod common;

use braitenberg_evo::evolution::load_population;
use braitenberg_evo::{Error, Genome, Simulation};
use rand::SeedableRng;
use rand_pcg::Pcg64;

fn main() -> braitenberg_evo::Result<()> {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(population_path) = args.first() else {
        return Err(Error::Config(
            "usage: replay_genome <population.txt> [config.toml] [scene.txt]".to_string(),
        ));
    };
    let config = common::load_config(args.get(1))?.simulation;
    let scene = common::load_scene(args.get(2))?;

    let population = load_population(population_path)?;
    let best = common::fittest(&population, population_path)?;
    println!("Replaying {}", best);

    let mut rng = Pcg64::seed_from_u64(0);
    let mut sim = Simulation::for_genome(best, scene, &config);
    for tick in 0..config.ticks {
        if !sim.step(&mut rng) {
            println!("Collision at tick {}", tick);
            break;
        }
        if tick % 50 == 0 {
            let pose = sim.robot().pose;
            println!(
                "tick {:>4}: x {:>7.1}  y {:>7.1}  heading {:>6.2}",
                tick, pose.position.x, pose.position.y, pose.heading
            );
        }
    }
    println!("Distance travelled: {:.2}", sim.distance_travelled());
    print_genome_line(best);
    Ok(())
}

fn print_genome_line(genome: &Genome) {
    println!("Saved form: {}", genome.saved_repr());
}
