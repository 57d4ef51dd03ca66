use braitenberg_evo::geometry::{Point, Pose};
use braitenberg_evo::{Environment, Genome, Scene, SceneObject, SensorId, build_obstacle_avoidance_robot};
use rand::SeedableRng;
use rand_pcg::Pcg64;

fn sample_genome() -> Genome {
    Genome::new([20.0, 300.0, 25.0, 0.5, 60.0, 80.0], Some(3))
}

#[test]
fn test_robot_is_wired_symmetrically() {
    let genome = sample_genome();
    let mut scene = Scene::new(640.0, 480.0);
    let robot = build_obstacle_avoidance_robot(&genome, 100.0, 120.0, 30.0, 0.1, &mut scene);

    let left = robot.left_motor_controller().expect("left controller attached");
    let right = robot.right_motor_controller().expect("right controller attached");

    assert_eq!(left.sensor().delta_direction, 0.5);
    assert_eq!(right.sensor().delta_direction, -0.5);
    assert_eq!(left.coefficient(), right.coefficient());
    assert_eq!(left.coefficient(), 300.0);
    assert_eq!(left.min_actuator_value(), right.min_actuator_value());
    assert_eq!(left.min_actuator_value(), 25.0);

    for ctrl in [left, right] {
        assert_eq!(ctrl.sensor().saturation_value, 60.0);
        assert_eq!(ctrl.sensor().max_distance, 80.0);
        assert_eq!(ctrl.sensor().error, 0.1, "sensor error is passed through");
        assert_eq!(ctrl.actuator().value(), 0.0, "actuators start idle");
    }
}

#[test]
fn test_robot_body_comes_from_genome_and_placement() {
    let genome = sample_genome();
    let mut scene = Scene::new(640.0, 480.0);
    let robot = genome.build_obstacle_avoidance_robot(42.0, 24.0, 35.0, 0.0, &mut scene);

    assert_eq!(robot.pose.position, Point::new(42.0, 24.0));
    assert_eq!(robot.size, 35.0);
    assert_eq!(robot.wheel_radius, 20.0);
}

#[test]
fn test_both_sensors_register_with_the_scene() {
    let genome = sample_genome();
    let mut scene = Scene::new(640.0, 480.0);
    let robot = build_obstacle_avoidance_robot(&genome, 100.0, 100.0, 30.0, 0.0, &mut scene);

    assert_eq!(scene.registered_sensors(), 2);
    let left_id = robot.left_motor_controller().unwrap().sensor().id();
    let right_id = robot.right_motor_controller().unwrap().sensor().id();
    assert_ne!(left_id, right_id);
}

#[test]
fn test_assembly_only_reads_the_genome() {
    let genome = sample_genome();
    let before = genome.clone();
    let mut scene = Scene::new(640.0, 480.0);
    let robot = build_obstacle_avoidance_robot(&genome, 100.0, 100.0, 30.0, 0.0, &mut scene);
    drop(genome);

    // The robot outlives the genome it was built from.
    assert_eq!(robot.wheel_radius, before.robot_wheel_radius());
}

/// Environment stub that only counts registrations and sees no obstacles.
#[derive(Default)]
struct EmptyWorld {
    registered: Vec<SensorId>,
}

impl Environment for EmptyWorld {
    fn register_sensor(&mut self) -> SensorId {
        let id = SensorId(self.registered.len());
        self.registered.push(id);
        id
    }

    fn cast_ray(&self, _origin: Point, _direction: f64, _max_distance: f64) -> Option<f64> {
        None
    }

    fn collides(&self, _center: Point, _radius: f64) -> bool {
        false
    }
}

#[test]
fn test_assembler_accepts_any_environment() {
    let genome = sample_genome();
    let mut world = EmptyWorld::default();
    let mut robot = build_obstacle_avoidance_robot(&genome, 0.0, 0.0, 30.0, 0.0, &mut world);
    assert_eq!(world.registered, vec![SensorId(0), SensorId(1)]);

    // Nothing in sight: both wheels run at the floor and the robot goes straight.
    let mut rng = Pcg64::seed_from_u64(0);
    let moved = robot.step(&world, 1.0, &mut rng);
    let expected = 25.0_f64.to_radians() * 20.0;
    assert!((moved - expected).abs() < 1e-9);
    assert_eq!(robot.pose.heading, 0.0);
    assert_eq!(robot.left_motor_controller().unwrap().actuator().value(), 25.0);
    assert_eq!(robot.right_motor_controller().unwrap().actuator().value(), 25.0);
}

#[test]
fn test_obstacle_on_the_left_turns_robot_right() {
    let genome = Genome::new([20.0, 600.0, 10.0, 0.6, 100.0, 150.0], None);
    let mut scene = Scene::new(1000.0, 1000.0);
    // Box ahead and to the left of a robot heading along +x.
    scene.put(SceneObject::Box {
        x: 180.0,
        y: 560.0,
        size: 60.0,
    });
    let mut robot = build_obstacle_avoidance_robot(&genome, 100.0, 500.0, 30.0, 0.0, &mut scene);
    robot.pose = Pose::new(100.0, 500.0, 0.0);

    let mut rng = Pcg64::seed_from_u64(1);
    robot.step(&scene, 0.05, &mut rng);

    let left = robot.left_motor_controller().unwrap().actuator().value();
    let right = robot.right_motor_controller().unwrap().actuator().value();
    assert!(left > right, "left wheel should spin faster ({} vs {})", left, right);
    assert!(robot.pose.heading < 0.0, "robot turns away (clockwise)");
}
