//! Genotype → phenotype mapping.

use crate::genome::Genome;
use crate::robot::{Actuator, MotorController, ProximitySensor, SensorDrivenRobot};
use crate::scene::Environment;

/// Assembles the symmetric Braitenberg controller described by `genome`.
///
/// The left sensor looks `+sensor_delta_direction` off the heading and the
/// right one `-sensor_delta_direction`. Each sensor feeds the motor
/// controller of its own side, and both controllers share the gain and the
/// floor. Both sensors are registered with `env`.
///
/// The genome is only read; the returned robot holds no reference to it.
pub fn build_obstacle_avoidance_robot<E: Environment + ?Sized>(
    genome: &Genome,
    x: f64,
    y: f64,
    robot_size: f64,
    sensor_error: f64,
    env: &mut E,
) -> SensorDrivenRobot {
    let mut robot = SensorDrivenRobot::new(x, y, robot_size, genome.robot_wheel_radius());

    let left_obstacle_sensor = ProximitySensor::new(
        env,
        genome.sensor_delta_direction(),
        genome.sensor_saturation_value(),
        sensor_error,
        genome.sensor_max_distance(),
    );
    let right_obstacle_sensor = ProximitySensor::new(
        env,
        -genome.sensor_delta_direction(),
        genome.sensor_saturation_value(),
        sensor_error,
        genome.sensor_max_distance(),
    );

    let left_wheel_actuator = Actuator::new();
    let right_wheel_actuator = Actuator::new();

    let left_motor_controller = MotorController::new(
        left_obstacle_sensor,
        genome.motor_ctrl_coefficient(),
        left_wheel_actuator,
        genome.motor_ctrl_min_actuator_value(),
    );
    let right_motor_controller = MotorController::new(
        right_obstacle_sensor,
        genome.motor_ctrl_coefficient(),
        right_wheel_actuator,
        genome.motor_ctrl_min_actuator_value(),
    );

    robot.set_left_motor_controller(left_motor_controller);
    robot.set_right_motor_controller(right_motor_controller);
    robot
}

impl Genome {
    /// Method form of [`build_obstacle_avoidance_robot`].
    pub fn build_obstacle_avoidance_robot<E: Environment + ?Sized>(
        &self,
        x: f64,
        y: f64,
        robot_size: f64,
        sensor_error: f64,
        env: &mut E,
    ) -> SensorDrivenRobot {
        build_obstacle_avoidance_robot(self, x, y, robot_size, sensor_error, env)
    }
}
