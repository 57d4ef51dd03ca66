//! Two-wheeled robot body and the sensor → motor → wheel chain that drives it.
//!
//! Units: distances in scene units, angles in radians, actuator values are
//! wheel angular speeds in degrees per second.

use crate::geometry::Pose;
use crate::scene::{Environment, SensorId};
use rand::Rng;
use rand_distr::{Distribution, StandardNormal};

/// Reading of a proximity sensor touching an obstacle, before saturation.
pub const SENSOR_FULL_SCALE: f64 = 100.0;

/// Passive output sink holding the last value written to it.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Actuator {
    value: f64,
}

impl Actuator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, value: f64) {
        self.value = value;
    }

    pub fn value(&self) -> f64 {
        self.value
    }
}

/// Ray-based proximity sensor mounted at an angle to the robot heading.
#[derive(Debug, Clone, PartialEq)]
pub struct ProximitySensor {
    id: SensorId,
    pub delta_direction: f64,
    pub saturation_value: f64,
    pub error: f64,
    pub max_distance: f64,
}

impl ProximitySensor {
    /// Creates the sensor and registers it with `env` for ray queries.
    pub fn new<E: Environment + ?Sized>(
        env: &mut E,
        delta_direction: f64,
        saturation_value: f64,
        error: f64,
        max_distance: f64,
    ) -> Self {
        Self {
            id: env.register_sensor(),
            delta_direction,
            saturation_value,
            error,
            max_distance,
        }
    }

    pub fn id(&self) -> SensorId {
        self.id
    }

    /// Closer obstacles give larger readings, `0` when nothing is in range.
    /// The result never exceeds `saturation_value`.
    pub fn read<E: Environment + ?Sized, R: Rng>(&self, pose: &Pose, env: &E, rng: &mut R) -> f64 {
        let direction = pose.heading + self.delta_direction;
        let Some(distance) = env.cast_ray(pose.position, direction, self.max_distance) else {
            return 0.0;
        };

        let mut reading = SENSOR_FULL_SCALE * (1.0 - distance / self.max_distance);
        if self.error > 0.0 {
            let z: f64 = StandardNormal.sample(rng);
            reading *= 1.0 + self.error * z;
        }
        reading.max(0.0).min(self.saturation_value)
    }
}

/// Maps one sensor to one wheel: `max(floor, coefficient * reading / full scale)`.
#[derive(Debug, Clone, PartialEq)]
pub struct MotorController {
    sensor: ProximitySensor,
    coefficient: f64,
    actuator: Actuator,
    min_actuator_value: f64,
}

impl MotorController {
    pub fn new(
        sensor: ProximitySensor,
        coefficient: f64,
        actuator: Actuator,
        min_actuator_value: f64,
    ) -> Self {
        Self {
            sensor,
            coefficient,
            actuator,
            min_actuator_value,
        }
    }

    pub fn sensor(&self) -> &ProximitySensor {
        &self.sensor
    }

    pub fn coefficient(&self) -> f64 {
        self.coefficient
    }

    pub fn min_actuator_value(&self) -> f64 {
        self.min_actuator_value
    }

    pub fn actuator(&self) -> &Actuator {
        &self.actuator
    }

    /// Reads the sensor and writes the resulting command to the actuator.
    pub fn update<E: Environment + ?Sized, R: Rng>(&mut self, pose: &Pose, env: &E, rng: &mut R) -> f64 {
        let reading = self.sensor.read(pose, env, rng);
        let command = (self.coefficient * reading / SENSOR_FULL_SCALE).max(self.min_actuator_value);
        self.actuator.set(command);
        command
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SensorDrivenRobot {
    pub pose: Pose,
    /// Body diameter, also used as the axle length.
    pub size: f64,
    pub wheel_radius: f64,
    left_motor_controller: Option<MotorController>,
    right_motor_controller: Option<MotorController>,
}

impl SensorDrivenRobot {
    pub fn new(x: f64, y: f64, size: f64, wheel_radius: f64) -> Self {
        Self {
            pose: Pose::new(x, y, 0.0),
            size,
            wheel_radius,
            left_motor_controller: None,
            right_motor_controller: None,
        }
    }

    pub fn set_left_motor_controller(&mut self, controller: MotorController) {
        self.left_motor_controller = Some(controller);
    }

    pub fn set_right_motor_controller(&mut self, controller: MotorController) {
        self.right_motor_controller = Some(controller);
    }

    pub fn left_motor_controller(&self) -> Option<&MotorController> {
        self.left_motor_controller.as_ref()
    }

    pub fn right_motor_controller(&self) -> Option<&MotorController> {
        self.right_motor_controller.as_ref()
    }

    /// Advances the robot by `dt` seconds with differential-drive kinematics
    /// and returns the distance covered. A side without a controller does
    /// not turn its wheel.
    pub fn step<E: Environment + ?Sized, R: Rng>(&mut self, env: &E, dt: f64, rng: &mut R) -> f64 {
        let pose = self.pose;
        let left = self
            .left_motor_controller
            .as_mut()
            .map_or(0.0, |c| c.update(&pose, env, rng));
        let right = self
            .right_motor_controller
            .as_mut()
            .map_or(0.0, |c| c.update(&pose, env, rng));

        let v_left = left.to_radians() * self.wheel_radius;
        let v_right = right.to_radians() * self.wheel_radius;
        let speed = (v_left + v_right) / 2.0;
        let turn_rate = if self.size > 0.0 {
            (v_right - v_left) / self.size
        } else {
            0.0
        };

        self.pose.heading += turn_rate * dt;
        self.pose.position = self.pose.position.offset(self.pose.heading, speed * dt);
        (speed * dt).abs()
    }

    pub fn collides<E: Environment + ?Sized>(&self, env: &E) -> bool {
        env.collides(self.pose.position, self.size / 2.0)
    }
}
