//! Static gene table.
//!
//! Each of the six controller parameters lives in a fixed closed interval.
//! The order of [`Gene::ALL`] is the canonical gene order used everywhere a
//! genome is flattened: storage, crossover, mutation draws and the persisted
//! line format.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f64::consts::FRAC_PI_2;
use std::fmt;

/// Number of genes in a [`crate::genome::Genome`].
pub const GENE_COUNT: usize = 6;

/// Closed interval `[min, max]` a gene is confined to.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeneBounds {
    pub min: f64,
    pub max: f64,
}

impl GeneBounds {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Saturating clamp. NaN passes through unchanged.
    pub fn clamp(&self, value: f64) -> f64 {
        if value < self.min {
            self.min
        } else if value > self.max {
            self.max
        } else {
            value
        }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    pub fn width(&self) -> f64 {
        self.max - self.min
    }

    /// Uniform sample over the closed interval.
    pub fn sample<R: Rng>(&self, rng: &mut R) -> f64 {
        rng.random_range(self.min..=self.max)
    }
}

/// One scalar parameter of the obstacle-avoidance controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gene {
    RobotWheelRadius,
    MotorCtrlCoefficient,
    MotorCtrlMinActuatorValue,
    SensorDeltaDirection,
    SensorSaturationValue,
    SensorMaxDistance,
}

impl Gene {
    pub const ALL: [Gene; GENE_COUNT] = [
        Gene::RobotWheelRadius,
        Gene::MotorCtrlCoefficient,
        Gene::MotorCtrlMinActuatorValue,
        Gene::SensorDeltaDirection,
        Gene::SensorSaturationValue,
        Gene::SensorMaxDistance,
    ];

    /// Position of this gene in the canonical order.
    pub const fn index(self) -> usize {
        match self {
            Gene::RobotWheelRadius => 0,
            Gene::MotorCtrlCoefficient => 1,
            Gene::MotorCtrlMinActuatorValue => 2,
            Gene::SensorDeltaDirection => 3,
            Gene::SensorSaturationValue => 4,
            Gene::SensorMaxDistance => 5,
        }
    }

    pub const fn bounds(self) -> GeneBounds {
        match self {
            Gene::RobotWheelRadius => GeneBounds::new(8.0, 30.0),
            Gene::MotorCtrlCoefficient => GeneBounds::new(50.0, 600.0),
            Gene::MotorCtrlMinActuatorValue => GeneBounds::new(10.0, 40.0),
            Gene::SensorDeltaDirection => GeneBounds::new(0.0, FRAC_PI_2),
            Gene::SensorSaturationValue => GeneBounds::new(20.0, 100.0),
            Gene::SensorMaxDistance => GeneBounds::new(20.0, 150.0),
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Gene::RobotWheelRadius => "robot_wheel_radius",
            Gene::MotorCtrlCoefficient => "motor_ctrl_coefficient",
            Gene::MotorCtrlMinActuatorValue => "motor_ctrl_min_actuator_value",
            Gene::SensorDeltaDirection => "sensor_delta_direction",
            Gene::SensorSaturationValue => "sensor_saturation_value",
            Gene::SensorMaxDistance => "sensor_max_distance",
        }
    }
}

impl fmt::Display for Gene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
