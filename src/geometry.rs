//! Planar geometry for sensor rays and body collisions.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Point reached by walking `length` along `direction` (radians).
    pub fn offset(&self, direction: f64, length: f64) -> Point {
        Point::new(
            self.x + length * direction.cos(),
            self.y + length * direction.sin(),
        )
    }
}

/// Position plus heading in radians, counter-clockwise from the x axis.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Pose {
    pub position: Point,
    pub heading: f64,
}

impl Pose {
    #[must_use]
    pub const fn new(x: f64, y: f64, heading: f64) -> Self {
        Self {
            position: Point::new(x, y),
            heading,
        }
    }
}

fn cross(ax: f64, ay: f64, bx: f64, by: f64) -> f64 {
    ax * by - ay * bx
}

/// Distance along the ray `origin + t * (cos d, sin d)` to segment `a-b`,
/// or `None` when the ray misses. Parallel segments never hit.
pub fn ray_segment_distance(origin: Point, direction: f64, a: Point, b: Point) -> Option<f64> {
    let (dx, dy) = (direction.cos(), direction.sin());
    let (ex, ey) = (b.x - a.x, b.y - a.y);
    let denom = cross(dx, dy, ex, ey);
    if denom.abs() < 1e-12 {
        return None;
    }
    let (wx, wy) = (a.x - origin.x, a.y - origin.y);
    let t = cross(wx, wy, ex, ey) / denom;
    let u = cross(wx, wy, dx, dy) / denom;
    if t >= 0.0 && (0.0..=1.0).contains(&u) {
        Some(t)
    } else {
        None
    }
}

/// Shortest distance from `p` to the segment `a-b`.
pub fn point_segment_distance(p: Point, a: Point, b: Point) -> f64 {
    let (ex, ey) = (b.x - a.x, b.y - a.y);
    let len_sq = ex * ex + ey * ey;
    if len_sq == 0.0 {
        return p.distance(a);
    }
    let t = (((p.x - a.x) * ex + (p.y - a.y) * ey) / len_sq).clamp(0.0, 1.0);
    p.distance(Point::new(a.x + t * ex, a.y + t * ey))
}
