//! Arena the robots drive in, and its line-oriented text format.
//!
//! ```text
//! # comment
//! Scene 640 480
//! Wall 10 10 630 10
//! Box 200 150 40
//! Light 320 240 100
//! ```
//!
//! Blank lines and lines starting with `#` are skipped. The first remaining
//! line must be the `Scene` header. Every other line is one [`SceneObject`].

use crate::error::{Error, Result};
use crate::geometry::{Point, point_segment_distance, ray_segment_distance};
use log::info;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Handle returned when a sensor registers with an [`Environment`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SensorId(pub usize);

/// What sensors and robot bodies need from the world around them.
pub trait Environment {
    /// Registers a sensor for ray queries and returns its handle.
    fn register_sensor(&mut self) -> SensorId;

    /// Distance to the nearest obstacle along the ray, if one lies within
    /// `max_distance`.
    fn cast_ray(&self, origin: Point, direction: f64, max_distance: f64) -> Option<f64>;

    /// Whether a disc of `radius` at `center` overlaps any obstacle.
    fn collides(&self, center: Point, radius: f64) -> bool;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SceneObject {
    Wall { from: Point, to: Point },
    /// Axis-aligned square of side `size` centred on `(x, y)`.
    Box { x: f64, y: f64, size: f64 },
    /// Light source; not an obstacle.
    Light { x: f64, y: f64, emitting_power: f64 },
}

impl SceneObject {
    /// Obstacle outline as line segments. Lights have none.
    pub fn segments(&self) -> Vec<(Point, Point)> {
        match *self {
            SceneObject::Wall { from, to } => vec![(from, to)],
            SceneObject::Box { x, y, size } => {
                let h = size / 2.0;
                let corners = [
                    Point::new(x - h, y - h),
                    Point::new(x + h, y - h),
                    Point::new(x + h, y + h),
                    Point::new(x - h, y + h),
                ];
                (0..4).map(|i| (corners[i], corners[(i + 1) % 4])).collect()
            }
            SceneObject::Light { .. } => Vec::new(),
        }
    }

    fn parse_words(tag: &str, args: &[&str], line: usize) -> Result<SceneObject> {
        let expected = match tag {
            "Wall" => 4,
            "Box" | "Light" => 3,
            other => {
                return Err(Error::ParseScene {
                    line,
                    reason: format!("unknown object type {:?}", other),
                });
            }
        };
        let values = parse_numbers(tag, args, expected, line)?;
        Ok(match tag {
            "Wall" => SceneObject::Wall {
                from: Point::new(values[0], values[1]),
                to: Point::new(values[2], values[3]),
            },
            "Box" => SceneObject::Box {
                x: values[0],
                y: values[1],
                size: values[2],
            },
            _ => SceneObject::Light {
                x: values[0],
                y: values[1],
                emitting_power: values[2],
            },
        })
    }
}

impl fmt::Display for SceneObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SceneObject::Wall { from, to } => {
                write!(f, "Wall {} {} {} {}", from.x, from.y, to.x, to.y)
            }
            SceneObject::Box { x, y, size } => write!(f, "Box {} {} {}", x, y, size),
            SceneObject::Light {
                x,
                y,
                emitting_power,
            } => write!(f, "Light {} {} {}", x, y, emitting_power),
        }
    }
}

fn parse_numbers(tag: &str, args: &[&str], expected: usize, line: usize) -> Result<Vec<f64>> {
    if args.len() != expected {
        return Err(Error::ParseScene {
            line,
            reason: format!("{} takes {} values, found {}", tag, expected, args.len()),
        });
    }
    args.iter()
        .map(|raw| {
            raw.parse::<f64>().map_err(|_| Error::ParseScene {
                line,
                reason: format!("{} has a non-numeric value {:?}", tag, raw),
            })
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub width: f64,
    pub height: f64,
    objects: Vec<SceneObject>,
    registered_sensors: usize,
}

impl Scene {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            objects: Vec::new(),
            registered_sensors: 0,
        }
    }

    pub fn put(&mut self, object: SceneObject) {
        self.objects.push(object);
    }

    pub fn extend<I: IntoIterator<Item = SceneObject>>(&mut self, objects: I) {
        self.objects.extend(objects);
    }

    /// Removes the first object equal to `object`. Returns whether one was found.
    pub fn remove(&mut self, object: &SceneObject) -> bool {
        match self.objects.iter().position(|o| o == object) {
            Some(idx) => {
                self.objects.remove(idx);
                true
            }
            None => false,
        }
    }

    pub fn objects(&self) -> &[SceneObject] {
        &self.objects
    }

    pub fn registered_sensors(&self) -> usize {
        self.registered_sensors
    }

    /// The arena border as four segments; it blocks rays like any wall.
    fn border(&self) -> [(Point, Point); 4] {
        let (w, h) = (self.width, self.height);
        [
            (Point::new(0.0, 0.0), Point::new(w, 0.0)),
            (Point::new(w, 0.0), Point::new(w, h)),
            (Point::new(w, h), Point::new(0.0, h)),
            (Point::new(0.0, h), Point::new(0.0, 0.0)),
        ]
    }

    fn obstacle_segments(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        self.border()
            .into_iter()
            .chain(self.objects.iter().flat_map(SceneObject::segments))
    }

    pub fn parse(text: &str) -> Result<Scene> {
        let mut scene: Option<Scene> = None;

        for (idx, raw_line) in text.lines().enumerate() {
            let line = idx + 1;
            let words: Vec<&str> = raw_line.split_whitespace().collect();
            let Some((&tag, args)) = words.split_first() else {
                continue;
            };
            if tag.starts_with('#') {
                continue;
            }

            if tag == "Scene" {
                if scene.is_some() {
                    return Err(Error::ParseScene {
                        line,
                        reason: "duplicate Scene header".to_string(),
                    });
                }
                let size = parse_numbers(tag, args, 2, line)?;
                scene = Some(Scene::new(size[0], size[1]));
                continue;
            }

            match scene.as_mut() {
                Some(scene) => scene.put(SceneObject::parse_words(tag, args, line)?),
                None => {
                    return Err(Error::ParseScene {
                        line,
                        reason: format!("expected Scene header, found {:?}", tag),
                    });
                }
            }
        }

        scene.ok_or_else(|| Error::ParseScene {
            line: text.lines().count(),
            reason: "no Scene header found".to_string(),
        })
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Scene> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let scene = Scene::parse(&text)?;
        info!(
            "Loaded scene {}x{} with {} objects from {}",
            scene.width,
            scene.height,
            scene.objects.len(),
            path.as_ref().display()
        );
        Ok(scene)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        std::fs::write(path.as_ref(), self.to_string())?;
        info!("Scene saved: {}", path.as_ref().display());
        Ok(())
    }
}

impl FromStr for Scene {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Scene::parse(s)
    }
}

impl fmt::Display for Scene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# First uncommented line must start with \"Scene\"")?;
        writeln!(f, "# This is the syntax for each kind of object:")?;
        writeln!(f, "# Scene WIDTH HEIGHT")?;
        writeln!(f, "# Wall X1 Y1 X2 Y2")?;
        writeln!(f, "# Box X Y SIZE")?;
        writeln!(f, "# Light X Y EMITTING_POWER")?;
        writeln!(f)?;
        writeln!(f, "Scene {} {}", self.width, self.height)?;
        for object in &self.objects {
            writeln!(f, "{}", object)?;
        }
        Ok(())
    }
}

impl Environment for Scene {
    fn register_sensor(&mut self) -> SensorId {
        let id = SensorId(self.registered_sensors);
        self.registered_sensors += 1;
        id
    }

    fn cast_ray(&self, origin: Point, direction: f64, max_distance: f64) -> Option<f64> {
        self.obstacle_segments()
            .filter_map(|(a, b)| ray_segment_distance(origin, direction, a, b))
            .filter(|&d| d <= max_distance)
            .min_by(f64::total_cmp)
    }

    fn collides(&self, center: Point, radius: f64) -> bool {
        self.obstacle_segments()
            .any(|(a, b)| point_segment_distance(center, a, b) < radius)
    }
}
