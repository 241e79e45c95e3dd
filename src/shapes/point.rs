use serde::{Deserialize, Serialize};

/// Integer pixel coordinate. `z` tags the image plane for multi-slice stacks
/// and stays zero within a single 2D pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
    #[serde(default)]
    pub z: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y, z: 0 }
    }

    /// Euclidean distance in the plane.
    pub fn distance_to(&self, other: &Point) -> f64 {
        let dx = f64::from(self.x - other.x);
        let dy = f64::from(self.y - other.y);
        (dx * dx + dy * dy).sqrt()
    }
}
