use rand::Rng;
use serde::{Deserialize, Serialize};

/// Integer coordinate on the placement grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Draws a point uniformly from `[0, area_size)²`, x first.
    pub fn random<R: Rng>(rng: &mut R, area_size: i32) -> Self {
        let x = rng.random_range(0..area_size);
        let y = rng.random_range(0..area_size);
        Self { x, y }
    }

    /// Whether the point lies in `[0, area_size)²`.
    pub fn is_within(&self, area_size: i32) -> bool {
        (0..area_size).contains(&self.x) && (0..area_size).contains(&self.y)
    }

    pub fn distance_to(&self, other: &Point) -> f64 {
        distance(*self, *other)
    }
}

/// Euclidean distance between two grid points.
pub fn distance(p1: Point, p2: Point) -> f64 {
    let dx = f64::from(p1.x) - f64::from(p2.x);
    let dy = f64::from(p1.y) - f64::from(p2.y);
    (dx * dx + dy * dy).sqrt()
}
