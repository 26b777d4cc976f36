/// 2D Position coordinates
use crate::prelude::Vector2;

#[cfg(feature = "serde")]
use serde::Serialize;

/// [Position] of the tag in the local anchor frame, in meters.
#[derive(Default, Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Position {
    /// x coordinate [m]
    pub x: f64,
    /// y coordinate [m]
    pub y: f64,
}

impl Position {
    /// Builds new [Position] from coordinates expressed in meter.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
    /// Builds new [Position] from a coordinates vector, in meter.
    pub fn from_vector(xy: Vector2<f64>) -> Self {
        Self::new(xy[0], xy[1])
    }
    /// Returns coordinates as a vector.
    pub fn vector(&self) -> Vector2<f64> {
        Vector2::new(self.x, self.y)
    }
    /// Euclidean distance to other [Position], in meter.
    pub fn distance(&self, rhs: &Self) -> f64 {
        (self.vector() - rhs.vector()).norm()
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "(x={:.3}m, y={:.3}m)", self.x, self.y)
    }
}
