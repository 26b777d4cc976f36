//! Fixed ranging anchors
use crate::{position::Position, Error};

use nalgebra::Vector2;

#[cfg(feature = "serde")]
use serde::Deserialize;

/// [AnchorId] identifies one fixed anchor. Tags report 16 bit short addresses,
/// which we represent as four upper case hexadecimal digits (for example "8817").
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "String"))]
pub struct AnchorId(String);

impl AnchorId {
    /// Returns the textual address
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::str::FromStr for AnchorId {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let trimmed = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);

        if trimmed.is_empty() || trimmed.chars().any(|c| c.is_whitespace()) {
            return Err(Error::InvalidAnchorId);
        }

        Ok(Self(trimmed.to_uppercase()))
    }
}

impl TryFrom<String> for AnchorId {
    type Error = Error;
    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<u16> for AnchorId {
    /// Builds [AnchorId] from a short address, formatted like the tag does.
    fn from(addr: u16) -> Self {
        Self(format!("{:04X}", addr))
    }
}

impl std::fmt::Display for AnchorId {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Immutable anchor coordinates, in meters.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
pub struct AnchorPosition {
    pub x: f64,
    pub y: f64,
}

impl AnchorPosition {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub(crate) fn vector(&self) -> Vector2<f64> {
        Vector2::new(self.x, self.y)
    }

    /// Euclidean distance [m] from this anchor to given [Position].
    pub fn distance_to(&self, position: &Position) -> f64 {
        (self.vector() - position.vector()).norm()
    }

    pub(crate) fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<(f64, f64)> for AnchorPosition {
    fn from(xy: (f64, f64)) -> Self {
        Self::new(xy.0, xy.1)
    }
}

/// [Anchor] registry entry
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
pub struct Anchor {
    pub id: AnchorId,
    pub position: AnchorPosition,
}
