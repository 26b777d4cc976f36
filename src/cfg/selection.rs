use crate::prelude::Error;

#[cfg(feature = "serde")]
use serde::Deserialize;

/// [AnchorSelection] defines which of the proposed ranges
/// contribute to the least squares fit.
#[derive(Default, Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
pub enum AnchorSelection {
    /// Fuse every range to a known anchor.
    /// Redundant anchors absorb part of the measurement noise.
    #[cfg_attr(feature = "serde", serde(alias = "all"))]
    All,

    /// Only the first three ranges (in proposal order) contribute,
    /// any other range is disregarded.
    #[default]
    #[cfg_attr(
        feature = "serde",
        serde(alias = "first-three", alias = "first_three")
    )]
    FirstThree,
}

impl AnchorSelection {
    /// Number of ranges retained out of `proposed` ones.
    pub(crate) fn retained(&self, proposed: usize) -> usize {
        match self {
            Self::All => proposed,
            Self::FirstThree => proposed.min(3),
        }
    }
}

impl std::fmt::Display for AnchorSelection {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::All => write!(f, "all"),
            Self::FirstThree => write!(f, "first-three"),
        }
    }
}

impl std::str::FromStr for AnchorSelection {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(Self::All),
            "first-three" | "first_three" | "firstthree" | "3" => Ok(Self::FirstThree),
            _ => Err(Error::UnknownAnchorSelection),
        }
    }
}
