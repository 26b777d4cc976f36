use crate::prelude::Error;

#[cfg(feature = "serde")]
use serde::Deserialize;

/// [WindowCoverage] defines the width of each aggregation window,
/// relative to the spacing between two window centers.
#[derive(Default, Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
pub enum WindowCoverage {
    /// Half width is a quarter of the spacing: each window covers half
    /// of the cadence, leaving gaps in between (5s every 10s).
    #[default]
    #[cfg_attr(feature = "serde", serde(alias = "sparse"))]
    Sparse,
    /// Half width is half of the spacing: windows cover the whole timeline.
    #[cfg_attr(feature = "serde", serde(alias = "gapless"))]
    Gapless,
}

impl WindowCoverage {
    /// Window half width [s] for given spacing between window centers [s]
    pub fn half_width(&self, spacing_s: f64) -> f64 {
        match self {
            Self::Sparse => spacing_s / 4.0,
            Self::Gapless => spacing_s / 2.0,
        }
    }
}

impl std::fmt::Display for WindowCoverage {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Sparse => write!(f, "sparse"),
            Self::Gapless => write!(f, "gapless"),
        }
    }
}

impl std::str::FromStr for WindowCoverage {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sparse" => Ok(Self::Sparse),
            "gapless" => Ok(Self::Gapless),
            _ => Err(Error::UnknownWindowCoverage),
        }
    }
}
