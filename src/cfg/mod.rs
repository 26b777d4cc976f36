#[cfg(feature = "serde")]
use serde::Deserialize;

use crate::prelude::Error;

mod coverage;
mod registry;
mod selection;

pub use coverage::WindowCoverage;
pub use registry::AnchorRegistry;
pub use selection::AnchorSelection;

fn default_min_distance() -> f64 {
    0.1
}

fn default_max_distance() -> f64 {
    15.0
}

fn default_max_jump() -> f64 {
    2.0
}

fn default_max_iterations() -> usize {
    100
}

fn default_tolerance() -> f64 {
    1.0E-8
}

fn default_window() -> f64 {
    10.0
}

fn default_snapshot_len() -> usize {
    100
}

/// Outlier filter thresholds, applied to each raw range, per anchor.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
pub struct FilterOpts {
    /// Shortest plausible range [m]
    #[cfg_attr(feature = "serde", serde(default = "default_min_distance"))]
    pub min_distance_m: f64,
    /// Longest plausible range [m]
    #[cfg_attr(feature = "serde", serde(default = "default_max_distance"))]
    pub max_distance_m: f64,
    /// Largest plausible variation between two consecutive ranges
    /// of the same anchor [m]. Anything beyond is considered noise, not motion.
    #[cfg_attr(feature = "serde", serde(default = "default_max_jump"))]
    pub max_jump_m: f64,
}

impl Default for FilterOpts {
    fn default() -> Self {
        Self {
            min_distance_m: default_min_distance(),
            max_distance_m: default_max_distance(),
            max_jump_m: default_max_jump(),
        }
    }
}

impl FilterOpts {
    fn validate(&self) -> Result<(), Error> {
        let (min, max) = (self.min_distance_m, self.max_distance_m);
        if !min.is_finite() || !max.is_finite() || min < 0.0 || min > max {
            return Err(Error::InvalidDistanceBounds(min, max));
        }
        if !self.max_jump_m.is_finite() || self.max_jump_m < 0.0 {
            return Err(Error::InvalidDistanceJump(self.max_jump_m));
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
pub struct SolverOpts {
    /// Which ranges contribute to the fit
    #[cfg_attr(feature = "serde", serde(default))]
    pub selection: AnchorSelection,
    /// Iteration budget. We report no solution when it is exhausted.
    #[cfg_attr(feature = "serde", serde(default = "default_max_iterations"))]
    pub max_iterations: usize,
    /// Convergence tolerance, applied to the cost reduction,
    /// the step length and the gradient.
    #[cfg_attr(feature = "serde", serde(default = "default_tolerance"))]
    pub tolerance: f64,
}

impl Default for SolverOpts {
    fn default() -> Self {
        Self {
            selection: AnchorSelection::default(),
            max_iterations: default_max_iterations(),
            tolerance: default_tolerance(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
pub struct TrajectoryOpts {
    /// Spacing between two window centers [s]
    #[cfg_attr(feature = "serde", serde(default = "default_window"))]
    pub window_seconds: f64,
    /// Window width, relative to the spacing
    #[cfg_attr(feature = "serde", serde(default))]
    pub coverage: WindowCoverage,
}

impl Default for TrajectoryOpts {
    fn default() -> Self {
        Self {
            window_seconds: default_window(),
            coverage: WindowCoverage::default(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
pub struct LiveOpts {
    /// Number of most recent records forming the live snapshot
    #[cfg_attr(feature = "serde", serde(default = "default_snapshot_len"))]
    pub snapshot_len: usize,
}

impl Default for LiveOpts {
    fn default() -> Self {
        Self {
            snapshot_len: default_snapshot_len(),
        }
    }
}

#[derive(Default, Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
pub struct Config {
    /// Fixed anchors. Ranges to anchors that are not registered
    /// are disregarded by the solver.
    #[cfg_attr(feature = "serde", serde(default))]
    pub anchors: AnchorRegistry,
    /// Outlier filter thresholds
    #[cfg_attr(feature = "serde", serde(default))]
    pub filter: FilterOpts,
    /// Multilateration solver customization
    #[cfg_attr(feature = "serde", serde(default))]
    pub solver: SolverOpts,
    /// Trajectory reconstruction
    #[cfg_attr(feature = "serde", serde(default))]
    pub trajectory: TrajectoryOpts,
    /// Live view
    #[cfg_attr(feature = "serde", serde(default))]
    pub live: LiveOpts,
}

impl Config {
    /// Returns default [Config] for this [AnchorRegistry].
    /// You can then customize [Self] as you will.
    pub fn preset(anchors: AnchorRegistry) -> Self {
        let mut s = Self::default();
        s.anchors = anchors;
        s
    }

    /// Copies and returns [Config] where every range to a known anchor
    /// contributes to the fit, not only the first three.
    pub fn with_all_anchors(&self) -> Self {
        let mut s = self.clone();
        s.solver.selection = AnchorSelection::All;
        s
    }

    /// Copies and returns [Config] with gapless window coverage
    pub fn with_gapless_windows(&self) -> Self {
        let mut s = self.clone();
        s.trajectory.coverage = WindowCoverage::Gapless;
        s
    }

    /// Verifies this [Config] is usable
    pub fn validate(&self) -> Result<(), Error> {
        self.anchors.validate()?;
        self.filter.validate()?;

        if self.solver.max_iterations == 0 {
            return Err(Error::NullIterationBudget);
        }

        let window = self.trajectory.window_seconds;
        if !window.is_finite() || window <= 0.0 {
            return Err(Error::InvalidWindow(window));
        }

        if self.live.snapshot_len == 0 {
            return Err(Error::NullSnapshot);
        }

        Ok(())
    }
}
