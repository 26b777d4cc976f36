//! Trajectory reconstruction
use std::cmp::Ordering;

use hifitime::TimeSeries;
use itertools::Itertools;
use log::{debug, error};

use crate::{
    cfg::{Config, WindowCoverage},
    prelude::{AnchorId, Duration, Epoch, Measurement, Position, Solver},
    utils::median,
};

#[cfg(feature = "serde")]
use serde::Serialize;

/// One [TrajectoryPoint] per solvable time window
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct TrajectoryPoint {
    /// Window center
    pub t: Epoch,
    /// Resolved [Position]
    pub position: Position,
    /// Median auxiliary reading (CO2 [ppm]) over the window
    pub auxiliary: f64,
}

/// [Reconstructor] resamples a measurement history on a regular time grid
/// and solves one [Position] per window.
#[derive(Debug, Clone)]
pub struct Reconstructor {
    solver: Solver,
    coverage: WindowCoverage,
}

impl Reconstructor {
    /// Builds a new [Reconstructor] from this [Config]
    pub fn new(cfg: &Config) -> Self {
        Self {
            solver: Solver::new(cfg),
            coverage: cfg.trajectory.coverage,
        }
    }

    /// Reconstructs the trajectory described by this history.
    /// Window centers are spaced by `window_seconds`, from the earliest
    /// to the latest reception. Within each window, ranges are reduced
    /// to their median value per anchor, and auxiliary readings to their
    /// median value. Empty or unsolvable windows contribute no point.
    /// The output is sorted by increasing window center.
    pub fn reconstruct(
        &self,
        history: &[Measurement],
        window_seconds: f64,
    ) -> Vec<TrajectoryPoint> {
        if !window_seconds.is_finite() || window_seconds <= 0.0 {
            error!("invalid window duration: {}s", window_seconds);
            return Vec::new();
        }

        let mut sorted = history.iter().collect::<Vec<_>>();
        sorted.sort_by(|a, b| {
            a.received_at
                .partial_cmp(&b.received_at)
                .unwrap_or(Ordering::Equal)
        });

        let (Some(first), Some(last)) = (sorted.first(), sorted.last()) else {
            return Vec::new();
        };

        let (start, end) = (first.received_at, last.received_at);
        let spacing = Duration::from_seconds(window_seconds);
        let half_width = Duration::from_seconds(self.coverage.half_width(window_seconds));

        TimeSeries::inclusive(start, end, spacing)
            .filter_map(|t| {
                let (lo, hi) = (t - half_width, t + half_width);
                let begin = sorted.partition_point(|m| m.received_at < lo);
                let stop = sorted.partition_point(|m| m.received_at <= hi);

                if begin >= stop {
                    debug!("{} - empty window", t);
                    return None;
                }

                self.window_point(t, &sorted[begin..stop])
            })
            .collect()
    }

    fn window_point(&self, t: Epoch, window: &[&Measurement]) -> Option<TrajectoryPoint> {
        let ranges = window
            .iter()
            .map(|m| &m.anchor)
            .unique()
            .filter_map(|anchor| {
                let mut values = window
                    .iter()
                    .filter(|m| m.anchor == *anchor)
                    .map(|m| m.range_m)
                    .collect::<Vec<_>>();
                median(&mut values).map(|range_m| (anchor.clone(), range_m))
            })
            .collect::<Vec<(AnchorId, f64)>>();

        let mut auxiliary = window.iter().map(|m| m.auxiliary).collect::<Vec<_>>();
        let auxiliary = median(&mut auxiliary)?;

        let position = self.solver.solve_ranges(&ranges)?;

        debug!(
            "{} - {} ({} records, {} anchors)",
            t,
            position,
            window.len(),
            ranges.len()
        );

        Some(TrajectoryPoint {
            t,
            position,
            auxiliary,
        })
    }
}
