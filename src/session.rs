//! Collection session
use itertools::Itertools;
use log::{debug, info, warn};

use crate::{
    averager::Averager,
    cfg::Config,
    filter::{FilterState, OutlierFilter, Verdict},
    prelude::{
        AnchorId, Epoch, Error, Measurement, Position, RawEvent, Reconstructor, Solver,
        TrajectoryPoint,
    },
};

/// Statistics over the live snapshot
#[derive(Debug, Clone, PartialEq)]
pub struct LiveSummary {
    /// Number of distinct anchors in the snapshot
    pub active_anchors: usize,
    /// Mean accepted range over the snapshot [m]
    pub mean_range_m: f64,
    /// Most recent auxiliary reading (CO2 [ppm])
    pub latest_auxiliary: f64,
    /// Total number of records in the session
    pub total_records: usize,
}

/// [Session] is the ingestion context: it owns the [OutlierFilter] state
/// and the history of accepted [Measurement]s, in arrival order.
/// Ingestion is sequential: one raw event at a time.
#[derive(Debug, Clone)]
pub struct Session {
    cfg: Config,
    filter: OutlierFilter,
    solver: Solver,
    reconstructor: Reconstructor,
    history: Vec<Measurement>,
}

impl Session {
    /// Opens a new [Session] with this [Config]
    pub fn new(cfg: &Config) -> Result<Self, Error> {
        cfg.validate()?;

        info!(
            "new session: {} anchors, window={}s ({})",
            cfg.anchors.len(),
            cfg.trajectory.window_seconds,
            cfg.trajectory.coverage
        );

        for anchor in cfg.anchors.iter() {
            debug!(
                "anchor {} at ({}, {})",
                anchor.id, anchor.position.x, anchor.position.y
            );
        }

        Ok(Self {
            cfg: cfg.clone(),
            filter: OutlierFilter::new(&cfg.filter),
            solver: Solver::new(cfg),
            reconstructor: Reconstructor::new(cfg),
            history: Vec::with_capacity(1024),
        })
    }

    /// [Config] of this [Session]
    pub fn config(&self) -> &Config {
        &self.cfg
    }

    /// Filters this [RawEvent] and records the accepted range.
    pub fn ingest(&mut self, event: &RawEvent, received_at: Epoch) -> Verdict {
        if let Some(last) = self.history.last() {
            if received_at < last.received_at {
                warn!(
                    "{} - received prior to previous record ({})",
                    received_at, last.received_at
                );
            }
        }

        let (accepted_m, verdict) = self.filter.decide(&event.anchor, event.range_m);

        if verdict.substituted() {
            debug!(
                "{} - range {:.2}m (filtered from {:.2}m)",
                event.anchor, accepted_m, event.range_m
            );
        }

        self.history
            .push(Measurement::record(event, accepted_m, received_at));

        verdict
    }

    /// Decodes one tag notification payload and ingests all its events,
    /// which share the same reception [Epoch]. Returns the number of
    /// recorded measurements. Batches are all or nothing: a single invalid
    /// entry rejects the whole payload, including the valid entries that
    /// precede it, and leaves the history and filter untouched.
    #[cfg(feature = "serde")]
    pub fn ingest_payload(&mut self, payload: &str, received_at: Epoch) -> Result<usize, Error> {
        let events = crate::measurement::decode_payload(payload)?;
        for event in events.iter() {
            self.ingest(event, received_at);
        }
        Ok(events.len())
    }

    /// Accepted history, in arrival order
    pub fn history(&self) -> &[Measurement] {
        &self.history
    }

    /// Current [FilterState]
    pub fn filter_state(&self) -> &FilterState {
        self.filter.state()
    }

    /// Most recent records, forming the live snapshot
    pub fn snapshot(&self) -> &[Measurement] {
        let len = self.history.len();
        &self.history[len.saturating_sub(self.cfg.live.snapshot_len)..]
    }

    /// Latest accepted range of each anchor within the live snapshot,
    /// anchors being sorted by first appearance.
    pub fn latest_ranges(&self) -> Vec<(AnchorId, f64)> {
        let snapshot = self.snapshot();
        snapshot
            .iter()
            .map(|m| &m.anchor)
            .unique()
            .filter_map(|anchor| {
                snapshot
                    .iter()
                    .rev()
                    .find(|m| m.anchor == *anchor)
                    .map(|m| (anchor.clone(), m.range_m))
            })
            .collect()
    }

    /// Live [Position], resolved from the latest range of each anchor.
    pub fn live_position(&self) -> Option<Position> {
        self.solver.solve_ranges(&self.latest_ranges())
    }

    /// [LiveSummary] over the live snapshot, if we have at least one record
    pub fn summary(&self) -> Option<LiveSummary> {
        let snapshot = self.snapshot();
        let latest = snapshot.last()?;
        let mean = snapshot.iter().map(|m| m.range_m).collect::<Averager>();

        Some(LiveSummary {
            active_anchors: snapshot.iter().map(|m| &m.anchor).unique().count(),
            mean_range_m: mean.value()?,
            latest_auxiliary: latest.auxiliary,
            total_records: self.history.len(),
        })
    }

    /// Reconstructs the trajectory over the whole history,
    /// using the window duration of our [Config].
    pub fn trajectory(&self) -> Vec<TrajectoryPoint> {
        self.reconstructor
            .reconstruct(&self.history, self.cfg.trajectory.window_seconds)
    }

    /// Clears the history and forgets every anchor.
    /// The next range of each anchor is considered a first reading.
    pub fn clear(&mut self) {
        info!("session cleared ({} records)", self.history.len());
        self.history.clear();
        self.filter.reset();
    }
}
