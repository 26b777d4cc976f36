#![doc = include_str!("../README.md")]
#![cfg_attr(docrs, feature(doc_cfg))]

// private modules
mod anchor;
mod averager;
mod cfg;
mod error;
mod filter;
mod measurement;
mod position;
mod session;
mod solver;
mod trajectory;
mod utils;

#[cfg(test)]
mod tests;

// prelude
pub mod prelude {
    pub use crate::anchor::{Anchor, AnchorId, AnchorPosition};
    pub use crate::cfg::{
        AnchorRegistry, AnchorSelection, Config, FilterOpts, LiveOpts, SolverOpts,
        TrajectoryOpts, WindowCoverage,
    };
    pub use crate::error::Error;
    pub use crate::filter::{FilterState, OutlierFilter, Verdict};
    #[cfg(feature = "serde")]
    pub use crate::measurement::decode_payload;
    pub use crate::measurement::{Measurement, RawEvent};
    pub use crate::position::Position;
    pub use crate::session::{LiveSummary, Session};
    pub use crate::solver::{Solution, Solver, MIN_ANCHORS};
    pub use crate::trajectory::{Reconstructor, TrajectoryPoint};
    // re-export
    pub use hifitime::{Duration, Epoch, TimeScale};
    pub use nalgebra::Vector2;
}

// pub export
pub use error::Error;
