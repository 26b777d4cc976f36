use thiserror::Error;

use crate::prelude::AnchorId;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Multilateration requires at least 3 ranges to known anchors.
    /// The attached value is the number of usable ranges that were proposed.
    #[error("not enough anchors: {0} usable range(s), 3 required")]
    NotEnoughAnchors(usize),

    /// The least squares iterations did not settle within the iteration budget.
    /// The solver reports no position rather than an unreliable one.
    #[error("solver did not converge within {0} iterations")]
    NotConverged(usize),

    /// Normal equations could not be inverted, whatever the damping.
    #[error("failed to invert matrix")]
    MatrixInversion,

    /// NaN or infinite range or anchor coordinates.
    #[error("non finite range or coordinates")]
    NonFiniteInput,

    #[error("invalid distance bounds: min={0}m max={1}m")]
    InvalidDistanceBounds(f64, f64),

    #[error("invalid maximal distance jump: {0}m")]
    InvalidDistanceJump(f64),

    #[error("window duration must be strictly positive (got {0}s)")]
    InvalidWindow(f64),

    #[error("solver iteration budget must not be null")]
    NullIterationBudget,

    #[error("live snapshot length must not be null")]
    NullSnapshot,

    /// Two registry entries share the same [AnchorId].
    #[error("anchor {0} is registered twice")]
    DuplicateAnchor(AnchorId),

    #[error("invalid anchor identifier")]
    InvalidAnchorId,

    #[error("unknown anchor selection")]
    UnknownAnchorSelection,

    #[error("unknown window coverage")]
    UnknownWindowCoverage,

    /// Tag payload could not be decoded. The collaborator is expected
    /// to drop such payloads.
    #[error("payload decoding error: {0}")]
    Payload(String),
}
