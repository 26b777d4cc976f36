//! Per anchor outlier filter
use std::collections::HashMap;

use log::{debug, warn};

use crate::{cfg::FilterOpts, prelude::AnchorId};

/// [FilterState] stores the last accepted range of each anchor.
/// It lives for the duration of a collection session and is only
/// reset on explicit request.
#[derive(Default, Debug, Clone, PartialEq)]
pub struct FilterState {
    inner: HashMap<AnchorId, f64>,
}

impl FilterState {
    pub fn new() -> Self {
        Self {
            inner: HashMap::with_capacity(8),
        }
    }

    /// Last accepted range [m] for this anchor, if any
    pub fn last_valid(&self, anchor: &AnchorId) -> Option<f64> {
        self.inner.get(anchor).copied()
    }

    /// Number of anchors we hold a range for
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Forget every anchor
    pub fn reset(&mut self) {
        self.inner.clear();
    }

    /// Iterates (anchor, last accepted range) pairs, in no particular order
    pub fn iter(&self) -> impl Iterator<Item = (&AnchorId, f64)> + '_ {
        self.inner.iter().map(|(anchor, range)| (anchor, *range))
    }

    fn update(&mut self, anchor: &AnchorId, range_m: f64) {
        self.inner.insert(anchor.clone(), range_m);
    }
}

/// Outcome of one filtering decision
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Verdict {
    /// Raw range accepted, it is the new reference for this anchor
    Accepted,
    /// Very first range of this anchor, accepted although out of bounds
    ColdStart,
    /// Out of bounds: substituted with the previous range
    OutOfBounds,
    /// Implausible variation: substituted with the previous range
    Jump,
}

impl Verdict {
    /// True when the raw range was replaced by the previous one
    pub fn substituted(&self) -> bool {
        matches!(self, Self::OutOfBounds | Self::Jump)
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Accepted => write!(f, "accepted"),
            Self::ColdStart => write!(f, "cold-start"),
            Self::OutOfBounds => write!(f, "out-of-bounds"),
            Self::Jump => write!(f, "jump"),
        }
    }
}

/// [OutlierFilter] is a one step "hold last good" gate, independent per anchor.
/// It has no memory beyond the last accepted range of each anchor, and
/// every call returns a usable range.
#[derive(Debug, Clone)]
pub struct OutlierFilter {
    opts: FilterOpts,
    state: FilterState,
}

impl OutlierFilter {
    /// Builds a new [OutlierFilter] with an empty [FilterState]
    pub fn new(opts: &FilterOpts) -> Self {
        Self {
            opts: opts.clone(),
            state: FilterState::new(),
        }
    }

    /// Filters one raw range [m] of this anchor and returns the accepted range.
    pub fn filter(&mut self, anchor: &AnchorId, raw_m: f64) -> f64 {
        self.decide(anchor, raw_m).0
    }

    /// Filters one raw range [m] of this anchor and returns the accepted
    /// range along with the [Verdict] that lead to it.
    pub fn decide(&mut self, anchor: &AnchorId, raw_m: f64) -> (f64, Verdict) {
        let prior = self.state.last_valid(anchor);

        let out_of_bounds = raw_m < self.opts.min_distance_m || raw_m > self.opts.max_distance_m;

        if out_of_bounds || raw_m.is_nan() {
            return match prior {
                Some(prior) => {
                    warn!(
                        "{} - out of bounds ({:.2}m): using previous {:.2}m",
                        anchor, raw_m, prior
                    );
                    (prior, Verdict::OutOfBounds)
                },
                None => {
                    warn!(
                        "{} - out of bounds ({:.2}m): no previous range, accepting",
                        anchor, raw_m
                    );
                    self.state.update(anchor, raw_m);
                    (raw_m, Verdict::ColdStart)
                },
            };
        }

        if let Some(prior) = prior {
            let jump = (raw_m - prior).abs();
            if jump > self.opts.max_jump_m {
                warn!(
                    "{} - large jump ({:.2}m): using previous {:.2}m",
                    anchor, jump, prior
                );
                return (prior, Verdict::Jump);
            }
        }

        debug!("{} - range {:.2}m", anchor, raw_m);
        self.state.update(anchor, raw_m);
        (raw_m, Verdict::Accepted)
    }

    /// Current [FilterState]
    pub fn state(&self) -> &FilterState {
        &self.state
    }

    /// Forget every anchor: next range of each anchor is a first reading
    pub fn reset(&mut self) {
        self.state.reset();
    }
}

#[cfg(test)]
mod test {
    use super::{FilterState, OutlierFilter, Verdict};
    use crate::{cfg::FilterOpts, prelude::AnchorId};

    #[test]
    fn verdict_substitution() {
        assert!(!Verdict::Accepted.substituted());
        assert!(!Verdict::ColdStart.substituted());
        assert!(Verdict::OutOfBounds.substituted());
        assert!(Verdict::Jump.substituted());
    }

    #[test]
    fn filter_state_reset() {
        let mut filter = OutlierFilter::new(&FilterOpts::default());
        let anchor = AnchorId::from(0x8817);

        assert_eq!(filter.filter(&anchor, 3.0), 3.0);
        assert_eq!(filter.state().len(), 1);

        filter.reset();
        assert_eq!(filter.state(), &FilterState::new());

        // first reading again: accepted whatever the jump
        assert_eq!(filter.filter(&anchor, 10.0), 10.0);
    }
}
