
#[cfg(feature = "serde")]
mod payload;

use log::LevelFilter;
use std::sync::Once;

use crate::prelude::{
    AnchorId, AnchorPosition, AnchorRegistry, Config, Duration, Epoch, Measurement, Position,
};

static INIT: Once = Once::new();

pub fn init_logger() {
    INIT.call_once(|| {
        env_logger::builder()
            .is_test(true)
            .filter_level(LevelFilter::Debug)
            .init();
    });
}

/// Reference anchors: (short address, x [m], y [m])
pub const REFERENCE_ANCHORS: [(u16, f64, f64); 3] = [
    (0x8817, 4.0, -4.5),
    (0x8717, 0.0, 0.0),
    (0x8617, 4.5, 6.5),
];

/// Reference tag position, within the reference anchors
pub const REFERENCE_TAG: (f64, f64) = (2.0, 1.0);

pub fn reference_registry() -> AnchorRegistry {
    let registry = REFERENCE_ANCHORS
        .iter()
        .map(|(addr, x, y)| (AnchorId::from(*addr), AnchorPosition::new(*x, *y)))
        .collect::<AnchorRegistry>();

    assert_eq!(registry, AnchorRegistry::reference());
    registry
}

pub fn reference_config() -> Config {
    Config::preset(reference_registry())
}

/// Session start
pub fn t0() -> Epoch {
    Epoch::from_gregorian_utc_hms(2025, 3, 14, 10, 0, 0)
}

/// [Epoch] `seconds` after session start
pub fn at(seconds: f64) -> Epoch {
    t0() + Duration::from_seconds(seconds)
}

/// Exact ranges from each registered anchor to this [Position]
pub fn exact_ranges(registry: &AnchorRegistry, tag: &Position) -> Vec<(AnchorId, f64)> {
    registry
        .iter()
        .map(|anchor| (anchor.id.clone(), anchor.position.distance_to(tag)))
        .collect()
}

/// Recorded [Measurement] for tests that bypass the filter
pub fn measurement(anchor: &AnchorId, range_m: f64, auxiliary: f64, t: Epoch) -> Measurement {
    Measurement {
        timestamp_ms: 0,
        anchor: anchor.clone(),
        range_m,
        rssi_dbm: -80.0,
        auxiliary,
        received_at: t,
    }
}

/// One record per reference anchor, at `t`, with exact ranges to `tag`
pub fn exact_records(tag: &Position, auxiliary: f64, t: Epoch) -> Vec<Measurement> {
    exact_ranges(&reference_registry(), tag)
        .iter()
        .map(|(anchor, range_m)| measurement(anchor, *range_m, auxiliary, t))
        .collect()
}
