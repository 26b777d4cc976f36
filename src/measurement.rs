//! Ranging events and recorded measurements
use crate::prelude::{AnchorId, Epoch, Error};

#[cfg(feature = "serde")]
use serde::Deserialize;

/// [RawEvent] is one ranging report, as forwarded by the tag,
/// prior any filtering. It is validated once, when built.
#[derive(Debug, Clone, PartialEq)]
pub struct RawEvent {
    /// Tag uptime when the range was sampled [ms]
    pub timestamp_ms: u64,
    /// Ranged anchor
    pub anchor: AnchorId,
    /// Raw range [m]
    pub range_m: f64,
    /// Received signal strength [dBm]
    pub rssi_dbm: f64,
    /// Auxiliary sensor reading attached to this report (CO2 [ppm])
    pub auxiliary: f64,
}

impl RawEvent {
    /// Builds a new [RawEvent]. Range, signal strength and auxiliary
    /// reading must be finite numbers.
    pub fn new(
        timestamp_ms: u64,
        anchor: AnchorId,
        range_m: f64,
        rssi_dbm: f64,
        auxiliary: f64,
    ) -> Result<Self, Error> {
        if !range_m.is_finite() || !rssi_dbm.is_finite() || !auxiliary.is_finite() {
            return Err(Error::NonFiniteInput);
        }
        Ok(Self {
            timestamp_ms,
            anchor,
            range_m,
            rssi_dbm,
            auxiliary,
        })
    }
}

/// Recorded [Measurement]: the range is the filtered one.
/// Immutable once created and appended to the history.
#[derive(Debug, Clone, PartialEq)]
pub struct Measurement {
    /// Tag uptime when the range was sampled [ms]
    pub timestamp_ms: u64,
    /// Ranged anchor
    pub anchor: AnchorId,
    /// Accepted range [m]
    pub range_m: f64,
    /// Received signal strength [dBm]
    pub rssi_dbm: f64,
    /// Auxiliary sensor reading (CO2 [ppm])
    pub auxiliary: f64,
    /// Wall clock reception [Epoch]
    pub received_at: Epoch,
}

impl Measurement {
    /// Records this [RawEvent] with the accepted range.
    pub fn record(event: &RawEvent, accepted_m: f64, received_at: Epoch) -> Self {
        Self {
            timestamp_ms: event.timestamp_ms,
            anchor: event.anchor.clone(),
            range_m: accepted_m,
            rssi_dbm: event.rssi_dbm,
            auxiliary: event.auxiliary,
            received_at,
        }
    }
}

#[cfg(feature = "serde")]
#[derive(Deserialize)]
#[serde(untagged)]
enum WireAddress {
    Text(String),
    Number(u64),
}

#[cfg(feature = "serde")]
#[derive(Deserialize)]
struct WireEvent {
    #[serde(rename = "T")]
    timestamp_ms: u64,
    #[serde(rename = "A")]
    anchor: WireAddress,
    #[serde(rename = "R")]
    range_m: f64,
    #[serde(rename = "Rx")]
    rssi_dbm: f64,
    #[serde(rename = "C")]
    auxiliary: f64,
}

#[cfg(feature = "serde")]
#[derive(Deserialize)]
#[serde(untagged)]
enum WirePayload {
    Batch(Vec<WireEvent>),
    Single(WireEvent),
}

#[cfg(feature = "serde")]
impl TryFrom<WireEvent> for RawEvent {
    type Error = Error;
    fn try_from(wire: WireEvent) -> Result<Self, Self::Error> {
        let anchor = match wire.anchor {
            WireAddress::Text(text) => text.parse::<AnchorId>()?,
            WireAddress::Number(number) => number.to_string().parse::<AnchorId>()?,
        };
        Self::new(
            wire.timestamp_ms,
            anchor,
            wire.range_m,
            wire.rssi_dbm,
            wire.auxiliary,
        )
    }
}

/// Banner the tag emits once notifications are enabled
#[cfg(feature = "serde")]
const READY_BANNER: &str = "Ready";

/// Decodes one tag notification payload into [RawEvent]s.
/// The payload is either a single JSON object or an array of objects,
/// with keys `T` (uptime [ms]), `A` (anchor address), `R` (range [m]),
/// `Rx` (RSSI [dBm]) and `C` (CO2 [ppm]).
/// Empty payloads and the ready banner carry no event.
#[cfg(feature = "serde")]
pub fn decode_payload(payload: &str) -> Result<Vec<RawEvent>, Error> {
    let trimmed = payload.trim_matches(|c: char| c.is_whitespace() || c == '\0');
    if trimmed.is_empty() || trimmed == READY_BANNER {
        return Ok(Vec::new());
    }

    let decoded: WirePayload =
        serde_json::from_str(trimmed).map_err(|e| Error::Payload(e.to_string()))?;

    match decoded {
        WirePayload::Single(event) => Ok(vec![RawEvent::try_from(event)?]),
        WirePayload::Batch(events) => events.into_iter().map(RawEvent::try_from).collect(),
    }
}
