// Walk example: a tag slowly walks a loop within the anchors triangle,
// its ranges are noisy and sometimes completely off.
// This is simply here to demonstrate how to operate the API.
use rand::{rngs::SmallRng, Rng, SeedableRng};

use uwb_rtls::prelude::{AnchorRegistry, Config, Duration, Epoch, Position, RawEvent, Session};

// Tag position along the loop, at t [s]
fn tag_position(t: f64) -> Position {
    let phase = 2.0 * std::f64::consts::PI * t / 120.0;
    Position::new(2.5 + 1.0 * phase.cos(), 1.0 + 1.5 * phase.sin())
}

pub fn main() {
    env_logger::init();

    // Anchors are surveyed ahead of time
    let anchors = AnchorRegistry::reference();

    let cfg = Config::preset(anchors.clone());
    let mut session = Session::new(&cfg).unwrap_or_else(|e| panic!("invalid setup: {}", e));

    let mut rng = SmallRng::seed_from_u64(0);
    let t0 = Epoch::from_gregorian_utc_hms(2025, 3, 14, 10, 0, 0);

    let mut substituted = 0;

    // one report per anchor, every 500ms, for two minutes
    for k in 0..240 {
        let t = k as f64 * 0.5;
        let tag = tag_position(t);

        for anchor in anchors.iter() {
            let mut range_m = anchor.position.distance_to(&tag) + rng.random_range(-0.1..0.1);

            // multipath: 2% of ranges are way off
            if rng.random_bool(0.02) {
                range_m += rng.random_range(3.0..10.0);
            }

            let event = RawEvent::new(
                (t * 1000.0) as u64,
                anchor.id.clone(),
                range_m,
                rng.random_range(-90.0..-70.0),
                rng.random_range(400.0..450.0_f64).round(),
            )
            .unwrap_or_else(|e| panic!("invalid event: {}", e));

            if session
                .ingest(&event, t0 + Duration::from_seconds(t))
                .substituted()
            {
                substituted += 1;
            }
        }
    }

    println!(
        "{} records, {} substituted ranges",
        session.history().len(),
        substituted
    );

    if let Some(summary) = session.summary() {
        println!(
            "active anchors: {} | avg range: {:.2}m | CO2: {}ppm",
            summary.active_anchors, summary.mean_range_m, summary.latest_auxiliary
        );
    }

    match session.live_position() {
        Some(position) => println!("current position: {}", position),
        None => println!("current position: unknown"),
    }

    for point in session.trajectory() {
        let t = (point.t - t0).to_seconds();
        let error = point.position.distance(&tag_position(t));
        println!(
            "{} {} CO2={}ppm (error: {:.2}m)",
            point.t, point.position, point.auxiliary, error
        );
    }
}
