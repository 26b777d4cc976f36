use rstest::*;

use crate::{
    prelude::{decode_payload, AnchorId, Config, Error, Session},
    tests::{at, init_logger, reference_config},
};

#[test]
fn single_event() {
    init_logger();

    let events =
        decode_payload(r#"{"T":123456,"A":"8817","R":3.42,"Rx":-81.5,"C":612}"#).unwrap();

    assert_eq!(events.len(), 1);

    let event = &events[0];
    assert_eq!(event.timestamp_ms, 123456);
    assert_eq!(event.anchor, AnchorId::from(0x8817));
    assert_eq!(event.range_m, 3.42);
    assert_eq!(event.rssi_dbm, -81.5);
    assert_eq!(event.auxiliary, 612.0);
}

#[test]
fn batch() {
    init_logger();

    let payload = concat!(
        r#"[{"T":1000,"A":"8817","R":5.85,"Rx":-80.1,"C":600},"#,
        r#"{"T":1000,"A":"8717","R":2.24,"Rx":-75.0,"C":600},"#,
        r#"{"T":1000,"A":"8617","R":6.04,"Rx":-83.2,"C":600}]"#,
    );

    let events = decode_payload(payload).unwrap();
    let anchors = events
        .iter()
        .map(|event| event.anchor.to_string())
        .collect::<Vec<_>>();

    assert_eq!(anchors, vec!["8817", "8717", "8617"]);
}

#[test]
fn numeric_address() {
    let events = decode_payload(r#"{"T":1,"A":8817,"R":1.0,"Rx":-70.0,"C":400}"#).unwrap();
    assert_eq!(events[0].anchor, AnchorId::from(0x8817));
}

#[rstest]
#[case("")]
#[case("Ready")]
#[case("  Ready\n")]
#[case("[]")]
fn no_events(#[case] payload: &str) {
    assert!(decode_payload(payload).unwrap().is_empty());
}

#[rstest]
#[case("Rea")]
#[case(r#"{"T":1,"A":"8817","R":1.0}"#)]
#[case(r#"{"T":1,"A":"8817","R":"far","Rx":-70.0,"C":400}"#)]
#[case(r#"[{"T":1,"A":"8817","R":1.0,"Rx":-70.0,"C":400},{"#)]
fn malformed(#[case] payload: &str) {
    assert!(matches!(decode_payload(payload), Err(Error::Payload(_))));
}

#[test]
fn invalid_address() {
    assert_eq!(
        decode_payload(r#"{"T":1,"A":" ","R":1.0,"Rx":-70.0,"C":400}"#),
        Err(Error::InvalidAnchorId)
    );
}

#[test]
fn session_ingestion() {
    init_logger();

    let mut session = Session::new(&reference_config()).unwrap();

    let payload = concat!(
        r#"[{"T":1000,"A":"8817","R":5.85,"Rx":-80.1,"C":600},"#,
        r#"{"T":1000,"A":"8717","R":2.24,"Rx":-75.0,"C":600},"#,
        r#"{"T":1000,"A":"8617","R":6.04,"Rx":-83.2,"C":600}]"#,
    );

    assert_eq!(session.ingest_payload("Ready", at(0.0)), Ok(0));
    assert_eq!(session.ingest_payload(payload, at(1.0)), Ok(3));
    assert!(session.ingest_payload("{", at(2.0)).is_err());

    assert_eq!(session.history().len(), 3);
    assert!(session
        .history()
        .iter()
        .all(|m| m.received_at == at(1.0)));

    let position = session.live_position().unwrap();
    assert!((position.x - 2.0).abs() < 0.05, "resolved {}", position);
    assert!((position.y - 1.0).abs() < 0.05, "resolved {}", position);
}

#[test]
fn invalid_batch_entry_rejects_payload() {
    init_logger();

    let mut session = Session::new(&reference_config()).unwrap();

    let payload = concat!(
        r#"[{"T":1000,"A":"8817","R":5.85,"Rx":-80.1,"C":600},"#,
        r#"{"T":1000,"A":" ","R":2.24,"Rx":-75.0,"C":600}]"#,
    );

    assert_eq!(
        session.ingest_payload(payload, at(0.0)),
        Err(Error::InvalidAnchorId)
    );
    assert!(session.history().is_empty());
    assert!(session.filter_state().is_empty());
}

#[test]
fn config_deserialization() {
    let cfg: Config = serde_json::from_str(
        r#"{
            "anchors": [
                { "id": "8817", "position": { "x": 4.0, "y": -4.5 } },
                { "id": "8717", "position": { "x": 0.0, "y": 0.0 } },
                { "id": "8617", "position": { "x": 4.5, "y": 6.5 } }
            ],
            "filter": { "max_jump_m": 1.5 },
            "solver": { "selection": "all" },
            "trajectory": { "coverage": "gapless" }
        }"#,
    )
    .unwrap();

    assert!(cfg.validate().is_ok());
    assert_eq!(cfg.anchors, reference_config().anchors);

    assert_eq!(cfg.filter.max_jump_m, 1.5);
    assert_eq!(cfg.filter.min_distance_m, 0.1);
    assert_eq!(cfg.filter.max_distance_m, 15.0);

    assert_eq!(cfg.solver.max_iterations, 100);
    assert_eq!(cfg.trajectory.window_seconds, 10.0);
    assert_eq!(cfg.live.snapshot_len, 100);

    assert_eq!(cfg, {
        let mut expected = reference_config()
            .with_all_anchors()
            .with_gapless_windows();
        expected.filter.max_jump_m = 1.5;
        expected
    });
}

#[test]
fn default_config_deserialization() {
    let cfg: Config = serde_json::from_str("{}").unwrap();
    assert_eq!(cfg, Config::default());
}
