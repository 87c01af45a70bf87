//! End-to-end session tests: user actions flow through the screens, the
//! scheduler drives every animation, and snapshots reflect the result.

use std::rc::Rc;
use std::time::Duration;

use webline_core::HapticLog;
use webline_screens::screens::{Param, Spectrum};
use webline_screens::{ScreenKind, ScreenSnapshot, Session, ShellConfig};

fn run(session: &mut Session, total_ms: u64) {
    for _ in 0..total_ms / 16 {
        session.advance(Duration::from_millis(16));
    }
}

fn start(haptics: &HapticLog) -> Session {
    Session::new(&ShellConfig::default(), Rc::new(haptics.clone())).unwrap()
}

#[test]
fn calibration_pressure_change_drives_tank_and_metrics() {
    let haptics = HapticLog::new();
    let mut session = start(&haptics);
    run(&mut session, 700);

    let lab = session.shell().calibration();
    assert_eq!(lab.stability(), 92.0);
    assert_eq!(lab.checksum(), "1685");
    assert_eq!(lab.tank_level(), 80.0);

    for _ in 0..3 {
        session.shell_mut().calibration_mut().set_param(Param::Pressure, 5.0);
    }
    run(&mut session, 700);

    let lab = session.shell().calibration();
    assert_eq!(lab.param(Param::Pressure), 95.0);
    // |95 - 65| * 0.5 = 15, plus 10 for pressure above 90
    assert_eq!(lab.stability(), 75.0);
    assert_eq!(lab.tank_level(), 95.0);
    assert_eq!(haptics.len(), 3);
}

#[test]
fn upload_completes_through_the_session() {
    let haptics = HapticLog::new();
    let mut session = start(&haptics);

    assert!(session.shell_mut().calibration_mut().start_upload());
    assert!(!session.shell_mut().calibration_mut().start_upload());
    run(&mut session, 2100);
    let progress = session.shell().calibration().upload_progress();
    assert!(progress > 0.3 && progress < 0.7, "progress {progress}");

    run(&mut session, 3000);
    assert!(!session.shell().calibration().is_uploading());
    assert_eq!(session.shell().calibration().upload_progress(), 0.0);
    assert_eq!(haptics.events().last(), Some(&vec![0, 80]));
}

#[test]
fn every_screen_snapshots_as_json() {
    let haptics = HapticLog::new();
    let mut session = start(&haptics);

    let tags = [
        "calibration",
        "crime_map",
        "tactical",
        "suit_manager",
        "mission_log",
        "fitness",
    ];
    for (kind, tag) in ScreenKind::ALL.into_iter().zip(tags) {
        session.shell_mut().select_screen(kind);
        run(&mut session, 200);
        let snap = session.snapshot();
        assert_eq!(snap.active, kind);
        assert_eq!(snap.screen.kind(), kind);

        let json = serde_json::to_value(&snap).unwrap();
        assert_eq!(json["active"], tag);
        assert_eq!(json["screen"]["screen"], tag);
        assert_eq!(json["tabs"].as_array().map(Vec::len), Some(6));
    }
}

#[test]
fn tactical_and_suits_respond_while_visible() {
    let haptics = HapticLog::new();
    let mut session = start(&haptics);

    session.shell_mut().select(2);
    session.shell_mut().tactical_mut().set_spectrum(Spectrum::Thermal);
    run(&mut session, 600);
    let ScreenSnapshot::Tactical(mj) = session.snapshot().screen else {
        panic!("expected the tactical screen");
    };
    assert_eq!(mj.spectrum, Spectrum::Thermal);
    assert_eq!(mj.palette.primary.to_hex_string(), "#ffaa00");
    assert_eq!(mj.terminal.len(), 5);

    session.shell_mut().select(3);
    assert!(session.shell_mut().suits_mut().select("s4"));
    run(&mut session, 1500);
    let ScreenSnapshot::SuitManager(suits) = session.snapshot().screen else {
        panic!("expected the suit manager");
    };
    assert_eq!(suits.selected.map(|s| s.name), Some("Superior suit".to_string()));
    assert_eq!(suits.stat_fills, [90.0, 80.0, 100.0, 60.0]);
    assert_eq!(suits.preview_opacity, 1.0);
}

#[test]
fn same_seed_replays_identically() {
    let snapshots = |seed: u64| {
        let config = ShellConfig {
            seed,
            ..ShellConfig::default()
        };
        let mut session = Session::new(&config, Rc::new(HapticLog::new())).unwrap();
        session.shell_mut().select_screen(ScreenKind::Tactical);
        (0..40)
            .map(|_| {
                session.advance(Duration::from_millis(50));
                serde_json::to_string(&session.snapshot()).unwrap()
            })
            .collect::<Vec<_>>()
    };

    assert_eq!(snapshots(9), snapshots(9));
    assert_ne!(snapshots(9), snapshots(10));
}
