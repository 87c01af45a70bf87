//! Property-based tests for screen-level invariants.
//!
//! 1. Any tab index selects a valid tab; out-of-range indices land on the last.
//! 2. Calibration parameters stay in 0..=100 and stability in 8..=100 under any nudges.
//! 3. Mission charge and lit segments follow the done count.
//! 4. Typewriter output is always a char-boundary prefix of its text.

use std::rc::Rc;
use std::time::Duration;

use proptest::prelude::*;
use webline_core::metrics::{charge_percent, lit_segments};
use webline_core::NoHaptics;
use webline_screens::screens::{Param, POWER_SEGMENTS};
use webline_screens::{ScreenKind, Session, ShellConfig, Typewriter};

fn session() -> Session {
    Session::new(&ShellConfig::default(), Rc::new(NoHaptics)).unwrap()
}

fn param() -> impl Strategy<Value = Param> {
    prop_oneof![
        Just(Param::Viscosity),
        Just(Param::Pressure),
        Just(Param::Tensile),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn tab_selection_is_always_valid(indices in prop::collection::vec(0usize..20, 1..10)) {
        let mut session = session();
        for index in indices {
            let kind = session.shell_mut().select(index);
            prop_assert_eq!(kind.index(), index.min(ScreenKind::ALL.len() - 1));
            prop_assert_eq!(session.shell().active(), kind);
            session.advance(Duration::from_millis(16));
        }
        let x = session.shell().indicator_x();
        prop_assert!(x.is_finite());
    }

    #[test]
    fn calibration_stays_in_domain(
        nudges in prop::collection::vec((param(), -40.0f32..40.0), 1..30),
    ) {
        let mut session = session();
        for (p, delta) in nudges {
            let value = session.shell_mut().calibration_mut().set_param(p, delta);
            prop_assert!((0.0..=100.0).contains(&value));
            let stability = session.shell().calibration().stability();
            prop_assert!((8.0..=100.0).contains(&stability));
            prop_assert_eq!(session.shell().calibration().checksum().len(), 4);
        }
    }

    #[test]
    fn mission_charge_tracks_done_tasks(toggles in prop::collection::vec(1u32..=8, 0..24)) {
        let mut session = session();
        let missions = session.shell_mut().missions_mut();
        for id in toggles {
            prop_assert!(missions.toggle(id));
        }
        let done = missions.done().count();
        let charge = missions.charge();
        prop_assert_eq!(charge, charge_percent(done, 8));
        prop_assert_eq!(missions.segments_lit(), lit_segments(charge, POWER_SEGMENTS));
        prop_assert_eq!(missions.segments_lit() == POWER_SEGMENTS, done == 8);
    }

    #[test]
    fn typewriter_reveals_a_prefix(
        text in "[a-zа-я ]{0,24}",
        steps in prop::collection::vec(1u64..120, 1..30),
    ) {
        let mut writer = Typewriter::per_char_ms(text.clone(), 20);
        let mut revealed = 0;
        for step in steps {
            writer.tick(Duration::from_millis(step));
            prop_assert!(text.starts_with(writer.visible()));
            prop_assert!(writer.revealed() >= revealed);
            revealed = writer.revealed();
        }
    }
}
