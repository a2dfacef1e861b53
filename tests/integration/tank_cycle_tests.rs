//! Tank cycle behaviour through the coordinator, against recording mocks.

use tankrig::app::commands::TankId;
use tankrig::app::events::RigEvent;
use tankrig::app::service::CommandOutcome;
use tankrig::config::{Chem2Completion, RigConfig};
use tankrig::fsm::{TankEvent, TankPhase};

use crate::mock_hw::Bench;

fn started(config: &RigConfig) -> Bench {
    let mut b = Bench::new(config);
    b.start(0);
    b.tick(0);
    b
}

// ── Full treatment cycle ──────────────────────────────────────

#[test]
fn full_cycle_with_level_switch() {
    let mut b = started(&RigConfig::default());

    assert_eq!(b.tank(TankId::A, TankEvent::Next), CommandOutcome::Applied);
    b.tick(10);
    assert!(b.a.ingress.on());
    assert!(!b.fill_pump.on(), "pre-fill opens the valve only");

    b.tick(3_011);
    assert_eq!(b.rig.tank_phase(TankId::A), TankPhase::Filling);

    // Entry actions land on the next tick, valve first.
    b.take_calls();
    b.tick(3_020);
    assert_eq!(
        b.take_calls(),
        vec![
            ("a-ingress", false),
            ("fill-pump", true),
            ("a-recirc", false),
            ("a-process", false),
        ]
    );

    b.a.level.set(true);
    b.tick(4_000);
    assert_eq!(b.rig.tank_phase(TankId::A), TankPhase::WaitingChem1);
    b.tick(4_010);
    assert!(!b.fill_pump.on());

    b.tank(TankId::A, TankEvent::Next);
    b.tick(5_000);
    assert!(b.a.recirc.on());
    b.tick(2_405_000);
    assert_eq!(b.rig.tank_phase(TankId::A), TankPhase::Chem1);
    b.tick(2_405_001);
    assert_eq!(b.rig.tank_phase(TankId::A), TankPhase::WaitingChem2);
    b.tick(2_405_010);
    assert!(!b.a.recirc.on());

    b.tank(TankId::A, TankEvent::Next);
    b.tick(2_406_000);
    assert!(b.a.recirc.on());
    b.tick(2_706_001);
    assert_eq!(b.rig.tank_phase(TankId::A), TankPhase::WaitingChem2);

    assert!(!b.sink.0.contains(&RigEvent::FailsafeExpired { tank: TankId::A }));
    assert_eq!(b.a.slot.saves(), vec![0, 3, 5, 5]);
    assert_eq!(b.rig.tank_phase(TankId::B), TankPhase::Initial);
}

#[test]
fn failsafe_ends_fill_without_level_switch() {
    let config = RigConfig {
        fill_failsafe_secs: 60,
        ..RigConfig::default()
    };
    let mut b = started(&config);
    b.tank(TankId::B, TankEvent::Next);
    b.tick(0);
    b.tick(3_001);
    b.tick(3_002);
    assert!(b.fill_pump.on());

    b.tick(63_002);
    assert_eq!(b.rig.tank_phase(TankId::B), TankPhase::Filling);
    b.tick(63_003);
    assert_eq!(b.rig.tank_phase(TankId::B), TankPhase::WaitingChem1);

    let n = b.sink.0.len();
    assert_eq!(b.sink.0[n - 2], RigEvent::FailsafeExpired { tank: TankId::B });
    assert_eq!(
        b.sink.0[n - 1],
        RigEvent::TankPhaseChanged {
            tank: TankId::B,
            from: TankPhase::Filling,
            to: TankPhase::WaitingChem1,
        }
    );

    // A late level edge no longer means anything.
    b.b.level.set(true);
    b.tick(63_010);
    assert_eq!(b.rig.tank_phase(TankId::B), TankPhase::WaitingChem1);
    assert!(!b.fill_pump.on());
}

#[test]
fn cancelled_chem1_restarts_its_full_timer() {
    let mut b = started(&RigConfig::default());
    b.tank(TankId::A, TankEvent::ForceNext);
    b.tank(TankId::A, TankEvent::Next);
    b.tick(1_000);

    b.tank(TankId::A, TankEvent::Cancel);
    assert_eq!(b.rig.tank_phase(TankId::A), TankPhase::WaitingChem1);
    b.tick(1_000_000);
    assert!(!b.a.recirc.on());

    b.tank(TankId::A, TankEvent::Next);
    b.tick(1_000_010);
    b.tick(3_400_010);
    assert_eq!(b.rig.tank_phase(TankId::A), TankPhase::Chem1);
    b.tick(3_400_011);
    assert_eq!(b.rig.tank_phase(TankId::A), TankPhase::WaitingChem2);
}

// ── Operator navigation ───────────────────────────────────────

#[test]
fn force_prev_wraps_around_the_waiting_ring() {
    let mut b = started(&RigConfig::default());
    let expected = [
        TankPhase::WaitingInProcess,
        TankPhase::WaitingChem2,
        TankPhase::WaitingChem1,
        TankPhase::Initial,
        TankPhase::WaitingInProcess,
    ];
    for phase in expected {
        assert_eq!(b.tank(TankId::B, TankEvent::ForcePrev), CommandOutcome::Applied);
        assert_eq!(b.rig.tank_phase(TankId::B), phase);
    }

    // Forward skipping stops at the end of the ring.
    assert_eq!(b.tank(TankId::B, TankEvent::ForceNext), CommandOutcome::Ignored);
    assert_eq!(b.b.slot.value(), Some(7));
}

#[test]
fn forced_moves_are_refused_while_timed() {
    let mut b = started(&RigConfig::default());
    b.tank(TankId::A, TankEvent::Next);
    for event in [TankEvent::ForceNext, TankEvent::ForcePrev, TankEvent::FillFinish] {
        assert_eq!(b.tank(TankId::A, event), CommandOutcome::Ignored);
        assert!(matches!(b.last_event(), Some(RigEvent::CommandIgnored { .. })));
    }
    assert_eq!(b.rig.tank_phase(TankId::A), TankPhase::PreFill);
}

// ── Process line ──────────────────────────────────────────────

#[test]
fn process_line_cycle_with_chem2_advance() {
    let config = RigConfig {
        process_line_enabled: true,
        chem2_completion: Chem2Completion::AdvanceToWaitingInProcess,
        ..RigConfig::default()
    };
    let mut b = started(&config);

    b.tank(TankId::A, TankEvent::ForceNext);
    b.tank(TankId::A, TankEvent::ForceNext);
    b.tank(TankId::A, TankEvent::Next);
    b.tick(100);
    b.tick(300_101);
    assert_eq!(b.rig.tank_phase(TankId::A), TankPhase::WaitingInProcess);

    assert_eq!(b.tank(TankId::A, TankEvent::Next), CommandOutcome::Applied);
    b.tick(300_120);
    assert!(b.a.process.on());
    assert!(b.rig.process_line_held());

    b.tank(TankId::B, TankEvent::ForcePrev);
    assert_eq!(b.tank(TankId::B, TankEvent::Next), CommandOutcome::Blocked);
    assert_eq!(b.last_event(), Some(&RigEvent::ProcessLineBusy { tank: TankId::B }));
    assert_eq!(b.rig.tank_phase(TankId::B), TankPhase::WaitingInProcess);

    b.tank(TankId::A, TankEvent::Next);
    assert!(!b.rig.process_line_held());
    b.tick(300_130);
    assert!(!b.a.process.on());

    assert_eq!(b.tank(TankId::B, TankEvent::Next), CommandOutcome::Applied);
    b.tick(300_140);
    assert!(b.b.process.on());
    assert_eq!(b.a.slot.saves(), vec![0, 3, 5, 7, 0]);
}
