//! Aqueduct gate: the full command table and overflow protection.

use tankrig::app::events::RigEvent;
use tankrig::app::service::CommandOutcome;
use tankrig::config::RigConfig;
use tankrig::fsm::{GateEvent, GatePhase};

use crate::mock_hw::Bench;

/// Fresh bench with the gate driven into `phase`.
fn gate_in(phase: GatePhase) -> Bench {
    let mut b = Bench::new(&RigConfig::default());
    b.start(0);
    b.tick(0);
    match phase {
        GatePhase::Stopped => {}
        GatePhase::Filling => {
            b.gate(GateEvent::ValveOn);
        }
        GatePhase::FillingPump => {
            b.gate(GateEvent::PumpOn);
        }
    }
    assert_eq!(b.rig.gate_phase(), phase);
    b
}

#[test]
fn command_table() {
    use GateEvent as E;
    use GatePhase as P;

    let table = [
        (P::Stopped, E::ValveOn, Some(P::Filling)),
        (P::Stopped, E::ValveOff, None),
        (P::Stopped, E::PumpOn, Some(P::FillingPump)),
        (P::Stopped, E::PumpOff, None),
        (P::Stopped, E::SensorHi, None),
        (P::Filling, E::ValveOn, None),
        (P::Filling, E::ValveOff, Some(P::Stopped)),
        (P::Filling, E::PumpOn, Some(P::FillingPump)),
        (P::Filling, E::PumpOff, None),
        (P::Filling, E::SensorHi, Some(P::Stopped)),
        (P::FillingPump, E::ValveOn, None),
        (P::FillingPump, E::ValveOff, Some(P::Stopped)),
        (P::FillingPump, E::PumpOn, None),
        (P::FillingPump, E::PumpOff, Some(P::Filling)),
        (P::FillingPump, E::SensorHi, Some(P::Stopped)),
    ];

    for (from, event, to) in table {
        let mut b = gate_in(from);
        let outcome = b.gate(event);
        match to {
            Some(to) => {
                assert_eq!(outcome, CommandOutcome::Applied, "{from} + {event:?}");
                assert_eq!(b.last_event(), Some(&RigEvent::GatePhaseChanged { from, to }));
            }
            None => assert_eq!(outcome, CommandOutcome::Ignored, "{from} + {event:?}"),
        }
        let phase = b.rig.gate_phase();
        assert_eq!(phase, to.unwrap_or(from));
        assert_eq!(b.gate_valve.on(), phase.outputs().valve, "{from} + {event:?}");
        assert_eq!(b.gate_pump.on(), phase.outputs().pump, "{from} + {event:?}");
    }
}

#[test]
fn pump_on_opens_valve_and_pump_together() {
    let mut b = gate_in(GatePhase::Stopped);
    b.gate(GateEvent::PumpOn);
    assert!(b.gate_valve.on());
    assert!(b.gate_pump.on());

    b.gate(GateEvent::PumpOff);
    assert!(b.gate_valve.on());
    assert!(!b.gate_pump.on());
}

#[test]
fn level_switch_closes_gate_once() {
    let mut b = gate_in(GatePhase::FillingPump);
    b.gate_level.set(true);
    b.tick(10);
    assert_eq!(b.rig.gate_phase(), GatePhase::Stopped);
    assert!(!b.gate_valve.on());
    assert!(!b.gate_pump.on());

    // Still high: reopening is allowed and the held level is not a new edge.
    assert_eq!(b.gate(GateEvent::ValveOn), CommandOutcome::Applied);
    b.tick(20);
    assert_eq!(b.rig.gate_phase(), GatePhase::Filling);

    b.gate_level.set(false);
    b.tick(30);
    b.gate_level.set(true);
    b.tick(40);
    assert_eq!(b.rig.gate_phase(), GatePhase::Stopped);
}

#[test]
fn level_edge_while_stopped_is_quiet() {
    let mut b = gate_in(GatePhase::Stopped);
    let before = b.sink.0.len();
    b.gate_level.set(true);
    b.tick(10);
    assert_eq!(b.rig.gate_phase(), GatePhase::Stopped);
    assert_eq!(b.sink.0.len(), before);
}
