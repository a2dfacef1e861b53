//! Power-cut recovery: a second bench restarts from the first bench's slots.

use tankrig::app::commands::TankId;
use tankrig::app::events::RigEvent;
use tankrig::config::RigConfig;
use tankrig::fsm::{TankEvent, TankPhase};

use crate::mock_hw::{Bench, MemSlot};

fn reboot(old: &Bench, config: &RigConfig) -> Bench {
    let mut b = Bench::with_slots(config, old.a.slot.clone(), old.b.slot.clone());
    b.start(0);
    b
}

#[test]
fn power_cut_mid_dose_resumes_at_last_checkpoint() {
    let config = RigConfig::default();
    let mut first = Bench::new(&config);
    first.start(0);
    first.tick(0);
    first.tank(TankId::A, TankEvent::ForceNext);
    first.tank(TankId::A, TankEvent::Next);
    first.tick(10);
    assert!(first.a.recirc.on());
    assert_eq!(first.a.slot.value(), Some(3));

    let mut second = reboot(&first, &config);
    assert_eq!(
        second.sink.0[0],
        RigEvent::Started {
            tank_a: TankPhase::WaitingChem1,
            tank_b: TankPhase::Initial,
        }
    );
    second.tick(0);
    assert!(!second.a.recirc.on());
    assert!(!second.fill_pump.on());

    // The operator restarts the dose by hand.
    second.tank(TankId::A, TankEvent::Next);
    assert_eq!(second.rig.tank_phase(TankId::A), TankPhase::Chem1);
}

#[test]
fn power_cut_mid_fill_restarts_from_initial() {
    let config = RigConfig::default();
    let mut first = Bench::new(&config);
    first.start(0);
    first.tick(0);
    first.tank(TankId::B, TankEvent::Next);
    first.tick(10);
    first.tick(3_011);
    first.tick(3_020);
    assert!(first.fill_pump.on());

    let mut second = reboot(&first, &config);
    second.tick(0);
    assert_eq!(second.rig.tank_phase(TankId::B), TankPhase::Initial);
    assert!(!second.fill_pump.on());
    assert!(!second.b.ingress.on());
}

#[test]
fn persisted_in_process_lands_in_waiting_with_line_free() {
    let config = RigConfig {
        process_line_enabled: true,
        ..RigConfig::default()
    };
    let mut b = Bench::with_slots(&config, MemSlot::holding(8), MemSlot::holding(7));
    b.start(0);
    b.tick(0);
    assert_eq!(b.rig.tank_phase(TankId::A), TankPhase::WaitingInProcess);
    assert_eq!(b.rig.tank_phase(TankId::B), TankPhase::WaitingInProcess);
    assert!(!b.rig.process_line_held());
    assert!(!b.a.process.on());
    assert_eq!(b.a.slot.value(), Some(7));
}

#[test]
fn garbage_byte_resets_slot_to_initial() {
    let config = RigConfig::default();
    let mut b = Bench::with_slots(&config, MemSlot::holding(42), MemSlot::holding(255));
    b.start(0);
    for id in TankId::ALL {
        assert_eq!(b.rig.tank_phase(id), TankPhase::Initial);
        assert_eq!(b.tank_bench(id).slot.value(), Some(0));
    }
}

#[test]
fn timed_byte_reenters_phase_with_full_timer() {
    let config = RigConfig::default();
    let mut b = Bench::with_slots(&config, MemSlot::holding(4), MemSlot::default());
    b.start(0);
    assert_eq!(b.rig.tank_phase(TankId::A), TankPhase::Chem1);
    assert!(b.a.slot.saves().is_empty(), "timed phases are never written");

    b.tick(1_000);
    assert!(b.a.recirc.on());
    b.tick(2_401_000);
    assert_eq!(b.rig.tank_phase(TankId::A), TankPhase::Chem1);
    b.tick(2_401_001);
    assert_eq!(b.rig.tank_phase(TankId::A), TankPhase::WaitingChem2);
}
