//! Fuzz target: `TankCycle::restore`
//!
//! Restores a tank from an arbitrary persisted byte, then replays the
//! remaining input as operator events and ticks.  The cycle must land in
//! a valid phase, never open the process line on restore, and only ever
//! write checkpoint bytes back.
//!
//! cargo fuzz run fuzz_restore_byte

#![no_main]

use std::cell::Cell;
use std::rc::Rc;

use libfuzzer_sys::fuzz_target;
use tankrig::app::ports::{Input, Output, PersistSlot, StorageError};
use tankrig::arbiter::ExclusivityLock;
use tankrig::config::RigConfig;
use tankrig::fsm::{TankCycle, TankEvent, TankIo, TankPhase, Timestamp};

#[derive(Default)]
struct Pin(bool);

impl Output for Pin {
    fn set(&mut self, on: bool) {
        self.0 = on;
    }

    fn is_set(&self) -> bool {
        self.0
    }
}

struct Level(Rc<Cell<bool>>);

impl Input for Level {
    fn read(&mut self) -> bool {
        self.0.get()
    }
}

struct Slot(Option<u8>);

impl PersistSlot for Slot {
    fn save(&mut self, value: u8) -> Result<(), StorageError> {
        let phase = TankPhase::from_byte(value).expect("saved byte decodes");
        assert!(phase.is_checkpoint(), "saved non-checkpoint {phase}");
        self.0 = Some(value);
        Ok(())
    }

    fn read(&mut self) -> Result<u8, StorageError> {
        self.0.ok_or(StorageError::NotFound)
    }
}

fuzz_target!(|data: &[u8]| {
    let Some((&byte, ops)) = data.split_first() else {
        return;
    };

    let config = RigConfig {
        process_line_enabled: true,
        ..RigConfig::default()
    };
    let level = Rc::new(Cell::new(false));
    let io = TankIo {
        ingress_valve: Pin::default(),
        fill_pump: Pin::default(),
        recirc_pump: Pin::default(),
        process_valve: Pin::default(),
        level: Level(Rc::clone(&level)),
        slot: Slot(Some(byte)),
    };
    let lock = Rc::new(ExclusivityLock::new("process-line"));
    let mut tank = TankCycle::new("fuzz", config.tank_settings(), io, Rc::clone(&lock));

    let restored = tank.restore();
    assert_ne!(restored, TankPhase::InProcess);
    assert!(!lock.is_held());

    let mut now = 0u32;
    for &op in ops {
        match op % 8 {
            n @ 0..=4 => {
                let _ = tank.handle(TankEvent::ALL[n as usize]);
            }
            5 => level.set(!level.get()),
            _ => now = now.wrapping_add(u32::from(op) * 10_000),
        }
        tank.tick(Timestamp::from_millis(now));
        assert_eq!(lock.is_held(), tank.phase() == TankPhase::InProcess);
    }
});
