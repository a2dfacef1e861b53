//! Mock hardware bench for integration tests.
//!
//! Records every relay command so tests can assert on the full actuation
//! history without touching real GPIO.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use tankrig::app::commands::{RigCommand, TankId};
use tankrig::app::events::RigEvent;
use tankrig::app::ports::{EventSink, Input, Output, PersistSlot, StorageError};
use tankrig::app::service::{CommandOutcome, RigIo, RigService, TankPins};
use tankrig::config::RigConfig;
use tankrig::fsm::{GateEvent, TankEvent, Timestamp};

// ── Relay call record ─────────────────────────────────────────

pub type CallLog = Rc<RefCell<Vec<(&'static str, bool)>>>;

#[derive(Clone)]
pub struct MockRelay {
    name: &'static str,
    state: Rc<Cell<bool>>,
    log: CallLog,
}

impl MockRelay {
    pub fn new(name: &'static str, log: &CallLog) -> Self {
        Self {
            name,
            state: Rc::new(Cell::new(false)),
            log: Rc::clone(log),
        }
    }

    pub fn on(&self) -> bool {
        self.state.get()
    }
}

impl Output for MockRelay {
    fn set(&mut self, on: bool) {
        self.state.set(on);
        self.log.borrow_mut().push((self.name, on));
    }

    fn is_set(&self) -> bool {
        self.state.get()
    }
}

// ── Level switch and slot ─────────────────────────────────────

#[derive(Clone, Default)]
pub struct MockSwitch(Rc<Cell<bool>>);

impl MockSwitch {
    pub fn set(&self, high: bool) {
        self.0.set(high);
    }
}

impl Input for MockSwitch {
    fn read(&mut self) -> bool {
        self.0.get()
    }
}

/// One-byte slot that survives a simulated power cut: clone it into the
/// next bench.
#[derive(Clone, Default)]
pub struct MemSlot {
    value: Rc<Cell<Option<u8>>>,
    saves: Rc<RefCell<Vec<u8>>>,
}

#[allow(dead_code)]
impl MemSlot {
    pub fn holding(byte: u8) -> Self {
        let slot = Self::default();
        slot.value.set(Some(byte));
        slot
    }

    pub fn value(&self) -> Option<u8> {
        self.value.get()
    }

    pub fn saves(&self) -> Vec<u8> {
        self.saves.borrow().clone()
    }
}

impl PersistSlot for MemSlot {
    fn save(&mut self, value: u8) -> Result<(), StorageError> {
        self.value.set(Some(value));
        self.saves.borrow_mut().push(value);
        Ok(())
    }

    fn read(&mut self) -> Result<u8, StorageError> {
        self.value.get().ok_or(StorageError::NotFound)
    }
}

// ── Event recorder ────────────────────────────────────────────

#[derive(Default)]
pub struct Recorder(pub Vec<RigEvent>);

impl EventSink for Recorder {
    fn emit(&mut self, event: &RigEvent) {
        self.0.push(event.clone());
    }
}

// ── Bench ─────────────────────────────────────────────────────

pub struct TankBench {
    pub ingress: MockRelay,
    pub recirc: MockRelay,
    pub process: MockRelay,
    pub level: MockSwitch,
    pub slot: MemSlot,
}

impl TankBench {
    fn new(id: TankId, slot: MemSlot, log: &CallLog) -> Self {
        let (ingress, recirc, process) = match id {
            TankId::A => ("a-ingress", "a-recirc", "a-process"),
            TankId::B => ("b-ingress", "b-recirc", "b-process"),
        };
        Self {
            ingress: MockRelay::new(ingress, log),
            recirc: MockRelay::new(recirc, log),
            process: MockRelay::new(process, log),
            level: MockSwitch::default(),
            slot,
        }
    }

    fn pins(&self) -> TankPins<MockRelay, MockSwitch, MemSlot> {
        TankPins {
            ingress_valve: self.ingress.clone(),
            recirc_pump: self.recirc.clone(),
            process_valve: self.process.clone(),
            level: self.level.clone(),
            slot: self.slot.clone(),
        }
    }
}

pub struct Bench {
    pub rig: RigService<MockRelay, MockSwitch, MemSlot>,
    pub sink: Recorder,
    pub log: CallLog,
    pub gate_valve: MockRelay,
    pub gate_pump: MockRelay,
    pub gate_level: MockSwitch,
    pub fill_pump: MockRelay,
    pub a: TankBench,
    pub b: TankBench,
}

#[allow(dead_code)]
impl Bench {
    pub fn new(config: &RigConfig) -> Self {
        Self::with_slots(config, MemSlot::default(), MemSlot::default())
    }

    /// Bench whose tanks persist into the given slots.
    pub fn with_slots(config: &RigConfig, slot_a: MemSlot, slot_b: MemSlot) -> Self {
        let log = CallLog::default();
        let gate_valve = MockRelay::new("aq-valve", &log);
        let gate_pump = MockRelay::new("aq-pump", &log);
        let gate_level = MockSwitch::default();
        let fill_pump = MockRelay::new("fill-pump", &log);
        let a = TankBench::new(TankId::A, slot_a, &log);
        let b = TankBench::new(TankId::B, slot_b, &log);

        let io = RigIo {
            gate_valve: gate_valve.clone(),
            gate_pump: gate_pump.clone(),
            gate_level: gate_level.clone(),
            fill_pump: fill_pump.clone(),
            heartbeat_led: MockRelay::new("led", &log),
            tank_a: a.pins(),
            tank_b: b.pins(),
        };

        Self {
            rig: RigService::new(config, io),
            sink: Recorder::default(),
            log,
            gate_valve,
            gate_pump,
            gate_level,
            fill_pump,
            a,
            b,
        }
    }

    pub fn start(&mut self, ms: u32) {
        self.rig.start(Timestamp::from_millis(ms), &mut self.sink);
    }

    pub fn tick(&mut self, ms: u32) {
        self.rig.tick(Timestamp::from_millis(ms), &mut self.sink);
    }

    pub fn tank(&mut self, id: TankId, event: TankEvent) -> CommandOutcome {
        self.rig.handle_command(RigCommand::Tank(id, event), &mut self.sink)
    }

    pub fn gate(&mut self, event: GateEvent) -> CommandOutcome {
        self.rig.handle_command(RigCommand::Gate(event), &mut self.sink)
    }

    pub fn tank_bench(&self, id: TankId) -> &TankBench {
        match id {
            TankId::A => &self.a,
            TankId::B => &self.b,
        }
    }

    /// Relay commands recorded since the last call.
    pub fn take_calls(&self) -> Vec<(&'static str, bool)> {
        std::mem::take(&mut *self.log.borrow_mut())
    }

    pub fn last_event(&self) -> Option<&RigEvent> {
        self.sink.0.last()
    }
}
