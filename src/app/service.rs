//! Rig service: the coordinator.
//!
//! [`RigService`] owns the gate, both tank cycles and the arbitration
//! primitives between them.  It exposes a hardware-agnostic API; all I/O
//! flows through port traits bound at construction, so the whole rig is
//! testable with mock adapters.
//!
//! ```text
//!   Input ──▶ ┌─────────────────────────────┐ ──▶ EventSink
//!             │         RigService           │
//!  Output ◀── │  gate · tank A · tank B      │
//!             │  fill-pump OR · line lock    │
//!             └─────────────────────────────┘
//! ```
//!
//! Per iteration the caller samples the clock once and calls
//! [`tick`](RigService::tick) with it; operator commands are delivered
//! between ticks through [`handle_command`](RigService::handle_command).

use std::rc::Rc;

use log::info;

use crate::arbiter::{ExclusivityLock, SharedActuator, SharedRequester};
use crate::config::RigConfig;
use crate::fsm::{
    EventOutcome, GateCycle, TankCycle, TankIo, TickReport, Timer, Timestamp, TransitionCause,
};

use super::commands::{RigCommand, TankId};
use super::events::{GateStatus, RigEvent, RigStatus, TankStatus};
use super::ports::{EventSink, Input, Output, PersistSlot};

// ───────────────────────────────────────────────────────────────
// Wiring
// ───────────────────────────────────────────────────────────────

/// Per-tank hardware, minus the shared fill pump.
pub struct TankPins<O, I, S> {
    pub ingress_valve: O,
    pub recirc_pump: O,
    pub process_valve: O,
    pub level: I,
    pub slot: S,
}

/// Every handle the rig is bound to.
pub struct RigIo<O, I, S> {
    pub gate_valve: O,
    pub gate_pump: O,
    pub gate_level: I,
    /// Physical fill-pump relay, shared by both tanks.
    pub fill_pump: O,
    pub heartbeat_led: O,
    pub tank_a: TankPins<O, I, S>,
    pub tank_b: TankPins<O, I, S>,
}

/// Result of [`RigService::handle_command`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    Applied,
    Ignored,
    /// Legal, but the shared process line is held by the other tank.
    Blocked,
}

type Tank<O, I, S> = TankCycle<O, SharedRequester<O>, I, S>;

// ───────────────────────────────────────────────────────────────
// RigService
// ───────────────────────────────────────────────────────────────

pub struct RigService<O: Output, I: Input, S: PersistSlot> {
    gate: GateCycle<O, I>,
    tank_a: Tank<O, I, S>,
    tank_b: Tank<O, I, S>,
    process_line: Rc<ExclusivityLock>,
    heartbeat: Timer,
    heartbeat_led: O,
    status_timer: Timer,
    tick_count: u64,
}

impl<O: Output, I: Input, S: PersistSlot> RigService<O, I, S> {
    /// Bind the rig to its hardware.
    ///
    /// Does **not** restore the tanks; call [`start`](Self::start) next.
    pub fn new(config: &RigConfig, io: RigIo<O, I, S>) -> Self {
        let settings = config.tank_settings();
        let process_line = Rc::new(ExclusivityLock::new("process-line"));
        let (fill_a, fill_b) = SharedActuator::split(io.fill_pump);

        let tank = |id: TankId, pins: TankPins<O, I, S>, fill_pump| {
            TankCycle::new(
                id.name(),
                settings,
                TankIo {
                    ingress_valve: pins.ingress_valve,
                    fill_pump,
                    recirc_pump: pins.recirc_pump,
                    process_valve: pins.process_valve,
                    level: pins.level,
                    slot: pins.slot,
                },
                Rc::clone(&process_line),
            )
        };
        let tank_a = tank(TankId::A, io.tank_a, fill_a);
        let tank_b = tank(TankId::B, io.tank_b, fill_b);

        Self {
            gate: GateCycle::new("aqueduct", io.gate_valve, io.gate_pump, io.gate_level),
            tank_a,
            tank_b,
            process_line,
            heartbeat: Timer::new(core::time::Duration::from_millis(
                config.heartbeat_interval_ms as u64,
            )),
            heartbeat_led: io.heartbeat_led,
            status_timer: Timer::new(core::time::Duration::from_millis(
                config.status_interval_ms as u64,
            )),
            tick_count: 0,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Restore both tanks from their persistence slots and arm the
    /// periodic timers.
    pub fn start(&mut self, now: Timestamp, sink: &mut impl EventSink) {
        let tank_a = self.tank_a.restore();
        let tank_b = self.tank_b.restore();
        self.heartbeat.reset(now);
        self.status_timer.reset(now);
        sink.emit(&RigEvent::Started { tank_a, tank_b });
        info!("RigService started: tank-a {tank_a}, tank-b {tank_b}");
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Run one coordinator iteration: gate, tank A, tank B, heartbeat.
    /// Every machine sees the same `now`.
    pub fn tick(&mut self, now: Timestamp, sink: &mut impl EventSink) {
        self.tick_count += 1;

        if let Some(EventOutcome::Applied { from, to }) = self.gate.tick() {
            sink.emit(&RigEvent::GatePhaseChanged { from, to });
        }

        if let Some(report) = self.tank_a.tick(now) {
            Self::report(TankId::A, report, sink);
        }
        if let Some(report) = self.tank_b.tick(now) {
            Self::report(TankId::B, report, sink);
        }

        if self.heartbeat.is_done(now) {
            self.heartbeat.reset(now);
            let on = !self.heartbeat_led.is_set();
            self.heartbeat_led.set(on);
        }
    }

    fn report(tank: TankId, r: TickReport, sink: &mut impl EventSink) {
        if r.cause == TransitionCause::FailsafeExpired {
            sink.emit(&RigEvent::FailsafeExpired { tank });
        }
        sink.emit(&RigEvent::TankPhaseChanged {
            tank,
            from: r.from,
            to: r.to,
        });
    }

    /// Emit a [`RigEvent::Status`] if the status interval has elapsed.
    /// Returns whether one was emitted.
    pub fn poll_status(&mut self, now: Timestamp, sink: &mut impl EventSink) -> bool {
        if !self.status_timer.is_done(now) {
            return false;
        }
        self.status_timer.reset(now);
        sink.emit(&RigEvent::Status(self.status(now)));
        true
    }

    // ── Command handling ──────────────────────────────────────

    /// Deliver an operator command synchronously.
    pub fn handle_command(&mut self, cmd: RigCommand, sink: &mut impl EventSink) -> CommandOutcome {
        match cmd {
            RigCommand::Gate(event) => match self.gate.handle(event) {
                EventOutcome::Applied { from, to } => {
                    sink.emit(&RigEvent::GatePhaseChanged { from, to });
                    CommandOutcome::Applied
                }
                EventOutcome::Ignored { .. } | EventOutcome::Blocked { .. } => {
                    sink.emit(&RigEvent::CommandIgnored { command: cmd });
                    CommandOutcome::Ignored
                }
            },
            RigCommand::Tank(id, event) => {
                let outcome = match id {
                    TankId::A => self.tank_a.handle(event),
                    TankId::B => self.tank_b.handle(event),
                };
                match outcome {
                    EventOutcome::Applied { from, to } => {
                        sink.emit(&RigEvent::TankPhaseChanged { tank: id, from, to });
                        CommandOutcome::Applied
                    }
                    EventOutcome::Ignored { .. } => {
                        sink.emit(&RigEvent::CommandIgnored { command: cmd });
                        CommandOutcome::Ignored
                    }
                    EventOutcome::Blocked { .. } => {
                        sink.emit(&RigEvent::ProcessLineBusy { tank: id });
                        CommandOutcome::Blocked
                    }
                }
            }
        }
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn status(&self, now: Timestamp) -> RigStatus {
        RigStatus {
            now,
            gate: GateStatus {
                phase: self.gate.phase(),
                level_high: self.gate.level_high(),
                outputs: self.gate.outputs(),
            },
            tank_a: Self::tank_status(&self.tank_a, now),
            tank_b: Self::tank_status(&self.tank_b, now),
            fill_pump_on: self.fill_pump_on(),
            process_line_held: self.process_line.is_held(),
        }
    }

    fn tank_status(tank: &Tank<O, I, S>, now: Timestamp) -> TankStatus {
        TankStatus {
            phase: tank.phase(),
            level_high: tank.level_high(),
            outputs: tank.outputs(),
            timer: tank.timer_progress(now),
        }
    }

    pub fn tank_phase(&self, id: TankId) -> crate::fsm::TankPhase {
        match id {
            TankId::A => self.tank_a.phase(),
            TankId::B => self.tank_b.phase(),
        }
    }

    pub fn gate_phase(&self) -> crate::fsm::GatePhase {
        self.gate.phase()
    }

    /// The shared relay is the OR of the two requests.
    pub fn fill_pump_on(&self) -> bool {
        self.tank_a.outputs().fill_pump || self.tank_b.outputs().fill_pump
    }

    pub fn process_line_held(&self) -> bool {
        self.process_line.is_held()
    }

    pub fn heartbeat_on(&self) -> bool {
        self.heartbeat_led.is_set()
    }

    /// Total coordinator ticks since construction.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }
}
