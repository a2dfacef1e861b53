//! Treatment tank cycle: fill, two chemical recirculation stages, hand-off.
//!
//! One [`TankCycle`] per tank.  Operator events are applied synchronously
//! through [`TankCycle::handle`]; timer- and sensor-driven transitions are
//! evaluated in [`TankCycle::tick`].  Entry actions need the tick timestamp
//! to arm timers, so a transition only marks its entry as pending and the
//! next tick applies it.

use std::rc::Rc;

use log::{error, info, warn};

use super::edge::EdgeDetector;
use super::timer::{Timer, TimerProgress, Timestamp};
use super::{EventOutcome, TankOutputs, TankPhase};
use crate::app::ports::{Input, Output, PersistSlot};
use crate::arbiter::{ExclusivityLock, LockToken};
use crate::config::{Chem2Completion, TankSettings};

/// Operator events a tank understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TankEvent {
    Next,
    Cancel,
    ForceNext,
    ForcePrev,
    FillFinish,
}

impl TankEvent {
    pub const ALL: [TankEvent; 5] = [
        Self::Next,
        Self::Cancel,
        Self::ForceNext,
        Self::ForcePrev,
        Self::FillFinish,
    ];
}

/// Why a tick moved the cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionCause {
    PreFillElapsed,
    LevelHigh,
    FailsafeExpired,
    Chem1Elapsed,
    Chem2Elapsed,
}

/// An automatic transition taken during [`TankCycle::tick`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickReport {
    pub from: TankPhase,
    pub to: TankPhase,
    pub cause: TransitionCause,
}

/// Hardware bound to one tank.  `fill_pump` is usually one side of the
/// shared fill-pump actuator.
pub struct TankIo<O, F, I, S> {
    pub ingress_valve: O,
    pub fill_pump: F,
    pub recirc_pump: O,
    pub process_valve: O,
    pub level: I,
    pub slot: S,
}

struct PhaseTimers {
    pre_fill: Timer,
    fill_failsafe: Timer,
    chem1: Timer,
    chem2: Timer,
}

impl PhaseTimers {
    fn from_settings(s: &TankSettings) -> Self {
        Self {
            pre_fill: Timer::from_secs(s.pre_fill_secs),
            fill_failsafe: Timer::from_secs(s.fill_failsafe_secs),
            chem1: Timer::from_secs(s.chem1_secs),
            chem2: Timer::from_secs(s.chem2_secs),
        }
    }

    fn for_phase(&self, phase: TankPhase) -> Option<&Timer> {
        match phase {
            TankPhase::PreFill => Some(&self.pre_fill),
            TankPhase::Filling => Some(&self.fill_failsafe),
            TankPhase::Chem1 => Some(&self.chem1),
            TankPhase::Chem2 => Some(&self.chem2),
            _ => None,
        }
    }

    fn for_phase_mut(&mut self, phase: TankPhase) -> Option<&mut Timer> {
        match phase {
            TankPhase::PreFill => Some(&mut self.pre_fill),
            TankPhase::Filling => Some(&mut self.fill_failsafe),
            TankPhase::Chem1 => Some(&mut self.chem1),
            TankPhase::Chem2 => Some(&mut self.chem2),
            _ => None,
        }
    }
}

pub struct TankCycle<O: Output, F: Output, I: Input, S: PersistSlot> {
    name: &'static str,
    settings: TankSettings,
    phase: TankPhase,
    entry_pending: bool,
    timers: PhaseTimers,
    level: EdgeDetector<I>,
    ingress_valve: O,
    fill_pump: F,
    recirc_pump: O,
    process_valve: O,
    slot: S,
    process_line: Rc<ExclusivityLock>,
    token: Option<LockToken>,
}

impl<O: Output, F: Output, I: Input, S: PersistSlot> TankCycle<O, F, I, S> {
    /// Build a cycle in INITIAL.  Call [`restore`](Self::restore) before the
    /// first tick to resume from the persistence slot.
    pub fn new(
        name: &'static str,
        settings: TankSettings,
        io: TankIo<O, F, I, S>,
        process_line: Rc<ExclusivityLock>,
    ) -> Self {
        Self {
            name,
            timers: PhaseTimers::from_settings(&settings),
            settings,
            phase: TankPhase::Initial,
            entry_pending: true,
            level: EdgeDetector::new(io.level),
            ingress_valve: io.ingress_valve,
            fill_pump: io.fill_pump,
            recirc_pump: io.recirc_pump,
            process_valve: io.process_valve,
            slot: io.slot,
            process_line,
            token: None,
        }
    }

    /// Resume from the persisted byte.  Unreadable or invalid slots fall
    /// back to INITIAL.  Returns the phase the cycle is now in.
    pub fn restore(&mut self) -> TankPhase {
        let target = match self.slot.read() {
            Ok(byte) => match TankPhase::from_byte(byte) {
                // The lock token is never persisted.
                Some(TankPhase::InProcess) => TankPhase::WaitingInProcess,
                Some(phase) => phase,
                None => {
                    warn!("{}: invalid persisted phase {byte}, starting at INITIAL", self.name);
                    TankPhase::Initial
                }
            },
            Err(e) => {
                warn!("{}: persisted phase unreadable ({e}), starting at INITIAL", self.name);
                TankPhase::Initial
            }
        };
        info!("{}: restored {}", self.name, target);
        self.set_phase(target);
        target
    }

    /// Refresh the level edge, apply pending entry actions, then evaluate
    /// automatic transitions.  At most one transition per tick.
    pub fn tick(&mut self, now: Timestamp) -> Option<TickReport> {
        self.level.update();

        if self.entry_pending {
            self.enter(now);
        }

        let (to, cause) = match self.phase {
            TankPhase::PreFill if self.timers.pre_fill.is_done(now) => {
                (TankPhase::Filling, TransitionCause::PreFillElapsed)
            }
            TankPhase::Filling if self.timers.fill_failsafe.is_done(now) => {
                warn!(
                    "{}: ALERT fill failsafe expired after {}s without high level",
                    self.name,
                    self.timers.fill_failsafe.total_secs()
                );
                (TankPhase::WaitingChem1, TransitionCause::FailsafeExpired)
            }
            TankPhase::Filling if self.level.rising_edge() => {
                (TankPhase::WaitingChem1, TransitionCause::LevelHigh)
            }
            TankPhase::Chem1 if self.timers.chem1.is_done(now) => {
                (TankPhase::WaitingChem2, TransitionCause::Chem1Elapsed)
            }
            TankPhase::Chem2 if self.timers.chem2.is_done(now) => {
                (self.chem2_target(), TransitionCause::Chem2Elapsed)
            }
            _ => return None,
        };

        let from = self.phase;
        self.set_phase(to);
        Some(TickReport { from, to, cause })
    }

    /// Apply an operator event.
    pub fn handle(&mut self, event: TankEvent) -> EventOutcome<TankPhase> {
        use TankEvent as E;
        use TankPhase as P;

        let from = self.phase;
        let to = match (event, from) {
            (E::Next, P::Initial) => P::PreFill,
            (E::Next, P::WaitingChem1) => P::Chem1,
            (E::Next, P::WaitingChem2) => P::Chem2,
            (E::Next, P::WaitingInProcess) if self.settings.process_line_enabled => {
                match self.process_line.try_acquire() {
                    Ok(token) => {
                        self.token = Some(token);
                        P::InProcess
                    }
                    Err(e) => {
                        warn!(
                            "{}: {} {e}, staying in {from}",
                            self.name,
                            self.process_line.name()
                        );
                        return EventOutcome::Blocked { phase: from };
                    }
                }
            }
            (E::Next, P::WaitingInProcess) => P::Initial,
            (E::Next, P::InProcess) => P::Initial,

            (E::Cancel, P::PreFill | P::Filling) => P::Initial,
            (E::Cancel, P::Chem1) => P::WaitingChem1,
            (E::Cancel, P::Chem2) => P::WaitingChem2,
            (E::Cancel, P::InProcess) => P::WaitingInProcess,

            (E::ForceNext, P::Initial) => P::WaitingChem1,
            (E::ForceNext, P::WaitingChem1) => P::WaitingChem2,
            (E::ForceNext, P::WaitingChem2) => P::WaitingInProcess,

            (E::ForcePrev, P::Initial) => P::WaitingInProcess,
            (E::ForcePrev, P::WaitingChem1) => P::Initial,
            (E::ForcePrev, P::WaitingChem2) => P::WaitingChem1,
            (E::ForcePrev, P::WaitingInProcess) => P::WaitingChem2,

            (E::FillFinish, P::Filling) => P::WaitingChem1,

            _ => {
                warn!("{}: {:?} ignored in {}", self.name, event, from);
                return EventOutcome::Ignored { phase: from };
            }
        };

        self.set_phase(to);
        EventOutcome::Applied { from, to }
    }

    fn chem2_target(&self) -> TankPhase {
        match self.settings.chem2_completion {
            Chem2Completion::ReturnToWaitingChem2 => TankPhase::WaitingChem2,
            Chem2Completion::AdvanceToWaitingInProcess => TankPhase::WaitingInProcess,
        }
    }

    /// The single transition path: every phase change goes through here.
    fn set_phase(&mut self, next: TankPhase) {
        if self.phase == TankPhase::InProcess && next != TankPhase::InProcess {
            self.release_process_line();
        }

        let from = self.phase;
        self.phase = next;
        self.entry_pending = true;
        info!("{}: {} -> {}", self.name, from, next);

        if next.is_checkpoint() {
            if let Err(e) = self.slot.save(next.id()) {
                error!("{}: failed to persist {}: {e}", self.name, next);
            }
        }
    }

    fn release_process_line(&mut self) {
        if let Some(token) = self.token.take() {
            if let Err(e) = self.process_line.release(token) {
                error!("{}: process line release failed: {e}", self.name);
            }
        }
    }

    fn enter(&mut self, now: Timestamp) {
        let out = self.phase.outputs();
        self.ingress_valve.set(out.ingress_valve);
        self.fill_pump.set(out.fill_pump);
        self.recirc_pump.set(out.recirc_pump);
        self.process_valve.set(out.process_valve);

        if let Some(timer) = self.timers.for_phase_mut(self.phase) {
            timer.reset(now);
        }
        self.entry_pending = false;
    }

    // --- Queries ---

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn phase(&self) -> TankPhase {
        self.phase
    }

    /// Last sampled level-switch state.
    pub fn level_high(&self) -> bool {
        self.level.value()
    }

    /// Output vector as currently commanded on the hardware handles.
    pub fn outputs(&self) -> TankOutputs {
        TankOutputs {
            ingress_valve: self.ingress_valve.is_set(),
            fill_pump: self.fill_pump.is_set(),
            recirc_pump: self.recirc_pump.is_set(),
            process_valve: self.process_valve.is_set(),
        }
    }

    /// Elapsed/total for the active phase timer.  `None` in untimed phases
    /// and before the phase's entry actions have run.
    pub fn timer_progress(&self, now: Timestamp) -> Option<TimerProgress> {
        if self.entry_pending {
            return None;
        }
        self.timers.for_phase(self.phase).map(|t| t.progress(now))
    }

    pub fn holds_process_line(&self) -> bool {
        self.token.is_some()
    }
}
