//! Shared water-source gate ("aqueduct"): one ingress valve and one pump
//! feeding both tanks, closed automatically on overflow.

use log::{debug, info, warn};

use super::edge::EdgeDetector;
use super::{EventOutcome, GateOutputs, GatePhase};
use crate::app::ports::{Input, Output};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GateEvent {
    ValveOn,
    ValveOff,
    PumpOn,
    PumpOff,
    /// High-level sensor tripped, raised by the tick on a rising edge or
    /// by the operator.
    SensorHi,
}

impl GateEvent {
    pub const ALL: [GateEvent; 5] = [
        Self::ValveOn,
        Self::ValveOff,
        Self::PumpOn,
        Self::PumpOff,
        Self::SensorHi,
    ];
}

pub struct GateCycle<O: Output, I: Input> {
    name: &'static str,
    phase: GatePhase,
    started: bool,
    level: EdgeDetector<I>,
    valve: O,
    pump: O,
}

impl<O: Output, I: Input> GateCycle<O, I> {
    pub fn new(name: &'static str, valve: O, pump: O, level: I) -> Self {
        Self {
            name,
            phase: GatePhase::Stopped,
            started: false,
            level: EdgeDetector::new(level),
            valve,
            pump,
        }
    }

    /// Refresh the shared level edge.  A rising edge raises
    /// [`GateEvent::SensorHi`]; its outcome is returned.
    pub fn tick(&mut self) -> Option<EventOutcome<GatePhase>> {
        if !self.started {
            self.started = true;
            self.apply(self.phase);
        }

        self.level.update();
        if self.level.rising_edge() {
            // Already closed: nothing to protect, not an operator mistake.
            if self.phase == GatePhase::Stopped {
                debug!("{}: high level while {}", self.name, self.phase);
                return Some(EventOutcome::Ignored { phase: self.phase });
            }
            info!("{}: high level detected", self.name);
            return Some(self.handle(GateEvent::SensorHi));
        }
        None
    }

    pub fn handle(&mut self, event: GateEvent) -> EventOutcome<GatePhase> {
        use GateEvent as E;
        use GatePhase as P;

        let from = self.phase;
        let to = match (event, from) {
            (E::ValveOn, P::Stopped) => P::Filling,
            (E::ValveOff, P::Filling | P::FillingPump) => P::Stopped,
            (E::PumpOn, P::Stopped | P::Filling) => P::FillingPump,
            (E::PumpOff, P::FillingPump) => P::Filling,
            (E::SensorHi, P::Filling | P::FillingPump) => P::Stopped,
            _ => {
                warn!("{}: {:?} ignored in {}", self.name, event, from);
                return EventOutcome::Ignored { phase: from };
            }
        };

        info!("{}: {} -> {}", self.name, from, to);
        self.phase = to;
        self.apply(to);
        EventOutcome::Applied { from, to }
    }

    fn apply(&mut self, phase: GatePhase) {
        let out = phase.outputs();
        self.valve.set(out.valve);
        self.pump.set(out.pump);
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn phase(&self) -> GatePhase {
        self.phase
    }

    pub fn level_high(&self) -> bool {
        self.level.value()
    }

    pub fn outputs(&self) -> GateOutputs {
        GateOutputs {
            valve: self.valve.is_set(),
            pump: self.pump.is_set(),
        }
    }
}
