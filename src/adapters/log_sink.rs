//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured rig events to the `log`
//! facade (stdout in the simulator, UART on the panel controller).
//! A touch-panel adapter would implement the same trait.

use log::{info, warn};

use crate::app::events::RigEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`RigEvent`] as one line.
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &RigEvent) {
        match event {
            RigEvent::Started { tank_a, tank_b } => {
                info!("START | tank-a={} tank-b={}", tank_a.label(), tank_b.label());
            }
            RigEvent::TankPhaseChanged { tank, from, to } => {
                info!("STATE | {} {} -> {}", tank, from.label(), to.label());
            }
            RigEvent::GatePhaseChanged { from, to } => {
                info!("STATE | aqueduct {} -> {}", from, to);
            }
            RigEvent::FailsafeExpired { tank } => {
                warn!("ALERT | {} fill failsafe expired, level switch never tripped", tank);
            }
            RigEvent::CommandIgnored { command } => {
                warn!("IGNORED | {}", command);
            }
            RigEvent::ProcessLineBusy { tank } => {
                warn!("ALERT | {} process line busy", tank);
            }
            RigEvent::Status(s) => {
                info!("STATUS | {}", s);
            }
        }
    }
}
