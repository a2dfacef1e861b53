//! Outbound rig events.
//!
//! The [`RigService`](super::service::RigService) emits these through the
//! [`EventSink`](super::ports::EventSink) port.  Adapters on the other
//! side decide what to do with them: log to serial, refresh a panel, or
//! record them in a test.

use core::fmt;

use crate::fsm::{GateOutputs, GatePhase, TankOutputs, TankPhase, TimerProgress, Timestamp};

use super::commands::{RigCommand, TankId};

/// Structured events emitted by the rig core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RigEvent {
    /// Both tanks restored; the loop is about to run.
    Started { tank_a: TankPhase, tank_b: TankPhase },

    TankPhaseChanged {
        tank: TankId,
        from: TankPhase,
        to: TankPhase,
    },

    GatePhaseChanged { from: GatePhase, to: GatePhase },

    /// Fill ran past its failsafe without the level switch tripping.
    FailsafeExpired { tank: TankId },

    /// An operator command was not legal in the current phase.
    CommandIgnored { command: RigCommand },

    /// `next` into IN_PROCESS was refused: the other tank holds the line.
    ProcessLineBusy { tank: TankId },

    /// Periodic snapshot.
    Status(RigStatus),
}

/// Point-in-time view of one tank.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TankStatus {
    pub phase: TankPhase,
    pub level_high: bool,
    pub outputs: TankOutputs,
    /// Present in timed phases only.
    pub timer: Option<TimerProgress>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GateStatus {
    pub phase: GatePhase,
    pub level_high: bool,
    pub outputs: GateOutputs,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RigStatus {
    pub now: Timestamp,
    pub gate: GateStatus,
    pub tank_a: TankStatus,
    pub tank_b: TankStatus,
    /// Physical fill-pump relay (OR of both tanks' requests).
    pub fill_pump_on: bool,
    pub process_line_held: bool,
}

/// Space-separated tags of the outputs that are on.
type Tags = heapless::String<24>;

fn tags(pairs: &[(bool, &str)]) -> Tags {
    // Four 3-byte tags plus separators always fit; overflow is unreachable.
    let mut s = Tags::new();
    for (_, tag) in pairs.iter().filter(|(on, _)| *on) {
        if !s.is_empty() {
            let _ = s.push(' ');
        }
        let _ = s.push_str(tag);
    }
    if s.is_empty() {
        let _ = s.push('-');
    }
    s
}

fn level(high: bool) -> &'static str {
    if high { "HI" } else { "LO" }
}

impl fmt::Display for TankStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let out = tags(&[
            (self.outputs.fill_pump, "FIL"),
            (self.outputs.ingress_valve, "VAL"),
            (self.outputs.recirc_pump, "RCR"),
            (self.outputs.process_valve, "PRC"),
        ]);
        write!(f, "{} lvl={} out=[{}] t=", self.phase.label(), level(self.level_high), out)?;
        match self.timer {
            Some(p) => write!(f, "{p}"),
            None => f.write_str("N/A"),
        }
    }
}

impl fmt::Display for GateStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let out = tags(&[(self.outputs.valve, "VAL"), (self.outputs.pump, "PMP")]);
        write!(f, "{} lvl={} out=[{}]", self.phase, level(self.level_high), out)
    }
}

impl fmt::Display for RigStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "aq: {} | a: {} | b: {} | pump={} line={}",
            self.gate,
            self.tank_a,
            self.tank_b,
            if self.fill_pump_on { "ON" } else { "OFF" },
            if self.process_line_held { "HELD" } else { "FREE" },
        )
    }
}
