//! Inbound operator commands.
//!
//! These come from the serial console (or a touch panel, or a test) and
//! are interpreted by [`RigService`](super::service::RigService).

use core::fmt;

use crate::fsm::{GateEvent, TankEvent};

/// Which treatment tank a command addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TankId {
    A,
    B,
}

impl TankId {
    pub const ALL: [TankId; 2] = [Self::A, Self::B];

    pub fn name(self) -> &'static str {
        match self {
            Self::A => "tank-a",
            Self::B => "tank-b",
        }
    }
}

impl fmt::Display for TankId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Commands that adapters can send into the rig core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RigCommand {
    /// Operator event for one tank cycle.
    Tank(TankId, TankEvent),
    /// Operator event for the shared gate.
    Gate(GateEvent),
}

impl fmt::Display for RigCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tank(id, ev) => write!(f, "{id} {ev:?}"),
            Self::Gate(ev) => write!(f, "aqueduct {ev:?}"),
        }
    }
}
