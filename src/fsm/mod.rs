//! Tank and gate state machines.
//!
//! ```text
//!       cancel (PRE_FILL, FILLING)
//!     ┌─────────────────────────────────────┐
//!     ▼                                     │
//!  INITIAL ──next──▶ PRE_FILL ──[timer]──▶ FILLING
//!     ▲                                     │ [level hi] / [failsafe] / fill finish
//!     │                                     ▼
//!     │                              WAITING_CHEM_1 ◀──cancel──┐
//!     │                                     │ next             │
//!     │                                     ▼                  │
//!     │                                  CHEM_1 ───────────────┘
//!     │                                     │ [timer]
//!     │                                     ▼
//!     │                              WAITING_CHEM_2 ◀──cancel / [timer]──┐
//!     │                                     │ next                       │
//!     │                                     ▼                            │
//!     │                                  CHEM_2 ─────────────────────────┘
//!     │
//!     └──next── WAITING_IN_PROCESS ◀──force next── WAITING_CHEM_2
//! ```
//!
//! Each machine is a plain struct with an enum phase and a `match`-driven
//! transition table.  Entry actions drive every output the machine owns,
//! so the physical state is a function of the current phase alone.

pub mod edge;
pub mod gate;
pub mod tank;
pub mod timer;

use core::fmt;

pub use edge::EdgeDetector;
pub use gate::{GateCycle, GateEvent};
pub use tank::{TankCycle, TankEvent, TankIo, TickReport, TransitionCause};
pub use timer::{Timer, TimerProgress, Timestamp};

// ---------------------------------------------------------------------------
// Tank phases
// ---------------------------------------------------------------------------

/// Every phase of a treatment tank cycle.  The discriminant is the byte
/// written to the tank's persistence slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TankPhase {
    Initial = 0,
    PreFill = 1,
    Filling = 2,
    WaitingChem1 = 3,
    Chem1 = 4,
    WaitingChem2 = 5,
    Chem2 = 6,
    WaitingInProcess = 7,
    /// Process line open.  Only reachable with the process line enabled.
    InProcess = 8,
}

impl TankPhase {
    pub const COUNT: usize = 9;

    pub const ALL: [TankPhase; Self::COUNT] = [
        Self::Initial,
        Self::PreFill,
        Self::Filling,
        Self::WaitingChem1,
        Self::Chem1,
        Self::WaitingChem2,
        Self::Chem2,
        Self::WaitingInProcess,
        Self::InProcess,
    ];

    /// Decode a persisted byte.  `None` for anything outside the enumeration.
    pub fn from_byte(b: u8) -> Option<Self> {
        Self::ALL.get(b as usize).copied()
    }

    pub fn id(self) -> u8 {
        self as u8
    }

    /// Phases with no running fill/dosing timer and no open process line.
    /// Only these are written to the persistence slot.
    pub fn is_checkpoint(self) -> bool {
        matches!(
            self,
            Self::Initial | Self::WaitingChem1 | Self::WaitingChem2 | Self::WaitingInProcess
        )
    }

    pub fn is_timed(self) -> bool {
        matches!(self, Self::PreFill | Self::Filling | Self::Chem1 | Self::Chem2)
    }

    /// Output vector applied on entry.
    pub fn outputs(self) -> TankOutputs {
        let off = TankOutputs::ALL_OFF;
        match self {
            Self::PreFill => TankOutputs {
                ingress_valve: true,
                ..off
            },
            Self::Filling => TankOutputs {
                fill_pump: true,
                ..off
            },
            Self::Chem1 | Self::Chem2 => TankOutputs {
                recirc_pump: true,
                ..off
            },
            Self::InProcess => TankOutputs {
                process_valve: true,
                ..off
            },
            Self::Initial | Self::WaitingChem1 | Self::WaitingChem2 | Self::WaitingInProcess => off,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Initial => "INITIAL",
            Self::PreFill => "PRE_FILL",
            Self::Filling => "FILLING",
            Self::WaitingChem1 => "WAITING_CHEM_1",
            Self::Chem1 => "CHEM_1",
            Self::WaitingChem2 => "WAITING_CHEM_2",
            Self::Chem2 => "CHEM_2",
            Self::WaitingInProcess => "WAITING_IN_PROCESS",
            Self::InProcess => "IN_PROCESS",
        }
    }

    /// Operator-facing label; the panel has always shown the last waiting
    /// phase as "in use".
    pub fn label(self) -> &'static str {
        match self {
            Self::WaitingInProcess => "WAITING_IN_USE",
            Self::InProcess => "IN_USE",
            other => other.name(),
        }
    }
}

impl fmt::Display for TankPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Commanded state of every output a tank cycle drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TankOutputs {
    pub ingress_valve: bool,
    pub fill_pump: bool,
    pub recirc_pump: bool,
    pub process_valve: bool,
}

impl TankOutputs {
    pub const ALL_OFF: Self = Self {
        ingress_valve: false,
        fill_pump: false,
        recirc_pump: false,
        process_valve: false,
    };
}

// ---------------------------------------------------------------------------
// Gate phases
// ---------------------------------------------------------------------------

/// Shared water-source gate ("aqueduct") phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GatePhase {
    Stopped,
    Filling,
    FillingPump,
}

impl GatePhase {
    pub const ALL: [GatePhase; 3] = [Self::Stopped, Self::Filling, Self::FillingPump];

    /// `(ingress valve, pump)` applied on entry.
    pub fn outputs(self) -> GateOutputs {
        match self {
            Self::Stopped => GateOutputs {
                valve: false,
                pump: false,
            },
            Self::Filling => GateOutputs {
                valve: true,
                pump: false,
            },
            Self::FillingPump => GateOutputs {
                valve: true,
                pump: true,
            },
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Stopped => "STOPPED",
            Self::Filling => "FILLING",
            Self::FillingPump => "FILLING_PUMP",
        }
    }
}

impl fmt::Display for GatePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GateOutputs {
    pub valve: bool,
    pub pump: bool,
}

// ---------------------------------------------------------------------------
// Event outcome
// ---------------------------------------------------------------------------

/// Result of delivering an operator event to a cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOutcome<P> {
    /// The event was legal and moved the cycle.
    Applied { from: P, to: P },
    /// The event is not legal in `phase`; nothing changed.
    Ignored { phase: P },
    /// The event is legal but the resource it needs is held elsewhere.
    Blocked { phase: P },
}

impl<P> EventOutcome<P> {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied { .. })
    }
}
