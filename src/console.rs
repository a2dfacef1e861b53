//! Plain-text operator console.
//!
//! One command per line, matched case-insensitively after trimming:
//!
//! | Line                       | Command                           |
//! |----------------------------|-----------------------------------|
//! | `next a` / `next b`        | tank `next`                       |
//! | `cancel a` / `cancel b`    | tank `cancel`                     |
//! | `fill finish a`            | tank `fill_finish`                |
//! | `fnext a` / `fprev a`      | tank force next / previous stage  |
//! | `aq valve on` / `off`      | gate valve                        |
//! | `aq pump on` / `off`       | gate pump                         |
//! | `aq sensor hi`             | gate high-level                   |
//! | `status`                   | log a status snapshot now         |
//! | `level a\|b\|aq hi\|lo`    | drive a simulated level switch    |
//!
//! Lines arrive from a reader thread through a bounded `embassy-sync`
//! channel.  The control loop drains it with [`poll`] between ticks and
//! never waits on it.

use core::fmt;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;

use crate::app::commands::{RigCommand, TankId};
use crate::fsm::{GateEvent, TankEvent};

/// Longest accepted line, in bytes.
pub const MAX_LINE: usize = 64;

/// A console line buffer.
pub type Line = heapless::String<MAX_LINE>;

/// Lines the reader may queue ahead of the control loop.
const LINE_DEPTH: usize = 8;

/// Reader thread → control loop.
static LINES: Channel<CriticalSectionRawMutex, Line, LINE_DEPTH> = Channel::new();

/// Queue a raw line for the control loop.  Never blocks.
pub fn submit(line: &str) -> Result<(), ConsoleError> {
    let line = line.trim_end_matches(['\r', '\n']);
    let mut buf = Line::new();
    buf.push_str(line).map_err(|_| ConsoleError::TooLong)?;
    LINES.try_send(buf).map_err(|_| ConsoleError::Backlog)
}

/// Next queued line, if any.
pub fn poll() -> Option<Line> {
    LINES.try_receive().ok()
}

/// Which level switch a `level` command drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelTarget {
    Tank(TankId),
    Aqueduct,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleCommand {
    Rig(RigCommand),
    Status,
    /// Simulator only.
    SetLevel { target: LevelTarget, high: bool },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleError {
    /// Blank line.
    Empty,
    /// Not in the command vocabulary.
    Unknown,
    /// Longer than [`MAX_LINE`] bytes.
    TooLong,
    /// The control loop has not drained earlier lines yet.
    Backlog,
}

impl fmt::Display for ConsoleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "empty line"),
            Self::Unknown => write!(f, "unknown command"),
            Self::TooLong => write!(f, "line longer than {MAX_LINE} bytes"),
            Self::Backlog => write!(f, "console backlog full"),
        }
    }
}

impl std::error::Error for ConsoleError {}

/// Parse one operator line.
pub fn parse(line: &str) -> Result<ConsoleCommand, ConsoleError> {
    if line.len() > MAX_LINE {
        return Err(ConsoleError::TooLong);
    }

    let mut lower = Line::new();
    for c in line.trim().chars() {
        for l in c.to_lowercase() {
            lower.push(l).map_err(|_| ConsoleError::TooLong)?;
        }
    }

    let mut words = heapless::Vec::<&str, 4>::new();
    for w in lower.split_whitespace() {
        words.push(w).map_err(|_| ConsoleError::Unknown)?;
    }

    use ConsoleCommand::{Rig, SetLevel, Status};

    let cmd = match words.as_slice() {
        [] => return Err(ConsoleError::Empty),
        ["status"] => Status,
        ["next", t] => tank_cmd(t, TankEvent::Next)?,
        ["cancel", t] => tank_cmd(t, TankEvent::Cancel)?,
        ["fill", "finish", t] => tank_cmd(t, TankEvent::FillFinish)?,
        ["fnext", t] => tank_cmd(t, TankEvent::ForceNext)?,
        ["fprev", t] => tank_cmd(t, TankEvent::ForcePrev)?,
        ["aq", "valve", "on"] => Rig(RigCommand::Gate(GateEvent::ValveOn)),
        ["aq", "valve", "off"] => Rig(RigCommand::Gate(GateEvent::ValveOff)),
        ["aq", "pump", "on"] => Rig(RigCommand::Gate(GateEvent::PumpOn)),
        ["aq", "pump", "off"] => Rig(RigCommand::Gate(GateEvent::PumpOff)),
        ["aq", "sensor", "hi"] => Rig(RigCommand::Gate(GateEvent::SensorHi)),
        ["level", target, state] => SetLevel {
            target: match *target {
                "aq" => LevelTarget::Aqueduct,
                t => LevelTarget::Tank(tank_id(t)?),
            },
            high: match *state {
                "hi" => true,
                "lo" => false,
                _ => return Err(ConsoleError::Unknown),
            },
        },
        _ => return Err(ConsoleError::Unknown),
    };
    Ok(cmd)
}

fn tank_id(word: &str) -> Result<TankId, ConsoleError> {
    match word {
        "a" => Ok(TankId::A),
        "b" => Ok(TankId::B),
        _ => Err(ConsoleError::Unknown),
    }
}

fn tank_cmd(word: &str, event: TankEvent) -> Result<ConsoleCommand, ConsoleError> {
    Ok(ConsoleCommand::Rig(RigCommand::Tank(tank_id(word)?, event)))
}
