//! Unified error type for the rig outside the control core.
//!
//! The state machines themselves have no error paths; illegal events and
//! lock contention are reported as outcomes.  Everything that can fail at
//! the edges (storage, config, console input) funnels into [`Error`].
//! All variants are `Copy`.

use core::fmt;

use crate::app::ports::{ConfigError, StorageError};
use crate::arbiter::LockError;
use crate::console::ConsoleError;

/// Every fallible edge operation funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Configuration is invalid or could not be loaded.
    Config(ConfigError),
    /// The non-volatile store failed.
    Storage(StorageError),
    /// Process-line arbitration failed.
    Lock(LockError),
    /// An operator line could not be parsed.
    Console(ConsoleError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "config: {e}"),
            Self::Storage(e) => write!(f, "storage: {e}"),
            Self::Lock(e) => write!(f, "lock: {e}"),
            Self::Console(e) => write!(f, "console: {e}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<StorageError> for Error {
    fn from(e: StorageError) -> Self {
        Self::Storage(e)
    }
}

impl From<LockError> for Error {
    fn from(e: LockError) -> Self {
        Self::Lock(e)
    }
}

impl From<ConsoleError> for Error {
    fn from(e: ConsoleError) -> Self {
        Self::Console(e)
    }
}

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
