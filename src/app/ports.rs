//! Port traits: the hexagonal boundary between the rig logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ TankCycle / GateCycle / RigService
//! ```
//!
//! Driven adapters (relays, level switches, event sinks, storage) implement
//! these traits.  The state machines consume them via generics, so the
//! control logic never touches hardware directly.
//!
//! ## Notes
//!
//! - **Output** / **Input** are infallible at this boundary.  Adapters that
//!   can fail (e.g. an I2C expander) log the failure and keep the last
//!   known state; the cycle logic never sees a hardware error.
//! - **PersistSlot** holds exactly one byte per tank.  Only a complete
//!   single-byte write is assumed to be atomic.
//! - All storage/config errors are typed; callers handle every variant.

use crate::config::RigConfig;

// ───────────────────────────────────────────────────────────────
// Actuator port (domain → hardware)
// ───────────────────────────────────────────────────────────────

/// A settable boolean output: relay, solenoid valve, pump contactor.
pub trait Output {
    /// Drive the output on (`true`) or off (`false`).
    fn set(&mut self, on: bool);

    /// The state this output was last commanded to.
    fn is_set(&self) -> bool;
}

// ───────────────────────────────────────────────────────────────
// Sensor port (hardware → domain)
// ───────────────────────────────────────────────────────────────

/// A readable boolean input, sampled once per edge-detector update.
pub trait Input {
    fn read(&mut self) -> bool;
}

// ───────────────────────────────────────────────────────────────
// Persistence port (domain ↔ non-volatile byte)
// ───────────────────────────────────────────────────────────────

/// One non-volatile byte, used for the tank's crash-recovery checkpoint.
pub trait PersistSlot {
    fn save(&mut self, value: u8) -> Result<(), StorageError>;

    fn read(&mut self) -> Result<u8, StorageError>;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (domain → logging / display)
// ───────────────────────────────────────────────────────────────

/// The coordinator emits structured [`RigEvent`](super::events::RigEvent)s
/// through this port.  Adapters decide where they go (serial log, display,
/// test recorder).
pub trait EventSink {
    fn emit(&mut self, event: &super::events::RigEvent);
}

// ───────────────────────────────────────────────────────────────
// Configuration port (domain ↔ persistent config)
// ───────────────────────────────────────────────────────────────

/// Loads and persists rig configuration.
///
/// Implementations MUST validate before persisting.  Out-of-range timer
/// settings are rejected with [`ConfigError::ValidationFailed`], never
/// clamped: a zero-length fill failsafe would defeat overflow protection.
pub trait ConfigPort {
    /// Load configuration from persistent storage.
    /// Returns [`RigConfig::default()`] if no stored config exists.
    fn load(&self) -> Result<RigConfig, ConfigError>;

    /// Validate and persist configuration.
    fn save(&self, config: &RigConfig) -> Result<(), ConfigError>;
}

// ───────────────────────────────────────────────────────────────
// Storage port (domain ↔ NVS / EEPROM / file)
// ───────────────────────────────────────────────────────────────

/// Persistent key-value storage.  Keys are namespaced to prevent
/// collisions between subsystems.
pub trait StoragePort {
    /// Read a value.  Returns the number of bytes written to `buf`.
    fn read(&self, namespace: &str, key: &str, buf: &mut [u8]) -> Result<usize, StorageError>;

    /// Write a value.
    fn write(&mut self, namespace: &str, key: &str, data: &[u8]) -> Result<(), StorageError>;

    /// Delete a key.  Returns `Ok(())` even if the key didn't exist.
    fn delete(&mut self, namespace: &str, key: &str) -> Result<(), StorageError>;

    /// Check whether a key exists without reading it.
    fn exists(&self, namespace: &str, key: &str) -> bool;
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from [`ConfigPort`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// No config found in storage (first boot).
    NotFound,
    /// Stored config failed deserialization.
    Corrupted,
    /// A config field failed range validation.
    ValidationFailed(&'static str),
    /// Generic I/O error from the storage backend.
    IoError,
}

/// Errors from [`StoragePort`] and [`PersistSlot`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageError {
    /// Requested key does not exist.
    NotFound,
    /// Storage is full.
    Full,
    /// Generic I/O error.
    IoError,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NotFound => write!(f, "config not found"),
            Self::Corrupted => write!(f, "config corrupted"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}

impl core::fmt::Display for StorageError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NotFound => write!(f, "key not found"),
            Self::Full => write!(f, "storage full"),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}

impl std::error::Error for ConfigError {}
impl std::error::Error for StorageError {}
