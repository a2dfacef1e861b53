//! Rig configuration parameters
//!
//! All tunable parameters for the treatment rig.
//! Values can be overridden via NVS (non-volatile storage) or the command line.

use serde::{Deserialize, Serialize};

/// Where a tank goes once the CHEM_2 timer runs out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Chem2Completion {
    /// Back to WAITING_CHEM_2, as the field units have always behaved.
    /// The operator must force the stage forward.
    ReturnToWaitingChem2,
    /// On to WAITING_IN_PROCESS, mirroring how CHEM_1 completes.
    AdvanceToWaitingInProcess,
}

/// Core rig configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RigConfig {
    // --- Tank phase timers ---
    /// Ingress valve open time before the fill pump starts (seconds)
    pub pre_fill_secs: u32,
    /// Fill failsafe: longest fill before forcing WAITING_CHEM_1 (seconds)
    pub fill_failsafe_secs: u32,
    /// First chemical recirculation time (seconds)
    pub chem1_secs: u32,
    /// Second chemical recirculation time (seconds)
    pub chem2_secs: u32,

    // --- Cycle behaviour ---
    /// Transition taken when the CHEM_2 timer expires
    pub chem2_completion: Chem2Completion,
    /// Enables the lock-guarded IN_PROCESS phase on the shared process line
    pub process_line_enabled: bool,

    // --- Timing ---
    /// Coordinator loop period (milliseconds)
    pub tick_interval_ms: u32,
    /// Status log period (milliseconds)
    pub status_interval_ms: u32,
    /// Heartbeat LED toggle period (milliseconds)
    pub heartbeat_interval_ms: u32,
}

impl Default for RigConfig {
    fn default() -> Self {
        Self {
            // Tank phase timers
            pre_fill_secs: 3,
            fill_failsafe_secs: 27 * 60,
            chem1_secs: 40 * 60,
            chem2_secs: 5 * 60,

            // Cycle behaviour
            chem2_completion: Chem2Completion::ReturnToWaitingChem2,
            process_line_enabled: false,

            // Timing
            tick_interval_ms: 10,        // 100 Hz
            status_interval_ms: 1000,    // 1 Hz
            heartbeat_interval_ms: 1000, // 1 Hz
        }
    }
}

impl RigConfig {
    /// The subset of settings a single tank cycle needs.
    pub fn tank_settings(&self) -> TankSettings {
        TankSettings {
            pre_fill_secs: self.pre_fill_secs,
            fill_failsafe_secs: self.fill_failsafe_secs,
            chem1_secs: self.chem1_secs,
            chem2_secs: self.chem2_secs,
            chem2_completion: self.chem2_completion,
            process_line_enabled: self.process_line_enabled,
        }
    }
}

/// Per-tank view of [`RigConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TankSettings {
    pub pre_fill_secs: u32,
    pub fill_failsafe_secs: u32,
    pub chem1_secs: u32,
    pub chem2_secs: u32,
    pub chem2_completion: Chem2Completion,
    pub process_line_enabled: bool,
}

impl Default for TankSettings {
    fn default() -> Self {
        RigConfig::default().tank_settings()
    }
}
