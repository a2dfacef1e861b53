//! Digital pin assignments for the rig controller board.
//!
//! Single source of truth: the simulator labels its pins from here and a
//! board bring-up uses the same numbers.  Change a pin here and it
//! propagates everywhere.

// ---------------------------------------------------------------------------
// Shared actuators
// ---------------------------------------------------------------------------

/// Fill pump contactor, shared by both tanks.
pub const FILL_PUMP: u8 = 3;

// ---------------------------------------------------------------------------
// Tank A
// ---------------------------------------------------------------------------

pub const TANK_A_RECIRC_PUMP: u8 = 4;
pub const TANK_A_INGRESS_VALVE: u8 = 5;
pub const TANK_A_PROCESS_VALVE: u8 = 6;
/// High-level switch, HIGH = water at the probe.
pub const TANK_A_LEVEL: u8 = 22;

// ---------------------------------------------------------------------------
// Tank B
// ---------------------------------------------------------------------------

pub const TANK_B_RECIRC_PUMP: u8 = 7;
pub const TANK_B_INGRESS_VALVE: u8 = 8;
pub const TANK_B_PROCESS_VALVE: u8 = 9;
pub const TANK_B_LEVEL: u8 = 23;

// ---------------------------------------------------------------------------
// Aqueduct gate
// ---------------------------------------------------------------------------

pub const AQUEDUCT_VALVE: u8 = 10;
pub const AQUEDUCT_PUMP: u8 = 11;
pub const AQUEDUCT_LEVEL: u8 = 24;

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// On-board LED, toggled as a heartbeat.
pub const HEARTBEAT_LED: u8 = 13;

/// Every assigned pin, for collision checks.
pub const ALL: [u8; 13] = [
    FILL_PUMP,
    TANK_A_RECIRC_PUMP,
    TANK_A_INGRESS_VALVE,
    TANK_A_PROCESS_VALVE,
    TANK_A_LEVEL,
    TANK_B_RECIRC_PUMP,
    TANK_B_INGRESS_VALVE,
    TANK_B_PROCESS_VALVE,
    TANK_B_LEVEL,
    AQUEDUCT_VALVE,
    AQUEDUCT_PUMP,
    AQUEDUCT_LEVEL,
    HEARTBEAT_LED,
];
