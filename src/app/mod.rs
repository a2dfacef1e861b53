//! Application core: the coordinator and its port boundary.
//!
//! This module contains the rig's orchestration rules.  All interaction
//! with hardware happens through **port traits** defined in [`ports`],
//! keeping this layer fully testable without real peripherals.

pub mod commands;
pub mod events;
pub mod ports;
pub mod service;
