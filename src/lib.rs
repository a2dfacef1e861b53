//! tankrig: two-tank water-treatment rig controller.
//!
//! Exposes the pure-logic modules (state machines, arbitration, the
//! coordinator service) for integration testing, plus the host adapters
//! the simulator binary wires together.  Nothing below `fsm` and
//! `arbiter` touches I/O directly; hardware enters through the
//! [`app::ports`] traits.

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod arbiter;
pub mod config;
pub mod console;
pub mod drivers;
pub mod fsm;
pub mod pins;
pub mod sensors;

mod error;

pub use error::{Error, Result};
