//! Actuator drivers and host-side pins.

pub mod relay;
pub mod sim_pin;

pub use relay::Relay;
pub use sim_pin::SimPin;
