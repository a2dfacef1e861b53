//! Sensor drivers.

pub mod level;

pub use level::LevelSwitch;
