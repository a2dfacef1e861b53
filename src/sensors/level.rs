//! Float / capacitive high-level switches.
//!
//! Each tank has one switch near the brim, and the aqueduct has one on the
//! shared header.  They are digital: HIGH when water reaches the probe.
//! Wiring with the switch pulling the line low is handled by
//! [`LevelSwitch::inverted`].

use embedded_hal::digital::InputPin;
use log::warn;

use crate::app::ports::Input;

pub struct LevelSwitch<P: InputPin> {
    name: &'static str,
    pin: P,
    inverted: bool,
    last: bool,
}

impl<P: InputPin> LevelSwitch<P> {
    pub fn new(name: &'static str, pin: P) -> Self {
        Self {
            name,
            pin,
            inverted: false,
            last: false,
        }
    }

    pub fn inverted(name: &'static str, pin: P) -> Self {
        Self {
            inverted: true,
            ..Self::new(name, pin)
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl<P: InputPin> Input for LevelSwitch<P> {
    /// A failed read keeps the previous sample, so a flaky line can never
    /// fabricate an edge.
    fn read(&mut self) -> bool {
        match self.pin.is_high() {
            Ok(high) => self.last = high != self.inverted,
            Err(e) => warn!("{}: read failed, holding {}: {:?}", self.name, self.last, e),
        }
        self.last
    }
}
