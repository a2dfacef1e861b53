//! Relay / solenoid driver over an `embedded-hal` output pin.
//!
//! Valves and pump contactors are plain on/off loads.  The driver caches
//! the commanded state so [`Output::is_set`] never touches the bus.
//!
//! A failed pin write is logged at `error` and otherwise swallowed: the
//! cycle logic has no recovery path for a stuck relay, and the next entry
//! action will retry the write.

use embedded_hal::digital::{OutputPin, PinState};
use log::{debug, error};

use crate::app::ports::Output;

pub struct Relay<P: OutputPin> {
    name: &'static str,
    pin: P,
    on: bool,
    active_low: bool,
}

impl<P: OutputPin> Relay<P> {
    /// Active-high relay, driven off immediately.
    pub fn new(name: &'static str, pin: P) -> Self {
        Self::with_polarity(name, pin, false)
    }

    /// Relay module that energises on a low pin (most opto-isolated boards).
    pub fn active_low(name: &'static str, pin: P) -> Self {
        Self::with_polarity(name, pin, true)
    }

    fn with_polarity(name: &'static str, pin: P, active_low: bool) -> Self {
        let mut relay = Self {
            name,
            pin,
            on: false,
            active_low,
        };
        relay.write(false);
        relay
    }

    fn write(&mut self, on: bool) {
        let state = PinState::from(on != self.active_low);
        if let Err(e) = self.pin.set_state(state) {
            error!("{}: pin write failed: {:?}", self.name, e);
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl<P: OutputPin> Output for Relay<P> {
    fn set(&mut self, on: bool) {
        if on != self.on {
            debug!("{}: {}", self.name, if on { "ON" } else { "OFF" });
        }
        self.on = on;
        self.write(on);
    }

    fn is_set(&self) -> bool {
        self.on
    }
}
