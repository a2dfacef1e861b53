//! Rising/falling edge detection over a sampled boolean input.

use crate::app::ports::Input;

/// Two-sample edge detector.
///
/// [`update`](Self::update) must be called exactly once per tick before
/// any transition logic looks at the edges; without it the edges are
/// stale.
pub struct EdgeDetector<I: Input> {
    input: I,
    previous: bool,
    current: bool,
}

impl<I: Input> EdgeDetector<I> {
    pub fn new(input: I) -> Self {
        Self {
            input,
            previous: false,
            current: false,
        }
    }

    /// Shift current → previous and re-sample the input.
    pub fn update(&mut self) {
        self.previous = self.current;
        self.current = self.input.read();
    }

    pub fn rising_edge(&self) -> bool {
        self.changed() && self.current
    }

    pub fn falling_edge(&self) -> bool {
        self.changed() && !self.current
    }

    pub fn changed(&self) -> bool {
        self.previous != self.current
    }

    /// Most recent sample.
    pub fn value(&self) -> bool {
        self.current
    }
}
