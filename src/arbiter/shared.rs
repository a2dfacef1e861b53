//! Many-to-one boolean combinator for a physically shared actuator.
//!
//! Two tank cycles drive one fill-pump relay.  Each gets its own
//! [`SharedRequester`], which behaves like any other [`Output`] from the
//! cycle's point of view.  The relay is energised while either request
//! is set:
//!
//! ```text
//!  tank A ──▶ SharedRequester(A) ──┐
//!                                  ├─ OR ──▶ fill pump relay
//!  tank B ──▶ SharedRequester(B) ──┘
//! ```

use core::cell::RefCell;
use std::rc::Rc;

use crate::app::ports::Output;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    A,
    B,
}

pub struct SharedActuator<O: Output> {
    request_a: bool,
    request_b: bool,
    output: O,
}

impl<O: Output> SharedActuator<O> {
    /// Wrap `output` and hand out the two requester handles.
    pub fn split(output: O) -> (SharedRequester<O>, SharedRequester<O>) {
        let shared = Rc::new(RefCell::new(Self {
            request_a: false,
            request_b: false,
            output,
        }));
        (
            SharedRequester {
                shared: Rc::clone(&shared),
                side: Side::A,
            },
            SharedRequester {
                shared,
                side: Side::B,
            },
        )
    }

    pub fn set_a(&mut self, on: bool) {
        self.request_a = on;
        self.update();
    }

    pub fn set_b(&mut self, on: bool) {
        self.request_b = on;
        self.update();
    }

    pub fn physical(&self) -> bool {
        self.output.is_set()
    }

    fn update(&mut self) {
        self.output.set(self.request_a || self.request_b);
    }
}

/// One side of a [`SharedActuator`].
///
/// `is_set` reports this side's own request; the OR'd relay state is
/// available through [`physical`](Self::physical).  The sibling's request
/// is never visible.
pub struct SharedRequester<O: Output> {
    shared: Rc<RefCell<SharedActuator<O>>>,
    side: Side,
}

impl<O: Output> SharedRequester<O> {
    pub fn side(&self) -> Side {
        self.side
    }

    pub fn physical(&self) -> bool {
        self.shared.borrow().physical()
    }
}

impl<O: Output> Output for SharedRequester<O> {
    fn set(&mut self, on: bool) {
        let mut shared = self.shared.borrow_mut();
        match self.side {
            Side::A => shared.set_a(on),
            Side::B => shared.set_b(on),
        }
    }

    fn is_set(&self) -> bool {
        let shared = self.shared.borrow();
        match self.side {
            Side::A => shared.request_a,
            Side::B => shared.request_b,
        }
    }
}
