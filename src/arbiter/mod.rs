//! Arbitration of physical resources that more than one cycle may request.
//!
//! | Primitive            | Resource                  | Policy                         |
//! |----------------------|---------------------------|--------------------------------|
//! | [`SharedActuator`]   | fill pump relay           | OR of independent requests     |
//! | [`ExclusivityLock`]  | downstream process line   | single holder, try-acquire     |

pub mod lock;
pub mod shared;

pub use lock::{ExclusivityLock, LockError, LockToken};
pub use shared::{SharedActuator, SharedRequester, Side};
