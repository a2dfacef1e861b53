//! Driven adapters: implementations of the [`ports`](crate::app::ports)
//! traits for the host and the panel controller.

pub mod log_sink;
pub mod nvs;
pub mod slot;
pub mod time;

pub use log_sink::LogEventSink;
pub use nvs::NvsAdapter;
pub use slot::NvsSlot;
pub use time::MonotonicClock;
