//! Fuzz target: `console::parse`
//!
//! Feeds arbitrary UTF-8 lines to the operator console parser and asserts
//! that it never panics and that blank input is reported as empty.
//!
//! cargo fuzz run fuzz_console_parser

#![no_main]

use libfuzzer_sys::fuzz_target;
use tankrig::console::{self, ConsoleError, MAX_LINE};

fuzz_target!(|data: &[u8]| {
    let Ok(line) = core::str::from_utf8(data) else {
        return;
    };

    match console::parse(line) {
        Ok(_) => assert!(line.len() <= MAX_LINE, "accepted an over-long line"),
        Err(ConsoleError::Empty) => assert!(line.trim().is_empty()),
        Err(_) => {}
    }
});
