//! Logging infrastructure for the print shop configurator.
//!
//! Library crates emit `tracing` events only; binaries and test harnesses
//! install a subscriber through this crate:
//! - `init_logging` - Global subscriber from a [`LogConfig`]
//! - `init_test_logging` - Idempotent test-writer subscriber

mod logging;

pub use logging::*;
