#![deny(missing_docs)]
//! Shared logging utilities for the applier workspace.
//!
//! All crates log through the `applier_*` macros below so the backend stays a
//! single choice made by the binary. Tests install a terminal logger with
//! [`initialize_for_tests`].

pub use log::LevelFilter;

/// Logs a trace-level message using the global logging facade.
#[macro_export]
macro_rules! applier_trace {
    ($($arg:tt)*) => {{
        log::trace!(target: "applier", $($arg)*);
    }};
}

/// Logs a debug-level message using the global logging facade.
#[macro_export]
macro_rules! applier_debug {
    ($($arg:tt)*) => {{
        log::debug!(target: "applier", $($arg)*);
    }};
}

/// Logs an info-level message using the global logging facade.
#[macro_export]
macro_rules! applier_info {
    ($($arg:tt)*) => {{
        log::info!(target: "applier", $($arg)*);
    }};
}

/// Logs a warn-level message using the global logging facade.
#[macro_export]
macro_rules! applier_warn {
    ($($arg:tt)*) => {{
        log::warn!(target: "applier", $($arg)*);
    }};
}

/// Logs an error-level message using the global logging facade.
#[macro_export]
macro_rules! applier_error {
    ($($arg:tt)*) => {{
        log::error!(target: "applier", $($arg)*);
    }};
}

/// Parses a level name such as `"info"` or `"DEBUG"`.
///
/// Unknown names fall back to `Info`.
pub fn parse_level(name: &str) -> LevelFilter {
    name.trim().parse().unwrap_or(LevelFilter::Info)
}

/// Initializes a simple terminal logger for use in tests.
///
/// This safely no-ops if another logger has already been initialized.
pub fn initialize_for_tests() {
    use simplelog::{ColorChoice, CombinedLogger, Config, TermLogger, TerminalMode};

    let level = if cfg!(debug_assertions) {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    // Another test may have won the race to install the logger.
    let _ = CombinedLogger::init(vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Never,
    )]);
}
