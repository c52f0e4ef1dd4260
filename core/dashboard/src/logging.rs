//! FILENAME: core/dashboard/src/logging.rs
// PURPOSE: Unified logging for the dashboard pipelines.
//
// Every line carries a global sequence number and a category so that
// interleaved async refreshes can be reconstructed in order:
//
//     seq|level|category|message
//
// Lines go through the `log` facade with the category as target; the host
// application installs the backend and filters per category.

use std::sync::atomic::{AtomicU64, Ordering};

/// Global sequence counter
static LOG_SEQ: AtomicU64 = AtomicU64::new(0);

/// Get next sequence number
pub fn next_seq() -> u64 {
    LOG_SEQ.fetch_add(1, Ordering::SeqCst) + 1
}

/// Map the one-letter level used in log lines to a `log::Level`.
pub fn level_from_code(level: &str) -> log::Level {
    match level {
        "E" => log::Level::Error,
        "W" => log::Level::Warn,
        "I" => log::Level::Info,
        "T" => log::Level::Trace,
        _ => log::Level::Debug,
    }
}

/// Format a log line in unified format
pub fn format_line(seq: u64, level: &str, category: &str, message: &str) -> String {
    format!("{}|{}|{}|{}", seq, level, category, message)
}

/// Write a log line in unified format
pub fn write_log(level: &str, category: &str, message: &str) {
    let lvl = level_from_code(level);
    if !log::log_enabled!(target: category, lvl) {
        return;
    }
    let line = format_line(next_seq(), level, category, message);
    log::log!(target: category, lvl, "{}", line);
}

/// Write an ENTER log line for function entry
pub fn write_log_enter(level: &str, category: &str, func_name: &str, params: &str) {
    let message = if params.is_empty() {
        format!("ENTER {}", func_name)
    } else {
        format!("ENTER {} {}", func_name, params)
    };
    write_log(level, category, &message);
}

/// Write an EXIT log line for function exit
pub fn write_log_exit(level: &str, category: &str, func_name: &str, result: &str) {
    let message = if result.is_empty() {
        format!("EXIT {}", func_name)
    } else {
        format!("EXIT {} {}", func_name, result)
    };
    write_log(level, category, &message);
}

// ============================================================================
// MACRO DEFINITIONS & EXPORTS
// ============================================================================

#[macro_export]
macro_rules! log_debug {
    ($cat:expr, $($arg:tt)*) => {
        $crate::logging::write_log("D", $cat, &format!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_info {
    ($cat:expr, $($arg:tt)*) => {
        $crate::logging::write_log("I", $cat, &format!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_warn {
    ($cat:expr, $($arg:tt)*) => {
        $crate::logging::write_log("W", $cat, &format!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_error {
    ($cat:expr, $($arg:tt)*) => {
        $crate::logging::write_log("E", $cat, &format!($($arg)*))
    };
}

// ENTER/EXIT macros for function tracing

#[macro_export]
macro_rules! log_enter {
    ($cat:expr, $func:expr) => {
        $crate::logging::write_log_enter("D", $cat, $func, "")
    };
    ($cat:expr, $func:expr, $($arg:tt)*) => {
        $crate::logging::write_log_enter("D", $cat, $func, &format!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_exit {
    ($cat:expr, $func:expr) => {
        $crate::logging::write_log_exit("D", $cat, $func, "")
    };
    ($cat:expr, $func:expr, $($arg:tt)*) => {
        $crate::logging::write_log_exit("D", $cat, $func, &format!($($arg)*))
    };
}
