//! Leveled stderr logging for the host pipeline.
//!
//! Worker threads report failures locally (spec: no error value crosses a
//! thread boundary), so the log sink has to be safe to hit from any thread.
//! Writes go through a locked stderr handle so lines from different workers
//! never interleave.
//!
//! # Environment variables
//!
//! - `AXP_LOG_LEVEL` - off, error, warn, info, debug (default: info)
//! - `AXP_FLUSH_LOG=1` - flush stderr after every line

use std::io::Write;
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};

/// Log levels, lowest to highest verbosity.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Off = 0,
    Error = 1,
    Warn = 2,
    Info = 3,
    Debug = 4,
}

impl LogLevel {
    fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "off" | "0" => Some(LogLevel::Off),
            "error" | "1" => Some(LogLevel::Error),
            "warn" | "2" => Some(LogLevel::Warn),
            "info" | "3" => Some(LogLevel::Info),
            "debug" | "4" => Some(LogLevel::Debug),
            _ => None,
        }
    }

    fn tag(self) -> &'static str {
        match self {
            LogLevel::Off => "",
            LogLevel::Error => "[ERROR]",
            LogLevel::Warn => "[WARN] ",
            LogLevel::Info => "[INFO] ",
            LogLevel::Debug => "[DEBUG]",
        }
    }
}

static LEVEL: AtomicU8 = AtomicU8::new(LogLevel::Info as u8);
static FLUSH: AtomicBool = AtomicBool::new(false);
static INIT: AtomicBool = AtomicBool::new(false);

/// Read `AXP_LOG_LEVEL` / `AXP_FLUSH_LOG`. Runs once; later calls return
/// immediately, so it is safe to call from every macro expansion.
pub fn init() {
    if INIT.swap(true, Ordering::SeqCst) {
        return;
    }
    if let Ok(val) = std::env::var("AXP_LOG_LEVEL") {
        if let Some(level) = LogLevel::parse(&val) {
            LEVEL.store(level as u8, Ordering::Relaxed);
        }
    }
    if let Ok(val) = std::env::var("AXP_FLUSH_LOG") {
        let on = matches!(val.as_str(), "1" | "true" | "yes" | "on");
        FLUSH.store(on, Ordering::Relaxed);
    }
}

/// Override the level programmatically (wins over the environment).
pub fn set_level(level: LogLevel) {
    init();
    LEVEL.store(level as u8, Ordering::Relaxed);
}

#[inline]
pub fn enabled(level: LogLevel) -> bool {
    level as u8 <= LEVEL.load(Ordering::Relaxed)
}

#[doc(hidden)]
pub fn _log(level: LogLevel, args: std::fmt::Arguments<'_>) {
    init();
    if !enabled(level) {
        return;
    }
    let stderr = std::io::stderr();
    let mut out = stderr.lock();
    let _ = write!(out, "{} ", level.tag());
    let _ = out.write_fmt(args);
    let _ = out.write_all(b"\n");
    if FLUSH.load(Ordering::Relaxed) {
        let _ = out.flush();
    }
}

/// Error level log
#[macro_export]
macro_rules! herror {
    ($($arg:tt)*) => {{
        $crate::hlog::_log($crate::hlog::LogLevel::Error, format_args!($($arg)*));
    }};
}

/// Warning level log
#[macro_export]
macro_rules! hwarn {
    ($($arg:tt)*) => {{
        $crate::hlog::_log($crate::hlog::LogLevel::Warn, format_args!($($arg)*));
    }};
}

/// Info level log
#[macro_export]
macro_rules! hinfo {
    ($($arg:tt)*) => {{
        $crate::hlog::_log($crate::hlog::LogLevel::Info, format_args!($($arg)*));
    }};
}

/// Debug level log
#[macro_export]
macro_rules! hdebug {
    ($($arg:tt)*) => {{
        $crate::hlog::_log($crate::hlog::LogLevel::Debug, format_args!($($arg)*));
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_parse() {
        assert_eq!(LogLevel::parse("debug"), Some(LogLevel::Debug));
        assert_eq!(LogLevel::parse("WARN"), Some(LogLevel::Warn));
        assert_eq!(LogLevel::parse("0"), Some(LogLevel::Off));
        assert_eq!(LogLevel::parse("nope"), None);
    }

    #[test]
    fn test_level_ordering() {
        assert!(LogLevel::Error < LogLevel::Debug);
        assert!(LogLevel::Off < LogLevel::Error);
    }
}
