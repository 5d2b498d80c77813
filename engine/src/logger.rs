use std::fmt;
use std::sync::{Mutex, OnceLock};

use chrono::Local;
use ringbuffer::{AllocRingBuffer, RingBuffer};

/// Number of entries kept in memory for `recent_entries`.
pub const LOG_HISTORY_SIZE: usize = 100;

static LOGGER: OnceLock<Logger> = OnceLock::new();

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone)]
pub struct LogEntry {
    pub level: LogLevel,
    pub message: String,
    pub timestamp_ms: i64,
}

pub struct Logger {
    prefix: Option<String>,
    min_level: LogLevel,
    history: Mutex<AllocRingBuffer<LogEntry>>,
}

impl Logger {
    fn new(prefix: Option<String>, min_level: LogLevel) -> Self {
        Self {
            prefix,
            min_level,
            history: Mutex::new(AllocRingBuffer::new(LOG_HISTORY_SIZE)),
        }
    }

    pub fn log(&self, level: LogLevel, file: &str, line: u32, message: &str) {
        if level < self.min_level {
            return;
        }

        let now = Local::now();
        let timestamp = now.format("%Y-%m-%d %H:%M:%S");
        let file_name = file.rsplit(['/', '\\']).next().unwrap_or(file);
        if let Some(ref prefix) = self.prefix {
            println!("[{}][{}][{}][{}:{}] {}", timestamp, prefix, level, file_name, line, message);
        } else {
            println!("[{}][{}][{}:{}] {}", timestamp, level, file_name, line, message);
        }

        // A poisoned history only loses the in-memory copy; the line is already printed.
        if let Ok(mut history) = self.history.lock() {
            history.enqueue(LogEntry {
                level,
                message: message.to_string(),
                timestamp_ms: now.timestamp_millis(),
            });
        }
    }

    pub fn recent_entries(&self) -> Vec<LogEntry> {
        match self.history.lock() {
            Ok(history) => history.iter().cloned().collect(),
            Err(_) => Vec::new(),
        }
    }

    pub fn clear_history(&self) {
        if let Ok(mut history) = self.history.lock() {
            history.clear();
        }
    }
}

pub fn init_logger(prefix: Option<String>, min_level: LogLevel) {
    LOGGER.get_or_init(|| Logger::new(prefix, min_level));
}

pub fn is_initialized() -> bool {
    LOGGER.get().is_some()
}

/// Writes a line if the logger was initialised; otherwise does nothing.
pub fn log(level: LogLevel, file: &str, line: u32, message: &str) {
    if let Some(logger) = LOGGER.get() {
        logger.log(level, file, line, message);
    }
}

pub fn recent_entries() -> Vec<LogEntry> {
    LOGGER.get().map(Logger::recent_entries).unwrap_or_default()
}

pub fn clear_history() {
    if let Some(logger) = LOGGER.get() {
        logger.clear_history();
    }
}

#[macro_export]
macro_rules! log {
    ($($arg:tt)*) => {
        $crate::logger::log($crate::logger::LogLevel::Info, file!(), line!(), &format!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {
        $crate::logger::log($crate::logger::LogLevel::Debug, file!(), line!(), &format!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        $crate::logger::log($crate::logger::LogLevel::Warn, file!(), line!(), &format!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {
        $crate::logger::log($crate::logger::LogLevel::Error, file!(), line!(), &format!($($arg)*))
    };
}
