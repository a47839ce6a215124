use std::sync::{Arc, OnceLock};

/// Receives the log output of indykit in the host application.
///
/// Exported via `UniFFI` so Swift and Kotlin code can route boundary logs
/// (issued calls, completions, dangling completions) into their own logging.
///
/// # Examples
///
/// ```rust
/// use indykit::{LogLevel, Logger};
///
/// struct StderrLogger;
///
/// impl Logger for StderrLogger {
///     fn log(&self, level: LogLevel, target: String, message: String) {
///         eprintln!("[{level:?}] {target}: {message}");
///     }
/// }
/// ```
///
/// ## Kotlin
///
/// ```kotlin
/// object IndykitLogger : Logger {
///     override fun log(level: LogLevel, target: String, message: String) {
///         Log.println(level.toPriority(), "indykit", "$target: $message")
///     }
/// }
///
/// setLogger(IndykitLogger, LogLevel.INFO) // once, at startup
/// ```
#[uniffi::export(with_foreign)]
pub trait Logger: Sync + Send {
    /// Records one message.
    ///
    /// * `level` - Severity of the message.
    /// * `target` - Module that produced it, e.g. `indykit_core::pending`.
    /// * `message` - The formatted message.
    fn log(&self, level: LogLevel, target: String, message: String);
}

/// Severity of a log message, most verbose first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, uniffi::Enum)]
pub enum LogLevel {
    /// Handle allocation and resolution.
    Trace,
    /// Issued calls and completions.
    Debug,
    /// Plugin registration, correlator installation and shutdown.
    Info,
    /// Timeouts and absorbed late completions.
    Warn,
    /// Dangling completions and failed registrations.
    Error,
}

impl From<log::Level> for LogLevel {
    fn from(level: log::Level) -> Self {
        match level {
            log::Level::Error => Self::Error,
            log::Level::Warn => Self::Warn,
            log::Level::Info => Self::Info,
            log::Level::Debug => Self::Debug,
            log::Level::Trace => Self::Trace,
        }
    }
}

impl From<LogLevel> for log::LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => Self::Error,
            LogLevel::Warn => Self::Warn,
            LogLevel::Info => Self::Info,
            LogLevel::Debug => Self::Debug,
            LogLevel::Trace => Self::Trace,
        }
    }
}

/// Bridges the `log` facade to the foreign [`Logger`].
struct ForeignLogger;

impl ForeignLogger {
    /// Debug and trace output of dependencies is dropped; only indykit's
    /// own crates are verbose.
    fn forwards(metadata: &log::Metadata) -> bool {
        metadata.level() <= log::Level::Info || metadata.target().starts_with("indykit")
    }
}

impl log::Log for ForeignLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        Self::forwards(metadata)
    }

    fn log(&self, record: &log::Record) {
        if !Self::forwards(record.metadata()) {
            return;
        }
        if let Some(logger) = LOGGER_INSTANCE.get() {
            logger.log(
                record.level().into(),
                record.target().to_string(),
                record.args().to_string(),
            );
        }
    }

    fn flush(&self) {}
}

static LOGGER_INSTANCE: OnceLock<Arc<dyn Logger>> = OnceLock::new();

/// Installs `logger` as the destination of all indykit log output, at
/// `max_level` and above.
///
/// Only the first logger is kept; later calls only adjust `max_level`.
#[uniffi::export]
pub fn set_logger(logger: Arc<dyn Logger>, max_level: LogLevel) {
    if LOGGER_INSTANCE.set(logger).is_err() {
        eprintln!("indykit logger already set");
    }

    static LOGGER: ForeignLogger = ForeignLogger;
    if let Err(e) = log::set_logger(&LOGGER) {
        // another `log` implementation owns the process; keep it
        if LOGGER_INSTANCE.get().is_none() {
            eprintln!("failed to set indykit logger: {e}");
        }
    }
    log::set_max_level(max_level.into());
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Captured(Mutex<Vec<(LogLevel, String, String)>>);

    impl Logger for Captured {
        fn log(&self, level: LogLevel, target: String, message: String) {
            self.0.lock().unwrap().push((level, target, message));
        }
    }

    #[test]
    fn test_levels_convert_both_ways() {
        assert_eq!(LogLevel::from(log::Level::Warn), LogLevel::Warn);
        assert_eq!(log::LevelFilter::from(LogLevel::Trace), log::LevelFilter::Trace);
        assert!(LogLevel::Trace < LogLevel::Error);
    }

    #[test]
    fn test_forwards_indykit_records_to_foreign_logger() {
        let captured = Arc::new(Captured::default());
        set_logger(captured.clone(), LogLevel::Debug);

        log::debug!(target: "indykit_core::pending", "open_wallet issued");
        log::debug!(target: "hyper::proto", "dropped");
        log::warn!(target: "hyper::proto", "kept");

        let records = captured.0.lock().unwrap();
        assert_eq!(
            *records,
            vec![
                (
                    LogLevel::Debug,
                    "indykit_core::pending".to_string(),
                    "open_wallet issued".to_string()
                ),
                (LogLevel::Warn, "hyper::proto".to_string(), "kept".to_string()),
            ]
        );
    }
}
