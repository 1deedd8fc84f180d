//! Logger handle owned by an experiment.

use std::fmt;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::dispatcher::{self, Dispatch};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{fmt as tracing_fmt, Layer, Registry};

use super::console::ConsoleTarget;
use super::format::{ExperimentFormat, LogLevel};
use crate::errors::Result;

/// Builder for a [`LoggerHandle`].
#[derive(Debug, Clone)]
pub struct LoggerBuilder {
    name: String,
    log_path: PathBuf,
    file_level: LogLevel,
    console_level: LogLevel,
    console: ConsoleTarget,
}

impl LoggerBuilder {
    /// Creates a builder with the default levels (file: debug, console: info).
    #[must_use]
    pub fn new(name: impl Into<String>, log_path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            log_path: log_path.into(),
            file_level: LogLevel::Debug,
            console_level: LogLevel::Info,
            console: ConsoleTarget::default(),
        }
    }

    /// Sets the file sink level.
    #[must_use]
    pub const fn file_level(mut self, level: LogLevel) -> Self {
        self.file_level = level;
        self
    }

    /// Sets the console sink level.
    #[must_use]
    pub const fn console_level(mut self, level: LogLevel) -> Self {
        self.console_level = level;
        self
    }

    /// Sets the console target.
    #[must_use]
    pub fn console(mut self, console: ConsoleTarget) -> Self {
        self.console = console;
        self
    }

    /// Opens the log file in append mode and wires both sinks.
    pub fn attach(self) -> Result<LoggerHandle> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)?;

        let format = ExperimentFormat::new(&self.name);
        // Both sinks are plain text; field names must not carry escapes.
        let file_layer = tracing_fmt::layer()
            .with_ansi(false)
            .event_format(format.clone())
            .with_writer(Arc::new(file))
            .with_filter(self.file_level.as_level_filter());
        let console_layer = tracing_fmt::layer()
            .with_ansi(false)
            .event_format(format)
            .with_writer(self.console.make_writer())
            .with_filter(self.console_level.as_level_filter());

        let subscriber = Registry::default().with(file_layer).with(console_layer);

        Ok(LoggerHandle {
            name: Arc::from(self.name.as_str()),
            log_path: self.log_path,
            dispatch: Dispatch::new(subscriber),
        })
    }
}

/// A named logger with a file sink and a console sink.
///
/// Cloning is cheap; clones write to the same sinks.
#[derive(Clone)]
pub struct LoggerHandle {
    name: Arc<str>,
    log_path: PathBuf,
    dispatch: Dispatch,
}

impl LoggerHandle {
    /// Creates a builder.
    #[must_use]
    pub fn builder(name: impl Into<String>, log_path: impl Into<PathBuf>) -> LoggerBuilder {
        LoggerBuilder::new(name, log_path)
    }

    /// Returns the logger name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the path of the file sink.
    #[must_use]
    pub fn log_path(&self) -> &Path {
        &self.log_path
    }

    /// Runs `f` with this logger as the default `tracing` dispatcher.
    ///
    /// Any `tracing` macro invoked inside `f` is written to this
    /// experiment's sinks.
    pub fn in_scope<T>(&self, f: impl FnOnce() -> T) -> T {
        dispatcher::with_default(&self.dispatch, f)
    }

    /// Logs at debug level.
    pub fn debug(&self, message: impl fmt::Display) {
        self.in_scope(|| tracing::debug!("{}", message));
    }

    /// Logs at info level.
    pub fn info(&self, message: impl fmt::Display) {
        self.in_scope(|| tracing::info!("{}", message));
    }

    /// Logs at warning level.
    pub fn warning(&self, message: impl fmt::Display) {
        self.in_scope(|| tracing::warn!("{}", message));
    }

    /// Logs at error level.
    pub fn error(&self, message: impl fmt::Display) {
        self.in_scope(|| tracing::error!("{}", message));
    }
}

impl fmt::Debug for LoggerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoggerHandle")
            .field("name", &self.name)
            .field("log_path", &self.log_path)
            .finish_non_exhaustive()
    }
}
