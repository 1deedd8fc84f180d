//! Line format shared by the file and console sinks.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Write as _};
use std::sync::Arc;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;

/// Timestamp layout: `2026-10-19 09:22:01,123`.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S,%3f";

/// Minimum severity accepted by a sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogLevel {
    /// Debug and above.
    Debug,
    /// Info and above.
    Info,
    /// Warnings and errors.
    Warning,
    /// Errors only.
    Error,
}

impl LogLevel {
    /// Converts to a `tracing` level filter.
    #[must_use]
    pub const fn as_level_filter(self) -> LevelFilter {
        match self {
            Self::Debug => LevelFilter::DEBUG,
            Self::Info => LevelFilter::INFO,
            Self::Warning => LevelFilter::WARN,
            Self::Error => LevelFilter::ERROR,
        }
    }
}

impl Default for LogLevel {
    fn default() -> Self {
        Self::Info
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Debug => write!(f, "DEBUG"),
            Self::Info => write!(f, "INFO"),
            Self::Warning => write!(f, "WARNING"),
            Self::Error => write!(f, "ERROR"),
        }
    }
}

/// Returns the printed name of a `tracing` level.
#[must_use]
pub fn level_name(level: &Level) -> &'static str {
    match level.as_str() {
        "WARN" => "WARNING",
        other => other,
    }
}

/// Event formatter producing `timestamp - name - level - message` lines.
///
/// The logger name is fixed at construction; event targets are ignored.
#[derive(Debug, Clone)]
pub struct ExperimentFormat {
    logger_name: Arc<str>,
}

impl ExperimentFormat {
    /// Creates a formatter for the given logger name.
    #[must_use]
    pub fn new(logger_name: &str) -> Self {
        Self {
            logger_name: Arc::from(logger_name),
        }
    }

    /// Returns the logger name.
    #[must_use]
    pub fn logger_name(&self) -> &str {
        &self.logger_name
    }

    /// Renders the line prefix preceding the message.
    #[must_use]
    pub fn prefix(&self, timestamp: &DateTime<Local>, level: &Level) -> String {
        format!(
            "{} - {} - {} - ",
            timestamp.format(TIMESTAMP_FORMAT),
            self.logger_name,
            level_name(level)
        )
    }
}

impl<S, N> FormatEvent<S, N> for ExperimentFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let prefix = self.prefix(&Local::now(), event.metadata().level());
        writer.write_str(&prefix)?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_level_names() {
        assert_eq!(level_name(&Level::DEBUG), "DEBUG");
        assert_eq!(level_name(&Level::INFO), "INFO");
        assert_eq!(level_name(&Level::WARN), "WARNING");
        assert_eq!(level_name(&Level::ERROR), "ERROR");
    }

    #[test]
    fn test_prefix_layout() {
        let format = ExperimentFormat::new("mnist_sweep");
        let ts = Local.with_ymd_and_hms(2026, 1, 14, 12, 6, 7).unwrap();
        assert_eq!(
            format.prefix(&ts, &Level::INFO),
            "2026-01-14 12:06:07,000 - mnist_sweep - INFO - "
        );
    }

    #[test]
    fn test_log_level_ordering_and_filters() {
        assert!(LogLevel::Debug < LogLevel::Info);
        assert!(LogLevel::Warning < LogLevel::Error);
        assert_eq!(LogLevel::Debug.as_level_filter(), LevelFilter::DEBUG);
        assert_eq!(LogLevel::Warning.as_level_filter(), LevelFilter::WARN);
        assert_eq!(LogLevel::Warning.to_string(), "WARNING");
    }

    #[test]
    fn test_log_level_serde() {
        let level: LogLevel = serde_json::from_str("\"error\"").unwrap();
        assert_eq!(level, LogLevel::Error);
        assert_eq!(serde_json::to_string(&LogLevel::Info).unwrap(), "\"info\"");
    }
}
