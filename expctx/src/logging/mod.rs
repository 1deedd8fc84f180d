//! Per-experiment logging.
//!
//! Each experiment owns a [`LoggerHandle`] wrapping its own `tracing`
//! dispatcher with two sinks:
//! - a file sink under the run's `data` directory (debug and above)
//! - a console sink (info and above)
//!
//! Both sinks share the `timestamp - name - level - message` line format.
//! There is no process-wide logger registry, so entering the same experiment
//! twice never duplicates sinks.

mod console;
mod format;
mod handle;

pub use console::{ConsoleTarget, SharedBuffer};
pub use format::{level_name, ExperimentFormat, LogLevel, TIMESTAMP_FORMAT};
pub use handle::{LoggerBuilder, LoggerHandle};
