//! # expctx
//!
//! Scoped experiment contexts for research runs.
//!
//! An experiment context creates a run directory, persists the run's
//! arguments, and attaches a logger before handing control to the caller:
//!
//! - **Persistent experiments**: named runs under the experiments root,
//!   refused unless the source tree is committed
//! - **Temporary experiments**: runs in a fresh scratch directory, gated by
//!   an operator confirmation
//! - **Run layout**: `data/` for args, manifest and log; `code/` for a
//!   snapshot of the source
//! - **Dual-sink logging**: a debug-level file sink and an info-level
//!   console sink sharing one format
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use expctx::prelude::*;
//! use serde_json::json;
//!
//! let context = PersistentExperimentContext::new(ExperimentConfig::default());
//! context.scope("lr_sweep", &json!({"lr": 0.01}), |experiment| {
//!     tracing::info!("writing results to {}", experiment.data_dir().display());
//!     Ok::<_, ExperimentError>(())
//! })?;
//! # Ok::<(), ExperimentError>(())
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod config;
pub mod confirm;
pub mod context;
pub mod core;
pub mod errors;
pub mod logging;
pub mod testing;
pub mod vcs;

pub use errors::{DirtyRepositoryError, ExperimentError, Result};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::ExperimentConfig;
    pub use crate::confirm::{AutoConfirm, Confirm, PromptConfirm, TerminalConfirm};
    pub use crate::context::{
        ExperimentGuard, PersistentExperimentContext, TemporaryExperimentContext,
    };
    pub use crate::core::{Experiment, ExperimentKind, RunLayout, RunManifest};
    pub use crate::errors::{DirtyRepositoryError, ExperimentError};
    pub use crate::logging::{ConsoleTarget, LogLevel, LoggerHandle, SharedBuffer};
    pub use crate::vcs::{GitWorkTree, SourceTree, TreeStatus};
}
