//! Core domain model for experiment runs.
//!
//! This module contains the leaves both contexts build on:
//! - the run directory layout and name validation
//! - argument persistence
//! - the run manifest
//! - lifecycle state and experiment kind enums
//! - the `Experiment` handle itself

mod args;
mod experiment;
mod finite;
mod layout;
mod manifest;
mod state;

pub use args::{encode_args, load_args, persist_args, PersistedArgs};
pub use experiment::{Experiment, SNAPSHOT_EXCLUDES};
pub use layout::{validate_name, RunLayout, ARGS_FILE, CODE_DIR, DATA_DIR, MANIFEST_FILE};
pub use manifest::RunManifest;
pub use state::{ContextState, ExperimentKind};
