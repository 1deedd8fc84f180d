//! Testing utilities for experiment contexts.
//!
//! This module provides:
//! - Scripted confirmation and a fake source tree
//! - A throwaway workspace wiring both contexts to a captured console

mod fixtures;
mod mocks;

pub use fixtures::TestWorkspace;
pub use mocks::{FakeSourceTree, ScriptedConfirm};
