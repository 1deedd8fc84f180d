//! Operator confirmation.
//!
//! Contexts never read the terminal directly; they ask a [`Confirm`]
//! capability. Interactive runs use [`TerminalConfirm`], automated callers
//! pass [`AutoConfirm`] or a scripted stand-in.

mod prompt;

pub use prompt::{parse_answer, AutoConfirm, PromptConfirm, TerminalConfirm};

use crate::errors::Result;

/// A yes/no decision taken by an operator.
#[cfg_attr(test, mockall::automock)]
pub trait Confirm {
    /// Shows `prompt` and blocks until an answer is given.
    ///
    /// Returns `Ok(false)` if the operator declined.
    fn confirm(&self, prompt: &str) -> Result<bool>;
}

impl<T: Confirm + ?Sized> Confirm for Box<T> {
    fn confirm(&self, prompt: &str) -> Result<bool> {
        (**self).confirm(prompt)
    }
}

impl<T: Confirm + ?Sized> Confirm for std::sync::Arc<T> {
    fn confirm(&self, prompt: &str) -> Result<bool> {
        (**self).confirm(prompt)
    }
}
