//! Confirmation implementations.

use parking_lot::Mutex;
use std::io::{self, BufRead, Write};

use super::Confirm;
use crate::errors::Result;

/// Interprets an operator answer.
///
/// An empty line, `y` or `yes` (any case) confirms; anything else declines.
#[must_use]
pub fn parse_answer(line: &str) -> bool {
    matches!(
        line.trim().to_ascii_lowercase().as_str(),
        "" | "y" | "yes"
    )
}

/// Prompts on standard error and reads the answer from standard input.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalConfirm;

impl Confirm for TerminalConfirm {
    fn confirm(&self, prompt: &str) -> Result<bool> {
        let mut stderr = io::stderr().lock();
        write!(stderr, "{prompt} [Y/n] ")?;
        stderr.flush()?;

        let mut line = String::new();
        let read = io::stdin().lock().read_line(&mut line)?;
        // End of input counts as a refusal.
        Ok(read > 0 && parse_answer(&line))
    }
}

/// Prompts on an arbitrary writer and reads answers from an arbitrary reader.
#[derive(Debug)]
pub struct PromptConfirm<R, W> {
    io: Mutex<(R, W)>,
}

impl<R: BufRead, W: Write> PromptConfirm<R, W> {
    /// Creates a prompt over the given reader and writer.
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            io: Mutex::new((reader, writer)),
        }
    }

    /// Returns the reader and writer.
    pub fn into_inner(self) -> (R, W) {
        self.io.into_inner()
    }
}

impl<R: BufRead, W: Write> Confirm for PromptConfirm<R, W> {
    fn confirm(&self, prompt: &str) -> Result<bool> {
        let mut io = self.io.lock();
        let (reader, writer) = &mut *io;
        writeln!(writer, "{prompt} [Y/n]")?;
        writer.flush()?;

        let mut line = String::new();
        let read = reader.read_line(&mut line)?;
        Ok(read > 0 && parse_answer(&line))
    }
}

/// Answers every prompt with a fixed decision.
#[derive(Debug, Clone, Copy)]
pub struct AutoConfirm {
    answer: bool,
}

impl AutoConfirm {
    /// Confirms every prompt.
    #[must_use]
    pub const fn yes() -> Self {
        Self { answer: true }
    }

    /// Declines every prompt.
    #[must_use]
    pub const fn no() -> Self {
        Self { answer: false }
    }
}

impl Default for AutoConfirm {
    fn default() -> Self {
        Self::yes()
    }
}

impl Confirm for AutoConfirm {
    fn confirm(&self, prompt: &str) -> Result<bool> {
        tracing::debug!(prompt, answer = self.answer, "Answered confirmation automatically");
        Ok(self.answer)
    }
}
