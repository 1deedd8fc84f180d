//! Console sink targets.

use parking_lot::Mutex;
use std::io;
use std::sync::Arc;
use tracing_subscriber::fmt::writer::BoxMakeWriter;

/// A cloneable in-memory byte sink.
///
/// All clones share one buffer, so a clone handed to a logger can be read
/// back from the original.
#[derive(Debug, Clone, Default)]
pub struct SharedBuffer {
    inner: Arc<Mutex<Vec<u8>>>,
}

impl SharedBuffer {
    /// Creates an empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the buffered bytes as text.
    #[must_use]
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.inner.lock()).into_owned()
    }

    /// Returns the buffered text split into lines.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(String::from).collect()
    }

    /// Returns true if nothing has been written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    /// Discards the buffered bytes.
    pub fn clear(&self) {
        self.inner.lock().clear();
    }
}

impl io::Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Where the console sink writes.
#[derive(Debug, Clone, Default)]
pub enum ConsoleTarget {
    /// Standard error.
    #[default]
    Stderr,
    /// Standard output.
    Stdout,
    /// An in-memory buffer.
    Buffer(SharedBuffer),
    /// Nothing is written.
    Discard,
}

impl ConsoleTarget {
    /// Builds a fresh writer factory for one logger.
    pub(crate) fn make_writer(&self) -> BoxMakeWriter {
        match self {
            Self::Stderr => BoxMakeWriter::new(io::stderr),
            Self::Stdout => BoxMakeWriter::new(io::stdout),
            Self::Buffer(buffer) => {
                let buffer = buffer.clone();
                BoxMakeWriter::new(move || buffer.clone())
            }
            Self::Discard => BoxMakeWriter::new(io::sink),
        }
    }
}

impl From<SharedBuffer> for ConsoleTarget {
    fn from(buffer: SharedBuffer) -> Self {
        Self::Buffer(buffer)
    }
}
