//! Sink over an already-open writable stream.

use super::Sink;
use std::io::{self, Write};

/// Passthrough sink wrapping a writable stream.
///
/// The sink does not own the stream's lifecycle: `close` is a no-op, and the
/// boxed writer is only dropped with the sink itself.
pub struct StreamSink {
    inner: Box<dyn Write + Send>,
}

impl StreamSink {
    /// Wraps a writable stream.
    pub fn new(writer: impl Write + Send + 'static) -> Self {
        Self {
            inner: Box::new(writer),
        }
    }

    /// Sink over standard output.
    #[must_use]
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }

    /// Sink over standard error.
    #[must_use]
    pub fn stderr() -> Self {
        Self::new(io::stderr())
    }
}

impl Sink for StreamSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner.write(buf)
    }

    fn close(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}
