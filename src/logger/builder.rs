//! Logger builder.

use super::Logger;
use crate::flag::{Flag, FlagSet};
use crate::level::LevelSet;
use crate::sink::{CronFileSink, Scheduler, Sink, SinkError, SizeFileSink, StreamSink};
use crate::tag::TagRegistry;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

/// Builder for configuring a logger.
///
/// Defaults: all levels enabled, timestamp and level tag shown, the
/// process-wide tag registry, and a stderr stream sink.
pub struct LoggerBuilder {
    levels: LevelSet,
    flags: FlagSet,
    tags: Arc<TagRegistry>,
    sink: Option<Box<dyn Sink>>,
}

impl LoggerBuilder {
    /// Creates a new logger builder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            levels: LevelSet::ALL,
            flags: Flag::ShowTime | Flag::ShowLevelTag,
            tags: Arc::clone(TagRegistry::global()),
            sink: None,
        }
    }

    /// Sets the enabled levels.
    #[must_use]
    pub const fn levels(mut self, levels: LevelSet) -> Self {
        self.levels = levels;
        self
    }

    /// Sets the active decoration flags.
    #[must_use]
    pub const fn flags(mut self, flags: FlagSet) -> Self {
        self.flags = flags;
        self
    }

    /// Uses an isolated tag registry instead of the process-wide one.
    #[must_use]
    pub fn tag_registry(mut self, tags: Arc<TagRegistry>) -> Self {
        self.tags = tags;
        self
    }

    /// Sets the backing sink.
    #[must_use]
    pub fn sink(mut self, sink: impl Sink + 'static) -> Self {
        self.sink = Some(Box::new(sink));
        self
    }

    /// Writes to an already-open stream. The stream stays owned by the
    /// caller's side of the process; `close` only flushes it.
    #[must_use]
    pub fn stream(self, writer: impl Write + Send + 'static) -> Self {
        self.sink(StreamSink::new(writer))
    }

    /// Starts configuring a size-rotated file sink at `path`.
    #[must_use]
    pub fn file(self, path: impl Into<PathBuf>) -> FileSinkBuilder {
        FileSinkBuilder {
            parent: self,
            path: path.into(),
            max_size: 0,
        }
    }

    /// Writes to a file rotated on a schedule. The rotation job is handed
    /// to `scheduler` under the given spec string.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or the scheduler
    /// rejects the spec.
    pub fn cron(
        self,
        path: impl Into<PathBuf>,
        spec: &str,
        scheduler: &dyn Scheduler,
    ) -> Result<Self, SinkError> {
        let sink = CronFileSink::new(path, spec, scheduler)?;
        Ok(self.sink(sink))
    }

    /// Builds the logger, defaulting to a stderr sink when none was set.
    #[must_use]
    pub fn build(self) -> Logger {
        let sink = self
            .sink
            .unwrap_or_else(|| Box::new(StreamSink::stderr()));
        Logger::assemble(sink, self.flags, self.levels, self.tags)
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Sub-builder for a size-rotated file sink.
pub struct FileSinkBuilder {
    parent: LoggerBuilder,
    path: PathBuf,
    max_size: i64,
}

impl FileSinkBuilder {
    /// Sets the rotation threshold in bytes. Values below 1 disable
    /// rotation; the default is unbounded.
    #[must_use]
    pub const fn max_size(mut self, bytes: i64) -> Self {
        self.max_size = bytes;
        self
    }

    /// Opens the file and returns to the logger builder.
    ///
    /// # Errors
    ///
    /// Returns an error if the parent directories cannot be created or
    /// the file cannot be opened for appending.
    pub fn done(self) -> Result<LoggerBuilder, SinkError> {
        let sink = SizeFileSink::new(self.path, self.max_size)?;
        Ok(self.parent.sink(sink))
    }
}
