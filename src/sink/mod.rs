//! Output sinks: where formatted records land.

mod cron;
mod file;
mod stream;

pub use cron::CronFileSink;
pub use file::SizeFileSink;
pub use stream::StreamSink;

use chrono::Local;
use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::Path;

/// An append-only destination for formatted records.
///
/// Anything implementing this can back a logger: the built-in stream and
/// rotating file sinks, or an external adapter (network shipper, database
/// logger). Calls are serialized by the owning logger's write lock.
pub trait Sink: Send {
    /// Appends one complete record.
    ///
    /// # Errors
    /// Returns an error if the underlying I/O fails.
    fn write(&mut self, buf: &[u8]) -> io::Result<usize>;

    /// Releases the sink's resources.
    ///
    /// # Errors
    /// Returns an error if the underlying close fails.
    fn close(&mut self) -> io::Result<()>;
}

/// Error type for sink construction.
#[derive(Debug)]
pub enum SinkError {
    /// I/O error creating directories or opening the file.
    Io(io::Error),
    /// The scheduler rejected the rotation schedule.
    Schedule(String),
}

impl std::fmt::Display for SinkError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Schedule(s) => write!(f, "schedule error: {s}"),
        }
    }
}

impl std::error::Error for SinkError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Schedule(_) => None,
        }
    }
}

impl From<io::Error> for SinkError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

/// Schedule collaborator for cron-rotated sinks.
///
/// An implementation accepts a cron-style expression and a zero-argument
/// callback, and invokes the callback at each matching time in its own
/// execution context until the process exits.
pub trait Scheduler {
    /// Registers `job` to run on the given schedule.
    ///
    /// # Errors
    /// Returns an error if the expression is rejected.
    fn schedule(
        &self,
        spec: &str,
        job: Box<dyn Fn() + Send + Sync + 'static>,
    ) -> Result<(), SinkError>;
}

/// Suffix timestamp layout for rotated files, compact `YYMMDDhhmmss`.
const BACKUP_STAMP: &str = "%y%m%d%H%M%S";

fn open_append(path: &Path) -> io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}

fn create_parent_dirs(path: &Path) -> io::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}

/// Renames `path` to `<path>.bak.<stamp>` and reopens a fresh file there.
///
/// Best-effort: a failed rename leaves the old file in place, a failed
/// reopen returns `None` and subsequent writes fail at the I/O layer.
fn backup_and_reopen(path: &Path) -> Option<File> {
    let stamp = Local::now().format(BACKUP_STAMP);
    let backup = format!("{}.bak.{stamp}", path.display());
    let _ = fs::rename(path, backup);
    open_append(path).ok()
}
