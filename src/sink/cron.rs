//! Schedule-rotated file sink.

use super::{Scheduler, Sink, SinkError, backup_and_reopen, create_parent_dirs, open_append};
use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};

struct CronFile {
    file: Option<File>,
    path: PathBuf,
}

impl CronFile {
    // Rotation and writes share this state's lock, so no writer can land in
    // a file mid-rename.
    fn rotate(&mut self) {
        self.file = None;
        self.file = backup_and_reopen(&self.path);
    }
}

/// File sink rotated on a cron-like schedule rather than by write volume.
///
/// The rotation routine is registered with the provided [`Scheduler`] as a
/// zero-argument callback; writes are otherwise plain appends.
pub struct CronFileSink {
    state: Arc<Mutex<CronFile>>,
}

impl CronFileSink {
    /// Opens (or creates) the log file and registers rotation with the
    /// scheduler under `spec`.
    ///
    /// # Errors
    /// Returns an error if the directory tree cannot be created, the file
    /// cannot be opened, or the scheduler rejects the expression.
    pub fn new(
        path: impl Into<PathBuf>,
        spec: &str,
        scheduler: &dyn Scheduler,
    ) -> Result<Self, SinkError> {
        let path = path.into();
        create_parent_dirs(&path)?;
        let file = open_append(&path)?;
        let state = Arc::new(Mutex::new(CronFile {
            file: Some(file),
            path,
        }));

        let job_state = Arc::clone(&state);
        scheduler.schedule(
            spec,
            Box::new(move || {
                job_state
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .rotate();
            }),
        )?;

        Ok(Self { state })
    }
}

impl Sink for CronFileSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut state = self
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let Some(file) = state.file.as_mut() else {
            return Err(io::Error::other("log file unavailable after rotation"));
        };
        file.write(buf)
    }

    fn close(&mut self) -> io::Result<()> {
        let mut state = self
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(file) = state.file.take() {
            file.sync_all()?;
        }
        Ok(())
    }
}
