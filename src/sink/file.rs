//! Size-rotated file sink.

use super::{Sink, SinkError, backup_and_reopen, create_parent_dirs, open_append};
use std::io::{self, Write};
use std::path::PathBuf;

/// File sink that rotates once accumulated bytes reach a threshold.
///
/// Rotation renames the current file to `<path>.bak.<YYMMDDhhmmss>` and
/// reopens a fresh file at the original path. A threshold below 1 disables
/// rotation.
pub struct SizeFileSink {
    file: Option<std::fs::File>,
    path: PathBuf,
    max_size: u64,
    cur_size: u64,
}

impl SizeFileSink {
    /// Opens (or creates) the log file in append mode, creating parent
    /// directories as needed.
    ///
    /// # Errors
    /// Returns an error if the directory tree cannot be created or the file
    /// cannot be opened.
    pub fn new(path: impl Into<PathBuf>, max_size: i64) -> Result<Self, SinkError> {
        let path = path.into();
        create_parent_dirs(&path)?;
        let file = open_append(&path)?;
        let cur_size = file.metadata()?.len();
        let max_size = if max_size < 1 {
            u64::MAX
        } else {
            max_size.unsigned_abs()
        };
        Ok(Self {
            file: Some(file),
            path,
            max_size,
            cur_size,
        })
    }

    /// Accumulated bytes since the last rotation.
    #[must_use]
    pub const fn current_size(&self) -> u64 {
        self.cur_size
    }

    fn rotate_if_needed(&mut self) {
        if self.cur_size < self.max_size {
            return;
        }
        // Re-check against the file's real size: an external truncation may
        // have invalidated the accumulated count.
        if let Some(file) = self.file.as_ref() {
            match file.metadata() {
                Ok(meta) if meta.len() < self.max_size => {
                    self.cur_size = meta.len();
                    return;
                }
                Ok(_) => {}
                Err(_) => return,
            }
        }
        self.file = None;
        match backup_and_reopen(&self.path) {
            Some(file) => {
                self.cur_size = file.metadata().map_or(0, |m| m.len());
                self.file = Some(file);
            }
            None => self.cur_size = 0,
        }
    }
}

impl Sink for SizeFileSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.rotate_if_needed();
        let Some(file) = self.file.as_mut() else {
            return Err(io::Error::other("log file unavailable after rotation"));
        };
        let n = file.write(buf)?;
        self.cur_size += n as u64;
        Ok(n)
    }

    fn close(&mut self) -> io::Result<()> {
        if let Some(file) = self.file.take() {
            file.sync_all()?;
        }
        Ok(())
    }
}
