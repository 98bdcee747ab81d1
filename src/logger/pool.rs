//! Reusable byte-buffer pool for the write path.
//!
//! The pool has its own lock, independent of the sink write lock: acquiring
//! a buffer never contends with an in-flight write. A checked-out buffer is
//! exclusively owned until it is returned.

use std::sync::{Mutex, PoisonError};

const BUFFER_CAPACITY: usize = 1024;
const MAX_POOLED: usize = 32;

pub(crate) struct BufferPool {
    free: Mutex<Vec<Vec<u8>>>,
}

impl BufferPool {
    pub(crate) const fn new() -> Self {
        Self {
            free: Mutex::new(Vec::new()),
        }
    }

    /// Returns an empty buffer, reusing capacity from a previous write when
    /// one is available.
    pub(crate) fn get(&self) -> Vec<u8> {
        let mut free = self
            .free
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        free.pop()
            .unwrap_or_else(|| Vec::with_capacity(BUFFER_CAPACITY))
    }

    pub(crate) fn put(&self, mut buf: Vec<u8>) {
        buf.clear();
        let mut free = self
            .free
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if free.len() < MAX_POOLED {
            free.push(buf);
        }
    }
}
