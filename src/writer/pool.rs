//! Scratch buffers for compression output, shared between the output buffers
//! of one writer.

use std::ops::{Deref, DerefMut};
use std::sync::Mutex;

pub trait BufferPool: Send + Sync {
    /// Returns a buffer at least `min_size` bytes long.
    fn check_out(&self, min_size: usize) -> Vec<u8>;
    fn check_in(&self, buffer: Vec<u8>);
}

/// Keeps only the most recently returned buffer. Column streams are
/// compressed one chunk at a time, so a single cached buffer covers the
/// common case without holding on to memory for every column.
#[derive(Default)]
pub struct LastUsedBufferPool {
    last_used: Mutex<Option<Vec<u8>>>,
}

impl LastUsedBufferPool {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BufferPool for LastUsedBufferPool {
    fn check_out(&self, min_size: usize) -> Vec<u8> {
        let cached = match self.last_used.lock() {
            Ok(mut guard) => guard.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        };
        match cached {
            Some(buffer) if buffer.len() >= min_size => buffer,
            _ => vec![0; min_size],
        }
    }

    fn check_in(&self, buffer: Vec<u8>) {
        match self.last_used.lock() {
            Ok(mut guard) => *guard = Some(buffer),
            Err(poisoned) => *poisoned.into_inner() = Some(buffer),
        }
    }
}

/// A buffer checked out of a pool; checked back in when dropped, on every
/// exit path.
pub(crate) struct PooledBuffer<'a> {
    pool: &'a dyn BufferPool,
    buffer: Option<Vec<u8>>,
}

impl<'a> PooledBuffer<'a> {
    pub(crate) fn check_out(pool: &'a dyn BufferPool, min_size: usize) -> Self {
        PooledBuffer {
            pool,
            buffer: Some(pool.check_out(min_size)),
        }
    }
}

impl<'a> Deref for PooledBuffer<'a> {
    type Target = [u8];
    fn deref(&self) -> &[u8] {
        self.buffer.as_deref().unwrap_or(&[])
    }
}

impl<'a> DerefMut for PooledBuffer<'a> {
    fn deref_mut(&mut self) -> &mut [u8] {
        self.buffer.as_deref_mut().unwrap_or(&mut [])
    }
}

impl<'a> Drop for PooledBuffer<'a> {
    fn drop(&mut self) {
        if let Some(buffer) = self.buffer.take() {
            self.pool.check_in(buffer);
        }
    }
}
