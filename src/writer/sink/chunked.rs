use std::cmp;
use std::collections::VecDeque;
use std::fmt;
use std::io::{Result, Write};
use std::mem;

use tracing::debug;

use super::{available, header_bytes, ChunkSink};

/// Eager sink: allocates its first chunk up front and grows by adding chunks
/// whose sizes double from `min_chunk_size` up to `max_chunk_size`. Written
/// bytes are never moved once appended.
pub struct ChunkedSink {
    min_chunk_size: usize,
    max_chunk_size: usize,
    reuse_chunks: bool,
    closed: Vec<Vec<u8>>,
    closed_size: usize,
    current: Vec<u8>,
    // Allocations kept across `reset`, in the order they were first used.
    spare: VecDeque<Vec<u8>>,
    next_chunk_size: usize,
}

impl ChunkedSink {
    pub fn new(min_chunk_size: usize, max_chunk_size: usize, reuse_chunks: bool) -> Self {
        assert!(min_chunk_size >= 3, "min chunk size must hold a chunk header");
        assert!(min_chunk_size <= max_chunk_size);
        ChunkedSink {
            min_chunk_size,
            max_chunk_size,
            reuse_chunks,
            closed: Vec::new(),
            closed_size: 0,
            current: Vec::with_capacity(min_chunk_size),
            spare: VecDeque::new(),
            next_chunk_size: cmp::min(min_chunk_size * 2, max_chunk_size),
        }
    }

    fn available(&self) -> usize {
        available(&self.current, self.current.capacity())
    }

    fn open_chunk(&mut self, min_length: usize, length: usize) {
        let size = cmp::max(
            min_length,
            cmp::min(cmp::max(self.next_chunk_size, length), self.max_chunk_size),
        );
        let next = match self.spare.front() {
            Some(chunk) if chunk.capacity() >= min_length => self.spare.pop_front(),
            _ => None,
        };
        let next = next.unwrap_or_else(|| Vec::with_capacity(size));
        let full = mem::replace(&mut self.current, next);
        if !full.is_empty() {
            self.closed_size += full.len();
            self.closed.push(full);
        }
        self.next_chunk_size = cmp::min(self.next_chunk_size * 2, self.max_chunk_size);
    }
}

impl ChunkSink for ChunkedSink {
    fn ensure_available(&mut self, min_length: usize, length: usize) {
        if self.available() < min_length {
            self.open_chunk(min_length, length);
        }
    }

    fn write_header(&mut self, header: u32) {
        debug_assert!(self.available() >= 3);
        self.current.extend_from_slice(&header_bytes(header));
    }

    fn write_bytes(&mut self, mut bytes: &[u8]) {
        while !bytes.is_empty() {
            if self.available() == 0 {
                self.open_chunk(1, bytes.len());
            }
            let n = cmp::min(self.available(), bytes.len());
            self.current.extend_from_slice(&bytes[..n]);
            bytes = &bytes[n..];
        }
    }

    fn size(&self) -> usize {
        self.closed_size + self.current.len()
    }

    fn retained_size(&self) -> usize {
        mem::size_of::<Self>()
            + self.current.capacity()
            + self.closed.iter().map(|c| c.capacity()).sum::<usize>()
            + self.spare.iter().map(|c| c.capacity()).sum::<usize>()
    }

    fn reset(&mut self) {
        if self.reuse_chunks {
            let mut spare: VecDeque<Vec<u8>> = self.closed.drain(..).collect();
            spare.push_back(mem::replace(&mut self.current, Vec::new()));
            spare.extend(self.spare.drain(..));
            for chunk in spare.iter_mut() {
                chunk.clear();
            }
            self.current = spare
                .pop_front()
                .unwrap_or_else(|| Vec::with_capacity(self.min_chunk_size));
            self.spare = spare;
        } else {
            self.closed = Vec::new();
            self.spare = VecDeque::new();
            self.current = Vec::with_capacity(self.min_chunk_size);
        }
        self.closed_size = 0;
        self.next_chunk_size = cmp::min(self.min_chunk_size * 2, self.max_chunk_size);
        debug!(retained = self.retained_size(), reuse = self.reuse_chunks, "chunked sink reset");
    }

    fn write_to<W: Write>(&self, out: &mut W) -> Result<usize> {
        for chunk in &self.closed {
            out.write_all(chunk)?;
        }
        out.write_all(&self.current)?;
        Ok(self.size())
    }
}

impl fmt::Debug for ChunkedSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChunkedSink")
            .field("size", &self.size())
            .field("chunks", &(self.closed.len() + 1))
            .field("retained", &self.retained_size())
            .finish()
    }
}
