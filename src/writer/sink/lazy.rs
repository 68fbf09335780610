use std::cmp;
use std::fmt;
use std::io::{Result, Write};
use std::mem;

use super::{available, header_bytes, ChunkSink};

/// Allocates nothing until the first write, then sizes each new chunk to the
/// record being written. Suited to streams that often stay empty.
#[derive(Default)]
pub struct LazySink {
    chunks: Vec<Vec<u8>>,
    size: usize,
}

impl LazySink {
    pub fn new() -> Self {
        Self::default()
    }

    fn available(&self) -> usize {
        self.chunks
            .last()
            .map(|c| available(c, c.capacity()))
            .unwrap_or(0)
    }

    fn append(&mut self, bytes: &[u8]) {
        if let Some(last) = self.chunks.last_mut() {
            last.extend_from_slice(bytes);
            self.size += bytes.len();
        }
    }
}

impl ChunkSink for LazySink {
    fn ensure_available(&mut self, min_length: usize, length: usize) {
        if self.available() < min_length {
            self.chunks.push(Vec::with_capacity(cmp::max(min_length, length)));
        }
    }

    fn write_header(&mut self, header: u32) {
        debug_assert!(self.available() >= 3);
        self.append(&header_bytes(header));
    }

    fn write_bytes(&mut self, mut bytes: &[u8]) {
        while !bytes.is_empty() {
            if self.available() == 0 {
                self.chunks.push(Vec::with_capacity(bytes.len()));
            }
            let n = cmp::min(self.available(), bytes.len());
            self.append(&bytes[..n]);
            bytes = &bytes[n..];
        }
    }

    fn size(&self) -> usize {
        self.size
    }

    fn retained_size(&self) -> usize {
        mem::size_of::<Self>() + self.chunks.iter().map(|c| c.capacity()).sum::<usize>()
    }

    fn reset(&mut self) {
        self.chunks = Vec::new();
        self.size = 0;
    }

    fn write_to<W: Write>(&self, out: &mut W) -> Result<usize> {
        for chunk in &self.chunks {
            out.write_all(chunk)?;
        }
        Ok(self.size)
    }
}

impl fmt::Debug for LazySink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazySink")
            .field("size", &self.size)
            .field("chunks", &self.chunks.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nothing_allocated_until_written() {
        let sink = LazySink::new();
        assert_eq!(sink.size(), 0);
        assert_eq!(sink.retained_size(), mem::size_of::<LazySink>());
        let mut out = Vec::new();
        assert_eq!(sink.write_to(&mut out).unwrap(), 0);
    }

    #[test]
    fn test_records_are_sized_exactly() {
        let mut sink = LazySink::new();
        sink.ensure_available(3, 7);
        sink.write_header(4 << 1);
        sink.write_bytes(&[1, 2, 3, 4]);
        sink.ensure_available(1, 5);
        sink.write_bytes(&[5; 5]);
        assert_eq!(sink.chunks.len(), 2);
        assert_eq!(sink.size(), 12);

        let mut out = Vec::new();
        assert_eq!(sink.write_to(&mut out).unwrap(), 12);
        assert_eq!(out, vec![8, 0, 0, 1, 2, 3, 4, 5, 5, 5, 5, 5]);

        sink.reset();
        assert_eq!(sink.size(), 0);
        assert!(sink.chunks.is_empty());
    }
}
