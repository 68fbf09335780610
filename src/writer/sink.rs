//! Append-only stores that receive framed chunks.

use std::fmt;
use std::io::{Result, Write};

pub use chunked::ChunkedSink;
pub use lazy::LazySink;

mod chunked;
mod lazy;

pub trait ChunkSink {
    /// Must be called before each `write_header` + `write_bytes` pair.
    /// Guarantees `min_length` contiguous bytes; `length` is the size of the
    /// whole record and only a sizing hint.
    fn ensure_available(&mut self, min_length: usize, length: usize);
    /// Writes a 3-byte little-endian chunk header.
    fn write_header(&mut self, header: u32);
    fn write_bytes(&mut self, bytes: &[u8]);
    fn size(&self) -> usize;
    fn retained_size(&self) -> usize;
    fn reset(&mut self);
    /// Copies everything written so far to `out`, returning the byte count.
    fn write_to<W: Write>(&self, out: &mut W) -> Result<usize>;
}

pub enum Sink {
    Chunked(ChunkedSink),
    Lazy(LazySink),
}

impl ChunkSink for Sink {
    fn ensure_available(&mut self, min_length: usize, length: usize) {
        match self {
            Sink::Chunked(x) => x.ensure_available(min_length, length),
            Sink::Lazy(x) => x.ensure_available(min_length, length),
        }
    }

    fn write_header(&mut self, header: u32) {
        match self {
            Sink::Chunked(x) => x.write_header(header),
            Sink::Lazy(x) => x.write_header(header),
        }
    }

    fn write_bytes(&mut self, bytes: &[u8]) {
        match self {
            Sink::Chunked(x) => x.write_bytes(bytes),
            Sink::Lazy(x) => x.write_bytes(bytes),
        }
    }

    fn size(&self) -> usize {
        match self {
            Sink::Chunked(x) => x.size(),
            Sink::Lazy(x) => x.size(),
        }
    }

    fn retained_size(&self) -> usize {
        match self {
            Sink::Chunked(x) => x.retained_size(),
            Sink::Lazy(x) => x.retained_size(),
        }
    }

    fn reset(&mut self) {
        match self {
            Sink::Chunked(x) => x.reset(),
            Sink::Lazy(x) => x.reset(),
        }
    }

    fn write_to<W: Write>(&self, out: &mut W) -> Result<usize> {
        match self {
            Sink::Chunked(x) => x.write_to(out),
            Sink::Lazy(x) => x.write_to(out),
        }
    }
}

impl fmt::Debug for Sink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sink::Chunked(x) => x.fmt(f),
            Sink::Lazy(x) => x.fmt(f),
        }
    }
}

fn available(chunk: &[u8], capacity: usize) -> usize {
    capacity - chunk.len()
}

fn header_bytes(header: u32) -> [u8; 3] {
    use byteorder::{ByteOrder, LittleEndian};
    let mut buf = [0; 3];
    LittleEndian::write_u24(&mut buf, header);
    buf
}
