use std::cmp::{max, min};
use std::fmt;
use std::io::{self, Read, Write};
use std::mem;

use byteorder::{ByteOrder, LittleEndian};

use crate::buffer::Buffer;
use crate::error::Result;
use crate::writer::checkpoint::Checkpoint;
use crate::writer::compression::Compressor;
use crate::writer::encryption::Encryptor;
use crate::writer::framer::{ChunkFramer, HEADER_SIZE};
use crate::writer::sink::ChunkSink;
use crate::writer::Config;

const INITIAL_BUFFER_SIZE: usize = 256;

/// Output stream of one column. Bytes are staged in a region that doubles from
/// 256 bytes up to the max chunk size; every full (or flushed) region becomes
/// one chunk, framed and appended to the sink.
///
/// Not meant to be shared between threads: each column stream owns its buffer.
pub struct OutputBuffer {
    framer: ChunkFramer,
    max_chunk_size: usize,
    staging: Option<Buffer>,
    /// Offset of the staging region within the stream.
    offset: usize,
    /// Current position for writing in the staging region.
    position: usize,
}

impl OutputBuffer {
    pub fn new(config: &Config, encryptor: Option<Box<dyn Encryptor>>) -> Self {
        Self::with_compressor(config, config.compression.compressor(), encryptor)
    }

    /// Like `new`, but compresses with `compressor` instead of the codec named
    /// by the config.
    pub fn with_compressor(
        config: &Config,
        compressor: Option<Box<dyn Compressor>>,
        encryptor: Option<Box<dyn Encryptor>>,
    ) -> Self {
        // A compressed chunk plus its header must fit within max_buffer_size.
        let max_chunk_size = if compressor.is_some() {
            config.max_buffer_size - HEADER_SIZE
        } else {
            config.max_buffer_size
        };
        let staging = if config.lazy_output_buffer {
            None
        } else {
            Some(Buffer::zeroed(min(INITIAL_BUFFER_SIZE, max_chunk_size)))
        };
        OutputBuffer {
            framer: ChunkFramer::new(config, compressor, encryptor, max_chunk_size),
            max_chunk_size,
            staging,
            offset: 0,
            position: 0,
        }
    }

    pub fn max_chunk_size(&self) -> usize {
        self.max_chunk_size
    }

    /// Bytes written so far, including those still staged.
    pub fn size(&self) -> usize {
        self.offset + self.position
    }

    /// Size of the framed output. Only meaningful once the buffer is flushed.
    pub fn output_data_size(&self) -> usize {
        assert!(
            self.position == 0,
            "buffer must be flushed before output_data_size can be called"
        );
        self.framer.sink_size()
    }

    pub fn estimate_output_data_size(&self) -> usize {
        self.framer.sink_size() + self.position
    }

    /// Copies the framed output to `out` and returns the number of bytes written.
    pub fn write_data_to<W: Write>(&self, out: &mut W) -> Result<usize> {
        assert!(
            self.position == 0,
            "buffer must be flushed before write_data_to can be called"
        );
        match self.framer.sink() {
            Some(sink) => Ok(sink.write_to(out)?),
            None => Ok(0),
        }
    }

    pub fn checkpoint(&self) -> Checkpoint {
        if !self.framer.is_framed() {
            return Checkpoint::Uncompressed(self.size() as u64);
        }
        Checkpoint::Compressed {
            block_offset: self.framer.sink_size() as u64,
            decompressed_offset: self.position as u64,
        }
    }

    pub fn retained_size(&self) -> usize {
        mem::size_of::<Self>()
            + self.framer.retained_size()
            + self.staging.as_ref().map(|b| b.retained_size()).unwrap_or(0)
    }

    /// Length of the staging region, 0 while it is not yet allocated.
    pub fn buffer_capacity(&self) -> usize {
        self.staging.as_ref().map(|b| b.len()).unwrap_or(0)
    }

    /// Frames any staged bytes. The sink itself is left as is.
    pub fn flush(&mut self) -> Result<()> {
        self.flush_staging()
    }

    pub fn close(&mut self) -> Result<()> {
        self.flush_staging()
    }

    /// Drops staged bytes and empties the sink so the buffer can be reused
    /// for the next stripe.
    pub fn reset(&mut self) {
        self.framer.reset();
        self.offset = 0;
        self.position = 0;
    }

    pub fn write_u8(&mut self, value: u8) -> Result<()> {
        self.reserve(1)?[0] = value;
        Ok(())
    }

    pub fn write_i16(&mut self, value: i16) -> Result<()> {
        LittleEndian::write_i16(self.reserve(2)?, value);
        Ok(())
    }

    pub fn write_i32(&mut self, value: i32) -> Result<()> {
        LittleEndian::write_i32(self.reserve(4)?, value);
        Ok(())
    }

    pub fn write_i64(&mut self, value: i64) -> Result<()> {
        LittleEndian::write_i64(self.reserve(8)?, value);
        Ok(())
    }

    /// Writes the IEEE-754 bits; every NaN is written as the canonical quiet NaN.
    pub fn write_f32(&mut self, value: f32) -> Result<()> {
        let bits = if value.is_nan() {
            0x7fc0_0000
        } else {
            value.to_bits()
        };
        LittleEndian::write_u32(self.reserve(4)?, bits);
        Ok(())
    }

    /// Writes the IEEE-754 bits; every NaN is written as the canonical quiet NaN.
    pub fn write_f64(&mut self, value: f64) -> Result<()> {
        let bits = if value.is_nan() {
            0x7ff8_0000_0000_0000
        } else {
            value.to_bits()
        };
        LittleEndian::write_u64(self.reserve(8)?, bits);
        Ok(())
    }

    pub fn write_bytes(&mut self, mut bytes: &[u8]) -> Result<()> {
        if bytes.is_empty() {
            return Ok(());
        }

        // finish filling the staging region
        if self.position != 0 {
            let n = min(bytes.len(), self.max_chunk_size - self.position);
            self.reserve(n)?.copy_from_slice(&bytes[..n]);
            bytes = &bytes[n..];
        }

        // write max_chunk_size chunks directly to the framer
        if bytes.len() >= self.max_chunk_size {
            self.flush_staging()?;
            while bytes.len() >= self.max_chunk_size {
                let (chunk, rest) = bytes.split_at(self.max_chunk_size);
                self.framer.write_chunk(chunk)?;
                self.offset += chunk.len();
                bytes = rest;
            }
        }

        // stage the tail smaller than max_chunk_size
        if !bytes.is_empty() {
            self.reserve(bytes.len())?.copy_from_slice(bytes);
        }
        Ok(())
    }

    /// Copies exactly `length` bytes from `reader`.
    pub fn write_from_reader<R: Read>(&mut self, reader: &mut R, mut length: usize) -> Result<()> {
        while length > 0 {
            let batch = self.ensure_batch_size(length)?;
            let start = self.position;
            reader.read_exact(&mut self.staging_mut()[start..start + batch])?;
            self.position += batch;
            length -= batch;
        }
        Ok(())
    }

    pub fn write_zeros(&mut self, mut length: usize) -> Result<()> {
        while length > 0 {
            let batch = self.ensure_batch_size(length)?;
            let start = self.position;
            self.staging_mut()[start..start + batch].fill(0);
            self.position += batch;
            length -= batch;
        }
        Ok(())
    }

    fn available(&self) -> usize {
        self.buffer_capacity() - self.position
    }

    fn staging_mut(&mut self) -> &mut Buffer {
        let size = min(INITIAL_BUFFER_SIZE, self.max_chunk_size);
        self.staging.get_or_insert_with(|| Buffer::zeroed(size))
    }

    /// Makes room for `n` bytes at the cursor and advances past them.
    fn reserve(&mut self, n: usize) -> Result<&mut [u8]> {
        self.ensure_writable_bytes(n)?;
        let start = self.position;
        self.position += n;
        Ok(&mut self.staging_mut()[start..start + n])
    }

    fn ensure_batch_size(&mut self, length: usize) -> Result<usize> {
        if self.staging.is_none() {
            self.init_staging(length);
        }
        self.ensure_writable_bytes(min(length, self.max_chunk_size - self.position))?;
        if self.available() == 0 {
            self.flush_staging()?;
        }
        Ok(min(length, self.available()))
    }

    fn ensure_writable_bytes(&mut self, min_writable_bytes: usize) -> Result<()> {
        assert!(
            min_writable_bytes <= self.max_chunk_size,
            "min writable bytes must not exceed max chunk size"
        );

        if self.staging.is_none() {
            self.init_staging(min_writable_bytes);
        }
        let capacity = self.buffer_capacity();
        let needed = self.position + min_writable_bytes;
        if needed <= capacity {
            return Ok(());
        }

        if capacity >= self.max_chunk_size {
            return self.flush_staging();
        }

        // grow the region up to max_chunk_size
        let new_size = min(max(capacity * 2, needed), self.max_chunk_size);
        if new_size >= needed {
            self.staging_mut().grow(new_size);
        } else {
            // not enough room even after growing; flush and start a fresh region
            self.flush_staging()?;
            self.staging = Some(Buffer::zeroed(new_size));
        }
        Ok(())
    }

    fn init_staging(&mut self, length: usize) {
        self.staging = Some(Buffer::zeroed(self.calculate_buffer_size(length)));
    }

    fn calculate_buffer_size(&self, length: usize) -> usize {
        let mut size = min(INITIAL_BUFFER_SIZE, self.max_chunk_size);
        while size < length && size < self.max_chunk_size {
            size = min(size * 2, self.max_chunk_size);
        }
        size
    }

    fn flush_staging(&mut self) -> Result<()> {
        if self.position > 0 {
            if let Some(staging) = &self.staging {
                self.framer.write_chunk(&staging[..self.position])?;
            }
            self.offset += self.position;
            self.position = 0;
        }
        Ok(())
    }
}

impl Write for OutputBuffer {
    fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
        self.write_bytes(bytes)?;
        Ok(bytes.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(self.flush_staging()?)
    }
}

impl fmt::Debug for OutputBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OutputBuffer")
            .field("output_stream", &self.framer.sink())
            .field("buffer_size", &self.buffer_capacity())
            .finish()
    }
}
