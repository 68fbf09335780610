use std::sync::Arc;

use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::writer::compression::{Compressor, MAX_BLOCK_SIZE};
use crate::writer::encryption::Encryptor;
use crate::writer::pool::{BufferPool, PooledBuffer};
use crate::writer::sink::{ChunkSink, ChunkedSink, LazySink, Sink};
use crate::writer::Config;

pub const HEADER_SIZE: usize = 3;

/// Turns flushed chunks into `[header][payload]` records, compressing and
/// encrypting them on the way, and appends them to the sink.
pub(crate) struct ChunkFramer {
    compressor: Option<Box<dyn Compressor>>,
    encryptor: Option<Box<dyn Encryptor>>,
    buffer_pool: Arc<dyn BufferPool>,
    max_chunk_size: usize,
    min_compressible_size: usize,
    sink_options: SinkOptions,
    sink: Option<Sink>,
}

/// What the sink is built from when the first chunk arrives.
#[derive(Debug, Copy, Clone)]
struct SinkOptions {
    lazy: bool,
    min_chunk_size: usize,
    max_chunk_size: usize,
    reuse_chunks: bool,
}

impl SinkOptions {
    fn build(self) -> Sink {
        debug!(options = ?self, "creating output sink");
        if self.lazy {
            Sink::Lazy(LazySink::new())
        } else {
            Sink::Chunked(ChunkedSink::new(
                self.min_chunk_size,
                self.max_chunk_size,
                self.reuse_chunks,
            ))
        }
    }
}

impl ChunkFramer {
    pub(crate) fn new(
        config: &Config,
        compressor: Option<Box<dyn Compressor>>,
        encryptor: Option<Box<dyn Encryptor>>,
        max_chunk_size: usize,
    ) -> Self {
        ChunkFramer {
            compressor,
            encryptor,
            buffer_pool: config.buffer_pool.clone(),
            max_chunk_size,
            min_compressible_size: config
                .min_compressible_size
                .unwrap_or_else(|| config.compression.kind().min_compressible_size()),
            sink_options: SinkOptions {
                lazy: config.lazy_output_buffer,
                min_chunk_size: config.min_output_chunk_size,
                max_chunk_size: config.max_output_chunk_size,
                reuse_chunks: config.reuse_output_chunks,
            },
            sink: None,
        }
    }

    /// Whether chunks get a header. Without a compressor or an encryptor the
    /// stream is written as plain bytes.
    pub(crate) fn is_framed(&self) -> bool {
        self.compressor.is_some() || self.encryptor.is_some()
    }

    pub(crate) fn sink(&self) -> Option<&Sink> {
        self.sink.as_ref()
    }

    pub(crate) fn sink_size(&self) -> usize {
        self.sink.as_ref().map(|s| s.size()).unwrap_or(0)
    }

    pub(crate) fn retained_size(&self) -> usize {
        self.sink.as_ref().map(|s| s.retained_size()).unwrap_or(0)
    }

    pub(crate) fn reset(&mut self) {
        if let Some(sink) = &mut self.sink {
            sink.reset();
        }
    }

    pub(crate) fn write_chunk(&mut self, chunk: &[u8]) -> Result<()> {
        let framed = self.is_framed();
        let options = self.sink_options;
        let sink = self.sink.get_or_insert_with(|| options.build());

        if !framed {
            sink.ensure_available(1, chunk.len());
            sink.write_bytes(chunk);
            return Ok(());
        }

        assert!(
            chunk.len() <= self.max_chunk_size,
            "chunk length {} exceeds max chunk size {}",
            chunk.len(),
            self.max_chunk_size
        );

        // Checked back into the pool when dropped, including on the error returns below.
        let mut scratch: Option<PooledBuffer> = None;
        let mut compressed_len = None;
        if let Some(compressor) = &mut self.compressor {
            if chunk.len() >= self.min_compressible_size {
                let min_size = compressor.max_compressed_length(chunk.len());
                let mut buf = PooledBuffer::check_out(&*self.buffer_pool, min_size);
                let len = compressor.compress(chunk, &mut buf)?;
                // The format only allows a compressed chunk when it is strictly
                // smaller than the original.
                if len < chunk.len() {
                    compressed_len = Some(len);
                }
                scratch = Some(buf);
            }
        }

        let is_compressed = compressed_len.is_some();
        let mut payload: &[u8] = match (&scratch, compressed_len) {
            (Some(buf), Some(len)) => &buf[..len],
            _ => chunk,
        };

        let encrypted;
        if let Some(encryptor) = &mut self.encryptor {
            encrypted = encryptor.encrypt(payload)?;
            // The length has to fit the 3-byte header, which is built after encryption.
            if encrypted.len() > MAX_BLOCK_SIZE {
                debug!(size = encrypted.len(), "encrypted chunk too large to frame");
                return Err(Error::DataSizeExceeded {
                    size: encrypted.len(),
                    limit: MAX_BLOCK_SIZE,
                });
            }
            payload = &encrypted;
        }

        let length = payload.len();
        let header = if is_compressed {
            length << 1
        } else {
            (length << 1) + 1
        };
        sink.ensure_available(HEADER_SIZE, length + HEADER_SIZE);
        sink.write_header(header as u32);
        sink.write_bytes(payload);
        trace!(length, compressed = is_compressed, "framed chunk");
        Ok(())
    }
}
