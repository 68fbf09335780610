use std::sync::Arc;

pub use checkpoint::Checkpoint;
pub use compression::{
    Compression, CompressionKind, Compressor, Lz4Compression, NoCompression, SnappyCompression,
    ZlibCompression, ZstdCompression, MAX_BLOCK_SIZE,
};
pub use encryption::{Encryptor, XChaChaEncryptor, NONCE_SIZE, TAG_SIZE};
pub use framer::HEADER_SIZE;
pub use output_buffer::OutputBuffer;
pub use pool::{BufferPool, LastUsedBufferPool};
pub use sink::{ChunkSink, ChunkedSink, LazySink, Sink};

mod checkpoint;
mod compression;
mod encryption;
mod framer;
mod output_buffer;
mod pool;
mod sink;

#[cfg(test)]
pub(crate) mod testing;

#[derive(Clone)]
pub struct Config {
    pub(crate) compression: Compression,
    pub(crate) max_buffer_size: usize,
    pub(crate) min_output_chunk_size: usize,
    pub(crate) max_output_chunk_size: usize,
    pub(crate) lazy_output_buffer: bool,
    pub(crate) reuse_output_chunks: bool,
    pub(crate) min_compressible_size: Option<usize>,
    pub(crate) buffer_pool: Arc<dyn BufferPool>,
}

impl Config {
    pub fn new() -> Config {
        Config {
            compression: NoCompression::new().build(),
            max_buffer_size: 262144,
            min_output_chunk_size: 8192,
            max_output_chunk_size: 1048576,
            lazy_output_buffer: false,
            reuse_output_chunks: true,
            min_compressible_size: None,
            buffer_pool: Arc::new(LastUsedBufferPool::new()),
        }
    }

    pub fn with_compression(mut self, compression: Compression) -> Self {
        self.compression = compression;
        self
    }

    /// Largest chunk, header included when compressing, that is handed to the
    /// codec in one piece.
    pub fn with_max_buffer_size(mut self, max_buffer_size: usize) -> Self {
        assert!(
            max_buffer_size > HEADER_SIZE,
            "maximum buffer size should be greater than page header size"
        );
        assert!(max_buffer_size <= MAX_BLOCK_SIZE);
        self.max_buffer_size = max_buffer_size;
        self
    }

    pub fn with_output_chunk_sizes(mut self, min: usize, max: usize) -> Self {
        assert!(min >= HEADER_SIZE && min <= max);
        self.min_output_chunk_size = min;
        self.max_output_chunk_size = max;
        self
    }

    /// Defer every allocation until the first write, for streams that may
    /// never receive data.
    pub fn with_lazy_output_buffer(mut self, lazy: bool) -> Self {
        self.lazy_output_buffer = lazy;
        self
    }

    /// Keep sink allocations across `OutputBuffer::reset` instead of
    /// releasing them.
    pub fn with_reuse_output_chunks(mut self, reuse: bool) -> Self {
        self.reuse_output_chunks = reuse;
        self
    }

    pub fn with_min_compressible_size(mut self, size: usize) -> Self {
        self.min_compressible_size = Some(size);
        self
    }

    pub fn with_buffer_pool(mut self, buffer_pool: Arc<dyn BufferPool>) -> Self {
        self.buffer_pool = buffer_pool;
        self
    }

    pub fn compression(&self) -> &Compression {
        &self.compression
    }

    pub fn max_buffer_size(&self) -> usize {
        self.max_buffer_size
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
