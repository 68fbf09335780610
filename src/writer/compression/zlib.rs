use flate2::{Compress, FlushCompress, Status};

use super::common::{CompressionKind, CompressionTrait, Compressor};
use crate::error::{Error, Result};

/// ORC's ZLIB codec: raw deflate blocks, no zlib header or trailer.
#[derive(Clone)]
pub struct ZlibCompression {
    compression_level: u32,
}

impl ZlibCompression {
    pub fn new() -> Self {
        Self {
            compression_level: 4,
        }
    }

    pub fn with_compression_level(mut self, compression_level: u32) -> Self {
        assert!(compression_level >= 1 && compression_level <= 9);
        self.compression_level = compression_level;
        self
    }
}

impl CompressionTrait for ZlibCompression {
    fn kind(&self) -> CompressionKind {
        CompressionKind::Zlib
    }

    fn compressor(&self) -> Option<Box<dyn Compressor>> {
        Some(Box::new(DeflateCompressor {
            inner: Compress::new(flate2::Compression::new(self.compression_level), false),
        }))
    }
}

struct DeflateCompressor {
    inner: Compress,
}

impl Compressor for DeflateCompressor {
    fn compress(&mut self, input: &[u8], output: &mut [u8]) -> Result<usize> {
        self.inner.reset();
        let status = self
            .inner
            .compress(input, output, FlushCompress::Finish)
            .map_err(|e| Error::Compression(format!("deflate: {}", e)))?;
        match status {
            Status::StreamEnd => Ok(self.inner.total_out() as usize),
            _ => Err(Error::Compression(format!(
                "deflate: output buffer of {} bytes too small",
                output.len()
            ))),
        }
    }

    // Same bound as zlib's compressBound().
    fn max_compressed_length(&self, n: usize) -> usize {
        n + (n >> 12) + (n >> 14) + (n >> 25) + 13
    }
}
