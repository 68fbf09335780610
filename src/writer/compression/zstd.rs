use zstd;
use zstd_safe;

use super::common::{CompressionKind, CompressionTrait, Compressor};
use crate::error::{Error, Result};

#[derive(Clone)]
pub struct ZstdCompression {
    compression_level: i32,
}

impl ZstdCompression {
    pub fn new() -> Self {
        Self {
            compression_level: 3,
        }
    }

    pub fn with_compression_level(mut self, compression_level: i32) -> Self {
        assert!(compression_level >= 1 && compression_level <= 22);
        self.compression_level = compression_level;
        self
    }
}

impl CompressionTrait for ZstdCompression {
    fn kind(&self) -> CompressionKind {
        CompressionKind::Zstd
    }

    fn compressor(&self) -> Option<Box<dyn Compressor>> {
        Some(Box::new(ZstdCompressor {
            compression_level: self.compression_level,
        }))
    }
}

struct ZstdCompressor {
    compression_level: i32,
}

impl Compressor for ZstdCompressor {
    fn compress(&mut self, input: &[u8], output: &mut [u8]) -> Result<usize> {
        zstd::bulk::compress_to_buffer(input, output, self.compression_level)
            .map_err(|e| Error::Compression(format!("zstd: {}", e)))
    }

    fn max_compressed_length(&self, input_len: usize) -> usize {
        zstd_safe::compress_bound(input_len)
    }
}
