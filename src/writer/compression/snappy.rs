use snap::raw::{max_compress_len, Encoder};

use super::common::{CompressionKind, CompressionTrait, Compressor};
use crate::error::{Error, Result};

#[derive(Clone)]
pub struct SnappyCompression {
    _dummy: (),
}

impl SnappyCompression {
    pub fn new() -> SnappyCompression {
        SnappyCompression { _dummy: () }
    }
}

impl CompressionTrait for SnappyCompression {
    fn kind(&self) -> CompressionKind {
        CompressionKind::Snappy
    }

    fn compressor(&self) -> Option<Box<dyn Compressor>> {
        Some(Box::new(SnappyCompressor {
            encoder: Encoder::new(),
        }))
    }
}

struct SnappyCompressor {
    encoder: Encoder,
}

impl Compressor for SnappyCompressor {
    fn compress(&mut self, input: &[u8], output: &mut [u8]) -> Result<usize> {
        self.encoder
            .compress(input, output)
            .map_err(|e| Error::Compression(format!("snappy: {}", e)))
    }

    fn max_compressed_length(&self, input_len: usize) -> usize {
        max_compress_len(input_len)
    }
}
