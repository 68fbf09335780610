use lz4_flex::block::{compress_into, get_maximum_output_size};

use super::common::{CompressionKind, CompressionTrait, Compressor};
use crate::error::{Error, Result};

/// Raw LZ4 blocks. The chunk header already carries the length, so no size
/// prefix is written.
#[derive(Clone)]
pub struct Lz4Compression {
    _dummy: (),
}

impl Lz4Compression {
    pub fn new() -> Lz4Compression {
        Lz4Compression { _dummy: () }
    }
}

impl CompressionTrait for Lz4Compression {
    fn kind(&self) -> CompressionKind {
        CompressionKind::Lz4
    }

    fn compressor(&self) -> Option<Box<dyn Compressor>> {
        Some(Box::new(Lz4Compressor))
    }
}

struct Lz4Compressor;

impl Compressor for Lz4Compressor {
    fn compress(&mut self, input: &[u8], output: &mut [u8]) -> Result<usize> {
        compress_into(input, output).map_err(|e| Error::Compression(format!("lz4: {}", e)))
    }

    fn max_compressed_length(&self, input_len: usize) -> usize {
        get_maximum_output_size(input_len)
    }
}
