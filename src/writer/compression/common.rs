use crate::error::Result;

/// Largest length a 3-byte chunk header can carry once the "original" flag
/// bit is packed in.
pub const MAX_BLOCK_SIZE: usize = 0x7fffff;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CompressionKind {
    None,
    Zlib,
    Snappy,
    Lz4,
    Zstd,
}

impl CompressionKind {
    /// Chunks shorter than this are framed as original bytes without trying the
    /// codec; below it the codec's own framing overhead makes a win unlikely.
    pub fn min_compressible_size(self) -> usize {
        match self {
            CompressionKind::None => 0,
            _ => 64,
        }
    }
}

pub trait CompressionTrait {
    fn kind(&self) -> CompressionKind;
    fn compressor(&self) -> Option<Box<dyn Compressor>>;
}

/// A block compressor. `output` is always at least
/// `max_compressed_length(input.len())` bytes long.
pub trait Compressor: Send {
    fn compress(&mut self, input: &[u8], output: &mut [u8]) -> Result<usize>;
    fn max_compressed_length(&self, input_len: usize) -> usize;
}
