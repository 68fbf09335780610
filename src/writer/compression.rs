use common::CompressionTrait;

pub use common::{CompressionKind, Compressor, MAX_BLOCK_SIZE};
pub use lz4::Lz4Compression;
pub use no_compression::NoCompression;
pub use snappy::SnappyCompression;
pub use zlib::ZlibCompression;
pub use self::zstd::ZstdCompression;

mod common;
mod lz4;
mod no_compression;
mod snappy;
mod zlib;
mod zstd;

#[derive(Clone)]
pub struct Compression(CompressionEnum);

impl Compression {
    pub fn kind(&self) -> CompressionKind {
        self.0.kind()
    }

    pub(crate) fn compressor(&self) -> Option<Box<dyn Compressor>> {
        self.0.compressor()
    }
}

impl Default for Compression {
    fn default() -> Self {
        NoCompression::new().build()
    }
}

#[derive(Clone)]
enum CompressionEnum {
    No(NoCompression),
    Zlib(ZlibCompression),
    Snappy(SnappyCompression),
    Lz4(Lz4Compression),
    Zstd(ZstdCompression),
}

// We could eliminate this boilerplate using enum-dispatch, but it doesn't work yet with RLS.
impl CompressionTrait for CompressionEnum {
    fn kind(&self) -> CompressionKind {
        match self {
            CompressionEnum::No(x) => x.kind(),
            CompressionEnum::Zlib(x) => x.kind(),
            CompressionEnum::Snappy(x) => x.kind(),
            CompressionEnum::Lz4(x) => x.kind(),
            CompressionEnum::Zstd(x) => x.kind(),
        }
    }

    fn compressor(&self) -> Option<Box<dyn Compressor>> {
        match self {
            CompressionEnum::No(x) => x.compressor(),
            CompressionEnum::Zlib(x) => x.compressor(),
            CompressionEnum::Snappy(x) => x.compressor(),
            CompressionEnum::Lz4(x) => x.compressor(),
            CompressionEnum::Zstd(x) => x.compressor(),
        }
    }
}

impl NoCompression {
    pub fn build(self) -> Compression {
        Compression(CompressionEnum::No(self))
    }
}

impl ZlibCompression {
    pub fn build(self) -> Compression {
        Compression(CompressionEnum::Zlib(self))
    }
}

impl SnappyCompression {
    pub fn build(self) -> Compression {
        Compression(CompressionEnum::Snappy(self))
    }
}

impl Lz4Compression {
    pub fn build(self) -> Compression {
        Compression(CompressionEnum::Lz4(self))
    }
}

impl ZstdCompression {
    pub fn build(self) -> Compression {
        Compression(CompressionEnum::Zstd(self))
    }
}
