use std::io;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// A chunk grew past what a 3-byte frame header can describe. Usually the
    /// result of an encryptor expanding an already large chunk; writing again
    /// with a smaller `max_buffer_size` is the expected recovery.
    ///
    /// `limit` is the largest length that can be framed, `0x7fffff`: a chunk
    /// of exactly 2^23 bytes is rejected as well, since its shifted length
    /// would not fit 24 bits.
    #[error("data size {size} exceeds limit of {limit} bytes")]
    DataSizeExceeded { size: usize, limit: usize },

    #[error("compression failed: {0}")]
    Compression(String),

    #[error("encryption failed: {0}")]
    Encryption(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl From<Error> for io::Error {
    fn from(e: Error) -> io::Error {
        match e {
            Error::Io(inner) => inner,
            other => io::Error::new(io::ErrorKind::Other, other),
        }
    }
}
