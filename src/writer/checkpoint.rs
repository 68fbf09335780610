/// A position in an output stream that a reader can seek back to.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Checkpoint {
    /// Byte offset into a stream written without chunk headers.
    Uncompressed(u64),
    /// Decode the chunk starting at `block_offset` in the framed stream, then
    /// skip `decompressed_offset` bytes of its decoded content.
    Compressed {
        block_offset: u64,
        decompressed_offset: u64,
    },
}

impl Checkpoint {
    /// Packs the checkpoint into one integer: the offset itself when
    /// uncompressed, otherwise `block_offset << 32 | decompressed_offset`.
    pub fn encode(&self) -> u64 {
        match *self {
            Checkpoint::Uncompressed(offset) => offset,
            Checkpoint::Compressed {
                block_offset,
                decompressed_offset,
            } => (block_offset << 32) | (decompressed_offset & 0xffff_ffff),
        }
    }

    /// Appends the row-index positions for this checkpoint.
    pub fn record(&self, out: &mut Vec<u64>) {
        match *self {
            Checkpoint::Uncompressed(offset) => out.push(offset),
            Checkpoint::Compressed {
                block_offset,
                decompressed_offset,
            } => {
                out.push(block_offset);
                out.push(decompressed_offset);
            }
        }
    }
}
