//! Read-side helpers for tests: splits framed output back into chunks.

use byteorder::{LittleEndian, ReadBytesExt};
use std::io::{Cursor, Read};

use crate::writer::compression::CompressionKind;

#[derive(Debug)]
pub struct Frame {
    pub is_original: bool,
    pub payload: Vec<u8>,
}

pub fn parse_frames(bytes: &[u8]) -> Vec<Frame> {
    let mut cursor = Cursor::new(bytes);
    let mut frames = Vec::new();
    while (cursor.position() as usize) < bytes.len() {
        let header = cursor.read_u24::<LittleEndian>().unwrap();
        let mut payload = vec![0; (header >> 1) as usize];
        cursor.read_exact(&mut payload).unwrap();
        frames.push(Frame {
            is_original: header & 1 == 1,
            payload,
        });
    }
    frames
}

pub fn decompress(kind: CompressionKind, data: &[u8], max_len: usize) -> Vec<u8> {
    match kind {
        CompressionKind::None => data.to_vec(),
        CompressionKind::Zlib => {
            let mut out = Vec::new();
            flate2::read::DeflateDecoder::new(data)
                .read_to_end(&mut out)
                .unwrap();
            out
        }
        CompressionKind::Snappy => snap::raw::Decoder::new().decompress_vec(data).unwrap(),
        CompressionKind::Lz4 => lz4_flex::block::decompress(data, max_len).unwrap(),
        CompressionKind::Zstd => zstd::bulk::decompress(data, max_len).unwrap(),
    }
}

/// Decodes a framed stream back to the bytes that were written into it.
pub fn decode_frames(kind: CompressionKind, bytes: &[u8], max_chunk_size: usize) -> Vec<u8> {
    let mut out = Vec::new();
    for frame in parse_frames(bytes) {
        if frame.is_original {
            out.extend_from_slice(&frame.payload);
        } else {
            out.extend(decompress(kind, &frame.payload, max_chunk_size));
        }
    }
    out
}
