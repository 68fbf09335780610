use byteorder::{ByteOrder, LittleEndian};
use orc_output::writer::{
    Compression, Lz4Compression, NoCompression, SnappyCompression, ZlibCompression,
    ZstdCompression, HEADER_SIZE,
};
use orc_output::{Config, OutputBuffer};
use std::env;
use std::fs::File;
use std::io::{self, Error, ErrorKind, Result};
use tracing_subscriber::EnvFilter;

fn compression(name: &str) -> Result<Compression> {
    match name {
        "none" => Ok(NoCompression::new().build()),
        "zlib" => Ok(ZlibCompression::new().build()),
        "snappy" => Ok(SnappyCompression::new().build()),
        "lz4" => Ok(Lz4Compression::new().build()),
        "zstd" => Ok(ZstdCompression::new().build()),
        _ => Err(Error::new(
            ErrorKind::InvalidInput,
            format!("unknown codec {}", name),
        )),
    }
}

// Usage: frame_dump <input> [none|zlib|snappy|lz4|zstd]
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();
    let path = args
        .get(1)
        .ok_or_else(|| Error::new(ErrorKind::InvalidInput, "missing input file"))?;
    let codec = args.get(2).map(String::as_str).unwrap_or("snappy");

    let mut file = File::open(path)?;
    let length = file.metadata()?.len() as usize;
    let config = Config::new().with_compression(compression(codec)?);
    let mut buffer = OutputBuffer::new(&config, None);
    buffer.write_from_reader(&mut file, length)?;
    let checkpoint = buffer.checkpoint();
    buffer.close()?;

    let mut out = Vec::new();
    buffer.write_data_to(&mut out)?;
    println!(
        "{}: {} bytes in, {} bytes out ({}), end checkpoint {:?}",
        path,
        buffer.size(),
        out.len(),
        codec,
        checkpoint
    );
    if codec == "none" {
        return Ok(());
    }

    let mut pos = 0;
    let mut frames = 0;
    let mut compressed = 0;
    while pos + HEADER_SIZE <= out.len() {
        let header = LittleEndian::read_u24(&out[pos..]);
        let len = (header >> 1) as usize;
        let kind = if header & 1 == 1 {
            "original"
        } else {
            compressed += 1;
            "compressed"
        };
        println!("frame {:>4} @ {:>10}: {:>8} bytes {}", frames, pos, len, kind);
        pos += HEADER_SIZE + len;
        frames += 1;
    }
    println!("{} frames, {} compressed", frames, compressed);
    Ok(())
}
