//! Wire codec for grid frames: zlib compression + hex framing.
//!
//! The `map` and `grid_update` frames carry an entire RGBA grid, which
//! compresses extremely well (long runs of identical cells). The bytes
//! go out as `hex(zlib(raw))` inside a JSON string.

use std::io::{Read, Write};

use flate2::Compression;
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;

/// Errors from the grid frame codec.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// Compression or decompression failed.
    #[error("zlib error: {source}")]
    Zlib {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// The hex framing is malformed.
    #[error("hex error: {source}")]
    Hex {
        /// The underlying hex decode error.
        #[from]
        source: hex::FromHexError,
    },
}

/// Compress raw RGBA bytes and frame them as a hex string.
///
/// # Errors
///
/// Returns [`CodecError::Zlib`] if compression fails (it does not for
/// in-memory sinks in practice).
pub fn encode_grid(raw: &[u8]) -> Result<String, CodecError> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(raw)?;
    Ok(hex::encode(encoder.finish()?))
}

/// Reverse [`encode_grid`]: hex-decode, then decompress.
///
/// # Errors
///
/// Returns [`CodecError::Hex`] on malformed hex or [`CodecError::Zlib`]
/// on a corrupt stream.
pub fn decode_grid(framed: &str) -> Result<Vec<u8>, CodecError> {
    let compressed = hex::decode(framed)?;
    let mut decoder = ZlibDecoder::new(compressed.as_slice());
    let mut raw = Vec::new();
    decoder.read_to_end(&mut raw)?;
    Ok(raw)
}
