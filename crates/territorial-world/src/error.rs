//! Error types for the `territorial-world` crate.
//!
//! All fallible operations in this crate return [`WorldError`] through the
//! standard [`Result`] type alias.

use std::path::PathBuf;

/// Errors that can occur during world generation and asset loading.
#[derive(Debug, thiserror::Error)]
pub enum WorldError {
    /// A required raster asset file is absent. Fatal at init.
    #[error("required asset missing: {path}")]
    AssetMissing {
        /// The path that was looked up.
        path: PathBuf,
    },

    /// A raster asset file exists but could not be decoded.
    #[error("malformed asset {path}: {message}")]
    AssetFormat {
        /// The offending file.
        path: PathBuf,
        /// Decoder diagnostic.
        message: String,
    },

    /// An I/O failure while reading assets.
    #[error("asset I/O error: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Raster construction with inconsistent dimensions.
    #[error("raster dimension mismatch: {height}x{width} cannot hold {len} values")]
    InvalidDimensions {
        /// Declared height.
        height: usize,
        /// Declared width.
        width: usize,
        /// Actual number of values supplied.
        len: usize,
    },

    /// A raster operation requires a non-empty raster.
    #[error("raster must be non-empty")]
    EmptyRaster,

    /// The city table could not be read or parsed.
    #[error("city table error: {source}")]
    Cities {
        /// The underlying CSV error.
        #[from]
        source: csv::Error,
    },
}
