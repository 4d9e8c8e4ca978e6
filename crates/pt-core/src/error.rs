use std::io;

use thiserror::Error;

/// Errors raised while decoding a PNG stream.
///
/// Every variant is terminal: corrupted or unsupported input cannot be
/// repaired by retrying, so nothing in the pipeline retries.
#[derive(Error, Debug)]
pub enum DecodeError {
    /// The first eight bytes are not the PNG signature.
    #[error("not a PNG file (bad signature)")]
    BadSignature,

    /// Header values outside the supported subset.
    #[error("unsupported PNG: {reason}")]
    UnsupportedFormat {
        /// Human-readable description of the rejected header field.
        reason: String,
    },

    /// Le flux s'est terminé sans IHDR ou sans IDAT.
    #[error("corrupt PNG (missing {what})")]
    MissingData {
        /// Name of the missing chunk.
        what: &'static str,
    },

    /// The zlib stream could not be inflated.
    #[error("failed to inflate image data: {0}")]
    Decompression(#[source] io::Error),

    /// Inflated byte count does not match `height × (1 + stride)`.
    #[error("unexpected decompressed size (got {actual}, expected {expected})")]
    CorruptData {
        /// Expected length.
        expected: usize,
        /// Actual length (capped at `expected + 1`).
        actual: usize,
    },

    /// A scanline carries a filter tag outside 0–4.
    #[error("unsupported PNG filter type {tag} on row {row}")]
    UnsupportedFilter {
        /// Zero-based scanline index.
        row: usize,
        /// Raw filter byte.
        tag: u8,
    },

    /// Dimensions invalides (nulles ou trop grandes pour la mémoire adressable).
    #[error("invalid dimensions: {width}×{height}")]
    InvalidDimensions {
        /// Width value.
        width: u32,
        /// Height value.
        height: u32,
    },

    /// A critical chunk has the wrong payload length.
    #[error("malformed {tag} chunk (length {length})")]
    MalformedChunk {
        /// Chunk tag as text.
        tag: String,
        /// Declared payload length.
        length: u32,
    },

    /// Stored CRC does not match tag+payload. Only raised when verification is on.
    #[error("CRC mismatch in {tag} chunk (stored {expected:#010x}, computed {actual:#010x})")]
    ChecksumMismatch {
        /// Chunk tag as text.
        tag: String,
        /// CRC read from the stream.
        expected: u32,
        /// CRC computed over tag and payload.
        actual: u32,
    },

    /// Opening or reading the source failed, including a chunk cut short.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl DecodeError {
    pub(crate) fn unsupported(reason: impl Into<String>) -> Self {
        Self::UnsupportedFormat {
            reason: reason.into(),
        }
    }
}
