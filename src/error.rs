use std::path::PathBuf;

use crate::uniform::ColorSpace;

/// Errors from BMP decoding/encoding and normalized-image construction.
///
/// Out-of-range accessor indices are contract violations and panic instead
/// of surfacing here.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ImageError {
    #[error("failed to open {}", path.display())]
    FileOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("not a BMP file: missing \"BM\" signature")]
    BadSignature,

    #[error("invalid header: {0}")]
    InvalidHeader(String),

    #[error("unsupported bit depth: {0}")]
    UnsupportedBitDepth(u16),

    #[error("unsupported compression scheme {0} (only uncompressed BMP is handled)")]
    UnsupportedCompression(u32),

    #[error("expected a 3-channel image, got {channels:?}")]
    ChannelMismatch { channels: Option<usize> },

    #[error("color-space conversion to {0:?} is not implemented")]
    UnsupportedConversion(ColorSpace),

    #[error("unexpected end of input")]
    UnexpectedEof,
}
