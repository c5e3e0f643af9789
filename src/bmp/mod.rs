//! Uncompressed Windows BMP raster codec.
//!
//! [`BmpImage`] owns the decoded pixel buffer in the file's native channel
//! layout (B,G,R for 24-bit images, palette indices for indexed depths),
//! one unpadded row after another in file order. Scanline padding exists
//! only on disk: it is stripped on decode and re-emitted as zeros on encode.

mod decode;
mod encode;
mod header;

use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::ImageError;

pub use header::{ColorEntry, FileHeader, InfoHeader, Orientation};

pub(crate) use header::HEADERS_SIZE;

/// How pixels map onto row bytes for a given bit depth.
///
/// Sub-byte depths pack several pixels into one byte; byte-aligned depths
/// spend a fixed number of bytes per pixel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChannelLayout {
    /// 1 or 4 bits per pixel: `pixels_per_byte` pixels share one byte.
    Packed { pixels_per_byte: usize },
    /// 8, 24, or 32 bits per pixel: `channels` bytes per pixel.
    PerPixel { channels: usize },
}

impl ChannelLayout {
    /// Layout for a bit depth, or [`ImageError::UnsupportedBitDepth`] for
    /// anything outside {1, 4, 8, 24, 32}.
    pub fn from_bit_depth(bit_depth: u16) -> Result<Self, ImageError> {
        match bit_depth {
            1 => Ok(Self::Packed { pixels_per_byte: 8 }),
            4 => Ok(Self::Packed { pixels_per_byte: 2 }),
            8 => Ok(Self::PerPixel { channels: 1 }),
            24 => Ok(Self::PerPixel { channels: 3 }),
            32 => Ok(Self::PerPixel { channels: 4 }),
            other => Err(ImageError::UnsupportedBitDepth(other)),
        }
    }

    /// Meaningful (unpadded) bytes in one row of `width` pixels.
    pub fn row_data_bytes(self, width: usize) -> usize {
        match self {
            Self::Packed { pixels_per_byte } => width.div_ceil(pixels_per_byte),
            Self::PerPixel { channels } => width * channels,
        }
    }

    /// Bytes per pixel, or `None` for packed layouts where pixels are not
    /// individually addressable.
    pub fn channels(self) -> Option<usize> {
        match self {
            Self::Packed { .. } => None,
            Self::PerPixel { channels } => Some(channels),
        }
    }
}

/// A decoded BMP image.
///
/// Constructed by [`load`](BmpImage::load) /
/// [`from_bytes`](BmpImage::from_bytes) (decode) or
/// [`blank`](BmpImage::blank) (zero-filled 24-bit image). A failed decode
/// returns an error and produces no instance; there is no partially
/// initialized state to observe. `Clone` deep-copies the pixel buffer and
/// color table.
#[derive(Clone, Debug)]
pub struct BmpImage {
    pub(crate) file_header: FileHeader,
    pub(crate) info: InfoHeader,
    pub(crate) orientation: Orientation,
    pub(crate) layout: ChannelLayout,
    pub(crate) color_table: Option<Vec<ColorEntry>>,
    /// `height * row_data_bytes` bytes, rows in file order, no padding.
    pub(crate) data: Vec<u8>,
    pub(crate) source: Option<PathBuf>,
}

impl BmpImage {
    /// Decode a BMP file from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ImageError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| ImageError::FileOpen {
            path: path.to_path_buf(),
            source,
        })?;
        let mut image = Self::from_bytes(&bytes)?;
        image.source = Some(path.to_path_buf());
        Ok(image)
    }

    /// Decode a BMP image from raw file bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ImageError> {
        decode::decode(bytes)
    }

    /// A zero-filled 24-bit bottom-up image with a self-consistent header.
    pub fn blank(width: usize, height: usize) -> Self {
        let layout = ChannelLayout::PerPixel { channels: 3 };
        let row_bytes = layout.row_data_bytes(width);
        let scan_bytes = row_bytes.div_ceil(4) * 4;
        let pixel_bytes = scan_bytes * height;
        Self {
            file_header: FileHeader {
                file_size: (HEADERS_SIZE + pixel_bytes) as u32,
                reserved: 0,
                data_offset: HEADERS_SIZE as u32,
            },
            info: InfoHeader {
                header_size: header::INFO_HEADER_SIZE as u32,
                width: width as u32,
                height: height as u32,
                planes: 1,
                bit_depth: 24,
                compression: 0,
                image_size: pixel_bytes as u32,
                x_pixels_per_meter: 3780,
                y_pixels_per_meter: 3780,
                colors_used: 0,
                important_colors: 0,
            },
            orientation: Orientation::BottomUp,
            layout,
            color_table: None,
            data: vec![0; row_bytes * height],
            source: None,
        }
    }

    /// Encode and write to disk. Scanline padding is written as explicit
    /// zero bytes; the file never contains unwritten gaps.
    pub fn store(&self, path: impl AsRef<Path>) -> Result<(), ImageError> {
        let path = path.as_ref();
        std::fs::write(path, self.to_bytes()).map_err(|source| ImageError::FileOpen {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Encode to raw BMP file bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        encode::encode(self)
    }

    pub fn width(&self) -> usize {
        self.info.width as usize
    }

    pub fn height(&self) -> usize {
        self.info.height as usize
    }

    pub fn bit_depth(&self) -> u16 {
        self.info.bit_depth
    }

    pub fn channel_layout(&self) -> ChannelLayout {
        self.layout
    }

    /// Bytes per pixel, or `None` for packed sub-byte depths.
    pub fn channels(&self) -> Option<usize> {
        self.layout.channels()
    }

    /// Meaningful bytes per buffer row (excluding on-disk padding).
    pub fn row_data_bytes(&self) -> usize {
        self.layout.row_data_bytes(self.width())
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Select the scan direction written on the next encode. Touches neither
    /// the height magnitude nor the pixel buffer.
    pub fn set_reverse_y(&mut self, reversed: bool) {
        self.orientation = if reversed {
            Orientation::TopDown
        } else {
            Orientation::BottomUp
        };
    }

    /// Read the byte at `(row, column, channel)`.
    ///
    /// Panics if the layout is packed (no per-pixel addressing) or any index
    /// is out of bounds; both are contract violations, not runtime errors.
    pub fn at(&self, row: usize, column: usize, channel: usize) -> u8 {
        self.data[self.data_index(row, column, channel)]
    }

    /// Mutable access to the byte at `(row, column, channel)`.
    ///
    /// Same contract as [`at`](Self::at).
    pub fn at_mut(&mut self, row: usize, column: usize, channel: usize) -> &mut u8 {
        let index = self.data_index(row, column, channel);
        &mut self.data[index]
    }

    fn data_index(&self, row: usize, column: usize, channel: usize) -> usize {
        let channels = match self.layout {
            ChannelLayout::PerPixel { channels } => channels,
            ChannelLayout::Packed { .. } => {
                panic!("per-pixel accessor used on a packed (sub-byte) image")
            }
        };
        assert!(channel < channels, "channel {channel} out of range");
        assert!(row < self.height(), "row {row} out of range");
        assert!(column < self.width(), "column {column} out of range");
        row * self.row_data_bytes() + column * channels + channel
    }

    /// The unpadded pixel buffer, rows in file order.
    pub fn pixels(&self) -> &[u8] {
        &self.data
    }

    pub fn pixels_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// The color table, present iff the bit depth is at most 8.
    pub fn color_table(&self) -> Option<&[ColorEntry]> {
        self.color_table.as_deref()
    }

    pub fn file_header(&self) -> &FileHeader {
        &self.file_header
    }

    pub fn info_header(&self) -> &InfoHeader {
        &self.info
    }

    /// The path this image was loaded from, if any.
    pub fn source_path(&self) -> Option<&Path> {
        self.source.as_deref()
    }
}

impl fmt::Display for BmpImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self
            .source
            .as_deref()
            .map(Path::display)
            .map(|d| d.to_string())
            .unwrap_or_else(|| "<memory>".into());
        write!(
            f,
            "BmpImage {name}: {}x{} px, {} data bytes, {} bits per pixel",
            self.width(),
            self.height(),
            self.data.len(),
            self.bit_depth()
        )
    }
}
