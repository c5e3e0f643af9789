//! Normalized texture image: top-left origin, three channels, one byte each.
//!
//! [`UniformImage`] is the buffer the renderer samples every frame. It is
//! built once from a decoded [`BmpImage`] (which stores rows bottom-up) by
//! flipping the rows into top-left order, and carries a color-space tag so
//! shaders can request the channel order they expect.

use std::fmt;

use log::warn;
use rgb::{FromSlice, RGB8};

use crate::bmp::BmpImage;
use crate::error::ImageError;

/// Channel interpretation of a [`UniformImage`] buffer.
///
/// Only `Rgb` and `Bgr` have conversion routines; `Yuv` and `Hsv` are
/// reserved tags and converting to or from them fails.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColorSpace {
    Rgb,
    Bgr,
    Yuv,
    Hsv,
}

/// Top-left-origin, row-major image of `width * height * 3` bytes.
#[derive(Clone, Debug)]
pub struct UniformImage {
    width: usize,
    height: usize,
    data: Vec<u8>,
    color_space: ColorSpace,
}

impl UniformImage {
    /// A zero-filled RGB image.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![0; width * height * 3],
            color_space: ColorSpace::Rgb,
        }
    }

    /// Build from a decoded BMP, flipping the bottom-up rows into top-left
    /// order. The source must have exactly 3 byte-channels per pixel; the
    /// result is tagged [`ColorSpace::Bgr`], the native order of 24-bit BMP.
    pub fn from_bmp(bmp: &BmpImage) -> Result<Self, ImageError> {
        if bmp.channels() != Some(3) {
            warn!(
                "cannot normalize a {}-bpp BMP into a 3-channel image",
                bmp.bit_depth()
            );
            return Err(ImageError::ChannelMismatch {
                channels: bmp.channels(),
            });
        }
        let width = bmp.width();
        let height = bmp.height();
        let row_bytes = width * 3;
        let src = bmp.pixels();

        let mut data = vec![0u8; row_bytes * height];
        for (i, row) in data.chunks_exact_mut(row_bytes).enumerate() {
            let src_start = (height - 1 - i) * row_bytes;
            row.copy_from_slice(&src[src_start..src_start + row_bytes]);
        }

        Ok(Self {
            width,
            height,
            data,
            color_space: ColorSpace::Bgr,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn color_space(&self) -> ColorSpace {
        self.color_space
    }

    /// Read the byte at `(row, column, channel)`.
    ///
    /// Panics on out-of-range indices; that is a contract violation, not a
    /// recoverable condition.
    pub fn at(&self, row: usize, column: usize, channel: usize) -> u8 {
        self.data[self.data_index(row, column, channel)]
    }

    /// Mutable access to the byte at `(row, column, channel)`.
    pub fn at_mut(&mut self, row: usize, column: usize, channel: usize) -> &mut u8 {
        let index = self.data_index(row, column, channel);
        &mut self.data[index]
    }

    fn data_index(&self, row: usize, column: usize, channel: usize) -> usize {
        assert!(channel < 3, "channel {channel} out of range");
        assert!(row < self.height, "row {row} out of range");
        assert!(column < self.width, "column {column} out of range");
        row * self.width * 3 + column * 3 + channel
    }

    /// The raw buffer in row-major top-left order.
    pub fn pixels(&self) -> &[u8] {
        &self.data
    }

    pub fn pixels_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Typed view of the buffer as 3-byte pixels. The component naming
    /// follows the current [`color_space`](Self::color_space) tag.
    pub fn as_rgb(&self) -> &[RGB8] {
        self.data.as_rgb()
    }

    /// Convert the buffer to `target` in place.
    ///
    /// Converting to the current space is a no-op. RGB↔BGR swaps the first
    /// and third byte of every triplet; any conversion involving YUV or HSV
    /// returns [`ImageError::UnsupportedConversion`] and leaves the buffer
    /// untouched.
    pub fn convert_color_space(&mut self, target: ColorSpace) -> Result<(), ImageError> {
        if target == self.color_space {
            return Ok(());
        }
        match (self.color_space, target) {
            (ColorSpace::Rgb, ColorSpace::Bgr) | (ColorSpace::Bgr, ColorSpace::Rgb) => {
                swap_red_blue_wide(&mut self.data);
                self.color_space = target;
                Ok(())
            }
            _ => Err(ImageError::UnsupportedConversion(target)),
        }
    }
}

impl fmt::Display for UniformImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "UniformImage: {}x{} px, {:?}",
            self.width, self.height, self.color_space
        )
    }
}

// ── Channel swapping ────────────────────────────────────────────────

/// Bytes handled per wide-word step: five 3-byte pixels.
const WIDE_CHUNK: usize = 15;

/// Selects the first byte of each triplet within a 16-byte word.
const LANE_MASK: u128 = u128::from_le_bytes([
    0xFF, 0x00, 0x00, 0xFF, 0x00, 0x00, 0xFF, 0x00, 0x00, 0xFF, 0x00, 0x00, 0xFF, 0x00, 0x00,
    0x00,
]);

/// Swap the first and third byte of every complete triplet. Reference path;
/// a trailing partial triplet is left untouched.
pub(crate) fn swap_red_blue_scalar(buf: &mut [u8]) {
    for pixel in buf.chunks_exact_mut(3) {
        pixel.swap(0, 2);
    }
}

/// Wide-word variant of [`swap_red_blue_scalar`]: loads 15 bytes into a
/// `u128`, extracts the three channel lanes with [`LANE_MASK`], and rotates
/// them into swapped position in one pass. The final chunk (and any buffer
/// shorter than one chunk) goes through the same masks in a zero-padded
/// word. Output is byte-identical to the scalar path.
pub(crate) fn swap_red_blue_wide(buf: &mut [u8]) {
    let whole = buf.len() - buf.len() % 3;
    for chunk in buf[..whole].chunks_mut(WIDE_CHUNK) {
        let mut word = [0u8; 16];
        word[..chunk.len()].copy_from_slice(chunk);
        let s0 = u128::from_le_bytes(word);
        let first = LANE_MASK & s0;
        let mid = LANE_MASK & (s0 >> 8);
        let third = LANE_MASK & (s0 >> 16);
        let swapped = third | (first << 16) | (mid << 8);
        let word = swapped.to_le_bytes();
        chunk.copy_from_slice(&word[..chunk.len()]);
    }
}
