//! # rastertex
//!
//! A two-stage image pipeline for software rasterizers:
//!
//! 1. [`BmpImage`] — an uncompressed Windows BMP codec. Decodes and encodes
//!    the on-disk format (palette images and all of the 1/4/8/24/32 bit
//!    depths) into a row-major pixel buffer in the file's native channel
//!    layout, with scanline padding stripped on load and re-emitted as
//!    explicit zeros on store.
//! 2. [`UniformImage`] — the normalized, top-left-origin, 3-channel buffer
//!    the renderer actually samples. Built once from a decoded 24-bit BMP
//!    (performing the vertical flip), convertible between RGB and BGR in
//!    place, and sampled per fragment with nearest or bilinear filtering.
//!
//! ## Non-goals
//!
//! - Raster formats other than uncompressed BMP (no RLE, no bitfields)
//! - Color management beyond the fixed [`ColorSpace`] tags
//! - GPU or portable-SIMD acceleration (the wide conversion path is a plain
//!   `u128` fast path, validated against the scalar one)
//!
//! ## Usage
//!
//! ```no_run
//! use rastertex::{BmpImage, ColorSpace, TextureFilter, UniformImage};
//!
//! let bmp = BmpImage::load("checker.bmp")?;
//! let mut texture = UniformImage::from_bmp(&bmp)?;
//! texture.convert_color_space(ColorSpace::Rgb)?;
//!
//! // Per fragment, with the renderer's filtering setting:
//! let color = texture.sample([0.25, 0.75], TextureFilter::Bilinear);
//! # Ok::<(), rastertex::ImageError>(())
//! ```
//!
//! All fallible operations return `Result`; a failed decode or construction
//! yields no instance, so there is no half-initialized state to check for.

#![forbid(unsafe_code)]

mod error;
mod sample;
mod uniform;

pub mod bmp;

pub use bmp::{BmpImage, ChannelLayout, ColorEntry, FileHeader, InfoHeader, Orientation};
pub use error::ImageError;
pub use sample::TextureFilter;
pub use uniform::{ColorSpace, UniformImage};
