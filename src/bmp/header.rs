//! Fixed-layout BMP file and info headers.
//!
//! Every multi-byte field crosses the format boundary through
//! `from_le_bytes`/`to_le_bytes`, field by field — never as a raw struct
//! image, so parsing is independent of host endianness and struct padding.

use crate::error::ImageError;

pub(crate) const FILE_HEADER_SIZE: usize = 14;
pub(crate) const INFO_HEADER_SIZE: usize = 40;
/// Offset of the color table (when present): both headers back to back.
pub(crate) const HEADERS_SIZE: usize = FILE_HEADER_SIZE + INFO_HEADER_SIZE;

const SIGNATURE: [u8; 2] = *b"BM";

/// BMP file header, minus the two-byte signature.
///
/// The signature is validated on parse and emitted as a constant on write;
/// a [`FileHeader`] value therefore always describes a well-signed file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FileHeader {
    /// Total file size in bytes (informational, not validated).
    pub file_size: u32,
    /// Reserved field, carried through verbatim.
    pub reserved: u32,
    /// Byte offset of the pixel data from the start of the file.
    pub data_offset: u32,
}

/// BITMAPINFOHEADER with the height sign already split off: `height` holds
/// the magnitude, the scan direction lives in a separate [`Orientation`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InfoHeader {
    pub header_size: u32,
    pub width: u32,
    pub height: u32,
    pub planes: u16,
    pub bit_depth: u16,
    pub compression: u32,
    /// Pixel data size in bytes (informational).
    pub image_size: u32,
    pub x_pixels_per_meter: i32,
    pub y_pixels_per_meter: i32,
    pub colors_used: u32,
    pub important_colors: u32,
}

/// Row order of the scanlines in the file.
///
/// On disk this is the sign of the height field: negative height means
/// top-down storage. The sign convention exists only in this module.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Orientation {
    /// The first scanline in the file is the visually bottom row.
    #[default]
    BottomUp,
    /// The first scanline in the file is the visually top row.
    TopDown,
}

/// One color-table entry in on-disk order: blue, green, red, reserved.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ColorEntry {
    pub blue: u8,
    pub green: u8,
    pub red: u8,
    pub reserved: u8,
}

// ── Byte cursor ─────────────────────────────────────────────────────

/// Positioned reader over the raw file bytes. Strict: any read past the end
/// of the input is an [`ImageError::UnexpectedEof`].
pub(crate) struct Cursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub(crate) fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    pub(crate) fn set_position(&mut self, pos: usize) -> Result<(), ImageError> {
        if pos > self.data.len() {
            return Err(ImageError::UnexpectedEof);
        }
        self.pos = pos;
        Ok(())
    }

    pub(crate) fn get_u16_le(&mut self) -> Result<u16, ImageError> {
        Ok(u16::from_le_bytes(self.read_fixed_bytes::<2>()?))
    }

    pub(crate) fn get_u32_le(&mut self) -> Result<u32, ImageError> {
        Ok(u32::from_le_bytes(self.read_fixed_bytes::<4>()?))
    }

    pub(crate) fn get_i32_le(&mut self) -> Result<i32, ImageError> {
        Ok(i32::from_le_bytes(self.read_fixed_bytes::<4>()?))
    }

    pub(crate) fn read_fixed_bytes<const N: usize>(&mut self) -> Result<[u8; N], ImageError> {
        let end = self.pos.checked_add(N).ok_or(ImageError::UnexpectedEof)?;
        if end > self.data.len() {
            return Err(ImageError::UnexpectedEof);
        }
        let mut buf = [0u8; N];
        buf.copy_from_slice(&self.data[self.pos..end]);
        self.pos = end;
        Ok(buf)
    }

    /// Borrow the next `n` bytes without copying.
    pub(crate) fn read_slice(&mut self, n: usize) -> Result<&'a [u8], ImageError> {
        let end = self.pos.checked_add(n).ok_or(ImageError::UnexpectedEof)?;
        if end > self.data.len() {
            return Err(ImageError::UnexpectedEof);
        }
        let slice = &self.data[self.pos..end];
        self.pos = end;
        Ok(slice)
    }
}

// ── Parsing ─────────────────────────────────────────────────────────

/// Parse the 14-byte file header at the cursor. The signature is checked
/// before any other field is touched.
pub(crate) fn parse_file_header(cur: &mut Cursor) -> Result<FileHeader, ImageError> {
    if cur.read_fixed_bytes::<2>()? != SIGNATURE {
        return Err(ImageError::BadSignature);
    }
    Ok(FileHeader {
        file_size: cur.get_u32_le()?,
        reserved: cur.get_u32_le()?,
        data_offset: cur.get_u32_le()?,
    })
}

/// Parse the 40-byte info header, normalizing a negative height into an
/// unsigned magnitude plus [`Orientation::TopDown`].
pub(crate) fn parse_info_header(
    cur: &mut Cursor,
) -> Result<(InfoHeader, Orientation), ImageError> {
    let header_size = cur.get_u32_le()?;
    let width = cur.get_i32_le()?;
    let raw_height = cur.get_i32_le()?;
    let planes = cur.get_u16_le()?;
    let bit_depth = cur.get_u16_le()?;
    let compression = cur.get_u32_le()?;
    let image_size = cur.get_u32_le()?;
    let x_pixels_per_meter = cur.get_i32_le()?;
    let y_pixels_per_meter = cur.get_i32_le()?;
    let colors_used = cur.get_u32_le()?;
    let important_colors = cur.get_u32_le()?;

    if width < 0 {
        return Err(ImageError::InvalidHeader(format!(
            "negative width {width}"
        )));
    }
    let orientation = if raw_height < 0 {
        Orientation::TopDown
    } else {
        Orientation::BottomUp
    };

    Ok((
        InfoHeader {
            header_size,
            width: width as u32,
            height: raw_height.unsigned_abs(),
            planes,
            bit_depth,
            compression,
            image_size,
            x_pixels_per_meter,
            y_pixels_per_meter,
            colors_used,
            important_colors,
        },
        orientation,
    ))
}

/// Read `count` 4-byte color-table entries at the cursor.
pub(crate) fn parse_color_table(
    cur: &mut Cursor,
    count: usize,
) -> Result<Vec<ColorEntry>, ImageError> {
    let mut table = Vec::with_capacity(count.min(256));
    for _ in 0..count {
        let [blue, green, red, reserved] = cur.read_fixed_bytes::<4>()?;
        table.push(ColorEntry {
            blue,
            green,
            red,
            reserved,
        });
    }
    Ok(table)
}

// ── Serialization ───────────────────────────────────────────────────

pub(crate) fn write_file_header(out: &mut Vec<u8>, header: &FileHeader) {
    out.extend_from_slice(&SIGNATURE);
    out.extend_from_slice(&header.file_size.to_le_bytes());
    out.extend_from_slice(&header.reserved.to_le_bytes());
    out.extend_from_slice(&header.data_offset.to_le_bytes());
}

pub(crate) fn write_info_header(out: &mut Vec<u8>, info: &InfoHeader, orientation: Orientation) {
    let signed_height = match orientation {
        Orientation::BottomUp => info.height as i32,
        Orientation::TopDown => -(info.height as i32),
    };
    out.extend_from_slice(&info.header_size.to_le_bytes());
    out.extend_from_slice(&(info.width as i32).to_le_bytes());
    out.extend_from_slice(&signed_height.to_le_bytes());
    out.extend_from_slice(&info.planes.to_le_bytes());
    out.extend_from_slice(&info.bit_depth.to_le_bytes());
    out.extend_from_slice(&info.compression.to_le_bytes());
    out.extend_from_slice(&info.image_size.to_le_bytes());
    out.extend_from_slice(&info.x_pixels_per_meter.to_le_bytes());
    out.extend_from_slice(&info.y_pixels_per_meter.to_le_bytes());
    out.extend_from_slice(&info.colors_used.to_le_bytes());
    out.extend_from_slice(&info.important_colors.to_le_bytes());
}

pub(crate) fn write_color_table(out: &mut Vec<u8>, table: &[ColorEntry]) {
    for entry in table {
        out.extend_from_slice(&[entry.blue, entry.green, entry.red, entry.reserved]);
    }
}
