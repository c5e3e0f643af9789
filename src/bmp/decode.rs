//! BMP decode: raw file bytes to an unpadded in-memory pixel buffer.

use log::debug;

use crate::error::ImageError;

use super::header::{self, Cursor, HEADERS_SIZE};
use super::{BmpImage, ChannelLayout};

pub(crate) fn decode(bytes: &[u8]) -> Result<BmpImage, ImageError> {
    let mut cur = Cursor::new(bytes);
    let file_header = header::parse_file_header(&mut cur)?;
    let (info, orientation) = header::parse_info_header(&mut cur)?;

    if info.planes != 1 {
        return Err(ImageError::InvalidHeader(format!(
            "planes field is {}, expected 1",
            info.planes
        )));
    }
    if info.compression != 0 {
        return Err(ImageError::UnsupportedCompression(info.compression));
    }
    if info.width == 0 || info.height == 0 {
        return Err(ImageError::InvalidHeader(format!(
            "degenerate dimensions {}x{}",
            info.width, info.height
        )));
    }
    let layout = ChannelLayout::from_bit_depth(info.bit_depth)?;

    let data_offset = file_header.data_offset as usize;
    if data_offset < HEADERS_SIZE || data_offset > bytes.len() {
        return Err(ImageError::InvalidHeader(format!(
            "pixel data offset {data_offset} outside the file"
        )));
    }

    // The color table sits right after the two headers, not at data_offset.
    let color_table = if info.bit_depth <= 8 {
        cur.set_position(HEADERS_SIZE)?;
        Some(header::parse_color_table(&mut cur, info.colors_used as usize)?)
    } else {
        None
    };

    let width = info.width as usize;
    let height = info.height as usize;
    let row_bytes = layout.row_data_bytes(width);
    let scan_bytes = row_bytes.div_ceil(4) * 4;
    let buffer_len = row_bytes
        .checked_mul(height)
        .ok_or_else(|| ImageError::InvalidHeader(format!(
            "dimensions {width}x{height} overflow the pixel buffer"
        )))?;

    // Scanlines land in the buffer in file order; reconciling the row order
    // with a top-left origin is the normalized image's job.
    cur.set_position(data_offset)?;
    let mut data = vec![0u8; buffer_len];
    for row in data.chunks_exact_mut(row_bytes) {
        let scanline = cur.read_slice(scan_bytes)?;
        row.copy_from_slice(&scanline[..row_bytes]);
    }

    debug!(
        "decoded {width}x{height} BMP, {} bpp, {:?}",
        info.bit_depth, orientation
    );

    Ok(BmpImage {
        file_header,
        info,
        orientation,
        layout,
        color_table,
        data,
        source: None,
    })
}
