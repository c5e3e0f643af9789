//! BMP encode: serialize headers, color table, and padded scanlines.
//!
//! Scanline padding and the gap between the headers and `data_offset` are
//! written as explicit zero bytes, so the output never relies on
//! storage-backend behavior for unwritten regions.

use super::header;
use super::BmpImage;

pub(crate) fn encode(image: &BmpImage) -> Vec<u8> {
    let row_bytes = image.row_data_bytes();
    let scan_bytes = row_bytes.div_ceil(4) * 4;
    let data_offset = image.file_header.data_offset as usize;

    let mut out = Vec::with_capacity(data_offset + scan_bytes * image.height());
    header::write_file_header(&mut out, &image.file_header);
    header::write_info_header(&mut out, &image.info, image.orientation);
    if let Some(table) = &image.color_table {
        header::write_color_table(&mut out, table);
    }

    if out.len() < data_offset {
        out.resize(data_offset, 0);
    }

    let pad = scan_bytes - row_bytes;
    if row_bytes > 0 {
        for row in image.data.chunks_exact(row_bytes) {
            out.extend_from_slice(row);
            out.extend(std::iter::repeat_n(0u8, pad));
        }
    }
    out
}
