use rastertex::{BmpImage, ImageError, Orientation, UniformImage};

/// Build a minimal uncompressed BMP byte vector by hand.
///
/// `rows` are scanlines in file order, already unpadded; padding and the
/// color table are laid out exactly as the format requires.
fn build_bmp(width: i32, height: i32, bit_depth: u16, palette: &[[u8; 4]], rows: &[&[u8]]) -> Vec<u8> {
    let data_offset = 54 + palette.len() * 4;
    let mut out = Vec::new();
    out.extend_from_slice(b"BM");
    out.extend_from_slice(&0u32.to_le_bytes()); // file size (informational)
    out.extend_from_slice(&0u32.to_le_bytes()); // reserved
    out.extend_from_slice(&(data_offset as u32).to_le_bytes());

    out.extend_from_slice(&40u32.to_le_bytes());
    out.extend_from_slice(&width.to_le_bytes());
    out.extend_from_slice(&height.to_le_bytes());
    out.extend_from_slice(&1u16.to_le_bytes()); // planes
    out.extend_from_slice(&bit_depth.to_le_bytes());
    out.extend_from_slice(&0u32.to_le_bytes()); // compression
    out.extend_from_slice(&0u32.to_le_bytes()); // image size
    out.extend_from_slice(&0i32.to_le_bytes()); // x pixels per meter
    out.extend_from_slice(&0i32.to_le_bytes()); // y pixels per meter
    out.extend_from_slice(&(palette.len() as u32).to_le_bytes());
    out.extend_from_slice(&0u32.to_le_bytes()); // important colors

    for entry in palette {
        out.extend_from_slice(entry);
    }
    for row in rows {
        out.extend_from_slice(row);
        let pad = row.len().div_ceil(4) * 4 - row.len();
        out.extend(std::iter::repeat_n(0u8, pad));
    }
    out
}

#[test]
fn blank_image_round_trips_through_bytes() {
    // Width 5 forces one pad byte per scanline.
    let mut image = BmpImage::blank(5, 3);
    for (i, byte) in image.pixels_mut().iter_mut().enumerate() {
        *byte = (i * 7 + 3) as u8;
    }

    let encoded = image.to_bytes();
    assert_eq!(&encoded[0..2], b"BM");

    let decoded = BmpImage::from_bytes(&encoded).unwrap();
    assert_eq!(decoded.width(), 5);
    assert_eq!(decoded.height(), 3);
    assert_eq!(decoded.bit_depth(), 24);
    assert_eq!(decoded.orientation(), Orientation::BottomUp);
    assert_eq!(decoded.pixels(), image.pixels());
}

#[test]
fn store_then_load_round_trips_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.bmp");

    let mut image = BmpImage::blank(4, 2);
    *image.at_mut(0, 0, 0) = 255;
    *image.at_mut(1, 3, 2) = 128;
    image.store(&path).unwrap();

    let loaded = BmpImage::load(&path).unwrap();
    assert_eq!(loaded.width(), 4);
    assert_eq!(loaded.height(), 2);
    assert_eq!(loaded.pixels(), image.pixels());
    assert_eq!(loaded.source_path(), Some(path.as_path()));
}

#[test]
fn stored_file_has_no_unwritten_gaps() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("padded.bmp");

    // Width 3 at 24 bpp: 9 data bytes, 3 pad bytes per scanline.
    let mut image = BmpImage::blank(3, 2);
    image.pixels_mut().fill(0xEE);
    image.store(&path).unwrap();

    let raw = std::fs::read(&path).unwrap();
    assert_eq!(raw.len(), 54 + 2 * 12);
    for row in 0..2 {
        let start = 54 + row * 12;
        assert!(raw[start..start + 9].iter().all(|&b| b == 0xEE));
        assert_eq!(&raw[start + 9..start + 12], &[0, 0, 0]);
    }
}

#[test]
fn load_missing_file_fails_without_an_instance() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("does-not-exist.bmp");
    match BmpImage::load(&path) {
        Err(ImageError::FileOpen { path: p, .. }) => assert_eq!(p, path),
        other => panic!("expected FileOpen, got {other:?}"),
    }
}

#[test]
fn bad_signature_is_a_format_error() {
    let mut bytes = BmpImage::blank(2, 2).to_bytes();
    bytes[0] = b'X';
    match BmpImage::from_bytes(&bytes) {
        Err(ImageError::BadSignature) => {}
        other => panic!("expected BadSignature, got {other:?}"),
    }
}

#[test]
fn truncated_pixel_data_is_eof() {
    let mut bytes = BmpImage::blank(4, 4).to_bytes();
    bytes.truncate(bytes.len() - 5);
    match BmpImage::from_bytes(&bytes) {
        Err(ImageError::UnexpectedEof) => {}
        other => panic!("expected UnexpectedEof, got {other:?}"),
    }
}

#[test]
fn compressed_files_are_rejected() {
    let mut bytes = BmpImage::blank(2, 2).to_bytes();
    bytes[30..34].copy_from_slice(&1u32.to_le_bytes()); // BI_RLE8
    match BmpImage::from_bytes(&bytes) {
        Err(ImageError::UnsupportedCompression(1)) => {}
        other => panic!("expected UnsupportedCompression, got {other:?}"),
    }
}

#[test]
fn unsupported_bit_depth_is_rejected_before_allocation() {
    let bytes = build_bmp(2, 1, 16, &[], &[&[0u8, 0, 0, 0][..]]);
    match BmpImage::from_bytes(&bytes) {
        Err(ImageError::UnsupportedBitDepth(16)) => {}
        other => panic!("expected UnsupportedBitDepth, got {other:?}"),
    }
}

#[test]
fn palette_image_decodes_table_and_indices() {
    let palette = [[10, 20, 30, 0], [200, 150, 100, 0]];
    // 3x2 at 8 bpp: 3 data bytes per row, padded to 4.
    let bytes = build_bmp(3, 2, 8, &palette, &[&[0u8, 1, 0][..], &[1, 1, 1][..]]);

    let image = BmpImage::from_bytes(&bytes).unwrap();
    assert_eq!(image.width(), 3);
    assert_eq!(image.height(), 2);
    assert_eq!(image.channels(), Some(1));
    let table = image.color_table().unwrap();
    assert_eq!(table.len(), 2);
    assert_eq!((table[1].blue, table[1].green, table[1].red), (200, 150, 100));
    assert_eq!(image.pixels(), &[0, 1, 0, 1, 1, 1]);

    // Palette layout survives re-encoding.
    let reencoded = image.to_bytes();
    assert_eq!(reencoded, bytes);
}

#[test]
fn packed_one_bit_image_strips_padding() {
    let palette = [[0, 0, 0, 0], [255, 255, 255, 0]];
    // Width 7 at 1 bpp: one meaningful byte per row, three pad bytes.
    let bytes = build_bmp(7, 2, 1, &palette, &[&[0b1010_1010u8][..], &[0b0101_0100][..]]);

    let image = BmpImage::from_bytes(&bytes).unwrap();
    assert_eq!(image.row_data_bytes(), 1);
    assert_eq!(image.channels(), None);
    assert_eq!(image.pixels(), &[0b1010_1010, 0b0101_0100]);
}

#[test]
fn top_down_files_round_trip_the_height_sign() {
    let bytes = build_bmp(2, -2, 24, &[], &[&[1u8; 6][..], &[2u8; 6][..]]);
    let image = BmpImage::from_bytes(&bytes).unwrap();
    assert_eq!(image.height(), 2);
    assert_eq!(image.orientation(), Orientation::TopDown);

    let reencoded = image.to_bytes();
    let raw_height = i32::from_le_bytes(reencoded[22..26].try_into().unwrap());
    assert_eq!(raw_height, -2);
}

#[test]
fn set_reverse_y_only_changes_the_written_sign() {
    let mut image = BmpImage::blank(2, 3);
    let before = image.pixels().to_vec();
    image.set_reverse_y(true);
    assert_eq!(image.pixels(), &before[..]);

    let bytes = image.to_bytes();
    let raw_height = i32::from_le_bytes(bytes[22..26].try_into().unwrap());
    assert_eq!(raw_height, -3);

    let decoded = BmpImage::from_bytes(&bytes).unwrap();
    assert_eq!(decoded.height(), 3);
    assert_eq!(decoded.orientation(), Orientation::TopDown);
}

#[test]
fn full_pipeline_from_file_to_sampled_texel() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("texture.bmp");

    // Bottom-up 2x2: file row 0 is the visually bottom row.
    let mut bmp = BmpImage::blank(2, 2);
    // Bottom-left pixel, stored B,G,R: pure red.
    *bmp.at_mut(0, 0, 2) = 255;
    bmp.store(&path).unwrap();

    let loaded = BmpImage::load(&path).unwrap();
    let mut texture = UniformImage::from_bmp(&loaded).unwrap();
    assert_eq!(texture.color_space(), rastertex::ColorSpace::Bgr);
    texture.convert_color_space(rastertex::ColorSpace::Rgb).unwrap();

    // v = 0 samples the visually bottom row.
    let color = texture.sample([0.0, 0.0], rastertex::TextureFilter::Nearest);
    assert_eq!(color, [255.0, 0.0, 0.0]);
}
