use retroraster::*;

fn distinct_palette(n: usize) -> Palette {
    let mut p = Palette::new();
    p.set_color_count(n);
    for i in 0..n {
        p.set_rgb(i, i as u8, 255 - i as u8, (i as u8).wrapping_mul(11));
    }
    p
}

fn assert_roundtrip(data: &[u8], layout: &LayoutDescriptor, palette: &Palette) {
    let raster = DecodeRequest::new(data, layout)
        .with_palette(palette)
        .decode(Unstoppable)
        .unwrap();
    let encoded = EncodeRequest::new(layout)
        .with_palette(palette)
        .encode(&raster, Unstoppable)
        .unwrap();
    assert_eq!(encoded, data, "byte round trip");

    let again = DecodeRequest::new(&encoded, layout)
        .with_palette(palette)
        .decode(Unstoppable)
        .unwrap();
    assert_eq!(again, raster, "raster round trip");
}

#[test]
fn packed_4bpp_roundtrip() {
    let layout = LayoutDescriptor::packed(8, 2, 4).unwrap();
    let palette = distinct_palette(16);
    let data = [0x01, 0x23, 0x45, 0x67, 0x89, 0xab, 0xcd, 0xef];
    assert_roundtrip(&data, &layout, &palette);
}

#[test]
fn packed_1bpp_roundtrip() {
    let layout = LayoutDescriptor::packed(16, 4, 1).unwrap();
    let palette = distinct_palette(2);
    let data = [0xa5, 0x3c, 0xff, 0x00, 0x81, 0x7e, 0x55, 0xaa];
    assert_roundtrip(&data, &layout, &palette);
}

#[test]
fn packed_8bpp_roundtrip() {
    let layout = LayoutDescriptor::packed(4, 2, 8).unwrap();
    let palette = distinct_palette(256);
    let data = [0, 17, 170, 255, 3, 128, 64, 32];
    assert_roundtrip(&data, &layout, &palette);
}

#[test]
fn planar_st_style_roundtrip() {
    // Atari-ST-like: 4 planes of big-endian 16-bit words.
    let layout = LayoutDescriptor::planar(16, 2, 4, 16)
        .unwrap()
        .with_big_endian(true)
        .unwrap();
    assert_eq!(layout.stride(), 8);
    let palette = distinct_palette(16);
    let data = [
        0x12, 0x34, 0x56, 0x78, 0x9a, 0xbc, 0xde, 0xf0, // row 0
        0x0f, 0xf0, 0x3c, 0xc3, 0xa5, 0x5a, 0x00, 0xff, // row 1
    ];
    assert_roundtrip(&data, &layout, &palette);
}

#[test]
fn planar_8bit_words_roundtrip() {
    let layout = LayoutDescriptor::planar(8, 3, 3, 8).unwrap();
    let palette = distinct_palette(8);
    let data = [0x81, 0x42, 0x24, 0x18, 0x99, 0x66, 0xff, 0x00, 0x5a];
    assert_roundtrip(&data, &layout, &palette);
}

#[test]
fn rgb565_roundtrip_both_endians() {
    let data = [0xf8, 0x00, 0x07, 0xe0, 0x00, 0x1f, 0x12, 0x34];
    for &big_endian in &[false, true] {
        let layout = LayoutDescriptor::packed(4, 1, 16)
            .unwrap()
            .with_pixel_format(PixelFormat::Rgb565)
            .unwrap()
            .with_big_endian(big_endian)
            .unwrap();
        assert_roundtrip(&data, &layout, &Palette::new());
    }
}

#[test]
fn rgb555_roundtrip() {
    // Top bit is unused and never re-emitted, so keep it clear.
    let data = [0x00, 0x7c, 0xe0, 0x03, 0x1f, 0x00, 0x34, 0x12];
    let layout = LayoutDescriptor::packed(4, 1, 16)
        .unwrap()
        .with_pixel_format(PixelFormat::Rgb555)
        .unwrap();
    assert_roundtrip(&data, &layout, &Palette::new());
}

#[test]
fn rgb24_with_alpha_roundtrip() {
    let layout = LayoutDescriptor::packed(2, 2, 24)
        .unwrap()
        .with_alpha_plane(true)
        .unwrap();
    assert_eq!(layout.stride(), 8);
    let data = [
        255, 0, 0, 255, 0, 255, 0, 128, //
        0, 0, 255, 0, 10, 20, 30, 200,
    ];
    assert_roundtrip(&data, &layout, &Palette::new());
}

#[test]
fn planar_with_mask_plane_roundtrip() {
    // Mask bits regenerate from alpha >= 128, so fully-set masks round-trip.
    let layout = LayoutDescriptor::planar(8, 1, 2, 8)
        .unwrap()
        .with_mask_plane(true)
        .unwrap();
    let palette = distinct_palette(4);
    let data = [0xc3, 0x3c, 0xff];
    assert_roundtrip(&data, &layout, &palette);
}

#[test]
fn encode_rejects_size_mismatch() {
    let layout = LayoutDescriptor::packed(8, 8, 8).unwrap();
    let raster = DecodeRequest::new(&[0u8; 64], &layout)
        .decode(Unstoppable)
        .unwrap();

    let other = LayoutDescriptor::packed(16, 16, 8).unwrap();
    let err = EncodeRequest::new(&other)
        .encode(&raster, Unstoppable)
        .unwrap_err();
    match err {
        RasterError::EncodingOverflow {
            expected_width,
            actual_width,
            ..
        } => {
            assert_eq!(expected_width, 16);
            assert_eq!(actual_width, 8);
        }
        other => panic!("expected EncodingOverflow, got {other:?}"),
    }
}

#[test]
fn encode_nearest_match_for_foreign_colors() {
    let layout = LayoutDescriptor::packed(1, 1, 8).unwrap();
    let mut palette = Palette::new();
    palette.set_color_count(2);
    palette.set_rgb(0, 0, 0, 0);
    palette.set_rgb(1, 200, 200, 200);

    // Decode under a richer palette, then re-encode under the 2-entry one.
    let rich_layout = LayoutDescriptor::packed(1, 1, 8).unwrap();
    let mut rich = Palette::new();
    rich.set_rgb(7, 190, 190, 190);
    let raster = DecodeRequest::new(&[7], &rich_layout)
        .with_palette(&rich)
        .decode(Unstoppable)
        .unwrap();

    let encoded = EncodeRequest::new(&layout)
        .with_palette(&palette)
        .encode(&raster, Unstoppable)
        .unwrap();
    assert_eq!(encoded, [1]);
}
