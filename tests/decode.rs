use retroraster::*;

fn gray_palette(n: usize) -> Palette {
    // Distinct RGB per index so exact matching is unambiguous.
    let mut p = Palette::new();
    p.set_color_count(n);
    for i in 0..n {
        p.set_rgb(i, i as u8, (i as u8).wrapping_mul(3), (i as u8).wrapping_mul(7));
    }
    p
}

#[test]
fn packed_1bpp_all_ones_uses_index_1() {
    let layout = LayoutDescriptor::packed(8, 8, 1).unwrap();
    let mut palette = Palette::new();
    palette.set_rgb(0, 10, 20, 30);
    palette.set_rgb(1, 200, 100, 50);

    let data = [0xffu8; 8];
    let raster = DecodeRequest::new(&data, &layout)
        .with_palette(&palette)
        .decode(Unstoppable)
        .unwrap();

    assert_eq!(raster.width(), 8);
    assert_eq!(raster.height(), 8);
    for y in 0..8 {
        for x in 0..8 {
            assert_eq!(raster.pixel(x, y), palette.lookup(1));
        }
    }
}

#[test]
fn packed_sub_byte_is_msb_first() {
    // 4 bpp: 0x12 is pixel 0 = 1, pixel 1 = 2.
    let layout = LayoutDescriptor::packed(2, 1, 4).unwrap();
    let palette = gray_palette(16);
    let raster = DecodeRequest::new(&[0x12], &layout)
        .with_palette(&palette)
        .decode(Unstoppable)
        .unwrap();
    assert_eq!(raster.pixel(0, 0), palette.lookup(1));
    assert_eq!(raster.pixel(1, 0), palette.lookup(2));
}

#[test]
fn packed_index_range_bounded_by_depth() {
    for &bpp in &[1u32, 2, 4, 8] {
        let layout = LayoutDescriptor::packed(16, 4, bpp).unwrap();
        let palette = gray_palette(256);
        let data = vec![0b1011_0110u8; layout.stride() * 4];
        let raster = DecodeRequest::new(&data, &layout)
            .with_palette(&palette)
            .decode(Unstoppable)
            .unwrap();

        let mut seen = std::collections::BTreeSet::new();
        for y in 0..4 {
            for x in 0..16 {
                let c = raster.pixel(x, y);
                seen.insert((c.r, c.g, c.b));
            }
        }
        assert!(seen.len() <= 1 << bpp, "bpp {bpp}: {} distinct", seen.len());
    }
}

#[test]
fn planar_plane_bit_order() {
    // 2 planes of 8-bit words: [plane0, plane1] per chunk, bit 7 is pixel 0.
    let layout = LayoutDescriptor::planar(8, 1, 2, 8).unwrap();
    let palette = gray_palette(4);

    let raster = DecodeRequest::new(&[0x01, 0x00], &layout)
        .with_palette(&palette)
        .decode(Unstoppable)
        .unwrap();
    for x in 0..7 {
        assert_eq!(raster.pixel(x, 0), palette.lookup(0));
    }
    assert_eq!(raster.pixel(7, 0), palette.lookup(0b01));

    // Same bit in plane 1 lands in index bit 1.
    let raster = DecodeRequest::new(&[0x00, 0x01], &layout)
        .with_palette(&palette)
        .decode(Unstoppable)
        .unwrap();
    assert_eq!(raster.pixel(7, 0), palette.lookup(0b10));
}

#[test]
fn planar_16bit_words_respect_endianness() {
    let layout = LayoutDescriptor::planar(16, 1, 2, 16)
        .unwrap()
        .with_big_endian(true)
        .unwrap();
    let palette = gray_palette(4);

    // Plane 0 word 0x8000 (pixel 0), plane 1 word 0x0001 (pixel 15).
    let data = [0x80, 0x00, 0x00, 0x01];
    let raster = DecodeRequest::new(&data, &layout)
        .with_palette(&palette)
        .decode(Unstoppable)
        .unwrap();
    assert_eq!(raster.pixel(0, 0), palette.lookup(1));
    assert_eq!(raster.pixel(15, 0), palette.lookup(2));

    // Little-endian: same words, byte-swapped.
    let layout = layout.with_big_endian(false).unwrap();
    let data = [0x00, 0x80, 0x01, 0x00];
    let raster = DecodeRequest::new(&data, &layout)
        .with_palette(&palette)
        .decode(Unstoppable)
        .unwrap();
    assert_eq!(raster.pixel(0, 0), palette.lookup(1));
    assert_eq!(raster.pixel(15, 0), palette.lookup(2));
}

#[test]
fn planar_stride_interleaves_chunks() {
    // 16 pixels wide, 8-bit words, 2 planes: chunk layout p0 p1 p0 p1.
    let layout = LayoutDescriptor::planar(16, 1, 2, 8).unwrap();
    assert_eq!(layout.stride(), 4);
    let palette = gray_palette(4);

    // Second chunk: plane 0 = 0xff.
    let data = [0x00, 0x00, 0xff, 0x00];
    let raster = DecodeRequest::new(&data, &layout)
        .with_palette(&palette)
        .decode(Unstoppable)
        .unwrap();
    assert_eq!(raster.pixel(0, 0), palette.lookup(0));
    assert_eq!(raster.pixel(8, 0), palette.lookup(1));
    assert_eq!(raster.pixel(15, 0), palette.lookup(1));
}

#[test]
fn direct_16bit_formats_unpack() {
    let data_be = [0xf8, 0x00]; // RGB565 pure red, big-endian
    let layout = LayoutDescriptor::packed(1, 1, 16)
        .unwrap()
        .with_pixel_format(PixelFormat::Rgb565)
        .unwrap()
        .with_big_endian(true)
        .unwrap();
    let raster = DecodeRequest::new(&data_be, &layout)
        .decode(Unstoppable)
        .unwrap();
    assert_eq!(raster.pixel(0, 0), RGBA8::new(255, 0, 0, 255));

    let layout = layout.with_big_endian(false).unwrap();
    let raster = DecodeRequest::new(&[0x00, 0xf8], &layout)
        .decode(Unstoppable)
        .unwrap();
    assert_eq!(raster.pixel(0, 0), RGBA8::new(255, 0, 0, 255));

    // RGB555 green: 0b0000_0011_1110_0000
    let layout = layout.with_pixel_format(PixelFormat::Rgb555).unwrap();
    let raster = DecodeRequest::new(&[0xe0, 0x03], &layout)
        .decode(Unstoppable)
        .unwrap();
    assert_eq!(raster.pixel(0, 0), RGBA8::new(0, 255, 0, 255));
}

#[test]
fn argb555_alpha_bit_and_mask() {
    // Alpha bit clear, red channel max.
    let word = 0x7c00u16;
    let base = LayoutDescriptor::packed(1, 1, 16)
        .unwrap()
        .with_pixel_format(PixelFormat::Argb555)
        .unwrap();

    // No alpha/mask flag: opaque regardless of the bit.
    let raster = DecodeRequest::new(&word.to_le_bytes(), &base)
        .decode(Unstoppable)
        .unwrap();
    assert_eq!(raster.pixel(0, 0).a, 255);

    // Alpha channel: bit drives alpha.
    let layout = base.with_alpha_plane(true).unwrap();
    let raster = DecodeRequest::new(&word.to_le_bytes(), &layout)
        .decode(Unstoppable)
        .unwrap();
    assert_eq!(raster.pixel(0, 0), RGBA8::new(255, 0, 0, 0));

    // Mask: a clear bit blanks the color entirely.
    let layout = base.with_mask_plane(true).unwrap();
    let raster = DecodeRequest::new(&word.to_le_bytes(), &layout)
        .decode(Unstoppable)
        .unwrap();
    assert_eq!(raster.pixel(0, 0), RGBA8::new(0, 0, 0, 0));
}

#[test]
fn planar_alpha_and_mask_planes() {
    // 2 color planes + 1 extra plane, 8 pixels.
    let layout = LayoutDescriptor::planar(8, 1, 2, 8)
        .unwrap()
        .with_alpha_plane(true)
        .unwrap();
    assert_eq!(layout.stride(), 3);
    let palette = gray_palette(4);

    // Color index 3 everywhere, alpha plane covers pixel 0 only.
    let data = [0xff, 0xff, 0x80];
    let raster = DecodeRequest::new(&data, &layout)
        .with_palette(&palette)
        .decode(Unstoppable)
        .unwrap();
    let solid = palette.lookup(3);
    assert_eq!(raster.pixel(0, 0), solid);
    assert_eq!(raster.pixel(1, 0), RGBA8::new(solid.r, solid.g, solid.b, 0));

    // Mask plane: uncovered pixels become transparent black.
    let layout = layout.with_mask_plane(true).unwrap();
    let raster = DecodeRequest::new(&data, &layout)
        .with_palette(&palette)
        .decode(Unstoppable)
        .unwrap();
    assert_eq!(raster.pixel(0, 0), solid);
    assert_eq!(raster.pixel(1, 0), RGBA8::new(0, 0, 0, 0));
}

#[test]
fn packed_mask_uses_transparent_index() {
    let layout = LayoutDescriptor::packed(4, 1, 8)
        .unwrap()
        .with_mask_plane(true)
        .unwrap();
    let mut palette = gray_palette(16);
    palette.set_transparent_index(Some(2));

    let raster = DecodeRequest::new(&[0, 1, 2, 3], &layout)
        .with_palette(&palette)
        .decode(Unstoppable)
        .unwrap();
    assert_eq!(raster.pixel(1, 0), palette.lookup(1));
    assert_eq!(raster.pixel(2, 0), RGBA8::new(0, 0, 0, 0));
}

#[test]
fn padding_extends_stride() {
    let layout = LayoutDescriptor::packed(8, 2, 1)
        .unwrap()
        .with_padding(2)
        .unwrap();
    assert_eq!(layout.stride(), 3);

    let mut palette = Palette::new();
    palette.set_rgb(1, 255, 255, 255);
    // Padding bytes (0xaa) must not leak into row 1.
    let data = [0xff, 0xaa, 0xaa, 0x00, 0xaa, 0xaa];
    let raster = DecodeRequest::new(&data, &layout)
        .with_palette(&palette)
        .decode(Unstoppable)
        .unwrap();
    assert_eq!(raster.pixel(0, 0), palette.lookup(1));
    assert_eq!(raster.pixel(0, 1), palette.lookup(0));
}

#[test]
fn out_of_range_is_reported() {
    let layout = LayoutDescriptor::packed(4, 2, 8).unwrap();
    let data = [0u8; 7]; // needs 8
    let err = DecodeRequest::new(&data, &layout)
        .decode(Unstoppable)
        .unwrap_err();
    match err {
        RasterError::OutOfRange {
            needed, available, ..
        } => {
            assert_eq!(needed, 8);
            assert_eq!(available, 7);
        }
        other => panic!("expected OutOfRange, got {other:?}"),
    }
}

#[test]
fn byte_offset_shifts_the_window() {
    let layout = LayoutDescriptor::packed(2, 1, 8)
        .unwrap()
        .with_byte_offset(3)
        .unwrap();
    let palette = gray_palette(256);
    let data = [9u8, 9, 9, 5, 6];
    let raster = DecodeRequest::new(&data, &layout)
        .with_palette(&palette)
        .decode(Unstoppable)
        .unwrap();
    assert_eq!(raster.pixel(0, 0), palette.lookup(5));
    assert_eq!(raster.pixel(1, 0), palette.lookup(6));
}

#[test]
fn missing_palette_yields_fallback() {
    let layout = LayoutDescriptor::packed(4, 1, 8).unwrap();
    let raster = DecodeRequest::new(&[0, 50, 100, 200], &layout)
        .decode(Unstoppable)
        .unwrap();
    for x in 0..4 {
        assert_eq!(raster.pixel(x, 0), FALLBACK_COLOR);
    }
}

#[test]
fn limits_cap_frame_bytes_and_width() {
    let layout = LayoutDescriptor::planar(320, 200, 4, 16)
        .unwrap()
        .with_big_endian(true)
        .unwrap();
    let data = vec![0u8; 32_000];

    let limits = Limits {
        max_frame_bytes: Some(16_000),
        ..Default::default()
    };
    let err = DecodeRequest::new(&data, &layout)
        .with_limits(&limits)
        .decode(Unstoppable)
        .unwrap_err();
    assert!(matches!(err, RasterError::LimitExceeded(_)));

    let limits = Limits {
        max_width: Some(256),
        ..Default::default()
    };
    let err = DecodeRequest::new(&data, &layout)
        .with_limits(&limits)
        .decode(Unstoppable)
        .unwrap_err();
    assert!(matches!(err, RasterError::LimitExceeded(_)));

    // Generous caps pass through.
    let limits = Limits {
        max_frame_bytes: Some(32_000),
        max_width: Some(320),
        max_memory_bytes: Some(320 * 200 * 4),
        ..Default::default()
    };
    DecodeRequest::new(&data, &layout)
        .with_limits(&limits)
        .decode(Unstoppable)
        .unwrap();
}

#[test]
fn limits_reject_large() {
    let layout = LayoutDescriptor::packed(8, 8, 8).unwrap();
    let limits = Limits {
        max_pixels: Some(1),
        ..Default::default()
    };
    let data = [0u8; 64];
    let result = DecodeRequest::new(&data, &layout)
        .with_limits(&limits)
        .decode(Unstoppable);
    match result.unwrap_err() {
        RasterError::LimitExceeded(_) => {}
        other => panic!("expected LimitExceeded, got {other:?}"),
    }
}
