use lyric_canvas_core::{
    generate_scheme, palette_from_pixels, parse_captions, AppConfig, CaptionTrack, ColorConfig,
    FrameComposer, PaletteColor, PixelBuffer, PlaybackClock, Rgb, SchemePolicy,
};

const LYRICS: &str = "\
1
00:00:00,500 --> 00:00:02,000
Under the paper moon

2
00:00:02,000 --> 00:00:04,250
we trace the silver line

3
00:00:06,000 --> 00:00:08,000
and hum it
one more time
";

/// Left half vivid orange, right half near-white background, with a
/// transparent border row.
fn cover() -> PixelBuffer {
    let (width, height) = (20u32, 10u32);
    let mut data = Vec::with_capacity((width * height * 4) as usize);
    for y in 0..height {
        for x in 0..width {
            let pixel = if y == 0 {
                [0, 0, 0, 0]
            } else if x < width / 2 {
                [230, 120, 20, 255]
            } else {
                [245, 245, 240, 255]
            };
            data.extend_from_slice(&pixel);
        }
    }
    PixelBuffer::from_rgba(width, height, data).unwrap()
}

#[test]
fn captions_drive_frame_snapshots() {
    let lines = parse_captions(LYRICS);
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[2].text, "and hum it\none more time");

    let composer = FrameComposer::new(CaptionTrack::new(lines));
    let at = |seconds| composer.snapshot(&PlaybackClock::at(seconds));

    assert_eq!(at(0.0).current_index, -1);
    assert_eq!(at(0.0).next_text.as_deref(), Some("Under the paper moon"));
    assert_eq!(at(2.0).current_text.as_deref(), Some("Under the paper moon"));
    assert_eq!(at(5.0).current_text, None);
    assert_eq!(at(5.0).last_shown_index, 1);
    assert_eq!(at(7.0).current_index, 2);
    assert_eq!(at(9.0).next_text, None);
}

#[test]
fn cover_pixels_produce_a_vivid_palette() {
    let config = ColorConfig {
        stride: 1,
        clusters: 3,
        ..ColorConfig::default()
    };
    let palette = palette_from_pixels(&cover(), &config).unwrap();
    assert_eq!(palette.colors[1], PaletteColor::Rgb(Rgb::new(230, 120, 20)));
    assert_eq!(palette, generate_scheme(Rgb::new(230, 120, 20), SchemePolicy::LightnessBlend));
}

#[test]
fn configuration_switches_palette_policy() {
    let config = AppConfig::from_json_str(r#"{ "color": { "policy": "hue_rotation" } }"#).unwrap();
    let palette = palette_from_pixels(&cover(), &config.color).unwrap();
    assert!(palette
        .colors
        .iter()
        .all(|color| matches!(color, PaletteColor::Hsl(_))));
}
