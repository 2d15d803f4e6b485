//! Post-capture enhancement tests

use docscan::config::EnhancementSettings;
use docscan::enhance::{encode_jpeg, Enhancer};
use docscan::testing::{solid_frame, synthetic_document_frame};
use docscan::types::{Frame, PixelFormat, QualityTier};

fn rgba_frame(width: u32, height: u32, rgba: [u8; 4]) -> Frame {
    let data = rgba
        .iter()
        .copied()
        .cycle()
        .take((width * height * 4) as usize)
        .collect();
    Frame::new(data, width, height, PixelFormat::Rgba8).unwrap()
}

#[test]
fn test_enhancement_is_deterministic() {
    let frame = synthetic_document_frame(320, 240);
    let enhancer = Enhancer::new(EnhancementSettings::default());

    let a = enhancer.process(frame.clone(), QualityTier::Standard).unwrap();
    let b = enhancer.process(frame.clone(), QualityTier::Standard).unwrap();
    assert_eq!(a.bytes, b.bytes);
    assert_eq!(a.quality, 85);
}

#[test]
fn test_encoded_capture_decodes_alone() {
    let frame = synthetic_document_frame(320, 240);
    let encoded = Enhancer::new(EnhancementSettings::default())
        .process(frame.clone(), QualityTier::Ultra)
        .unwrap();
    assert_eq!(encoded.quality, 98);

    let decoded = image::load_from_memory(&encoded.bytes).unwrap().to_rgb8();
    assert_eq!(decoded.dimensions(), (320, 240));
    // Centre of the page: 230 after contrast 120 is 250.4
    let centre = decoded.get_pixel(160, 120).0;
    assert!(centre.iter().all(|&v| v >= 240), "centre {:?}", centre);
}

#[test]
fn test_brightness_then_contrast_order() {
    let frame = solid_frame(6, 6, [100, 100, 100]);
    let settings = EnhancementSettings {
        auto_enhance: true,
        brightness: 120,
        contrast: 140,
        sharpness: 100,
    };
    let out = Enhancer::new(settings).enhance(frame.clone());
    // (100 + 51) = 151, then (151 - 128) * 1.4 + 128 = 160.2
    assert!(out.data.iter().all(|&v| v == 160));
}

#[test]
fn test_alpha_preserved_by_enhance() {
    let frame = rgba_frame(5, 5, [50, 60, 70, 42]);
    let out = Enhancer::new(EnhancementSettings {
        auto_enhance: true,
        brightness: 150,
        contrast: 150,
        sharpness: 150,
    })
    .enhance(frame.clone());

    assert_eq!(out.format, PixelFormat::Rgba8);
    for pixel in out.data.chunks_exact(4) {
        assert_eq!(pixel[3], 42);
    }
}

#[test]
fn test_sharpen_leaves_border() {
    let frame = synthetic_document_frame(40, 40);
    let settings = EnhancementSettings {
        auto_enhance: true,
        brightness: 100,
        contrast: 100,
        sharpness: 150,
    };
    let out = Enhancer::new(settings).enhance(frame.clone());

    let width = 40 * 3;
    assert_eq!(&out.data[..width], &frame.data[..width]);
    // Page side of the left boundary (x = 6) gets brighter, desk side darker
    assert!(out.rgb_at(6, 20)[0] > frame.rgb_at(6, 20)[0]);
    assert!(out.rgb_at(5, 20)[0] < frame.rgb_at(5, 20)[0]);
}

#[test]
fn test_encode_rgba_frame() {
    let frame = rgba_frame(8, 8, [1, 2, 3, 4]);
    assert!(encode_jpeg(frame, 92).is_ok());
}
