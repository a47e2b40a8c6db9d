use std::io::Cursor;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use image::{DynamicImage, GenericImageView, ImageFormat, Rgba, RgbaImage};
use crate::screenshot::{Screenshot, ScreenshotError, MAX_UPLOAD_SIDE};
use crate::tests::init;

fn png_bytes(width: u32, height: u32, color: Rgba<u8>) -> Vec<u8> {
    let image = RgbaImage::from_pixel(width, height, color);
    let mut bytes = Vec::new();

    DynamicImage::ImageRgba8(image)
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .unwrap();

    bytes
}

#[test]
fn test_from_bytes_decodes_png() {
    init();

    let screenshot = Screenshot::from_bytes(&png_bytes(120, 80, Rgba([0, 0, 0, 255]))).unwrap();

    assert_eq!(screenshot.dimensions(), (120, 80));
}

#[test]
fn test_from_bytes_rejects_garbage() {
    init();

    let result = Screenshot::from_bytes(b"definitely not an image");

    assert!(matches!(result, Err(ScreenshotError::Decode(_))));
}

#[test]
fn test_to_jpeg_downscales_large_images_keeping_ratio() {
    init();

    let screenshot = Screenshot::from_bytes(&png_bytes(1600, 1200, Rgba([40, 90, 200, 255]))).unwrap();

    let jpeg = screenshot.to_jpeg(MAX_UPLOAD_SIDE, 80).unwrap();
    let decoded = image::load_from_memory_with_format(&jpeg, ImageFormat::Jpeg).unwrap();

    assert_eq!(decoded.dimensions(), (800, 600));
}

#[test]
fn test_to_jpeg_never_enlarges_small_images() {
    init();

    let screenshot = Screenshot::from_bytes(&png_bytes(300, 200, Rgba([40, 90, 200, 255]))).unwrap();

    let jpeg = screenshot.to_jpeg(MAX_UPLOAD_SIDE, 80).unwrap();
    let decoded = image::load_from_memory_with_format(&jpeg, ImageFormat::Jpeg).unwrap();

    assert_eq!(decoded.dimensions(), (300, 200));
}

#[test]
fn test_to_jpeg_flattens_transparency_on_white() {
    init();

    let screenshot = Screenshot::from_bytes(&png_bytes(16, 16, Rgba([0, 0, 0, 0]))).unwrap();

    let jpeg = screenshot.to_jpeg(MAX_UPLOAD_SIDE, 90).unwrap();
    let decoded = image::load_from_memory(&jpeg).unwrap().to_rgb8();

    for pixel in decoded.pixels() {
        assert!(pixel.0.iter().all(|channel| *channel >= 245));
    }
}

#[test]
fn test_to_data_uri_embeds_base64_jpeg() {
    init();

    let screenshot = Screenshot::from_bytes(&png_bytes(64, 64, Rgba([200, 10, 10, 255]))).unwrap();

    let uri = screenshot.to_data_uri().unwrap();
    let payload = uri.strip_prefix("data:image/jpeg;base64,").unwrap();
    let jpeg = STANDARD.decode(payload).unwrap();

    assert_eq!(&jpeg[..2], &[0xFF, 0xD8]);
}
