use std::io::Cursor;
use std::sync::Once;
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use log::LevelFilter;
use simplelog::{Config, TestLogger};


static START: Once = Once::new();

fn init_logger_for_test() {
    START.call_once(|| TestLogger::init(LevelFilter::Trace, Config::default()).unwrap());
}

pub fn init() {
    init_logger_for_test();
}

pub fn screenshot_png() -> Vec<u8> {
    let image = RgbaImage::from_pixel(390, 844, Rgba([30, 30, 30, 255]));
    let mut bytes = Vec::new();

    DynamicImage::ImageRgba8(image)
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .unwrap();

    bytes
}
