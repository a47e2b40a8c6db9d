use std::error::Error;
use std::fmt::{Display, Formatter};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ExtendedColorType, GenericImageView, ImageError};
use log::debug;

pub const MAX_UPLOAD_SIDE: u32 = 800;
pub const DEFAULT_JPEG_QUALITY: u8 = 80;
const BACKGROUND: [u8; 3] = [255, 255, 255];

#[derive(Debug)]
pub enum ScreenshotError {
    Decode(String),
    Encode(String),
}

impl Error for ScreenshotError {}

impl Display for ScreenshotError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ScreenshotError::Decode(s) => write!(f, "could not decode screenshot: {}", s),
            ScreenshotError::Encode(s) => write!(f, "could not encode screenshot: {}", s),
        }
    }
}

/// A decoded home-screen screenshot, ready to be shrunk and sent to the vision model.
#[derive(Debug, Clone)]
pub struct Screenshot {
    image: DynamicImage,
}

impl Screenshot {
    pub fn from_bytes(bytes: &[u8]) -> Result<Screenshot, ScreenshotError> {
        let image = image::load_from_memory(bytes)
            .map_err(|e| ScreenshotError::Decode(e.to_string()))?;

        debug!("screenshot decoded: {}x{}", image.width(), image.height());
        Ok(Screenshot { image })
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    /// Shrinks the image to fit in `max_side` x `max_side` (never enlarges it), flattens
    /// transparency on a white background and encodes it as JPEG.
    pub fn to_jpeg(&self, max_side: u32, quality: u8) -> Result<Vec<u8>, ScreenshotError> {
        let (width, height) = self.image.dimensions();

        let resized = if width > max_side || height > max_side {
            self.image.resize(max_side, max_side, FilterType::Triangle)
        } else {
            self.image.clone()
        };

        let (width, height) = resized.dimensions();
        debug!("screenshot resized to {}x{}", width, height);

        let rgb = Screenshot::flatten(&resized);

        Screenshot::encode_jpeg(&rgb, width, height, quality)
            .map_err(|e| ScreenshotError::Encode(e.to_string()))
    }

    pub fn to_data_uri(&self) -> Result<String, ScreenshotError> {
        let jpeg = self.to_jpeg(MAX_UPLOAD_SIDE, DEFAULT_JPEG_QUALITY)?;

        Ok(format!("data:image/jpeg;base64,{}", STANDARD.encode(jpeg)))
    }

    fn flatten(image: &DynamicImage) -> Vec<u8> {
        let rgba = image.to_rgba8();
        let mut rgb = Vec::with_capacity(rgba.width() as usize * rgba.height() as usize * 3);

        for pixel in rgba.pixels() {
            let [r, g, b, a] = pixel.0;
            let a = a as u32;
            let inv_a = 255 - a;

            rgb.extend_from_slice(&[
                ((r as u32 * a + BACKGROUND[0] as u32 * inv_a) / 255) as u8,
                ((g as u32 * a + BACKGROUND[1] as u32 * inv_a) / 255) as u8,
                ((b as u32 * a + BACKGROUND[2] as u32 * inv_a) / 255) as u8,
            ]);
        }

        rgb
    }

    fn encode_jpeg(rgb: &[u8], width: u32, height: u32, quality: u8) -> Result<Vec<u8>, ImageError> {
        let mut out = Vec::new();
        let mut encoder = JpegEncoder::new_with_quality(&mut out, quality.clamp(1, 100));
        encoder.encode(rgb, width, height, ExtendedColorType::Rgb8)?;

        Ok(out)
    }
}
