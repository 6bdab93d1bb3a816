//! Raster images (logos) prepared for embedding as Flate-compressed RGB

use std::io::Write;

use flate2::write::ZlibEncoder;
use flate2::Compression;

use crate::error::LayoutError;

/// A decoded image ready to become an image XObject
#[derive(Debug, Clone, PartialEq)]
pub struct RasterImage {
    pub width: u32,
    pub height: u32,
    /// Zlib stream of 8-bit RGB samples
    pub(crate) data: Vec<u8>,
}

impl RasterImage {
    /// Decode PNG or JPEG bytes.
    ///
    /// Transparent pixels are composited over white, which is how the logos
    /// look on paper.
    pub fn decode(bytes: &[u8]) -> Result<Self, LayoutError> {
        let decoded =
            image::load_from_memory(bytes).map_err(|e| LayoutError::ImageDecode(e.to_string()))?;
        let rgba = decoded.to_rgba8();
        let (width, height) = rgba.dimensions();

        let mut rgb = Vec::with_capacity((width * height * 3) as usize);
        for pixel in rgba.pixels() {
            let [r, g, b, a] = pixel.0;
            let alpha = a as u32;
            for channel in [r, g, b] {
                let blended = (channel as u32 * alpha + 255 * (255 - alpha)) / 255;
                rgb.push(blended as u8);
            }
        }

        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder
            .write_all(&rgb)
            .map_err(|e| LayoutError::ImageDecode(e.to_string()))?;
        let data = encoder
            .finish()
            .map_err(|e| LayoutError::ImageDecode(e.to_string()))?;

        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Height over width
    pub fn aspect(&self) -> f32 {
        if self.width == 0 {
            1.0
        } else {
            self.height as f32 / self.width as f32
        }
    }

    /// Size that fits inside `max_w` × `max_h` keeping the aspect ratio
    pub fn fit(&self, max_w: f32, max_h: f32) -> (f32, f32) {
        if self.width == 0 || self.height == 0 {
            return (0.0, 0.0);
        }
        let scale = (max_w / self.width as f32).min(max_h / self.height as f32);
        (self.width as f32 * scale, self.height as f32 * scale)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::io::{Cursor, Read};

    /// A small PNG with a transparent half
    pub(crate) fn sample_png() -> Vec<u8> {
        let img = image::RgbaImage::from_fn(40, 20, |x, _| {
            if x < 20 {
                image::Rgba([200, 10, 10, 255])
            } else {
                image::Rgba([0, 0, 0, 0])
            }
        });
        let mut bytes = Vec::new();
        image::DynamicImage::ImageRgba8(img)
            .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn decodes_png_and_flattens_alpha() {
        let image = RasterImage::decode(&sample_png()).unwrap();
        assert_eq!((image.width, image.height), (40, 20));

        let mut rgb = Vec::new();
        flate2::read::ZlibDecoder::new(&image.data[..])
            .read_to_end(&mut rgb)
            .unwrap();
        assert_eq!(rgb.len(), 40 * 20 * 3);
        assert_eq!(&rgb[..3], &[200, 10, 10]);
        assert_eq!(&rgb[rgb.len() - 3..], &[255, 255, 255]);
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(matches!(
            RasterImage::decode(b"not an image"),
            Err(LayoutError::ImageDecode(_))
        ));
    }

    #[test]
    fn fit_keeps_aspect() {
        let image = RasterImage::decode(&sample_png()).unwrap();
        let (w, h) = image.fit(100.0, 100.0);
        assert_eq!((w, h), (100.0, 50.0));
        let (w, h) = image.fit(100.0, 10.0);
        assert_eq!((w, h), (20.0, 10.0));
        assert_eq!(image.aspect(), 0.5);
    }
}
