//! JPEG re-encoding for uploaded photos.

use std::io::Cursor;

use image::{codecs::jpeg::JpegEncoder, DynamicImage, GenericImageView};

use crate::{Error, Result};

pub const JPEG_CONTENT_TYPE: &str = "image/jpeg";

/// Encoding settings for uploaded photos.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JpegOptions {
    /// JPEG quality, 1-100.
    pub quality: u8,
    /// Optional bound on the longer edge. Smaller images are never upscaled.
    pub max_dimension: Option<u32>,
}

impl Default for JpegOptions {
    fn default() -> Self {
        Self {
            quality: 80,
            max_dimension: None,
        }
    }
}

/// Decode any supported image and re-encode it as JPEG.
pub fn encode_jpeg(source_bytes: &[u8], options: JpegOptions) -> Result<Vec<u8>> {
    if source_bytes.is_empty() {
        return Err(Error::ImageEncoding(
            "Image source bytes cannot be empty".to_string(),
        ));
    }
    if options.quality == 0 || options.quality > 100 {
        return Err(Error::ImageEncoding(format!(
            "JPEG quality must be between 1 and 100, got {}",
            options.quality
        )));
    }

    let source = image::load_from_memory(source_bytes)
        .map_err(|error| Error::ImageEncoding(format!("Failed to decode image: {error}")))?;

    let resized = match options.max_dimension {
        Some(0) => {
            return Err(Error::ImageEncoding(
                "Maximum dimension must be greater than zero".to_string(),
            ));
        }
        Some(max) => {
            let (width, height) = source.dimensions();
            if width <= max && height <= max {
                source
            } else {
                source.thumbnail(max, max)
            }
        }
        None => source,
    };

    // JPEG has no alpha channel.
    let rgb = DynamicImage::ImageRgb8(resized.to_rgb8());
    let mut cursor = Cursor::new(Vec::new());
    JpegEncoder::new_with_quality(&mut cursor, options.quality)
        .encode_image(&rgb)
        .map_err(|error| Error::ImageEncoding(format!("Failed to encode JPEG: {error}")))?;

    Ok(cursor.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, ImageFormat, Rgba};

    fn source_png(width: u32, height: u32) -> Vec<u8> {
        let image = ImageBuffer::<Rgba<u8>, Vec<u8>>::from_fn(width, height, |_x, _y| {
            Rgba([200, 160, 90, 128])
        });

        let mut cursor = Cursor::new(Vec::new());
        DynamicImage::ImageRgba8(image)
            .write_to(&mut cursor, ImageFormat::Png)
            .unwrap();
        cursor.into_inner()
    }

    #[test]
    fn encode_jpeg_converts_png_with_alpha() {
        let jpeg = encode_jpeg(&source_png(64, 48), JpegOptions::default()).unwrap();
        assert_eq!(image::guess_format(&jpeg).unwrap(), ImageFormat::Jpeg);

        let decoded = image::load_from_memory(&jpeg).unwrap();
        assert_eq!(decoded.dimensions(), (64, 48));
    }

    #[test]
    fn encode_jpeg_bounds_longer_edge() {
        let jpeg = encode_jpeg(
            &source_png(400, 100),
            JpegOptions {
                quality: 70,
                max_dimension: Some(200),
            },
        )
        .unwrap();
        let decoded = image::load_from_memory(&jpeg).unwrap();
        assert_eq!(decoded.dimensions(), (200, 50));
    }

    #[test]
    fn encode_jpeg_rejects_invalid_source() {
        let err = encode_jpeg(b"not-an-image", JpegOptions::default()).unwrap_err();
        match err {
            Error::ImageEncoding(message) => assert!(message.contains("decode")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn encode_jpeg_rejects_empty_source() {
        assert!(matches!(
            encode_jpeg(&[], JpegOptions::default()),
            Err(Error::ImageEncoding(_))
        ));
    }
}
