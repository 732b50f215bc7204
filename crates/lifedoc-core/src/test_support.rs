//! Fixtures shared by unit tests.

use std::io::Cursor;

use image::{DynamicImage, ImageBuffer, ImageFormat, Rgb};

use crate::session::Session;

pub fn session() -> Session {
    Session::new("uid-1", Some("ana@example.com".to_string()), "token-1").unwrap()
}

/// A small PNG; `shade` varies the pixels so uploads differ.
pub fn sample_png(shade: u8) -> Vec<u8> {
    let image = ImageBuffer::<Rgb<u8>, Vec<u8>>::from_fn(16, 12, |x, _y| {
        Rgb([shade, shade.wrapping_add(40), u8::try_from(x).unwrap_or(0)])
    });
    let mut cursor = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(image)
        .write_to(&mut cursor, ImageFormat::Png)
        .unwrap();
    cursor.into_inner()
}
