/// Image re-encoding for upload
///
/// Picked photos arrive in whatever container the platform hands over.
/// They are re-encoded as aggressively compressed JPEGs before upload; the
/// exact quality is a size/fidelity tradeoff, not load-bearing.
use image::codecs::jpeg::JpegEncoder;

use crate::error::Result;

/// Default JPEG quality for uploads.
pub const UPLOAD_JPEG_QUALITY: u8 = 35;

/// File name given to every uploaded post image; the store makes it unique.
pub const UPLOAD_FILE_NAME: &str = "image.jpg";

/// Decode `bytes` as an image and re-encode it as a JPEG at `quality`.
pub fn encode_jpeg(bytes: &[u8], quality: u8) -> Result<Vec<u8>> {
    let decoded = image::load_from_memory(bytes)?;
    let rgb = decoded.to_rgb8();

    let mut out = Vec::new();
    let mut encoder = JpegEncoder::new_with_quality(&mut out, quality);
    encoder.encode_image(&rgb)?;

    Ok(out)
}

/// Tiny valid PNG used as a stand-in for picked photos in tests.
#[cfg(test)]
pub(crate) fn sample_png() -> Vec<u8> {
    use image::{DynamicImage, ImageOutputFormat, RgbImage};
    use std::io::Cursor;

    let pixels = RgbImage::from_fn(8, 8, |x, y| image::Rgb([x as u8 * 16, y as u8 * 16, 128]));
    let mut bytes = Vec::new();
    DynamicImage::ImageRgb8(pixels)
        .write_to(&mut Cursor::new(&mut bytes), ImageOutputFormat::Png)
        .expect("in-memory PNG encode");
    bytes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;

    #[test]
    fn reencodes_to_jpeg() {
        let jpeg = encode_jpeg(&sample_png(), UPLOAD_JPEG_QUALITY).expect("encode");
        // JPEG SOI marker
        assert_eq!(&jpeg[..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn rejects_bytes_that_are_not_an_image() {
        let err = encode_jpeg(b"definitely not pixels", UPLOAD_JPEG_QUALITY).unwrap_err();
        assert!(matches!(err, AppError::Media(_)));
    }
}
