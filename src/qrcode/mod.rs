use image::{DynamicImage, RgbaImage};
use std::fs;

use crate::error::{QrError, Result};
use crate::totp::{parse_otpauth_uri, TotpSpec};

/// Decode the first QR code found in an encoded image (PNG, JPEG, ...).
///
/// Returns `Ok(None)` when the image is readable but holds no decodable
/// QR code.
pub fn decode_payload(bytes: &[u8]) -> std::result::Result<Option<String>, QrError> {
    let img = image::load_from_memory(bytes)?;
    Ok(scan(&img))
}

/// Same as [`decode_payload`] for raw 8-bit RGBA pixels, the shape an
/// image copied to the clipboard arrives in.
pub fn decode_rgba(
    width: usize,
    height: usize,
    rgba: Vec<u8>,
) -> std::result::Result<Option<String>, QrError> {
    let bad = QrError::Dimensions { width, height };
    let (Ok(w), Ok(h)) = (u32::try_from(width), u32::try_from(height)) else {
        return Err(bad);
    };
    let buf = RgbaImage::from_raw(w, h, rgba).ok_or(bad)?;
    Ok(scan(&DynamicImage::ImageRgba8(buf)))
}

fn scan(img: &DynamicImage) -> Option<String> {
    let decoder = bardecoder::default_decoder();
    let results = decoder.decode(img);
    tracing::debug!(candidates = results.len(), "scanned image for QR codes");

    results.into_iter().find_map(|r| r.ok())
}

/// extract_totp_uri reads the image at `file_path` and parses the
/// otpauth URI encoded in its QR code. This contains the secret, tick
/// period, digits in the code and the issuer as metadata.
pub fn extract_totp_uri(file_path: &str) -> Result<TotpSpec> {
    let bytes = fs::read(file_path).map_err(|source| QrError::Open {
        path: file_path.to_string(),
        source,
    })?;

    let payload = decode_payload(&bytes)?.ok_or(QrError::NoPayload)?;
    Ok(parse_otpauth_uri(&payload)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use image::{GrayImage, ImageOutputFormat, Luma};
    use std::io::Cursor;

    fn png(img: GrayImage) -> Vec<u8> {
        let mut buf = Vec::new();
        DynamicImage::ImageLuma8(img)
            .write_to(&mut Cursor::new(&mut buf), ImageOutputFormat::Png)
            .unwrap();
        buf
    }

    #[test]
    fn blank_image_has_no_payload() {
        let blank = GrayImage::from_pixel(200, 200, Luma([255]));
        assert_eq!(decode_payload(&png(blank)).unwrap(), None);
    }

    #[test]
    fn garbage_is_not_an_image() {
        assert!(matches!(
            decode_payload(b"definitely not a png"),
            Err(QrError::Image(_))
        ));
    }

    #[test]
    fn blank_pixels_have_no_payload() {
        let white = vec![255u8; 64 * 64 * 4];
        assert_eq!(decode_rgba(64, 64, white).unwrap(), None);
    }

    #[test]
    fn short_pixel_buffer() {
        assert!(matches!(
            decode_rgba(64, 64, vec![0u8; 10]),
            Err(QrError::Dimensions {
                width: 64,
                height: 64
            })
        ));
    }

    #[test]
    fn missing_file() {
        let err = extract_totp_uri("./does/not/exist.png").unwrap_err();
        assert!(matches!(err, Error::Qr(QrError::Open { .. })));
    }
}
