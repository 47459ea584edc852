//! Byte-stream decoding with EXIF orientation handling.

use std::io::Cursor;

use exif::{In, Reader, Tag};
use image::DynamicImage;
use image::ImageReader;

use super::{DecodeError, Orientation};
use crate::raster::Raster;

/// Decode image bytes into an upright RGB raster.
///
/// The input format is guessed from the byte stream. EXIF orientation is
/// applied before the raster is returned, so planning and resampling see the
/// display dimensions.
///
/// # Errors
///
/// Returns [`DecodeError::UnknownFormat`] if the bytes do not match any
/// supported format, or [`DecodeError::Corrupted`] if decoding fails.
pub fn decode_image(bytes: &[u8]) -> Result<Raster, DecodeError> {
    let orientation = extract_orientation(bytes);
    let img = load(bytes)?;
    let oriented = apply_orientation(img, orientation);
    Ok(Raster::from_rgb_image(oriented.into_rgb8()))
}

/// Decode image bytes without applying EXIF orientation.
///
/// Use this when the caller handles rotation itself or the source is known to
/// be upright already.
pub fn decode_image_raw(bytes: &[u8]) -> Result<Raster, DecodeError> {
    let img = load(bytes)?;
    Ok(Raster::from_rgb_image(img.into_rgb8()))
}

/// Extract the EXIF orientation of an encoded image.
///
/// Returns [`Orientation::Normal`] when no EXIF data is present.
pub fn orientation_of(bytes: &[u8]) -> Orientation {
    extract_orientation(bytes)
}

fn load(bytes: &[u8]) -> Result<DynamicImage, DecodeError> {
    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| DecodeError::Corrupted(e.to_string()))?;

    if reader.format().is_none() {
        return Err(DecodeError::UnknownFormat);
    }

    reader
        .decode()
        .map_err(|e| DecodeError::Corrupted(e.to_string()))
}

fn extract_orientation(bytes: &[u8]) -> Orientation {
    let exif_reader = Reader::new();
    let mut cursor = Cursor::new(bytes);

    match exif_reader.read_from_container(&mut cursor) {
        Ok(exif) => {
            if let Some(field) = exif.get_field(Tag::Orientation, In::PRIMARY) {
                if let Some(value) = field.value.get_uint(0) {
                    return Orientation::from(value);
                }
            }
            Orientation::Normal
        }
        Err(_) => Orientation::Normal,
    }
}

fn apply_orientation(img: DynamicImage, orientation: Orientation) -> DynamicImage {
    match orientation {
        Orientation::Normal => img,
        Orientation::FlipHorizontal => img.fliph(),
        Orientation::Rotate180 => img.rotate180(),
        Orientation::FlipVertical => img.flipv(),
        Orientation::Transpose => img.rotate90().fliph(),
        Orientation::Rotate90CW => img.rotate90(),
        Orientation::Transverse => img.rotate270().fliph(),
        Orientation::Rotate270CW => img.rotate270(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = image::RgbImage::from_fn(width, height, |x, y| {
            image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
        });
        let mut buf = Cursor::new(Vec::new());
        img.write_to(&mut buf, image::ImageFormat::Png)
            .expect("in-memory png encode");
        buf.into_inner()
    }

    #[test]
    fn test_decode_valid_png() {
        let bytes = png_bytes(8, 6);
        let raster = decode_image(&bytes).unwrap();

        assert_eq!(raster.width, 8);
        assert_eq!(raster.height, 6);
        assert_eq!(raster.pixels.len(), 8 * 6 * 3);
    }

    #[test]
    fn test_decode_raw_matches_for_unoriented_input() {
        let bytes = png_bytes(5, 4);
        let a = decode_image(&bytes).unwrap();
        let b = decode_image_raw(&bytes).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_decode_garbage_fails() {
        let result = decode_image(&[0x00, 0x01, 0x02, 0x03]);
        assert!(result.is_err());
    }

    #[test]
    fn test_decode_empty_fails() {
        assert!(decode_image(&[]).is_err());
    }

    #[test]
    fn test_decode_truncated_png_fails() {
        let bytes = png_bytes(8, 8);
        let result = decode_image(&bytes[0..bytes.len() / 2]);
        assert!(matches!(result, Err(DecodeError::Corrupted(_))));
    }

    #[test]
    fn test_orientation_of_plain_png() {
        let bytes = png_bytes(4, 4);
        assert_eq!(orientation_of(&bytes), Orientation::Normal);
    }

    #[test]
    fn test_orientation_of_invalid_data() {
        assert_eq!(orientation_of(&[0x00, 0x01, 0x02]), Orientation::Normal);
    }

    #[test]
    fn test_apply_orientation_rotate90_swaps_dimensions() {
        let pixels = vec![
            255, 0, 0, // Red (left)
            0, 255, 0, // Green (right)
        ];
        let rgb = image::RgbImage::from_raw(2, 1, pixels).unwrap();
        let img = DynamicImage::ImageRgb8(rgb);

        let result = apply_orientation(img, Orientation::Rotate90CW);
        assert_eq!(result.into_rgb8().dimensions(), (1, 2));
    }

    #[test]
    fn test_apply_orientation_flip_horizontal() {
        let pixels = vec![
            255, 0, 0, // Red (left)
            0, 255, 0, // Green (right)
        ];
        let rgb = image::RgbImage::from_raw(2, 1, pixels).unwrap();
        let img = DynamicImage::ImageRgb8(rgb);

        let result = apply_orientation(img, Orientation::FlipHorizontal).into_rgb8();
        assert_eq!(result.get_pixel(0, 0).0, [0, 255, 0]);
        assert_eq!(result.get_pixel(1, 0).0, [255, 0, 0]);
    }
}
