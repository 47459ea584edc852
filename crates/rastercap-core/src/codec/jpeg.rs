//! Built-in JPEG plane codec backed by the image crate's encoder.
//!
//! Monochrome plane sets encode the luma plane directly as 8-bit grayscale.
//! Chroma-bearing layouts are reassembled into interleaved RGB (replicated
//! chroma upsample, then YCbCr -> RGB) before entering the encoder, which
//! owns the entropy coding end to end.

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::ExtendedColorType;
use image::ImageEncoder;

use super::{CodecError, PlaneCodec};
use crate::chroma::{self, ChromaSampling, Plane, PlaneSet};
use crate::decode;

/// JPEG implementation of the [`PlaneCodec`] boundary.
#[derive(Debug, Clone, Copy, Default)]
pub struct JpegCodec;

impl JpegCodec {
    /// Create the codec. Stateless; safe to share across calls.
    pub fn new() -> Self {
        Self
    }
}

impl PlaneCodec for JpegCodec {
    fn encode(&self, planes: &PlaneSet, quality: u8) -> Result<Vec<u8>, CodecError> {
        let (width, height) = (planes.width(), planes.height());
        if width == 0 || height == 0 {
            return Err(CodecError::InvalidPlaneLayout(format!(
                "luma plane is {width}x{height}"
            )));
        }
        validate_layout(planes)?;

        let quality = quality.clamp(1, 100);
        let mut buffer = Cursor::new(Vec::new());
        let encoder = JpegEncoder::new_with_quality(&mut buffer, quality);

        match &planes.chroma {
            None => encoder
                .write_image(&planes.luma.samples, width, height, ExtendedColorType::L8)
                .map_err(|e| CodecError::EncodingFailed(e.to_string()))?,
            Some((cb, cr)) => {
                let rgb = interleave_rgb(&planes.luma, cb, cr, planes.mode);
                encoder
                    .write_image(&rgb, width, height, ExtendedColorType::Rgb8)
                    .map_err(|e| CodecError::EncodingFailed(e.to_string()))?
            }
        }

        Ok(buffer.into_inner())
    }

    fn decode(&self, bytes: &[u8]) -> Result<PlaneSet, CodecError> {
        let raster = decode::decode_image_raw(bytes)
            .map_err(|e| CodecError::DecodingFailed(e.to_string()))?;
        Ok(chroma::subsample(&raster, ChromaSampling::Full))
    }
}

/// Check that chroma plane dimensions match the declared sampling mode.
fn validate_layout(planes: &PlaneSet) -> Result<(), CodecError> {
    let expected = planes
        .mode
        .chroma_dimensions(planes.width(), planes.height());

    match (&planes.chroma, expected) {
        (None, None) => Ok(()),
        (Some((cb, cr)), Some((ew, eh))) => {
            if cb.width == ew && cb.height == eh && cr.width == ew && cr.height == eh {
                Ok(())
            } else {
                Err(CodecError::InvalidPlaneLayout(format!(
                    "chroma planes {}x{} do not match {:?} at {}x{}",
                    cb.width,
                    cb.height,
                    planes.mode,
                    planes.width(),
                    planes.height()
                )))
            }
        }
        (Some(_), None) => Err(CodecError::InvalidPlaneLayout(
            "monochrome layout carries chroma planes".to_string(),
        )),
        (None, Some(_)) => Err(CodecError::InvalidPlaneLayout(format!(
            "{:?} layout is missing chroma planes",
            planes.mode
        ))),
    }
}

/// Rebuild an interleaved RGB buffer from YCbCr planes, replicating each
/// chroma sample across its decimation block.
fn interleave_rgb(luma: &Plane, cb: &Plane, cr: &Plane, mode: ChromaSampling) -> Vec<u8> {
    let (h_rate, v_rate) = mode.rates().unwrap_or((1, 1));
    let (width, height) = (luma.width, luma.height);
    let mut rgb = Vec::with_capacity(width as usize * height as usize * 3);

    for y in 0..height {
        let cy = y / v_rate;
        for x in 0..width {
            let cx = x / h_rate;
            let (r, g, b) =
                chroma::rgb_from_ycbcr(luma.sample(x, y), cb.sample(cx, cy), cr.sample(cx, cy));
            rgb.push(r);
            rgb.push(g);
            rgb.push(b);
        }
    }

    rgb
}
