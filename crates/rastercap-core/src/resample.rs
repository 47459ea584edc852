//! Raster resampling with a selectable interpolation kernel.
//!
//! Dimension arithmetic is owned by the planner; this module only executes
//! the resize it is handed. Resampling to the source dimensions is a strict
//! no-op that returns pixel-identical data for every kernel.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::raster::Raster;

/// An unrecognized filter id.
///
/// Filter ids form a closed set; anything outside it is rejected before any
/// pixel allocation happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Unrecognized filter id: {0}")]
pub struct InvalidFilter(pub u8);

/// Errors produced by [`resample`].
#[derive(Debug, Error)]
pub enum ResampleError {
    /// Source or target width/height is zero.
    #[error("Invalid resample dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    /// The source pixel buffer does not match its declared dimensions.
    #[error("Pixel buffer does not match {width}x{height} RGB raster")]
    BufferMismatch { width: u32, height: u32 },
}

/// Interpolation kernel used when resizing a raster.
///
/// The ids are part of the wire contract: 0 nearest, 1 triangle,
/// 2 Catmull-Rom, 3 Gaussian, 4 Lanczos3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FilterKind {
    /// Nearest neighbor (fastest, lowest quality).
    Nearest,
    /// Triangle / bilinear (fast, acceptable quality).
    #[default]
    Triangle,
    /// Catmull-Rom cubic.
    CatmullRom,
    /// Gaussian.
    Gaussian,
    /// Lanczos with window 3 (slowest, highest quality).
    Lanczos3,
}

impl FilterKind {
    /// Resolve a wire-level filter id.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidFilter`] for ids outside the closed kernel set.
    pub fn from_id(id: u8) -> Result<Self, InvalidFilter> {
        match id {
            0 => Ok(FilterKind::Nearest),
            1 => Ok(FilterKind::Triangle),
            2 => Ok(FilterKind::CatmullRom),
            3 => Ok(FilterKind::Gaussian),
            4 => Ok(FilterKind::Lanczos3),
            other => Err(InvalidFilter(other)),
        }
    }

    /// The wire-level id of this kernel.
    pub fn id(self) -> u8 {
        match self {
            FilterKind::Nearest => 0,
            FilterKind::Triangle => 1,
            FilterKind::CatmullRom => 2,
            FilterKind::Gaussian => 3,
            FilterKind::Lanczos3 => 4,
        }
    }

    /// Convert to the image crate's kernel selector.
    pub fn to_image_filter(self) -> image::imageops::FilterType {
        match self {
            FilterKind::Nearest => image::imageops::FilterType::Nearest,
            FilterKind::Triangle => image::imageops::FilterType::Triangle,
            FilterKind::CatmullRom => image::imageops::FilterType::CatmullRom,
            FilterKind::Gaussian => image::imageops::FilterType::Gaussian,
            FilterKind::Lanczos3 => image::imageops::FilterType::Lanczos3,
        }
    }
}

/// Resize a raster to exact dimensions.
///
/// The source raster is not mutated; a new raster of exactly
/// `width` x `height` is returned. When the target equals the source
/// dimensions the pixel data is returned unchanged, with no resampling
/// artifacts for any kernel.
///
/// # Errors
///
/// Returns [`ResampleError::InvalidDimensions`] when either dimension of the
/// source or the target is zero.
pub fn resample(
    image: &Raster,
    width: u32,
    height: u32,
    filter: FilterKind,
) -> Result<Raster, ResampleError> {
    if image.width == 0 || image.height == 0 {
        return Err(ResampleError::InvalidDimensions {
            width: image.width,
            height: image.height,
        });
    }
    if width == 0 || height == 0 {
        return Err(ResampleError::InvalidDimensions { width, height });
    }

    // Fast path: matching dimensions pass pixels through untouched.
    if image.width == width && image.height == height {
        return Ok(image.clone());
    }

    let rgb_image = image.to_rgb_image().ok_or(ResampleError::BufferMismatch {
        width: image.width,
        height: image.height,
    })?;

    let resized = image::imageops::resize(&rgb_image, width, height, filter.to_image_filter());

    Ok(Raster::from_rgb_image(resized))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient_raster(width: u32, height: u32) -> Raster {
        let mut pixels = Vec::with_capacity((width * height * 3) as usize);
        for y in 0..height {
            for x in 0..width {
                pixels.push(((x * 255) / width.max(1)) as u8);
                pixels.push(((y * 255) / height.max(1)) as u8);
                pixels.push(128);
            }
        }
        Raster::new(width, height, pixels)
    }

    #[test]
    fn test_resample_basic() {
        let img = gradient_raster(100, 50);
        let resized = resample(&img, 50, 25, FilterKind::Triangle).unwrap();

        assert_eq!(resized.width, 50);
        assert_eq!(resized.height, 25);
        assert_eq!(resized.pixels.len(), 50 * 25 * 3);
    }

    #[test]
    fn test_resample_same_dimensions_is_identity() {
        let img = gradient_raster(100, 50);

        for filter in [
            FilterKind::Nearest,
            FilterKind::Triangle,
            FilterKind::CatmullRom,
            FilterKind::Gaussian,
            FilterKind::Lanczos3,
        ] {
            let resized = resample(&img, 100, 50, filter).unwrap();
            assert_eq!(resized.pixels, img.pixels, "{filter:?} must be a no-op");
        }
    }

    #[test]
    fn test_resample_does_not_mutate_source() {
        let img = gradient_raster(40, 30);
        let before = img.pixels.clone();
        let _ = resample(&img, 20, 15, FilterKind::Lanczos3).unwrap();
        assert_eq!(img.pixels, before);
    }

    #[test]
    fn test_resample_upscale() {
        let img = gradient_raster(50, 25);
        let resized = resample(&img, 100, 50, FilterKind::Lanczos3).unwrap();

        assert_eq!(resized.width, 100);
        assert_eq!(resized.height, 50);
    }

    #[test]
    fn test_resample_zero_target_dimension_errors() {
        let img = gradient_raster(100, 50);

        assert!(resample(&img, 0, 50, FilterKind::Triangle).is_err());
        assert!(resample(&img, 50, 0, FilterKind::Triangle).is_err());
    }

    #[test]
    fn test_resample_zero_source_dimension_errors() {
        let img = Raster::new(0, 0, vec![]);
        assert!(matches!(
            resample(&img, 10, 10, FilterKind::Triangle),
            Err(ResampleError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn test_all_kernels_produce_target_dimensions() {
        let img = gradient_raster(100, 50);

        for filter in [
            FilterKind::Nearest,
            FilterKind::Triangle,
            FilterKind::CatmullRom,
            FilterKind::Gaussian,
            FilterKind::Lanczos3,
        ] {
            let resized = resample(&img, 37, 19, filter).unwrap();
            assert_eq!(resized.width, 37);
            assert_eq!(resized.height, 19);
        }
    }

    #[test]
    fn test_filter_id_round_trip() {
        for id in 0..=4u8 {
            let filter = FilterKind::from_id(id).unwrap();
            assert_eq!(filter.id(), id);
        }
    }

    #[test]
    fn test_filter_unknown_id_rejected() {
        assert_eq!(FilterKind::from_id(5), Err(InvalidFilter(5)));
        assert_eq!(FilterKind::from_id(255), Err(InvalidFilter(255)));
    }

    #[test]
    fn test_filter_to_image_filter() {
        assert!(matches!(
            FilterKind::Nearest.to_image_filter(),
            image::imageops::FilterType::Nearest
        ));
        assert!(matches!(
            FilterKind::Triangle.to_image_filter(),
            image::imageops::FilterType::Triangle
        ));
        assert!(matches!(
            FilterKind::Lanczos3.to_image_filter(),
            image::imageops::FilterType::Lanczos3
        ));
    }
}
