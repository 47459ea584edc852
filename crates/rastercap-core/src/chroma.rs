//! Chroma subsampling into the plane layout the encoder expects.
//!
//! A full-resolution RGB raster is converted to BT.601 full-range YCbCr and
//! the chroma planes are decimated according to the sampling mode. The
//! transform is deterministic and side-effect-free: the same raster and mode
//! always produce identical planes.

use serde::{Deserialize, Serialize};

use crate::raster::Raster;

/// Chroma sampling mode.
///
/// A closed four-value set. The planner's size-estimation table enumerates
/// exactly these modes; adding a mode is a versioned interface change, not a
/// drop-in extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ChromaSampling {
    /// No subsampling (4:4:4). Chroma planes at full resolution.
    #[default]
    Full,
    /// Horizontal-only subsampling (4:2:2). Chroma planes half-width.
    Horizontal,
    /// Subsampling on both axes (4:2:0). Chroma planes half-width and
    /// half-height.
    Both,
    /// Luma plane only, chroma planes omitted entirely.
    Monochrome,
}

impl ChromaSampling {
    /// Horizontal and vertical decimation rates, or `None` for monochrome.
    pub fn rates(self) -> Option<(u32, u32)> {
        match self {
            ChromaSampling::Full => Some((1, 1)),
            ChromaSampling::Horizontal => Some((2, 1)),
            ChromaSampling::Both => Some((2, 2)),
            ChromaSampling::Monochrome => None,
        }
    }

    /// The next coarser mode in the degradation ladder, if any.
    pub fn next_coarser(self) -> Option<ChromaSampling> {
        match self {
            ChromaSampling::Full => Some(ChromaSampling::Horizontal),
            ChromaSampling::Horizontal => Some(ChromaSampling::Both),
            ChromaSampling::Both => Some(ChromaSampling::Monochrome),
            ChromaSampling::Monochrome => None,
        }
    }

    /// Chroma plane dimensions for a luma raster of `width` x `height`.
    ///
    /// Odd dimensions round up (even-padding convention). Returns `None` for
    /// monochrome.
    pub fn chroma_dimensions(self, width: u32, height: u32) -> Option<(u32, u32)> {
        let (h_rate, v_rate) = self.rates()?;
        Some((width.div_ceil(h_rate), height.div_ceil(v_rate)))
    }

    /// Total sample count across all planes at the given luma resolution.
    ///
    /// This is the quantity the planner's worst-case size model scales with.
    pub fn total_samples(self, width: u32, height: u32) -> u64 {
        let luma = width as u64 * height as u64;
        match self.chroma_dimensions(width, height) {
            Some((cw, ch)) => luma + 2 * cw as u64 * ch as u64,
            None => luma,
        }
    }
}

/// A single 2D grid of 8-bit samples (luma or one chroma channel).
#[derive(Debug, Clone, PartialEq)]
pub struct Plane {
    /// Plane width in samples.
    pub width: u32,
    /// Plane height in samples.
    pub height: u32,
    /// Row-major sample data. Length is always width * height.
    pub samples: Vec<u8>,
}

impl Plane {
    fn new(width: u32, height: u32, samples: Vec<u8>) -> Self {
        debug_assert_eq!(samples.len(), width as usize * height as usize);
        Self {
            width,
            height,
            samples,
        }
    }

    /// Sample at `(x, y)`.
    #[inline]
    pub fn sample(&self, x: u32, y: u32) -> u8 {
        self.samples[y as usize * self.width as usize + x as usize]
    }
}

/// The plane layout handed to the encoder.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaneSet {
    /// Full-resolution luma plane.
    pub luma: Plane,
    /// (Cb, Cr) planes, absent for monochrome.
    pub chroma: Option<(Plane, Plane)>,
    /// The mode that produced this layout.
    pub mode: ChromaSampling,
}

impl PlaneSet {
    /// Luma width, the image width.
    pub fn width(&self) -> u32 {
        self.luma.width
    }

    /// Luma height, the image height.
    pub fn height(&self) -> u32 {
        self.luma.height
    }

    /// Total sample count across all planes.
    pub fn total_samples(&self) -> u64 {
        let luma = self.luma.samples.len() as u64;
        match &self.chroma {
            Some((cb, cr)) => luma + cb.samples.len() as u64 + cr.samples.len() as u64,
            None => luma,
        }
    }
}

/// Convert a raster into the subsampled plane layout for `mode`.
///
/// Chroma decimation box-averages each block, replicating edge samples for
/// odd dimensions.
pub fn subsample(image: &Raster, mode: ChromaSampling) -> PlaneSet {
    let (width, height) = (image.width, image.height);
    let pixel_count = width as usize * height as usize;

    let mut luma = Vec::with_capacity(pixel_count);
    let mut cb_full = Vec::new();
    let mut cr_full = Vec::new();
    let wants_chroma = mode.rates().is_some();
    if wants_chroma {
        cb_full.reserve(pixel_count);
        cr_full.reserve(pixel_count);
    }

    for px in image.pixels.chunks_exact(3) {
        let (y, cb, cr) = ycbcr_from_rgb(px[0], px[1], px[2]);
        luma.push(y);
        if wants_chroma {
            cb_full.push(cb);
            cr_full.push(cr);
        }
    }

    let luma = Plane::new(width, height, luma);

    let chroma = mode.rates().map(|(h_rate, v_rate)| {
        let cw = width.div_ceil(h_rate);
        let ch = height.div_ceil(v_rate);
        let cb = decimate(&cb_full, width, height, cw, ch, h_rate, v_rate);
        let cr = decimate(&cr_full, width, height, cw, ch, h_rate, v_rate);
        (cb, cr)
    });

    PlaneSet { luma, chroma, mode }
}

/// Box-average a full-resolution channel down by integer rates.
fn decimate(
    full: &[u8],
    width: u32,
    height: u32,
    out_width: u32,
    out_height: u32,
    h_rate: u32,
    v_rate: u32,
) -> Plane {
    if h_rate == 1 && v_rate == 1 {
        return Plane::new(out_width, out_height, full.to_vec());
    }

    let count = h_rate * v_rate;
    let mut samples = Vec::with_capacity(out_width as usize * out_height as usize);

    for cy in 0..out_height {
        for cx in 0..out_width {
            let mut sum = 0u32;
            for dy in 0..v_rate {
                let sy = (cy * v_rate + dy).min(height - 1);
                for dx in 0..h_rate {
                    let sx = (cx * h_rate + dx).min(width - 1);
                    sum += full[sy as usize * width as usize + sx as usize] as u32;
                }
            }
            samples.push(((sum + count / 2) / count) as u8);
        }
    }

    Plane::new(out_width, out_height, samples)
}

/// BT.601 full-range RGB -> YCbCr (the JFIF convention).
#[inline]
fn ycbcr_from_rgb(r: u8, g: u8, b: u8) -> (u8, u8, u8) {
    let (r, g, b) = (r as f32, g as f32, b as f32);
    let y = 0.299 * r + 0.587 * g + 0.114 * b;
    let cb = 128.0 - 0.168_736 * r - 0.331_264 * g + 0.5 * b;
    let cr = 128.0 + 0.5 * r - 0.418_688 * g - 0.081_312 * b;
    (clamp_u8(y), clamp_u8(cb), clamp_u8(cr))
}

/// BT.601 full-range YCbCr -> RGB, the inverse used by the built-in codec.
#[inline]
pub(crate) fn rgb_from_ycbcr(y: u8, cb: u8, cr: u8) -> (u8, u8, u8) {
    let y = y as f32;
    let cb = cb as f32 - 128.0;
    let cr = cr as f32 - 128.0;
    let r = y + 1.402 * cr;
    let g = y - 0.344_136 * cb - 0.714_136 * cr;
    let b = y + 1.772 * cb;
    (clamp_u8(r), clamp_u8(g), clamp_u8(b))
}

#[inline]
fn clamp_u8(v: f32) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}
