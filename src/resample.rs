use image::{DynamicImage, GenericImageView, GrayImage, Luma, RgbImage, imageops::FilterType};

use crate::error::{Error, Result};

/// Filter used for every resize. Output values are specific to this filter;
/// other Lanczos implementations will differ by a level here and there.
pub const FILTER: FilterType = FilterType::Lanczos3;

/// A resized image in the two forms the encoder samples from.
#[derive(Clone, Debug)]
pub struct Raster {
    pub rgb: RgbImage,
    pub luma: GrayImage,
}

impl Raster {
    pub fn width(&self) -> u32 {
        self.rgb.width()
    }

    pub fn height(&self) -> u32 {
        self.rgb.height()
    }
}

/// ITU-R 601-2 luma in 16-bit fixed point. The weights sum to 65536, so a
/// gray pixel `(v, v, v)` maps back to `v`.
#[inline(always)]
pub fn luma(rgb: [u8; 3]) -> u8 {
    let [r, g, b] = rgb.map(u32::from);
    ((r * 19595 + g * 38470 + b * 7471 + 0x8000) >> 16) as u8
}

/// Resize `img` to exactly `width × height` and derive the RGB and luma
/// rasters from the result.
///
/// Resizing runs in the source's own color model; the result is then coerced
/// to RGB8 (gray channels are replicated, alpha is dropped).
pub fn resample(img: &DynamicImage, width: u32, height: u32) -> Result<Raster> {
    let (in_w, in_h) = img.dimensions();
    if width == 0 || height == 0 || in_w == 0 || in_h == 0 {
        return Err(Error::InvalidDimension { width, height });
    }

    tracing::debug!(
        from_width = in_w,
        from_height = in_h,
        to_width = width,
        to_height = height,
        "resampling image"
    );

    // resize_exact copies the pixels untouched when the size already matches.
    let rgb = img.resize_exact(width, height, FILTER).to_rgb8();
    let gray = GrayImage::from_fn(width, height, |x, y| Luma([luma(rgb.get_pixel(x, y).0)]));

    Ok(Raster { rgb, luma: gray })
}
