//! Bounds-checked brightness sampling over RGBA image buffers.

use image::RgbaImage;

use crate::error::AnalysisError;
use crate::geometry::Point2D;

/// Wrap a raw row-major RGBA byte buffer as an [`RgbaImage`].
///
/// Fails with [`AnalysisError::InvalidImage`] when the byte count does not
/// match `width * height * 4` or either dimension is zero.
pub fn rgba_from_raw(width: u32, height: u32, bytes: Vec<u8>) -> Result<RgbaImage, AnalysisError> {
    if width == 0 || height == 0 {
        return Err(AnalysisError::InvalidImage {
            reason: format!("empty image {}x{}", width, height),
        });
    }
    let actual = bytes.len();
    RgbaImage::from_raw(width, height, bytes).ok_or_else(|| AnalysisError::InvalidImage {
        reason: format!(
            "buffer holds {} bytes, expected {} for {}x{} RGBA",
            actual,
            width as usize * height as usize * 4,
            width,
            height
        ),
    })
}

/// Nearest-pixel brightness reader.
///
/// Brightness is the unweighted mean of R, G and B in `[0, 255]`; alpha is
/// ignored.
#[derive(Clone, Copy)]
pub struct PixelSampler<'a> {
    img: &'a RgbaImage,
}

impl<'a> PixelSampler<'a> {
    pub fn new(img: &'a RgbaImage) -> Self {
        Self { img }
    }

    pub fn width(self) -> u32 {
        self.img.width()
    }

    pub fn height(self) -> u32 {
        self.img.height()
    }

    /// Brightness at integer pixel `(x, y)`, or `None` outside the image.
    #[inline]
    pub fn brightness(self, x: i64, y: i64) -> Option<f32> {
        let (w, h) = self.img.dimensions();
        if x < 0 || y < 0 || x >= w as i64 || y >= h as i64 {
            return None;
        }
        let px = self.img.get_pixel(x as u32, y as u32).0;
        Some((px[0] as f32 + px[1] as f32 + px[2] as f32) / 3.0)
    }

    /// Brightness at the pixel nearest to `p`, or `None` outside the image.
    #[inline]
    pub fn brightness_at(self, p: Point2D) -> Option<f32> {
        if !p.is_finite() {
            return None;
        }
        self.brightness(p.x.round() as i64, p.y.round() as i64)
    }
}
