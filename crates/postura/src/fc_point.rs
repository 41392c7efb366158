//! Front-curvature (FC) point search.
//!
//! The FC point is the silhouette point farthest from the shoulder–hip axis,
//! measured perpendicular to it. It stands in for a spinal-curvature landmark
//! that no keypoint covers directly.
//!
//! Search layout, in the axis frame:
//! - `u`: unit vector from the shoulder center to the hip center,
//! - `n = (-u.y, u.x)`: unit normal; positive offsets follow `n`.
//!
//! For every integer step `t` along the axis, offsets up to
//! `radius_fraction * |axis|` are probed on the side(s) allowed for the
//! current orientation. A probe is on the body edge when the axis pixel is
//! brighter than the probe by more than `brightness_delta`.

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

use crate::geometry::Point2D;
use crate::orientation::Orientation;
use crate::sampler::PixelSampler;

const MIN_AXIS_LEN_PX: f64 = 1e-6;

/// Which side of the axis to scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanSide {
    /// Offsets against the normal only.
    Negative,
    /// Offsets along the normal only.
    Positive,
    Both,
}

impl ScanSide {
    fn signs(self) -> &'static [f64] {
        match self {
            Self::Negative => &[-1.0],
            Self::Positive => &[1.0],
            Self::Both => &[-1.0, 1.0],
        }
    }
}

/// Orientation to scan-side mapping.
///
/// Tuned for side-profile photos; the far side of the body is usually
/// occluded and produces false edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanSidePolicy {
    pub left: ScanSide,
    pub right: ScanSide,
    pub center: ScanSide,
    pub unknown: ScanSide,
}

impl Default for ScanSidePolicy {
    fn default() -> Self {
        Self {
            left: ScanSide::Negative,
            right: ScanSide::Positive,
            center: ScanSide::Both,
            unknown: ScanSide::Both,
        }
    }
}

impl ScanSidePolicy {
    pub fn side_for(&self, orientation: Orientation) -> ScanSide {
        match orientation {
            Orientation::Left => self.left,
            Orientation::Right => self.right,
            Orientation::Center => self.center,
            Orientation::Unknown => self.unknown,
        }
    }
}

/// FC locator tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FcLocatorConfig {
    /// Minimum `axis - probe` brightness difference (0-255 scale).
    pub brightness_delta: f32,
    /// Scan radius as a fraction of the shoulder–hip distance.
    pub radius_fraction: f64,
    /// Number of subdivisions of the scan radius. Dominates the cost of the
    /// whole analysis: work is `|axis| * scan_steps` per scanned side.
    pub scan_steps: usize,
    /// Orientation to scan-side mapping.
    pub scan_side: ScanSidePolicy,
}

impl Default for FcLocatorConfig {
    fn default() -> Self {
        Self {
            brightness_delta: 30.0,
            radius_fraction: 0.3,
            scan_steps: 1000,
            scan_side: ScanSidePolicy::default(),
        }
    }
}

impl FcLocatorConfig {
    pub(crate) fn validate(&self) -> Result<(), String> {
        if !(self.radius_fraction.is_finite() && self.radius_fraction > 0.0) {
            return Err(format!(
                "fc radius_fraction must be positive, got {}",
                self.radius_fraction
            ));
        }
        if self.scan_steps == 0 {
            return Err("fc scan_steps must be at least 1".to_string());
        }
        if !self.brightness_delta.is_finite() {
            return Err("fc brightness_delta must be finite".to_string());
        }
        Ok(())
    }
}

/// Outcome of one FC search.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FcPoint {
    /// FC point in image pixels; always inside the image.
    pub point: Point2D,
    /// Signed perpendicular offset from the axis (pixels); 0 on fallback.
    pub offset_px: f64,
    /// `false` when no edge qualified and the hip center was used instead.
    pub found_edge: bool,
}

impl FcPoint {
    fn fallback(hips: Point2D, width: u32, height: u32) -> Self {
        Self {
            point: hips.clamp_to_image(width, height),
            offset_px: 0.0,
            found_edge: false,
        }
    }
}

/// Parameter span `[t0, t1]` of `origin + dir * t`, `t` in `[0, len]`, that
/// lies inside the box `[min, max]` (Liang–Barsky).
fn clip_segment(
    origin: Vector2<f64>,
    dir: Vector2<f64>,
    len: f64,
    min: Vector2<f64>,
    max: Vector2<f64>,
) -> Option<(f64, f64)> {
    let mut t0 = 0.0f64;
    let mut t1 = len;
    for axis in 0..2 {
        let (p, d) = (origin[axis], dir[axis]);
        if d.abs() <= f64::EPSILON {
            if p < min[axis] || p > max[axis] {
                return None;
            }
            continue;
        }
        let a = (min[axis] - p) / d;
        let b = (max[axis] - p) / d;
        t0 = t0.max(a.min(b));
        t1 = t1.min(a.max(b));
        if t0 > t1 {
            return None;
        }
    }
    Some((t0, t1))
}

/// Locate the FC point between `shoulders` and `hips`.
///
/// Falls back to the hip center (clamped into the image) when the axis is
/// degenerate or no probe qualifies.
pub fn locate_fc_point(
    sampler: PixelSampler<'_>,
    shoulders: Point2D,
    hips: Point2D,
    orientation: Orientation,
    config: &FcLocatorConfig,
) -> FcPoint {
    let (width, height) = (sampler.width(), sampler.height());
    let axis = Vector2::new(hips.x - shoulders.x, hips.y - shoulders.y);
    let axis_len = axis.norm();
    if !(axis_len.is_finite() && axis_len > MIN_AXIS_LEN_PX) {
        tracing::debug!("degenerate shoulder-hip axis, FC falls back to hip center");
        return FcPoint::fallback(hips, width, height);
    }

    let u = axis / axis_len;
    let n = Vector2::new(-u.y, u.x);
    let steps = config.scan_steps.max(1);
    let radius = config.radius_fraction * axis_len;
    let dr = radius / steps as f64;
    let signs = config.scan_side.side_for(orientation).signs();
    let origin = Vector2::new(shoulders.x, shoulders.y);

    // Axis samples outside the image never qualify; walk only the clipped span.
    let Some((t_first, t_last)) = clip_segment(
        origin,
        u,
        axis_len,
        Vector2::new(-1.0, -1.0),
        Vector2::new(width as f64, height as f64),
    ) else {
        tracing::warn!("shoulder-hip axis misses the image, FC falls back to hip center");
        return FcPoint::fallback(hips, width, height);
    };

    let mut best: Option<(f64, Point2D)> = None;
    for t in (t_first.ceil() as usize)..=(t_last.floor() as usize) {
        let a = origin + u * t as f64;
        let Some(axis_brightness) = sampler.brightness_at(Point2D::new(a.x, a.y)) else {
            continue;
        };

        for &sign in signs {
            // Descending offsets: the first hit is this side's farthest.
            for k in (1..=steps).rev() {
                let offset = k as f64 * dr;
                if best.is_some_and(|(best_abs, _)| offset <= best_abs) {
                    break;
                }
                let c = a + n * (sign * offset);
                let candidate = Point2D::new(c.x, c.y);
                if !candidate.is_inside(width, height) {
                    continue;
                }
                let Some(b) = sampler.brightness_at(candidate) else {
                    continue;
                };
                if axis_brightness - b > config.brightness_delta {
                    best = Some((offset, candidate));
                    break;
                }
            }
        }
    }

    match best {
        Some((offset, point)) => {
            let signed = (point.x - shoulders.x) * n.x + (point.y - shoulders.y) * n.y;
            tracing::debug!(
                "FC point at ({:.1}, {:.1}), offset {:.1}px of {:.1}px radius",
                point.x,
                point.y,
                offset,
                radius
            );
            FcPoint {
                point,
                offset_px: signed,
                found_edge: true,
            }
        }
        None => {
            tracing::warn!(
                "no body edge found along shoulder-hip axis, FC falls back to hip center"
            );
            FcPoint::fallback(hips, width, height)
        }
    }
}
