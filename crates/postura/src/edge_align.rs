//! Horizontal silhouette-edge snapping.
//!
//! Walks pixel by pixel along a row until the brightness between consecutive
//! pixels jumps by more than a threshold. Only the first discontinuity counts,
//! so texture or noise inside the body can stop the walk early.

use serde::{Deserialize, Serialize};

use crate::geometry::Point2D;
use crate::orientation::Orientation;
use crate::sampler::PixelSampler;

/// Walk direction, named by body-facing side.
///
/// `Left` walks toward increasing x, `Right` toward decreasing x.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeWalk {
    Left,
    Right,
}

impl EdgeWalk {
    /// Pixel step along x.
    pub fn x_step(self) -> i64 {
        match self {
            Self::Left => 1,
            Self::Right => -1,
        }
    }
}

/// Which walk (if any) to use for each orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlignWalkPolicy {
    pub left: Option<EdgeWalk>,
    pub right: Option<EdgeWalk>,
    pub center: Option<EdgeWalk>,
    pub unknown: Option<EdgeWalk>,
}

impl Default for AlignWalkPolicy {
    fn default() -> Self {
        Self {
            left: Some(EdgeWalk::Left),
            right: Some(EdgeWalk::Right),
            center: None,
            unknown: None,
        }
    }
}

impl AlignWalkPolicy {
    pub fn walk_for(&self, orientation: Orientation) -> Option<EdgeWalk> {
        match orientation {
            Orientation::Left => self.left,
            Orientation::Right => self.right,
            Orientation::Center => self.center,
            Orientation::Unknown => self.unknown,
        }
    }
}

/// Silhouette alignment tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EdgeAlignConfig {
    /// Consecutive-pixel brightness delta (0-255 scale) that ends a walk.
    pub brightness_threshold: f32,
    /// Orientation to walk-direction mapping.
    pub walk: AlignWalkPolicy,
}

impl Default for EdgeAlignConfig {
    fn default() -> Self {
        Self {
            brightness_threshold: 25.0,
            walk: AlignWalkPolicy::default(),
        }
    }
}

/// Snap `start` horizontally onto the first brightness edge in `walk`
/// direction.
///
/// The walk starts at the rounded pixel and stops on the last pixel before a
/// step larger than `threshold`, or one pixel short of the image border. Only
/// x changes; y is returned as given. Starts outside the image are returned
/// unchanged.
pub fn align_to_edge(
    sampler: PixelSampler<'_>,
    start: Point2D,
    walk: EdgeWalk,
    threshold: f32,
) -> Point2D {
    if !start.is_finite() {
        return start;
    }
    let mut x = start.x.round() as i64;
    let y = start.y.round() as i64;
    let Some(mut current) = sampler.brightness(x, y) else {
        return start;
    };

    let width = sampler.width() as i64;
    let step = walk.x_step();
    let can_step = |x: i64| match walk {
        EdgeWalk::Left => x < width - 2,
        EdgeWalk::Right => x > 1,
    };

    while can_step(x) {
        let next_x = x + step;
        let Some(next) = sampler.brightness(next_x, y) else {
            break;
        };
        if (next - current).abs() > threshold {
            break;
        }
        current = next;
        x = next_x;
    }

    Point2D::new(x as f64, start.y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{step_image, uniform_image};

    #[test]
    fn stops_on_last_pixel_before_jump() {
        // 200 up to x=10, 50 from x=11.
        let img = step_image(32, 8, 10, 200, 50);
        let s = PixelSampler::new(&img);
        let p = align_to_edge(s, Point2D::new(5.0, 3.0), EdgeWalk::Left, 25.0);
        assert_eq!(p, Point2D::new(10.0, 3.0));
    }

    #[test]
    fn walking_toward_decreasing_x_stops_at_edge() {
        // 50 up to x=10, 200 from x=11.
        let img = step_image(32, 8, 10, 50, 200);
        let s = PixelSampler::new(&img);
        let p = align_to_edge(s, Point2D::new(20.0, 4.0), EdgeWalk::Right, 25.0);
        assert_eq!(p, Point2D::new(11.0, 4.0));
    }

    #[test]
    fn realigning_own_output_is_idempotent() {
        let img = step_image(32, 8, 10, 200, 50);
        let s = PixelSampler::new(&img);
        let first = align_to_edge(s, Point2D::new(2.4, 3.0), EdgeWalk::Left, 25.0);
        let second = align_to_edge(s, first, EdgeWalk::Left, 25.0);
        assert_eq!(first, second);

        let flat = uniform_image(16, 4, 120);
        let s = PixelSampler::new(&flat);
        let first = align_to_edge(s, Point2D::new(5.0, 1.0), EdgeWalk::Right, 25.0);
        assert_eq!(first.x, 1.0);
        assert_eq!(align_to_edge(s, first, EdgeWalk::Right, 25.0), first);
    }

    #[test]
    fn uniform_row_walks_to_margin() {
        let img = uniform_image(16, 4, 120);
        let s = PixelSampler::new(&img);
        let p = align_to_edge(s, Point2D::new(3.0, 2.0), EdgeWalk::Left, 25.0);
        assert_eq!(p.x, 14.0);
    }

    #[test]
    fn y_is_never_altered() {
        let img = step_image(32, 8, 10, 200, 50);
        let s = PixelSampler::new(&img);
        let p = align_to_edge(s, Point2D::new(5.2, 3.4), EdgeWalk::Left, 25.0);
        assert_eq!(p.y, 3.4);
    }

    #[test]
    fn small_steps_below_threshold_are_followed() {
        let img = step_image(32, 8, 10, 200, 180);
        let s = PixelSampler::new(&img);
        let p = align_to_edge(s, Point2D::new(5.0, 3.0), EdgeWalk::Left, 25.0);
        assert_eq!(p.x, 30.0);
    }

    #[test]
    fn start_outside_image_is_returned_unchanged() {
        let img = uniform_image(16, 4, 120);
        let s = PixelSampler::new(&img);
        let start = Point2D::new(-3.0, 2.0);
        assert_eq!(align_to_edge(s, start, EdgeWalk::Left, 25.0), start);
    }

    #[test]
    fn default_policy_skips_center_and_unknown() {
        let policy = AlignWalkPolicy::default();
        assert_eq!(policy.walk_for(Orientation::Left), Some(EdgeWalk::Left));
        assert_eq!(policy.walk_for(Orientation::Right), Some(EdgeWalk::Right));
        assert_eq!(policy.walk_for(Orientation::Center), None);
        assert_eq!(policy.walk_for(Orientation::Unknown), None);
    }
}
