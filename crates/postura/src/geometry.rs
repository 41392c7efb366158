//! Point/vector primitives in image pixel coordinates.
//!
//! All helpers degrade to defaults instead of failing: missing inputs give the
//! origin, degenerate angles give `0.0`.

use std::ops::{Add, Mul, Sub};

use serde::{Deserialize, Serialize};

/// A 2D point in image pixel coordinates (x right, y down).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    /// The origin, used as the degrade-to-default value.
    pub const ORIGIN: Point2D = Point2D { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Returns `true` when both coordinates are finite.
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    pub fn dot(self, rhs: Point2D) -> f64 {
        self.x * rhs.x + self.y * rhs.y
    }

    pub fn norm(self) -> f64 {
        self.dot(self).sqrt()
    }

    /// Clamp into the pixel rectangle `[0, width) x [0, height)`.
    ///
    /// Points already inside are returned unchanged; outside points land on
    /// the nearest border pixel (`width - 1`, `height - 1` on the far side).
    /// Non-finite points and zero-sized images give the origin.
    pub fn clamp_to_image(self, width: u32, height: u32) -> Point2D {
        if !self.is_finite() {
            return Point2D::ORIGIN;
        }
        if self.is_inside(width, height) {
            return self;
        }
        let max_x = (width.max(1) - 1) as f64;
        let max_y = (height.max(1) - 1) as f64;
        Point2D {
            x: self.x.clamp(0.0, max_x),
            y: self.y.clamp(0.0, max_y),
        }
    }

    /// Returns `true` when the point lies inside `[0, width) x [0, height)`.
    pub fn is_inside(self, width: u32, height: u32) -> bool {
        self.x >= 0.0 && self.y >= 0.0 && self.x < width as f64 && self.y < height as f64
    }
}

impl From<[f64; 2]> for Point2D {
    fn from(xy: [f64; 2]) -> Self {
        Self { x: xy[0], y: xy[1] }
    }
}

impl Add for Point2D {
    type Output = Point2D;

    fn add(self, rhs: Point2D) -> Self::Output {
        Point2D {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
        }
    }
}

impl Sub for Point2D {
    type Output = Point2D;

    fn sub(self, rhs: Point2D) -> Self::Output {
        Point2D {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
        }
    }
}

impl Mul<f64> for Point2D {
    type Output = Point2D;

    fn mul(self, rhs: f64) -> Self::Output {
        Point2D {
            x: self.x * rhs,
            y: self.y * rhs,
        }
    }
}

/// Midpoint of `a` and `b` with the y component scaled by `vertical_scale`.
///
/// Returns the origin when either input is absent or non-finite. Note that the
/// scale multiplies the absolute y coordinate, not an offset from anything.
pub fn midpoint(a: Option<Point2D>, b: Option<Point2D>, vertical_scale: f64) -> Point2D {
    match (a, b) {
        (Some(a), Some(b)) if a.is_finite() && b.is_finite() => Point2D {
            x: (a.x + b.x) * 0.5,
            y: (a.y + b.y) * 0.5 * vertical_scale,
        },
        _ => Point2D::ORIGIN,
    }
}

/// Euclidean distance.
pub fn distance(a: Point2D, b: Point2D) -> f64 {
    (a - b).norm()
}

/// Angle at vertex `b` between rays `b→a` and `b→c`, in degrees `[0, 180]`.
///
/// Zero-length rays (coincident points) return `0.0`.
pub fn angle_degrees(a: Point2D, b: Point2D, c: Point2D) -> f64 {
    let ba = a - b;
    let bc = c - b;
    let denom = ba.norm() * bc.norm();
    if !(denom.is_finite() && denom > f64::EPSILON) {
        return 0.0;
    }
    // Rounding can push the cosine slightly past ±1.
    let cos = (ba.dot(bc) / denom).clamp(-1.0, 1.0);
    cos.acos().to_degrees()
}
