//! Synthetic RGBA scenes for image-based unit tests.

use image::{Rgba, RgbaImage};
use imageproc::drawing::{draw_filled_ellipse_mut, draw_filled_rect_mut};

use crate::keypoints::{Keypoint, KeypointIndex, PoseKeypoints};

/// Axis-aligned pixel rectangle (`x`, `y` top-left; `w`, `h` size).
#[derive(Debug, Clone, Copy)]
pub(crate) struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: u32,
    pub h: u32,
}

impl Rect {
    pub(crate) fn new(x: i32, y: i32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }

    fn to_imageproc(self) -> imageproc::rect::Rect {
        imageproc::rect::Rect::at(self.x, self.y).of_size(self.w, self.h)
    }
}

fn gray(v: u8) -> Rgba<u8> {
    Rgba([v, v, v, 255])
}

/// Uniform gray image.
pub(crate) fn uniform_image(w: u32, h: u32, v: u8) -> RgbaImage {
    RgbaImage::from_pixel(w, h, gray(v))
}

/// Two-level image split by column: `left` for `x <= last_left_x`, `right`
/// after that.
pub(crate) fn step_image(w: u32, h: u32, last_left_x: u32, left: u8, right: u8) -> RgbaImage {
    RgbaImage::from_fn(w, h, |x, _| if x <= last_left_x { gray(left) } else { gray(right) })
}

/// Uniform background with one filled rectangle.
pub(crate) fn rect_image(w: u32, h: u32, bg: u8, rect: Rect, fg: u8) -> RgbaImage {
    let mut img = uniform_image(w, h, bg);
    draw_filled_rect_mut(&mut img, rect.to_imageproc(), gray(fg));
    img
}

/// Bright side-profile silhouette on a dark background.
///
/// The torso is a tall rectangle spanning x in `[80, 140)`, with a belly
/// ellipse bulging toward larger x around y = 200, a head at the top and legs
/// down to y = 380.
pub(crate) fn profile_silhouette() -> RgbaImage {
    let mut img = uniform_image(240, 400, 20);
    let body = gray(210);
    draw_filled_ellipse_mut(&mut img, (110, 40), 22, 28, body);
    draw_filled_rect_mut(&mut img, Rect::new(80, 70, 60, 200).to_imageproc(), body);
    draw_filled_ellipse_mut(&mut img, (140, 200), 25, 40, body);
    draw_filled_rect_mut(&mut img, Rect::new(90, 270, 40, 110).to_imageproc(), body);
    img
}

/// Keypoints matching [`profile_silhouette`] for a body facing toward
/// smaller x (nose left of the shoulders).
pub(crate) fn profile_keypoints() -> PoseKeypoints {
    let mut kps = PoseKeypoints::default();
    let mut put = |idx: KeypointIndex, x: f64, y: f64| {
        kps.set(idx, Keypoint::new(x, y, 0.9, idx.name()));
    };
    put(KeypointIndex::Nose, 72.0, 40.0);
    put(KeypointIndex::LeftShoulder, 110.0, 90.0);
    put(KeypointIndex::RightShoulder, 114.0, 92.0);
    put(KeypointIndex::LeftHip, 108.0, 260.0);
    put(KeypointIndex::RightHip, 112.0, 262.0);
    put(KeypointIndex::LeftAnkle, 106.0, 370.0);
    put(KeypointIndex::RightAnkle, 110.0, 372.0);
    kps
}
