//! Body keypoints as delivered by the external pose estimator.
//!
//! Keypoints follow the 17-point COCO/MoveNet numbering. Only a handful of
//! indices are consumed here (nose, shoulders, hips, ankles); anything missing
//! or non-finite is treated as absent rather than as an error.

use serde::{Deserialize, Serialize};

use crate::geometry::Point2D;

/// One body-joint estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Keypoint {
    pub x: f64,
    pub y: f64,
    /// Estimator confidence in `[0, 1]`. Advisory only, never thresholded.
    #[serde(default, alias = "score")]
    pub confidence: f32,
    /// Anatomical name, e.g. `"left_shoulder"`.
    #[serde(default)]
    pub name: String,
}

impl Keypoint {
    pub fn new(x: f64, y: f64, confidence: f32, name: impl Into<String>) -> Self {
        Self {
            x,
            y,
            confidence,
            name: name.into(),
        }
    }

    pub fn point(&self) -> Point2D {
        Point2D::new(self.x, self.y)
    }

    fn is_usable(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Fixed anatomical keypoint numbering (COCO 17-point order).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeypointIndex {
    Nose = 0,
    LeftEye = 1,
    RightEye = 2,
    LeftEar = 3,
    RightEar = 4,
    LeftShoulder = 5,
    RightShoulder = 6,
    LeftElbow = 7,
    RightElbow = 8,
    LeftWrist = 9,
    RightWrist = 10,
    LeftHip = 11,
    RightHip = 12,
    LeftKnee = 13,
    RightKnee = 14,
    LeftAnkle = 15,
    RightAnkle = 16,
}

impl KeypointIndex {
    pub const COUNT: usize = 17;

    pub const ALL: [KeypointIndex; Self::COUNT] = [
        Self::Nose,
        Self::LeftEye,
        Self::RightEye,
        Self::LeftEar,
        Self::RightEar,
        Self::LeftShoulder,
        Self::RightShoulder,
        Self::LeftElbow,
        Self::RightElbow,
        Self::LeftWrist,
        Self::RightWrist,
        Self::LeftHip,
        Self::RightHip,
        Self::LeftKnee,
        Self::RightKnee,
        Self::LeftAnkle,
        Self::RightAnkle,
    ];

    /// Estimator-side name (MoveNet / COCO convention).
    pub fn name(self) -> &'static str {
        match self {
            Self::Nose => "nose",
            Self::LeftEye => "left_eye",
            Self::RightEye => "right_eye",
            Self::LeftEar => "left_ear",
            Self::RightEar => "right_ear",
            Self::LeftShoulder => "left_shoulder",
            Self::RightShoulder => "right_shoulder",
            Self::LeftElbow => "left_elbow",
            Self::RightElbow => "right_elbow",
            Self::LeftWrist => "left_wrist",
            Self::RightWrist => "right_wrist",
            Self::LeftHip => "left_hip",
            Self::RightHip => "right_hip",
            Self::LeftKnee => "left_knee",
            Self::RightKnee => "right_knee",
            Self::LeftAnkle => "left_ankle",
            Self::RightAnkle => "right_ankle",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.name() == name)
    }
}

/// Keypoints for one detected body, addressed by [`KeypointIndex`].
///
/// Replaced wholesale on every new detection; never merged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PoseKeypoints {
    slots: Vec<Option<Keypoint>>,
}

impl PoseKeypoints {
    /// Build from estimator output in index order. Slot `i` is keypoint `i`.
    pub fn from_indexed(slots: Vec<Option<Keypoint>>) -> Self {
        Self { slots }
    }

    /// Build from keypoints identified by name; unknown names are ignored.
    ///
    /// When a name repeats, the last occurrence wins.
    pub fn from_named(keypoints: impl IntoIterator<Item = Keypoint>) -> Self {
        let mut slots = vec![None; KeypointIndex::COUNT];
        for kp in keypoints {
            if let Some(idx) = KeypointIndex::from_name(&kp.name) {
                slots[idx as usize] = Some(kp);
            }
        }
        Self { slots }
    }

    /// Returns `true` when no usable keypoint is present.
    pub fn is_empty(&self) -> bool {
        self.slots.iter().flatten().all(|kp| !kp.is_usable())
    }

    /// Number of usable keypoints.
    pub fn n_present(&self) -> usize {
        self.slots.iter().flatten().filter(|kp| kp.is_usable()).count()
    }

    /// Keypoint at `idx`, or `None` if missing or non-finite.
    pub fn get(&self, idx: KeypointIndex) -> Option<&Keypoint> {
        self.slots
            .get(idx as usize)
            .and_then(Option::as_ref)
            .filter(|kp| kp.is_usable())
    }

    pub fn point(&self, idx: KeypointIndex) -> Option<Point2D> {
        self.get(idx).map(Keypoint::point)
    }

    pub fn set(&mut self, idx: KeypointIndex, kp: Keypoint) {
        let i = idx as usize;
        if self.slots.len() <= i {
            self.slots.resize(i + 1, None);
        }
        self.slots[i] = Some(kp);
    }
}
