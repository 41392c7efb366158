//! Head-facing direction from nose and shoulder keypoints.

use serde::{Deserialize, Serialize};

use crate::keypoints::{KeypointIndex, PoseKeypoints};

/// Facing direction of the photographed body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    /// Nose clearly left of the shoulder (smaller x).
    Left,
    /// Nose clearly right of the shoulder (larger x).
    Right,
    /// Nose roughly above the shoulder.
    Center,
    /// Not enough keypoints to decide.
    #[default]
    Unknown,
}

impl std::fmt::Display for Orientation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Left => "left",
            Self::Right => "right",
            Self::Center => "center",
            Self::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

/// Orientation classifier tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OrientationConfig {
    /// Horizontal nose-to-shoulder offset (pixels) beyond which the body is
    /// considered turned. Camera-dependent; 30 px suits ~1000 px tall photos.
    pub threshold_px: f64,
}

impl Default for OrientationConfig {
    fn default() -> Self {
        Self { threshold_px: 30.0 }
    }
}

/// Classify facing direction from the nose and one visible shoulder.
///
/// The left shoulder is preferred when both are present.
pub fn classify_orientation(keypoints: &PoseKeypoints, config: &OrientationConfig) -> Orientation {
    let Some(nose) = keypoints.point(KeypointIndex::Nose) else {
        return Orientation::Unknown;
    };
    let shoulder = keypoints
        .point(KeypointIndex::LeftShoulder)
        .or_else(|| keypoints.point(KeypointIndex::RightShoulder));
    let Some(shoulder) = shoulder else {
        return Orientation::Unknown;
    };

    let diff = nose.x - shoulder.x;
    if diff > config.threshold_px {
        Orientation::Right
    } else if diff < -config.threshold_px {
        Orientation::Left
    } else {
        Orientation::Center
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keypoints::Keypoint;

    fn pose(nose_x: Option<f64>, left_x: Option<f64>, right_x: Option<f64>) -> PoseKeypoints {
        let mut kps = PoseKeypoints::default();
        if let Some(x) = nose_x {
            kps.set(KeypointIndex::Nose, Keypoint::new(x, 40.0, 0.9, "nose"));
        }
        if let Some(x) = left_x {
            kps.set(KeypointIndex::LeftShoulder, Keypoint::new(x, 90.0, 0.9, "left_shoulder"));
        }
        if let Some(x) = right_x {
            kps.set(KeypointIndex::RightShoulder, Keypoint::new(x, 90.0, 0.9, "right_shoulder"));
        }
        kps
    }

    fn facing(nose: Option<f64>, left: Option<f64>, right: Option<f64>) -> Orientation {
        classify_orientation(&pose(nose, left, right), &OrientationConfig::default())
    }

    #[test]
    fn nose_right_of_shoulder_faces_right() {
        assert_eq!(facing(Some(140.0), Some(100.0), None), Orientation::Right);
    }

    #[test]
    fn nose_left_of_shoulder_faces_left() {
        assert_eq!(facing(Some(60.0), None, Some(100.0)), Orientation::Left);
    }

    #[test]
    fn threshold_is_exclusive() {
        assert_eq!(facing(Some(130.0), Some(100.0), None), Orientation::Center);
        assert_eq!(facing(Some(70.0), Some(100.0), None), Orientation::Center);
    }

    #[test]
    fn left_shoulder_is_preferred() {
        // Against the right shoulder this would be Center.
        assert_eq!(facing(Some(140.0), Some(100.0), Some(130.0)), Orientation::Right);
    }

    #[test]
    fn missing_data_is_unknown() {
        assert_eq!(facing(None, Some(100.0), Some(120.0)), Orientation::Unknown);
        assert_eq!(facing(Some(100.0), None, None), Orientation::Unknown);
        assert_eq!(Orientation::default(), Orientation::Unknown);
    }

    #[test]
    fn threshold_is_tunable() {
        let cfg = OrientationConfig { threshold_px: 50.0 };
        let kps = pose(Some(140.0), Some(100.0), None);
        assert_eq!(classify_orientation(&kps, &cfg), Orientation::Center);
    }
}
