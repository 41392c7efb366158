//! Calibrated body-part centers from left/right keypoint pairs.
//!
//! Keypoints sit inside the body outline, so the plain midpoint of a pair
//! lands a little low on the silhouette. Each part applies a fixed vertical
//! calibration factor to the midpoint's y coordinate.

use serde::{Deserialize, Serialize};

use crate::config::AnalysisMode;
use crate::geometry::{midpoint, Point2D};
use crate::keypoints::{KeypointIndex, PoseKeypoints};

/// Vertical calibration for the shoulder center.
pub const SHOULDER_CALIBRATION: f64 = 0.91;
/// Vertical calibration for the hip center.
pub const HIP_CALIBRATION: f64 = 0.95;
/// Vertical calibration for the foot center.
pub const FOOT_CALIBRATION: f64 = 1.0;

/// Accepted range for any calibration factor.
pub const CALIBRATION_RANGE: std::ops::RangeInclusive<f64> = 0.5..=1.5;

/// Body parts with a left/right keypoint pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BodyPart {
    Shoulders,
    Hips,
    Feet,
}

impl BodyPart {
    pub const ALL: [BodyPart; 3] = [Self::Shoulders, Self::Hips, Self::Feet];

    /// Left and right keypoint indices of the pair.
    pub fn keypoint_pair(self) -> (KeypointIndex, KeypointIndex) {
        match self {
            Self::Shoulders => (KeypointIndex::LeftShoulder, KeypointIndex::RightShoulder),
            Self::Hips => (KeypointIndex::LeftHip, KeypointIndex::RightHip),
            Self::Feet => (KeypointIndex::LeftAnkle, KeypointIndex::RightAnkle),
        }
    }
}

/// Vertical calibration factors for one analysis mode.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalibrationTable {
    pub shoulders: f64,
    pub hips: f64,
    pub feet: f64,
}

impl Default for CalibrationTable {
    fn default() -> Self {
        Self {
            shoulders: SHOULDER_CALIBRATION,
            hips: HIP_CALIBRATION,
            feet: FOOT_CALIBRATION,
        }
    }
}

impl CalibrationTable {
    pub fn factor(&self, part: BodyPart) -> f64 {
        match part {
            BodyPart::Shoulders => self.shoulders,
            BodyPart::Hips => self.hips,
            BodyPart::Feet => self.feet,
        }
    }

    pub(crate) fn validate(&self) -> Result<(), String> {
        for part in BodyPart::ALL {
            let f = self.factor(part);
            if !(f.is_finite() && CALIBRATION_RANGE.contains(&f)) {
                return Err(format!(
                    "calibration factor for {:?} is {}, expected {:?}",
                    part, f, CALIBRATION_RANGE
                ));
            }
        }
        Ok(())
    }
}

/// Calibration tables per analysis mode.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalibrationConfig {
    pub front: CalibrationTable,
    pub side: CalibrationTable,
    pub side_fc: CalibrationTable,
}

impl CalibrationConfig {
    pub fn for_mode(&self, mode: AnalysisMode) -> &CalibrationTable {
        match mode {
            AnalysisMode::Front => &self.front,
            AnalysisMode::Side => &self.side,
            AnalysisMode::SideFc => &self.side_fc,
        }
    }
}

/// Calibrated centers of the three paired body parts.
///
/// Parts with a missing keypoint degrade to the origin.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Centerlines {
    pub shoulders: Point2D,
    pub hips: Point2D,
    pub feet: Point2D,
}

impl Centerlines {
    pub fn get(&self, part: BodyPart) -> Point2D {
        match part {
            BodyPart::Shoulders => self.shoulders,
            BodyPart::Hips => self.hips,
            BodyPart::Feet => self.feet,
        }
    }
}

/// Calibrated center of one body part.
pub fn part_center(keypoints: &PoseKeypoints, part: BodyPart, table: &CalibrationTable) -> Point2D {
    let (left, right) = part.keypoint_pair();
    midpoint(
        keypoints.point(left),
        keypoints.point(right),
        table.factor(part),
    )
}

/// Calibrated centers of all paired body parts.
pub fn compute_centerlines(keypoints: &PoseKeypoints, table: &CalibrationTable) -> Centerlines {
    Centerlines {
        shoulders: part_center(keypoints, BodyPart::Shoulders, table),
        hips: part_center(keypoints, BodyPart::Hips, table),
        feet: part_center(keypoints, BodyPart::Feet, table),
    }
}
