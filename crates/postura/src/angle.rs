//! Posture angle over the resolved landmarks of one analysis mode.

use serde::{Deserialize, Serialize};

use crate::config::AnalysisMode;
use crate::geometry::angle_degrees;
use crate::landmarks::{LandmarkRole, LandmarkSet};

/// Reported posture angle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostureAngle {
    /// Angle at the vertex, degrees in `[0, 180]`.
    pub degrees: f64,
    /// Landmark the angle is measured at.
    pub vertex: LandmarkRole,
    /// Display string with one decimal, e.g. `"172.4°"`.
    pub display: String,
}

/// Landmark triple `(ray end, vertex, ray end)` measured in `mode`.
pub fn angle_roles(mode: AnalysisMode) -> [LandmarkRole; 3] {
    match mode {
        AnalysisMode::Front | AnalysisMode::Side => {
            [LandmarkRole::Shoulders, LandmarkRole::Hips, LandmarkRole::Feet]
        }
        AnalysisMode::SideFc => [
            LandmarkRole::Shoulders,
            LandmarkRole::FrontCurvature,
            LandmarkRole::Hips,
        ],
    }
}

pub fn format_degrees(degrees: f64) -> String {
    format!("{:.1}°", degrees)
}

/// Angle at the mode's vertex landmark.
pub fn report_angle(mode: AnalysisMode, landmarks: &LandmarkSet) -> PostureAngle {
    let [a, vertex, c] = angle_roles(mode);
    let degrees = angle_degrees(
        landmarks.point(a),
        landmarks.point(vertex),
        landmarks.point(c),
    );
    PostureAngle {
        degrees,
        vertex,
        display: format_degrees(degrees),
    }
}
