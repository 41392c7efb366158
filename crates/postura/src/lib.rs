//! postura — posture alignment from a single photo.
//!
//! Given an image and body keypoints from an external pose estimator, the
//! pipeline places a small set of posture landmarks and reports the angle they
//! form. The stages are:
//!
//! 1. **Orientation** – facing direction from nose vs. shoulder position.
//! 2. **Centerline** – calibrated shoulder, hip and foot centers.
//! 3. **FC point** – perpendicular scan of the shoulder–hip axis for the
//!    front-curvature point (side-FC mode).
//! 4. **Edge alignment** – horizontal snapping of landmarks onto the
//!    silhouette edge (side modes).
//! 5. **Landmarks** – per-role resolution of override, aligned and computed
//!    positions.
//! 6. **Angle** – angle at the mode's vertex landmark.
//!
//! # Public API
//! - [`Analyzer`] and [`AnalysisConfig`] as primary entry points
//! - [`ImageSession`] and [`PoseEstimator`] for the estimator boundary
//! - stage functions and result structures for direct use

mod analyzer;
mod angle;
mod centerline;
mod config;
mod edge_align;
mod error;
mod fc_point;
mod geometry;
mod keypoints;
mod landmarks;
mod orientation;
mod sampler;
mod session;

#[cfg(test)]
pub(crate) mod test_utils;

pub use analyzer::{AnalysisResult, Analyzer};
pub use angle::{angle_roles, format_degrees, report_angle, PostureAngle};
pub use centerline::{
    compute_centerlines, part_center, BodyPart, CalibrationConfig, CalibrationTable, Centerlines,
    FOOT_CALIBRATION, HIP_CALIBRATION, SHOULDER_CALIBRATION,
};
pub use config::{AnalysisConfig, AnalysisMode};
pub use edge_align::{align_to_edge, AlignWalkPolicy, EdgeAlignConfig, EdgeWalk};
pub use error::AnalysisError;
pub use fc_point::{locate_fc_point, FcLocatorConfig, FcPoint, ScanSide, ScanSidePolicy};
pub use geometry::{angle_degrees, distance, midpoint, Point2D};
pub use keypoints::{Keypoint, KeypointIndex, PoseKeypoints};
pub use landmarks::{
    LandmarkCandidates, LandmarkRole, LandmarkSet, LandmarkSource, OverrideStore,
    ResolvedLandmark,
};
pub use orientation::{classify_orientation, Orientation, OrientationConfig};
pub use sampler::{rgba_from_raw, PixelSampler};
pub use session::{ImageSession, LoadTicket, PoseEstimator};
