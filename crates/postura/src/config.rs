//! Analysis configuration.
//!
//! Every tunable constant of the pipeline lives here with its documented
//! default. JSON files may specify any subset of fields; missing fields keep
//! their defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::centerline::CalibrationConfig;
use crate::edge_align::EdgeAlignConfig;
use crate::error::AnalysisError;
use crate::fc_point::FcLocatorConfig;
use crate::landmarks::LandmarkRole;
use crate::orientation::OrientationConfig;

/// Which view of the body is analyzed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisMode {
    /// Front/back view: shoulders, hips, feet from keypoints only.
    Front,
    /// Side view: shoulders, hips, feet snapped to the silhouette edge.
    #[default]
    Side,
    /// Side view with the front-curvature point instead of the feet.
    SideFc,
}

impl AnalysisMode {
    /// Landmark roles produced in this mode.
    pub fn roles(self) -> &'static [LandmarkRole] {
        match self {
            Self::Front | Self::Side => &[
                LandmarkRole::Shoulders,
                LandmarkRole::Hips,
                LandmarkRole::Feet,
            ],
            Self::SideFc => &[
                LandmarkRole::Shoulders,
                LandmarkRole::Hips,
                LandmarkRole::FrontCurvature,
            ],
        }
    }

    /// Whether computed landmarks are snapped to the silhouette edge.
    pub fn aligns_to_silhouette(self) -> bool {
        !matches!(self, Self::Front)
    }
}

impl std::fmt::Display for AnalysisMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Front => "front",
            Self::Side => "side",
            Self::SideFc => "side_fc",
        };
        f.write_str(s)
    }
}

/// Top-level analysis configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Analysis mode.
    pub mode: AnalysisMode,
    /// Vertical calibration factors per mode.
    pub calibration: CalibrationConfig,
    /// Facing-direction classifier.
    pub orientation: OrientationConfig,
    /// Silhouette edge snapping.
    pub edge_align: EdgeAlignConfig,
    /// Front-curvature point search.
    pub fc_locator: FcLocatorConfig,
}

impl AnalysisConfig {
    /// Default configuration for `mode`.
    pub fn for_mode(mode: AnalysisMode) -> Self {
        Self {
            mode,
            ..Default::default()
        }
    }

    /// Parse and validate a configuration from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self, AnalysisError> {
        let cfg: Self =
            serde_json::from_str(json).map_err(|e| AnalysisError::Config(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Load and validate a configuration from a JSON file.
    pub fn from_json_file(path: &Path) -> Result<Self, AnalysisError> {
        let data = std::fs::read_to_string(path)
            .map_err(|e| AnalysisError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_json_str(&data)
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<(), AnalysisError> {
        let tables = [
            &self.calibration.front,
            &self.calibration.side,
            &self.calibration.side_fc,
        ];
        for table in tables {
            table.validate().map_err(AnalysisError::Config)?;
        }
        if !(self.orientation.threshold_px.is_finite() && self.orientation.threshold_px >= 0.0) {
            return Err(AnalysisError::Config(format!(
                "orientation threshold_px must be non-negative, got {}",
                self.orientation.threshold_px
            )));
        }
        let t = self.edge_align.brightness_threshold;
        if !(t.is_finite() && t >= 0.0) {
            return Err(AnalysisError::Config(format!(
                "edge_align brightness_threshold must be non-negative, got {}",
                t
            )));
        }
        self.fc_locator.validate().map_err(AnalysisError::Config)
    }
}
