//! Error type for conditions surfaced to callers.
//!
//! Geometry and scanning never fail; they fall back to defaults. Only the
//! outer boundaries (pose estimation, image decoding, session bookkeeping,
//! user input, configuration) report errors.

use crate::landmarks::LandmarkRole;

/// Errors reported by the analysis boundary.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisError {
    /// The pose estimator failed or found no body.
    NoPoseDetected {
        /// Estimator-provided detail, if any.
        detail: Option<String>,
    },
    /// The source image could not be decoded or has an inconsistent buffer.
    InvalidImage {
        /// Human-readable reason.
        reason: String,
    },
    /// A keypoint result arrived for an image load that is no longer current.
    StaleResult {
        /// Generation of the load the result belongs to.
        ticket: u64,
        /// Generation of the currently loaded image.
        current: u64,
    },
    /// A user override had non-finite coordinates.
    InvalidOverride {
        /// Role the override was addressed to.
        role: LandmarkRole,
    },
    /// A configuration value is out of range or could not be parsed.
    Config(String),
}

impl std::fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoPoseDetected { detail: Some(d) } => write!(f, "no pose detected: {}", d),
            Self::NoPoseDetected { detail: None } => write!(f, "no pose detected"),
            Self::InvalidImage { reason } => write!(f, "invalid image: {}", reason),
            Self::StaleResult { ticket, current } => write!(
                f,
                "stale keypoint result: load generation {} superseded by {}",
                ticket, current
            ),
            Self::InvalidOverride { role } => {
                write!(f, "override for {} must have finite coordinates", role)
            }
            Self::Config(msg) => write!(f, "invalid config: {}", msg),
        }
    }
}

impl std::error::Error for AnalysisError {}
