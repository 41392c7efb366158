//! High-level analysis API.
//!
//! [`Analyzer`] wires the stages together for one image and one keypoint set:
//! orientation → centerlines → FC point → silhouette alignment → landmark
//! resolution → angle. Every call recomputes from scratch; identical inputs
//! give identical results.

use image::RgbaImage;
use serde::{Deserialize, Serialize};

use crate::angle::{report_angle, PostureAngle};
use crate::centerline::{compute_centerlines, BodyPart, Centerlines};
use crate::config::{AnalysisConfig, AnalysisMode};
use crate::edge_align::align_to_edge;
use crate::error::AnalysisError;
use crate::fc_point::{locate_fc_point, FcPoint};
use crate::geometry::Point2D;
use crate::keypoints::PoseKeypoints;
use crate::landmarks::{LandmarkCandidates, LandmarkRole, LandmarkSet, OverrideStore};
use crate::orientation::{classify_orientation, Orientation};
use crate::sampler::PixelSampler;

/// Full analysis output for one image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub mode: AnalysisMode,
    pub orientation: Orientation,
    /// Image dimensions `[width, height]`.
    pub image_size: [u32; 2],
    /// Calibrated centers straight from the keypoints.
    pub centerlines: Centerlines,
    /// FC search outcome (only in [`AnalysisMode::SideFc`]).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fc_point: Option<FcPoint>,
    /// Final landmark positions with their sources.
    pub landmarks: LandmarkSet,
    pub angle: PostureAngle,
}

/// Primary analysis interface.
///
/// Create once with a configuration, analyze many images.
///
/// # Examples
///
/// ```no_run
/// use postura::{Analyzer, AnalysisMode, OverrideStore, PoseKeypoints};
/// use image::RgbaImage;
///
/// let analyzer = Analyzer::with_mode(AnalysisMode::SideFc);
/// let image = RgbaImage::new(640, 960);
/// let keypoints = PoseKeypoints::default();
/// match analyzer.analyze(&image, &keypoints, &OverrideStore::new()) {
///     Ok(result) => println!("angle {}", result.angle.display),
///     Err(e) => eprintln!("{}", e),
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct Analyzer {
    config: AnalysisConfig,
}

impl Analyzer {
    /// Create an analyzer with a validated configuration.
    pub fn new(config: AnalysisConfig) -> Result<Self, AnalysisError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Default configuration for `mode`.
    pub fn with_mode(mode: AnalysisMode) -> Self {
        Self {
            config: AnalysisConfig::for_mode(mode),
        }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn mode(&self) -> AnalysisMode {
        self.config.mode
    }

    /// Analyze one image.
    ///
    /// Fails with [`AnalysisError::NoPoseDetected`] when `keypoints` holds no
    /// usable point. All other degenerate inputs fall back to defaults.
    pub fn analyze(
        &self,
        image: &RgbaImage,
        keypoints: &PoseKeypoints,
        overrides: &OverrideStore,
    ) -> Result<AnalysisResult, AnalysisError> {
        if keypoints.is_empty() {
            return Err(AnalysisError::NoPoseDetected { detail: None });
        }
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(AnalysisError::InvalidImage {
                reason: format!("empty image {}x{}", width, height),
            });
        }

        let cfg = &self.config;
        let mode = cfg.mode;
        let sampler = PixelSampler::new(image);

        let orientation = classify_orientation(keypoints, &cfg.orientation);
        let centerlines = compute_centerlines(keypoints, cfg.calibration.for_mode(mode));
        tracing::debug!(
            "orientation={} shoulders=({:.1}, {:.1}) hips=({:.1}, {:.1}) feet=({:.1}, {:.1})",
            orientation,
            centerlines.shoulders.x,
            centerlines.shoulders.y,
            centerlines.hips.x,
            centerlines.hips.y,
            centerlines.feet.x,
            centerlines.feet.y,
        );

        let fc_point = (mode == AnalysisMode::SideFc).then(|| {
            locate_fc_point(
                sampler,
                centerlines.shoulders,
                centerlines.hips,
                orientation,
                &cfg.fc_locator,
            )
        });

        let walk = if mode.aligns_to_silhouette() {
            cfg.edge_align.walk.walk_for(orientation)
        } else {
            None
        };
        if mode.aligns_to_silhouette() && walk.is_none() {
            tracing::debug!(
                "no alignment walk for orientation {}, using computed centers",
                orientation
            );
        }

        let candidates = mode.roles().iter().map(|&role| {
            let computed = computed_point(role, keypoints, &centerlines, fc_point.as_ref())
                .map(|p| p.clamp_to_image(width, height));
            let aligned = match (walk, computed) {
                (Some(walk), Some(p)) => Some(
                    align_to_edge(sampler, p, walk, cfg.edge_align.brightness_threshold)
                        .clamp_to_image(width, height),
                ),
                _ => None,
            };
            (
                role,
                LandmarkCandidates {
                    override_point: overrides.get(role),
                    aligned,
                    computed,
                },
            )
        });
        let landmarks = LandmarkSet::resolve(candidates);
        let angle = report_angle(mode, &landmarks);

        tracing::info!(
            "{} analysis: orientation={}, angle {} at {}",
            mode,
            orientation,
            angle.display,
            angle.vertex
        );

        Ok(AnalysisResult {
            mode,
            orientation,
            image_size: [width, height],
            centerlines,
            fc_point,
            landmarks,
            angle,
        })
    }
}

/// Keypoint-derived position for `role`, or `None` when its inputs are
/// missing.
fn computed_point(
    role: LandmarkRole,
    keypoints: &PoseKeypoints,
    centerlines: &Centerlines,
    fc_point: Option<&FcPoint>,
) -> Option<Point2D> {
    let part = match role {
        LandmarkRole::Shoulders => BodyPart::Shoulders,
        LandmarkRole::Hips => BodyPart::Hips,
        LandmarkRole::Feet => BodyPart::Feet,
        LandmarkRole::FrontCurvature => {
            let has_axis =
                has_pair(keypoints, BodyPart::Shoulders) && has_pair(keypoints, BodyPart::Hips);
            return fc_point.filter(|_| has_axis).map(|fc| fc.point);
        }
    };
    has_pair(keypoints, part).then(|| centerlines.get(part))
}

fn has_pair(keypoints: &PoseKeypoints, part: BodyPart) -> bool {
    let (left, right) = part.keypoint_pair();
    keypoints.get(left).is_some() && keypoints.get(right).is_some()
}
