//! Per-image session state around the pose-estimation boundary.
//!
//! Pose estimation is slow and may finish after the user has already moved on
//! to another image. Every image load issues a [`LoadTicket`]; keypoints are
//! only accepted for the ticket of the current load, so a late result can never
//! be applied to the wrong picture.

use std::sync::Arc;

use image::RgbaImage;

use crate::analyzer::{AnalysisResult, Analyzer};
use crate::error::AnalysisError;
use crate::geometry::Point2D;
use crate::keypoints::PoseKeypoints;
use crate::landmarks::{LandmarkRole, OverrideStore};

/// External body-keypoint estimator (e.g. a MoveNet runtime).
pub trait PoseEstimator {
    /// Estimate keypoints for one image.
    ///
    /// An empty result means no body was found.
    fn estimate_keypoints(&self, image: &RgbaImage) -> Result<PoseKeypoints, AnalysisError>;
}

/// Identifies one image load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LoadTicket {
    generation: u64,
}

impl LoadTicket {
    pub fn generation(self) -> u64 {
        self.generation
    }
}

/// Current image, its keypoints and the user's overrides.
#[derive(Debug, Default)]
pub struct ImageSession {
    generation: u64,
    image: Option<Arc<RgbaImage>>,
    keypoints: Option<PoseKeypoints>,
    overrides: OverrideStore,
}

impl ImageSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the current image.
    ///
    /// Keypoints and overrides of the previous image are dropped and any
    /// outstanding ticket becomes stale.
    pub fn load_image(&mut self, image: RgbaImage) -> LoadTicket {
        self.generation += 1;
        self.image = Some(Arc::new(image));
        self.keypoints = None;
        self.overrides.clear();
        tracing::debug!("image load generation {}", self.generation);
        self.current_ticket()
    }

    pub fn current_ticket(&self) -> LoadTicket {
        LoadTicket {
            generation: self.generation,
        }
    }

    pub fn image(&self) -> Option<&RgbaImage> {
        self.image.as_deref()
    }

    /// Ticket and shared image handle for running estimation elsewhere,
    /// e.g. on a worker thread.
    pub fn estimation_input(&self) -> Option<(LoadTicket, Arc<RgbaImage>)> {
        self.image
            .as_ref()
            .map(|img| (self.current_ticket(), Arc::clone(img)))
    }

    /// Accept an estimator result for the load identified by `ticket`.
    ///
    /// Results for superseded loads are discarded with
    /// [`AnalysisError::StaleResult`]. Estimator failures and empty results
    /// are reported as [`AnalysisError::NoPoseDetected`] and leave the session
    /// without keypoints.
    pub fn apply_keypoints(
        &mut self,
        ticket: LoadTicket,
        result: Result<PoseKeypoints, AnalysisError>,
    ) -> Result<(), AnalysisError> {
        if ticket.generation != self.generation {
            tracing::debug!(
                "discarding keypoints for generation {} (current {})",
                ticket.generation,
                self.generation
            );
            return Err(AnalysisError::StaleResult {
                ticket: ticket.generation,
                current: self.generation,
            });
        }
        let keypoints = match result {
            Ok(kps) if !kps.is_empty() => kps,
            Ok(_) => {
                self.keypoints = None;
                return Err(AnalysisError::NoPoseDetected { detail: None });
            }
            Err(AnalysisError::NoPoseDetected { detail }) => {
                self.keypoints = None;
                return Err(AnalysisError::NoPoseDetected { detail });
            }
            Err(e) => {
                self.keypoints = None;
                return Err(AnalysisError::NoPoseDetected {
                    detail: Some(e.to_string()),
                });
            }
        };
        tracing::debug!("accepted {} keypoints", keypoints.n_present());
        self.keypoints = Some(keypoints);
        Ok(())
    }

    /// Run `estimator` on the current image and apply its result.
    pub fn run_estimator(&mut self, estimator: &dyn PoseEstimator) -> Result<(), AnalysisError> {
        let (ticket, image) = self.estimation_input().ok_or_else(|| AnalysisError::InvalidImage {
            reason: "no image loaded".to_string(),
        })?;
        let result = estimator.estimate_keypoints(&image);
        self.apply_keypoints(ticket, result)
    }

    pub fn keypoints(&self) -> Option<&PoseKeypoints> {
        self.keypoints.as_ref()
    }

    pub fn overrides(&self) -> &OverrideStore {
        &self.overrides
    }

    /// Record a user-placed landmark for the current image.
    pub fn set_override(
        &mut self,
        role: LandmarkRole,
        point: Point2D,
    ) -> Result<(), AnalysisError> {
        self.overrides.set(role, point)
    }

    pub fn clear_override(&mut self, role: LandmarkRole) -> Option<Point2D> {
        self.overrides.clear_role(role)
    }

    /// Analyze the current image with its keypoints and overrides.
    pub fn analyze(&self, analyzer: &Analyzer) -> Result<AnalysisResult, AnalysisError> {
        let image = self.image().ok_or_else(|| AnalysisError::InvalidImage {
            reason: "no image loaded".to_string(),
        })?;
        let keypoints = self
            .keypoints
            .as_ref()
            .ok_or(AnalysisError::NoPoseDetected { detail: None })?;
        analyzer.analyze(image, keypoints, &self.overrides)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AnalysisMode;
    use crate::landmarks::LandmarkSource;
    use crate::test_utils::{profile_keypoints, profile_silhouette, uniform_image};

    struct FixedEstimator(PoseKeypoints);

    impl PoseEstimator for FixedEstimator {
        fn estimate_keypoints(&self, _image: &RgbaImage) -> Result<PoseKeypoints, AnalysisError> {
            Ok(self.0.clone())
        }
    }

    struct FailingEstimator;

    impl PoseEstimator for FailingEstimator {
        fn estimate_keypoints(&self, _image: &RgbaImage) -> Result<PoseKeypoints, AnalysisError> {
            Err(AnalysisError::InvalidImage {
                reason: "model not loaded".to_string(),
            })
        }
    }

    #[test]
    fn late_result_for_previous_image_is_discarded() {
        let mut session = ImageSession::new();
        let first = session.load_image(uniform_image(8, 8, 0));
        let second = session.load_image(profile_silhouette());
        assert_ne!(first, second);

        let err = session.apply_keypoints(first, Ok(profile_keypoints())).unwrap_err();
        assert_eq!(
            err,
            AnalysisError::StaleResult {
                ticket: first.generation(),
                current: second.generation()
            }
        );
        assert!(session.keypoints().is_none());

        session.apply_keypoints(second, Ok(profile_keypoints())).unwrap();
        assert!(session.keypoints().is_some());
    }

    #[test]
    fn result_from_worker_thread_is_checked_against_current_load() {
        let mut session = ImageSession::new();
        session.load_image(profile_silhouette());
        let (ticket, image) = session.estimation_input().unwrap();

        let worker = std::thread::spawn(move || {
            let result = FixedEstimator(profile_keypoints()).estimate_keypoints(&image);
            (ticket, result)
        });
        session.load_image(uniform_image(4, 4, 9));
        let (ticket, result) = worker.join().unwrap();

        assert!(matches!(
            session.apply_keypoints(ticket, result),
            Err(AnalysisError::StaleResult { .. })
        ));
    }

    #[test]
    fn new_image_clears_keypoints_and_overrides() {
        let mut session = ImageSession::new();
        session.load_image(profile_silhouette());
        session.run_estimator(&FixedEstimator(profile_keypoints())).unwrap();
        session
            .set_override(LandmarkRole::Hips, Point2D::new(10.0, 20.0))
            .unwrap();
        assert!(!session.overrides().is_empty());

        session.load_image(profile_silhouette());
        assert!(session.keypoints().is_none());
        assert!(session.overrides().is_empty());
    }

    #[test]
    fn empty_or_failed_estimation_reports_no_pose() {
        let mut session = ImageSession::new();
        session.load_image(profile_silhouette());

        let err = session
            .run_estimator(&FixedEstimator(PoseKeypoints::default()))
            .unwrap_err();
        assert_eq!(err, AnalysisError::NoPoseDetected { detail: None });

        let err = session.run_estimator(&FailingEstimator).unwrap_err();
        assert!(matches!(err, AnalysisError::NoPoseDetected { detail: Some(_) }));
        assert!(matches!(
            session.analyze(&Analyzer::default()),
            Err(AnalysisError::NoPoseDetected { .. })
        ));
    }

    #[test]
    fn estimator_without_image_is_an_error() {
        let mut session = ImageSession::new();
        let err = session
            .run_estimator(&FixedEstimator(profile_keypoints()))
            .unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidImage { .. }));
    }

    #[test]
    fn analysis_reflects_overrides() {
        let mut session = ImageSession::new();
        session.load_image(profile_silhouette());
        session.run_estimator(&FixedEstimator(profile_keypoints())).unwrap();
        session
            .set_override(LandmarkRole::Feet, Point2D::new(100.0, 390.0))
            .unwrap();

        let analyzer = Analyzer::with_mode(AnalysisMode::Front);
        let result = session.analyze(&analyzer).unwrap();
        let feet = result.landmarks.get(LandmarkRole::Feet).unwrap();
        assert_eq!(feet.source, LandmarkSource::Override);

        session.clear_override(LandmarkRole::Feet);
        let result = session.analyze(&analyzer).unwrap();
        assert_eq!(
            result.landmarks.get(LandmarkRole::Feet).unwrap().source,
            LandmarkSource::Computed
        );
    }
}
