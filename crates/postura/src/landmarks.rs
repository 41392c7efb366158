//! Landmark resolution across computed, silhouette-aligned and user-override
//! sources.
//!
//! Precedence per role is `Override > Aligned > Computed > Default`, decided
//! independently for every role. Resolution is a pure read; the
//! [`OverrideStore`] is owned by the editing surface and never mutated here.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::AnalysisError;
use crate::geometry::Point2D;

/// Named landmark slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LandmarkRole {
    Shoulders,
    Hips,
    Feet,
    FrontCurvature,
}

impl LandmarkRole {
    pub const ALL: [LandmarkRole; 4] = [
        Self::Shoulders,
        Self::Hips,
        Self::Feet,
        Self::FrontCurvature,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Shoulders => "shoulders",
            Self::Hips => "hips",
            Self::Feet => "feet",
            Self::FrontCurvature => "front_curvature",
        }
    }
}

impl std::fmt::Display for LandmarkRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for LandmarkRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "shoulders" => Ok(Self::Shoulders),
            "hips" => Ok(Self::Hips),
            "feet" => Ok(Self::Feet),
            "front_curvature" | "fc" => Ok(Self::FrontCurvature),
            other => Err(format!("unknown landmark role '{}'", other)),
        }
    }
}

/// Where a resolved landmark came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LandmarkSource {
    Override,
    Aligned,
    Computed,
    /// Nothing was available; the point is the origin.
    Default,
}

/// Competing positions for one role.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LandmarkCandidates {
    pub override_point: Option<Point2D>,
    pub aligned: Option<Point2D>,
    pub computed: Option<Point2D>,
}

impl LandmarkCandidates {
    /// Pick the highest-precedence candidate.
    pub fn resolve(&self) -> ResolvedLandmark {
        let tiers = [
            (self.override_point, LandmarkSource::Override),
            (self.aligned, LandmarkSource::Aligned),
            (self.computed, LandmarkSource::Computed),
        ];
        tiers
            .into_iter()
            .find_map(|(p, source)| p.map(|point| ResolvedLandmark { point, source }))
            .unwrap_or(ResolvedLandmark {
                point: Point2D::ORIGIN,
                source: LandmarkSource::Default,
            })
    }
}

/// Final position of one role with its provenance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResolvedLandmark {
    pub point: Point2D,
    pub source: LandmarkSource,
}

/// Resolved landmarks for the roles of one analysis mode.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LandmarkSet {
    roles: BTreeMap<LandmarkRole, ResolvedLandmark>,
}

impl LandmarkSet {
    /// Resolve every `(role, candidates)` pair.
    pub fn resolve<I>(candidates: I) -> Self
    where
        I: IntoIterator<Item = (LandmarkRole, LandmarkCandidates)>,
    {
        Self {
            roles: candidates
                .into_iter()
                .map(|(role, c)| (role, c.resolve()))
                .collect(),
        }
    }

    pub fn get(&self, role: LandmarkRole) -> Option<&ResolvedLandmark> {
        self.roles.get(&role)
    }

    /// Resolved point for `role`, or the origin when the role is not part of
    /// this set.
    pub fn point(&self, role: LandmarkRole) -> Point2D {
        self.roles
            .get(&role)
            .map_or(Point2D::ORIGIN, |r| r.point)
    }

    pub fn iter(&self) -> impl Iterator<Item = (LandmarkRole, &ResolvedLandmark)> + '_ {
        self.roles.iter().map(|(r, l)| (*r, l))
    }

    pub fn len(&self) -> usize {
        self.roles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }
}

/// User-placed landmark positions for the current image.
///
/// Written by the interactive editor (drag gestures), read by resolution.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OverrideStore {
    points: BTreeMap<LandmarkRole, Point2D>,
}

impl OverrideStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an override. Coordinates are trusted (not clamped) but must be
    /// finite.
    pub fn set(&mut self, role: LandmarkRole, point: Point2D) -> Result<(), AnalysisError> {
        if !point.is_finite() {
            return Err(AnalysisError::InvalidOverride { role });
        }
        self.points.insert(role, point);
        Ok(())
    }

    pub fn get(&self, role: LandmarkRole) -> Option<Point2D> {
        self.points.get(&role).copied()
    }

    pub fn clear_role(&mut self, role: LandmarkRole) -> Option<Point2D> {
        self.points.remove(&role)
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const O: Point2D = Point2D::new(1.0, 1.0);
    const A: Point2D = Point2D::new(2.0, 2.0);
    const C: Point2D = Point2D::new(3.0, 3.0);

    #[test]
    fn override_beats_aligned_beats_computed() {
        let all = LandmarkCandidates {
            override_point: Some(O),
            aligned: Some(A),
            computed: Some(C),
        };
        assert_eq!(all.resolve(), ResolvedLandmark { point: O, source: LandmarkSource::Override });

        let no_override = LandmarkCandidates {
            override_point: None,
            ..all
        };
        assert_eq!(no_override.resolve().point, A);
        assert_eq!(no_override.resolve().source, LandmarkSource::Aligned);

        let computed_only = LandmarkCandidates {
            computed: Some(C),
            ..Default::default()
        };
        assert_eq!(computed_only.resolve().point, C);
        assert_eq!(computed_only.resolve().source, LandmarkSource::Computed);
    }

    #[test]
    fn nothing_available_resolves_to_origin() {
        let r = LandmarkCandidates::default().resolve();
        assert_eq!(r.point, Point2D::ORIGIN);
        assert_eq!(r.source, LandmarkSource::Default);
    }

    #[test]
    fn roles_resolve_independently() {
        let set = LandmarkSet::resolve([
            (
                LandmarkRole::Shoulders,
                LandmarkCandidates {
                    override_point: Some(O),
                    aligned: Some(A),
                    computed: Some(C),
                },
            ),
            (
                LandmarkRole::Hips,
                LandmarkCandidates {
                    aligned: Some(A),
                    computed: Some(C),
                    ..Default::default()
                },
            ),
        ]);
        assert_eq!(set.point(LandmarkRole::Shoulders), O);
        assert_eq!(set.point(LandmarkRole::Hips), A);
        assert!(set.get(LandmarkRole::Feet).is_none());
        assert_eq!(set.point(LandmarkRole::Feet), Point2D::ORIGIN);
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn override_store_rejects_non_finite_points() {
        let mut store = OverrideStore::new();
        let err = store
            .set(LandmarkRole::Hips, Point2D::new(f64::INFINITY, 0.0))
            .unwrap_err();
        assert_eq!(err, AnalysisError::InvalidOverride { role: LandmarkRole::Hips });
        assert!(store.is_empty());

        store.set(LandmarkRole::Hips, Point2D::new(-40.0, 9000.0)).unwrap();
        assert_eq!(store.get(LandmarkRole::Hips), Some(Point2D::new(-40.0, 9000.0)));
        assert_eq!(store.clear_role(LandmarkRole::Hips), Some(Point2D::new(-40.0, 9000.0)));
        assert!(store.get(LandmarkRole::Hips).is_none());
    }

    #[test]
    fn role_names_parse() {
        assert_eq!("fc".parse::<LandmarkRole>(), Ok(LandmarkRole::FrontCurvature));
        for role in LandmarkRole::ALL {
            assert_eq!(role.as_str().parse::<LandmarkRole>(), Ok(role));
        }
        assert!("knees".parse::<LandmarkRole>().is_err());
    }
}
