//! Geometric feature extraction
//!
//! Computes the per-frame feature vector from the primary face's landmarks:
//! inter-eye distance, per-eye openness and head angle. Extraction is pure;
//! a malformed mesh yields an error instead of fabricated defaults.

use crate::error::ComputeError;
use crate::landmarks::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Features derived from one face detection batch
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    /// Distance between outer eye corners (px), a rough proximity proxy
    pub inter_eye_distance: f64,
    /// Left eye lid separation (px)
    pub left_eye_openness: f64,
    /// Right eye lid separation (px)
    pub right_eye_openness: f64,
    /// Head angle, ~0 for a frontal face, in [-90, 90]
    pub head_angle_degrees: f64,
    /// Number of faces in the batch
    pub face_count: usize,
}

impl FeatureVector {
    pub fn average_eye_openness(&self) -> f64 {
        (self.left_eye_openness + self.right_eye_openness) / 2.0
    }
}

/// Feature extractor for face landmark sets
pub struct FeatureExtractor;

impl FeatureExtractor {
    /// Extract features from the first face of a batch.
    pub fn extract(batch: &FaceBatch) -> Result<FeatureVector, ComputeError> {
        let primary = batch.primary().ok_or(ComputeError::EmptyBatch)?;
        let mut features = Self::extract_face(primary)?;
        features.face_count = batch.face_count();
        Ok(features)
    }

    /// Extract features from a single landmark set (face count of 1).
    pub fn extract_face(landmarks: &LandmarkSet) -> Result<FeatureVector, ComputeError> {
        let missing: Vec<usize> = REQUIRED_INDICES
            .into_iter()
            .filter(|&index| index >= landmarks.len())
            .collect();
        if !missing.is_empty() {
            return Err(ComputeError::MissingLandmarks(missing));
        }

        let left_outer = required(landmarks, LEFT_EYE_OUTER)?;
        let right_outer = required(landmarks, RIGHT_EYE_OUTER)?;
        let left_upper = required(landmarks, LEFT_EYE_UPPER)?;
        let left_lower = required(landmarks, LEFT_EYE_LOWER)?;
        let right_upper = required(landmarks, RIGHT_EYE_UPPER)?;
        let right_lower = required(landmarks, RIGHT_EYE_LOWER)?;
        let nose = required(landmarks, NOSE_TIP)?;

        Ok(FeatureVector {
            inter_eye_distance: left_outer.distance(&right_outer),
            left_eye_openness: left_upper.distance(&left_lower),
            right_eye_openness: right_upper.distance(&right_lower),
            head_angle_degrees: head_angle(&left_outer, &right_outer, &nose),
            face_count: 1,
        })
    }
}

fn required(landmarks: &LandmarkSet, index: usize) -> Result<Point2, ComputeError> {
    let point = landmarks
        .get(index)
        .ok_or_else(|| ComputeError::MissingLandmarks(vec![index]))?;
    if !point.is_finite() {
        return Err(ComputeError::MalformedLandmark {
            index,
            x: point.x,
            y: point.y,
        });
    }
    Ok(point)
}

/// Head angle from the nose-to-eye-midpoint vector.
///
/// `atan2(v.y, v.x)` in degrees, shifted by -90 so a nose straight below the
/// eye line reads 0, then folded once into [-90, 90].
pub fn head_angle(left_outer: &Point2, right_outer: &Point2, nose_tip: &Point2) -> f64 {
    let mid = left_outer.midpoint(right_outer);
    let vx = nose_tip.x - mid.x;
    let vy = nose_tip.y - mid.y;

    let mut angle = vy.atan2(vx).to_degrees() - 90.0;
    if angle < -90.0 {
        angle += 180.0;
    }
    if angle > 90.0 {
        angle -= 180.0;
    }
    angle
}

/// Human-readable statistics for a diagnostics readout
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Diagnostics {
    pub face_count: usize,
    /// Present only when the primary face yielded features
    #[serde(skip_serializing_if = "Option::is_none")]
    pub features: Option<FeatureVector>,
}

impl Diagnostics {
    pub fn from_batch(batch: &FaceBatch) -> Self {
        Self {
            face_count: batch.face_count(),
            features: FeatureExtractor::extract(batch).ok(),
        }
    }
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Faces Detected: {}", self.face_count)?;
        if let Some(features) = &self.features {
            write!(
                f,
                " | Eye Distance: {:.1}px | Face Angle: {:.1}° | Eye Openness: {:.1}px",
                features.inter_eye_distance,
                features.head_angle_degrees,
                features.average_eye_openness()
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{attentive_batch, face, MESH_POINTS};
    use approx::assert_relative_eq;
    use rstest::rstest;

    #[test]
    fn test_frontal_face_features() {
        let features = FeatureExtractor::extract(&attentive_batch()).unwrap();

        assert_relative_eq!(features.inter_eye_distance, 150.0, epsilon = 1e-9);
        assert_relative_eq!(features.left_eye_openness, 10.0, epsilon = 1e-9);
        assert_relative_eq!(features.right_eye_openness, 10.0, epsilon = 1e-9);
        assert_relative_eq!(features.head_angle_degrees, 0.0, epsilon = 1e-9);
        assert_eq!(features.face_count, 1);
    }

    #[rstest]
    #[case(10.0)]
    #[case(-25.0)]
    #[case(45.0)]
    #[case(-60.0)]
    #[case(89.0)]
    fn test_head_angle_tracks_rotation(#[case] angle: f64) {
        let features = FeatureExtractor::extract_face(&face(angle, 150.0, 8.0, 8.0)).unwrap();
        assert_relative_eq!(features.head_angle_degrees, angle, epsilon = 1e-9);
    }

    #[test]
    fn test_head_angle_folds_upside_down_vector() {
        let left = Point2::new(0.0, 0.0);
        let right = Point2::new(100.0, 0.0);

        // Nose straight above the eyes: atan2 = -90, minus 90 = -180, folded to 0
        let angle = head_angle(&left, &right, &Point2::new(50.0, -40.0));
        assert_relative_eq!(angle, 0.0, epsilon = 1e-9);

        // Nose to the upper-left: atan2 = -135, minus 90 = -225, folded to -45
        let angle = head_angle(&left, &right, &Point2::new(10.0, -40.0));
        assert_relative_eq!(angle, -45.0, epsilon = 1e-9);
    }

    #[test]
    fn test_head_angle_stays_in_range() {
        let left = Point2::new(0.0, 0.0);
        let right = Point2::new(100.0, 0.0);
        for step in 0..72 {
            let theta = (step as f64 * 5.0).to_radians();
            let nose = Point2::new(50.0 + 30.0 * theta.cos(), 30.0 * theta.sin());
            let angle = head_angle(&left, &right, &nose);
            assert!((-90.0..=90.0).contains(&angle), "angle {angle} out of range");
        }
    }

    #[test]
    fn test_face_count_comes_from_batch() {
        let batch = FaceBatch::new(vec![face(0.0, 150.0, 9.0, 9.0), face(5.0, 90.0, 7.0, 7.0)]);
        let features = FeatureExtractor::extract(&batch).unwrap();
        assert_eq!(features.face_count, 2);
        // Secondary faces never contribute geometry
        assert_relative_eq!(features.inter_eye_distance, 150.0, epsilon = 1e-9);
    }

    #[test]
    fn test_empty_batch_yields_no_features() {
        let result = FeatureExtractor::extract(&FaceBatch::empty());
        assert!(matches!(result, Err(ComputeError::EmptyBatch)));
    }

    #[test]
    fn test_truncated_mesh_is_rejected() {
        let mut landmarks = face(0.0, 150.0, 10.0, 10.0);
        landmarks.mesh.truncate(300);
        match FeatureExtractor::extract_face(&landmarks) {
            Err(ComputeError::MissingLandmarks(missing)) => {
                assert_eq!(missing, vec![RIGHT_EYE_UPPER, RIGHT_EYE_LOWER]);
            }
            other => panic!("unexpected result {other:?}"),
        }

        landmarks.mesh.truncate(3);
        match FeatureExtractor::extract_face(&landmarks) {
            Err(ComputeError::MissingLandmarks(missing)) => {
                assert_eq!(missing.len(), REQUIRED_INDICES.len());
            }
            other => panic!("unexpected result {other:?}"),
        }
    }

    #[test]
    fn test_non_finite_landmark_is_rejected() {
        let mut landmarks = face(0.0, 150.0, 10.0, 10.0);
        landmarks.mesh[NOSE_TIP] = Point2::new(f64::NAN, 10.0);
        let result = FeatureExtractor::extract_face(&landmarks);
        assert!(matches!(
            result,
            Err(ComputeError::MalformedLandmark { index: NOSE_TIP, .. })
        ));
    }

    #[test]
    fn test_extraction_is_deterministic() {
        let batch = FaceBatch::new(vec![face(37.5, 112.0, 3.2, 6.1)]);
        let first = FeatureExtractor::extract(&batch).unwrap();
        for _ in 0..10 {
            assert_eq!(FeatureExtractor::extract(&batch).unwrap(), first);
        }
        assert_eq!(batch.faces[0].len(), MESH_POINTS);
    }

    #[test]
    fn test_diagnostics_readout() {
        let diagnostics = Diagnostics::from_batch(&attentive_batch());
        assert_eq!(
            diagnostics.to_string(),
            "Faces Detected: 1 | Eye Distance: 150.0px | Face Angle: 0.0° | Eye Openness: 10.0px"
        );

        let empty = Diagnostics::from_batch(&FaceBatch::empty());
        assert_eq!(empty.to_string(), "Faces Detected: 0");
    }
}
