//! Face landmark primitives
//!
//! A landmark set is the raw mesh produced by the external face model for one
//! detected face. Indices follow the 468-point face-mesh topology; only a
//! handful of them are needed by the feature extractor.

use serde::{Deserialize, Serialize};

/// Outer corner of the subject's left eye
pub const LEFT_EYE_OUTER: usize = 33;
/// Outer corner of the subject's right eye
pub const RIGHT_EYE_OUTER: usize = 263;
/// Left eye upper lid (center)
pub const LEFT_EYE_UPPER: usize = 159;
/// Left eye lower lid (center)
pub const LEFT_EYE_LOWER: usize = 145;
/// Right eye upper lid (center)
pub const RIGHT_EYE_UPPER: usize = 386;
/// Right eye lower lid (center)
pub const RIGHT_EYE_LOWER: usize = 374;
/// Nose tip
pub const NOSE_TIP: usize = 4;

/// Every index the feature extractor reads
pub const REQUIRED_INDICES: [usize; 7] = [
    LEFT_EYE_OUTER,
    RIGHT_EYE_OUTER,
    LEFT_EYE_UPPER,
    LEFT_EYE_LOWER,
    RIGHT_EYE_UPPER,
    RIGHT_EYE_LOWER,
    NOSE_TIP,
];

/// A 2D point in image pixel space.
///
/// Serialized as `[x, y]`; a trailing depth component (`[x, y, z]`) is
/// accepted on input and dropped.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "[f64; 2]")]
pub struct Point2 {
    pub x: f64,
    pub y: f64,
}

impl Point2 {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Point2) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    pub fn midpoint(&self, other: &Point2) -> Point2 {
        Point2::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl TryFrom<Vec<f64>> for Point2 {
    type Error = String;

    fn try_from(coords: Vec<f64>) -> Result<Self, Self::Error> {
        match coords.as_slice() {
            [x, y] | [x, y, _] => Ok(Point2::new(*x, *y)),
            other => Err(format!(
                "expected [x, y] or [x, y, z], got {} components",
                other.len()
            )),
        }
    }
}

impl From<Point2> for [f64; 2] {
    fn from(p: Point2) -> Self {
        [p.x, p.y]
    }
}

/// Landmark mesh for one detected face
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LandmarkSet {
    /// Points indexed by anatomical landmark id
    pub mesh: Vec<Point2>,
    /// Detector confidence (0.0 - 1.0), informational only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

impl LandmarkSet {
    pub fn new(mesh: Vec<Point2>) -> Self {
        Self {
            mesh,
            confidence: None,
        }
    }

    pub fn get(&self, index: usize) -> Option<Point2> {
        self.mesh.get(index).copied()
    }

    pub fn len(&self) -> usize {
        self.mesh.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mesh.is_empty()
    }
}

/// All faces detected in one frame, in model order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FaceBatch {
    pub faces: Vec<LandmarkSet>,
}

impl FaceBatch {
    pub fn new(faces: Vec<LandmarkSet>) -> Self {
        Self { faces }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// The face used for geometric features (single-subject assumption)
    pub fn primary(&self) -> Option<&LandmarkSet> {
        self.faces.first()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_accepts_two_or_three_components() {
        let p: Point2 = serde_json::from_str("[1.5, 2.5]").unwrap();
        assert_eq!(p, Point2::new(1.5, 2.5));

        let p: Point2 = serde_json::from_str("[1.5, 2.5, -30.0]").unwrap();
        assert_eq!(p, Point2::new(1.5, 2.5));

        assert!(serde_json::from_str::<Point2>("[1.5]").is_err());
        assert!(serde_json::from_str::<Point2>("[1, 2, 3, 4]").is_err());
    }

    #[test]
    fn test_point_serializes_as_pair() {
        let json = serde_json::to_string(&Point2::new(3.0, 4.0)).unwrap();
        assert_eq!(json, "[3.0,4.0]");
    }

    #[test]
    fn test_distance_and_midpoint() {
        let a = Point2::new(0.0, 0.0);
        let b = Point2::new(3.0, 4.0);
        assert_eq!(a.distance(&b), 5.0);
        assert_eq!(a.midpoint(&b), Point2::new(1.5, 2.0));
    }

    #[test]
    fn test_batch_primary_face() {
        let batch = FaceBatch::new(vec![
            LandmarkSet::new(vec![Point2::new(1.0, 1.0)]),
            LandmarkSet::new(vec![Point2::new(2.0, 2.0)]),
        ]);
        assert_eq!(batch.face_count(), 2);
        assert_eq!(batch.primary().unwrap().get(0), Some(Point2::new(1.0, 1.0)));
        assert!(FaceBatch::empty().primary().is_none());
    }
}
