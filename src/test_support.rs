//! Synthetic face meshes for unit tests

use crate::landmarks::*;

/// Number of points in a full face mesh
pub const MESH_POINTS: usize = 468;

/// Build a face mesh with the given head angle (degrees), outer-eye distance
/// and per-eye openness (pixels). The face is centered at (320, 240).
pub fn face(angle_deg: f64, eye_distance: f64, left_open: f64, right_open: f64) -> LandmarkSet {
    let cx = 320.0;
    let cy = 240.0;
    let mut mesh = vec![Point2::new(0.0, 0.0); MESH_POINTS];

    mesh[LEFT_EYE_OUTER] = Point2::new(cx - eye_distance / 2.0, cy);
    mesh[RIGHT_EYE_OUTER] = Point2::new(cx + eye_distance / 2.0, cy);

    // atan2(v) - 90 == angle  =>  v = L * (-sin(angle), cos(angle))
    let theta = angle_deg.to_radians();
    let nose_len = 40.0;
    mesh[NOSE_TIP] = Point2::new(cx - nose_len * theta.sin(), cy + nose_len * theta.cos());

    let left_x = cx - eye_distance / 4.0;
    mesh[LEFT_EYE_UPPER] = Point2::new(left_x, cy - left_open / 2.0);
    mesh[LEFT_EYE_LOWER] = Point2::new(left_x, cy + left_open / 2.0);

    let right_x = cx + eye_distance / 4.0;
    mesh[RIGHT_EYE_UPPER] = Point2::new(right_x, cy - right_open / 2.0);
    mesh[RIGHT_EYE_LOWER] = Point2::new(right_x, cy + right_open / 2.0);

    LandmarkSet::new(mesh)
}

/// A frontal, attentive face: 0 degrees, 150px eye span, eyes open
pub fn attentive_face() -> LandmarkSet {
    face(0.0, 150.0, 10.0, 10.0)
}

/// Frame with a single attentive face
pub fn attentive_batch() -> FaceBatch {
    FaceBatch::new(vec![attentive_face()])
}

/// Frame containing `n` attentive faces
pub fn crowd_batch(n: usize) -> FaceBatch {
    FaceBatch::new((0..n).map(|_| attentive_face()).collect())
}
