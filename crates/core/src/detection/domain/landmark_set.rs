//! 68-point facial landmarks in the standard anatomical convention.
//!
//! Point groups: 0-16 jaw, 17-26 eyebrows, 27-35 nose, 36-47 eyes,
//! 48-59 outer lip, 60-67 inner lip.

use crate::shared::constants::{LANDMARK_COUNT, MOUTH_LANDMARK_RANGE};

#[derive(Clone, Debug, PartialEq)]
pub struct LandmarkSet {
    points: [(f64, f64); LANDMARK_COUNT],
}

impl LandmarkSet {
    pub fn new(points: [(f64, f64); LANDMARK_COUNT]) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[(f64, f64); LANDMARK_COUNT] {
        &self.points
    }

    /// The 20 mouth contour points (outer + inner lip).
    pub fn mouth_points(&self) -> &[(f64, f64)] {
        &self.points[MOUTH_LANDMARK_RANGE]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbered_landmarks() -> LandmarkSet {
        let mut points = [(0.0, 0.0); LANDMARK_COUNT];
        for (i, p) in points.iter_mut().enumerate() {
            *p = (i as f64, i as f64 * 2.0);
        }
        LandmarkSet::new(points)
    }

    #[test]
    fn test_mouth_points_count() {
        assert_eq!(numbered_landmarks().mouth_points().len(), 20);
    }

    #[test]
    fn test_mouth_points_start_at_48() {
        let lm = numbered_landmarks();
        assert_eq!(lm.mouth_points()[0], (48.0, 96.0));
        assert_eq!(lm.mouth_points()[19], (67.0, 134.0));
    }

    #[test]
    fn test_points_roundtrip() {
        let lm = numbered_landmarks();
        assert_eq!(lm.points()[0], (0.0, 0.0));
        assert_eq!(lm.points()[67], (67.0, 134.0));
    }
}
