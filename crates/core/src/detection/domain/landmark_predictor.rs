use crate::detection::domain::face_detector::FaceBox;
use crate::detection::domain::landmark_set::LandmarkSet;
use crate::shared::frame::Frame;

/// Domain interface for 68-point facial landmark prediction.
///
/// Given the frame and one detected face within it, returns the full
/// landmark set in frame pixel coordinates. A landmark set is only
/// meaningful paired with the frame it was computed from.
pub trait LandmarkPredictor: Send {
    fn predict(
        &mut self,
        frame: &Frame,
        face: &FaceBox,
    ) -> Result<LandmarkSet, Box<dyn std::error::Error>>;
}
