use crate::shared::frame::Frame;

/// A detected face as corner coordinates in frame pixels.
///
/// Coordinates may fall slightly outside the frame; consumers clamp
/// before cropping.
#[derive(Clone, Debug, PartialEq)]
pub struct FaceBox {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    pub confidence: f64,
}

impl FaceBox {
    pub fn width(&self) -> f64 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> f64 {
        self.y2 - self.y1
    }
}

/// Domain interface for face detection.
///
/// Implementations may hold inference state, hence `&mut self`. Detections
/// are returned in the backend's native order; callers that need exactly
/// one face take the first.
pub trait FaceDetector: Send {
    fn detect(&mut self, frame: &Frame) -> Result<Vec<FaceBox>, Box<dyn std::error::Error>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_face_box_dimensions() {
        let b = FaceBox {
            x1: 10.0,
            y1: 20.0,
            x2: 110.0,
            y2: 170.0,
            confidence: 0.9,
        };
        assert_eq!(b.width(), 100.0);
        assert_eq!(b.height(), 150.0);
    }
}
