//! Mouth-region extraction: landmark contour → padded bounding box →
//! fixed-size crop.
//!
//! A frame with no detectable face yields `Ok(None)`, never an error;
//! missing detections are a normal condition for this pipeline.

use crate::detection::domain::face_detector::FaceDetector;
use crate::detection::domain::landmark_predictor::LandmarkPredictor;
use crate::shared::constants::{MOUTH_PADDING, MOUTH_REGION_SIZE};
use crate::shared::frame::Frame;

/// Pixel rectangle fully contained in its source frame.
#[derive(Clone, Debug, PartialEq)]
pub struct CropBounds {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Extracts a fixed-size mouth crop from a frame.
///
/// Selects the first detected face (no ranking, no multi-face policy),
/// derives the axis-aligned bounding box of the 20 mouth landmarks,
/// pads it, and resizes the crop to 64x64. The crop is returned in RGB;
/// the caller converts to grayscale.
pub struct MouthRegionExtractor {
    detector: Box<dyn FaceDetector>,
    predictor: Box<dyn LandmarkPredictor>,
}

impl MouthRegionExtractor {
    pub fn new(detector: Box<dyn FaceDetector>, predictor: Box<dyn LandmarkPredictor>) -> Self {
        Self {
            detector,
            predictor,
        }
    }

    pub fn extract(&mut self, frame: &Frame) -> Result<Option<Frame>, Box<dyn std::error::Error>> {
        let faces = self.detector.detect(frame)?;
        let Some(face) = faces.first() else {
            return Ok(None);
        };

        let landmarks = self.predictor.predict(frame, face)?;

        let Some(bounds) =
            padded_mouth_bounds(landmarks.mouth_points(), frame.width(), frame.height())
        else {
            return Ok(None);
        };

        Ok(Some(crop_resized(frame, &bounds, MOUTH_REGION_SIZE)?))
    }
}

/// Axis-aligned bounding box of the mouth points, padded by
/// [`MOUTH_PADDING`] on each side and clamped to the frame on all four
/// edges. Returns `None` for an empty point set or a box that collapses
/// to zero area after clamping.
pub fn padded_mouth_bounds(
    points: &[(f64, f64)],
    frame_width: u32,
    frame_height: u32,
) -> Option<CropBounds> {
    if points.is_empty() {
        return None;
    }

    let mut min_x = f64::INFINITY;
    let mut min_y = f64::INFINITY;
    let mut max_x = f64::NEG_INFINITY;
    let mut max_y = f64::NEG_INFINITY;
    for &(x, y) in points {
        min_x = min_x.min(x);
        min_y = min_y.min(y);
        max_x = max_x.max(x);
        max_y = max_y.max(y);
    }

    let x1 = (min_x - MOUTH_PADDING).max(0.0).floor();
    let y1 = (min_y - MOUTH_PADDING).max(0.0).floor();
    let x2 = (max_x + MOUTH_PADDING).min(frame_width as f64).ceil();
    let y2 = (max_y + MOUTH_PADDING).min(frame_height as f64).ceil();

    if x2 <= x1 || y2 <= y1 {
        return None;
    }

    Some(CropBounds {
        x: x1 as u32,
        y: y1 as u32,
        width: (x2 - x1) as u32,
        height: (y2 - y1) as u32,
    })
}

/// Crops `bounds` out of the frame and bilinearly resizes to
/// `size` x `size`. The crop keeps the source frame's index.
fn crop_resized(
    frame: &Frame,
    bounds: &CropBounds,
    size: u32,
) -> Result<Frame, Box<dyn std::error::Error>> {
    let img = image::RgbImage::from_raw(frame.width(), frame.height(), frame.data().to_vec())
        .ok_or("frame data does not match its dimensions")?;

    let cropped =
        image::imageops::crop_imm(&img, bounds.x, bounds.y, bounds.width, bounds.height)
            .to_image();
    let resized =
        image::imageops::resize(&cropped, size, size, image::imageops::FilterType::Triangle);

    Ok(Frame::new(resized.into_raw(), size, size, frame.index()))
}
