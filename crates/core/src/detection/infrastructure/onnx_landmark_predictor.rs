/// 68-point landmark predictor using a PFLD-style ONNX model.
///
/// The model takes a square face crop (NCHW, values in 0..1) and returns
/// 136 values: 68 (x, y) pairs normalized to the crop. Points are mapped
/// back to frame pixel coordinates before being returned.
use std::path::Path;

use crate::detection::domain::face_detector::FaceBox;
use crate::detection::domain::landmark_predictor::LandmarkPredictor;
use crate::detection::domain::landmark_set::LandmarkSet;
use crate::shared::constants::LANDMARK_COUNT;
use crate::shared::frame::Frame;

use super::execution_provider::preferred_execution_providers;

/// Fallback crop resolution when the model doesn't specify dimensions.
const DEFAULT_INPUT_SIZE: u32 = 112;

/// Extra margin around the detector box before cropping, as a fraction of
/// the box's longer side. Landmark models are trained on crops slightly
/// looser than tight detection boxes.
const CROP_MARGIN: f64 = 0.1;

pub struct OnnxLandmarkPredictor {
    session: ort::session::Session,
    input_size: u32,
}

impl OnnxLandmarkPredictor {
    pub fn new(model_path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let session = ort::session::Session::builder()?
            .with_execution_providers(preferred_execution_providers())?
            .commit_from_file(model_path)?;

        let input_size = session
            .inputs()
            .first()
            .and_then(|input| {
                if let ort::value::ValueType::Tensor { ref shape, .. } = input.dtype() {
                    if shape.len() >= 4 && shape[2] > 0 {
                        Some(shape[2] as u32)
                    } else {
                        None
                    }
                } else {
                    None
                }
            })
            .unwrap_or(DEFAULT_INPUT_SIZE);

        Ok(Self {
            session,
            input_size,
        })
    }
}

impl LandmarkPredictor for OnnxLandmarkPredictor {
    fn predict(
        &mut self,
        frame: &Frame,
        face: &FaceBox,
    ) -> Result<LandmarkSet, Box<dyn std::error::Error>> {
        let crop = square_crop_bounds(face);

        // 1. Resample the face crop to the model resolution (NCHW, 0..1)
        let input_tensor = sample_crop(frame, &crop, self.input_size);

        // 2. Inference
        let input_value = ort::value::Tensor::from_array(input_tensor)?;
        let outputs = self.session.run(ort::inputs![input_value])?;
        if outputs.len() == 0 {
            return Err("landmark model produced no outputs".into());
        }
        let tensor = outputs[0].try_extract_array::<f32>()?;
        let data = tensor.as_slice().ok_or("cannot get tensor slice")?;
        if data.len() < LANDMARK_COUNT * 2 {
            return Err(format!(
                "landmark model returned {} values, expected {}",
                data.len(),
                LANDMARK_COUNT * 2
            )
            .into());
        }

        // 3. Map normalized crop coordinates back to the frame
        let mut points = [(0.0f64, 0.0f64); LANDMARK_COUNT];
        for (i, point) in points.iter_mut().enumerate() {
            let nx = data[i * 2] as f64;
            let ny = data[i * 2 + 1] as f64;
            *point = (crop.x + nx * crop.side, crop.y + ny * crop.side);
        }

        Ok(LandmarkSet::new(points))
    }
}

/// Square crop region in frame coordinates. May extend past the frame
/// edges; sampling treats outside pixels as black.
#[derive(Clone, Debug)]
struct SquareCrop {
    x: f64,
    y: f64,
    side: f64,
}

/// Expands a face box to a centered square with [`CROP_MARGIN`] slack.
fn square_crop_bounds(face: &FaceBox) -> SquareCrop {
    let side = face.width().max(face.height()) * (1.0 + 2.0 * CROP_MARGIN);
    let cx = (face.x1 + face.x2) / 2.0;
    let cy = (face.y1 + face.y2) / 2.0;
    SquareCrop {
        x: cx - side / 2.0,
        y: cy - side / 2.0,
        side: side.max(1.0),
    }
}

/// Nearest-neighbor resample of the crop into an NCHW float tensor.
fn sample_crop(frame: &Frame, crop: &SquareCrop, target_size: u32) -> ndarray::Array4<f32> {
    let target = target_size as usize;
    let mut tensor = ndarray::Array4::<f32>::zeros((1, 3, target, target));

    let src = frame.as_ndarray();
    let fw = frame.width() as i64;
    let fh = frame.height() as i64;
    let step = crop.side / target as f64;

    for ty in 0..target {
        let sy = (crop.y + (ty as f64 + 0.5) * step) as i64;
        if sy < 0 || sy >= fh {
            continue;
        }
        for tx in 0..target {
            let sx = (crop.x + (tx as f64 + 0.5) * step) as i64;
            if sx < 0 || sx >= fw {
                continue;
            }
            for c in 0..3 {
                tensor[[0, c, ty, tx]] = src[[sy as usize, sx as usize, c]] as f32 / 255.0;
            }
        }
    }

    tensor
}

#[cfg(test)]
mod tests {
    use super::*;

    fn face(x1: f64, y1: f64, x2: f64, y2: f64) -> FaceBox {
        FaceBox {
            x1,
            y1,
            x2,
            y2,
            confidence: 1.0,
        }
    }

    #[test]
    fn test_square_crop_is_square_and_centered() {
        let crop = square_crop_bounds(&face(100.0, 100.0, 200.0, 150.0));
        // Longer side 100, margin 0.1 each side → 120
        assert!((crop.side - 120.0).abs() < 1e-9);
        // Centered on (150, 125)
        assert!((crop.x + crop.side / 2.0 - 150.0).abs() < 1e-9);
        assert!((crop.y + crop.side / 2.0 - 125.0).abs() < 1e-9);
    }

    #[test]
    fn test_square_crop_degenerate_box() {
        let crop = square_crop_bounds(&face(50.0, 50.0, 50.0, 50.0));
        assert!(crop.side >= 1.0);
    }

    #[test]
    fn test_sample_crop_shape_and_range() {
        let frame = Frame::new(vec![255u8; 50 * 50 * 3], 50, 50, 0);
        let crop = SquareCrop {
            x: 10.0,
            y: 10.0,
            side: 20.0,
        };
        let tensor = sample_crop(&frame, &crop, 112);
        assert_eq!(tensor.shape(), &[1, 3, 112, 112]);
        assert!((tensor[[0, 0, 56, 56]] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_sample_crop_outside_frame_is_black() {
        let frame = Frame::new(vec![255u8; 10 * 10 * 3], 10, 10, 0);
        let crop = SquareCrop {
            x: -20.0,
            y: -20.0,
            side: 10.0,
        };
        let tensor = sample_crop(&frame, &crop, 8);
        assert_eq!(tensor[[0, 0, 0, 0]], 0.0);
    }
}
