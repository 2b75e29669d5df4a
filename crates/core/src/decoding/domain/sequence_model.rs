use ndarray::{Array3, ArrayView5};

/// Domain interface for the pretrained lip-reading sequence classifier.
///
/// Input: a batch of normalized windows, shape
/// `(num_windows, 75, height, width, 1)`.
/// Output: per-window, per-timestep class probabilities, shape
/// `(num_windows, 75, num_classes)`.
pub trait SequenceModel: Send {
    fn predict(
        &mut self,
        batch: ArrayView5<'_, f32>,
    ) -> Result<Array3<f32>, Box<dyn std::error::Error>>;
}
