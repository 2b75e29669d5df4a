/// Pretrained lip-reading classifier using ONNX Runtime via `ort`.
///
/// Takes the normalized 5D batch as-is; the model was exported with a
/// `(batch, 75, 64, 64, 1)` float32 input and a `(batch, 75, classes)`
/// softmax output.
use std::path::Path;

use ndarray::{Array3, ArrayView5};

use crate::decoding::domain::sequence_model::SequenceModel;
use crate::detection::infrastructure::execution_provider::preferred_execution_providers;

pub struct OnnxSequenceModel {
    session: ort::session::Session,
}

impl OnnxSequenceModel {
    pub fn new(model_path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let session = ort::session::Session::builder()?
            .with_execution_providers(preferred_execution_providers())?
            .commit_from_file(model_path)?;
        Ok(Self { session })
    }
}

impl SequenceModel for OnnxSequenceModel {
    fn predict(
        &mut self,
        batch: ArrayView5<'_, f32>,
    ) -> Result<Array3<f32>, Box<dyn std::error::Error>> {
        let input_value = ort::value::Tensor::from_array(batch.to_owned())?;
        let outputs = self.session.run(ort::inputs![input_value])?;
        if outputs.len() == 0 {
            return Err("sequence model produced no outputs".into());
        }

        let tensor = outputs[0].try_extract_array::<f32>()?;
        let probs = tensor
            .to_owned()
            .into_dimensionality::<ndarray::Ix3>()
            .map_err(|_| {
                format!(
                    "unexpected sequence model output shape: {:?}",
                    tensor.shape()
                )
            })?;

        Ok(probs)
    }
}
