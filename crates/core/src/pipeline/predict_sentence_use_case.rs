use std::path::Path;

use crate::decoding::decoder::Decoder;
use crate::decoding::domain::sequence_model::SequenceModel;
use crate::pipeline::predict_error::PredictError;
use crate::sequence::frame_sequence_builder::FrameSequenceBuilder;
use crate::sequence::normalizer;

/// Orchestrates the full serving pipeline for one video:
/// frame sequence → chunked windows → model → sentence.
///
/// Reusable across requests; the model and vocabulary are injected at
/// construction and never mutated, only the inference sessions require
/// `&mut`.
pub struct PredictSentenceUseCase {
    builder: FrameSequenceBuilder,
    model: Box<dyn SequenceModel>,
    decoder: Decoder,
}

impl PredictSentenceUseCase {
    pub fn new(
        builder: FrameSequenceBuilder,
        model: Box<dyn SequenceModel>,
        decoder: Decoder,
    ) -> Self {
        Self {
            builder,
            model,
            decoder,
        }
    }

    pub fn execute(&mut self, video_path: &Path) -> Result<String, PredictError> {
        let frames = self.builder.build(video_path)?;
        log::info!(
            "video {}: {} usable frames, {} window(s)",
            video_path.display(),
            frames.len(),
            normalizer::window_count(frames.len())
        );

        let batch = normalizer::chunked(&frames);
        let probs = self
            .model
            .predict(batch.view())
            .map_err(|e| PredictError::Inference(e.to_string()))?;

        Ok(self.decoder.decode(probs.view()))
    }
}
