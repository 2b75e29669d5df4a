use std::sync::{Arc, Mutex};

use lipread_core::pipeline::predict_sentence_use_case::PredictSentenceUseCase;

/// Shared server state.
///
/// The prediction engine holds mutable ONNX sessions, so requests take a
/// lock and run one video at a time. Upload parsing still happens
/// concurrently; only the inference section serializes.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<Mutex<PredictSentenceUseCase>>,
}

impl AppState {
    pub fn new(engine: PredictSentenceUseCase) -> Self {
        Self {
            engine: Arc::new(Mutex::new(engine)),
        }
    }
}
