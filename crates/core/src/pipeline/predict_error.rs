use thiserror::Error;

/// Failure surfaced by the prediction pipeline.
///
/// Zero usable frames is NOT an error: the normalizer emits an all-zero
/// window and decoding proceeds. Only genuinely broken inputs or broken
/// collaborators fail.
#[derive(Error, Debug)]
pub enum PredictError {
    /// The file could not be opened or decoded as video.
    #[error("video decode failed: {0}")]
    VideoDecode(String),

    /// Face detection or landmark prediction infrastructure failed.
    /// Distinct from "no face found", which is a normal condition.
    #[error("face analysis failed: {0}")]
    Detection(String),

    /// The sequence model rejected or failed on the batch.
    #[error("model inference failed: {0}")]
    Inference(String),
}
