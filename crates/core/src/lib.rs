//! Lip-reading inference library.
//!
//! Turns a speaker video into a predicted sentence: per-frame mouth-region
//! extraction (face detection + 68-point landmarks), fixed-length sequence
//! normalization, and argmax decoding of a pretrained sequence classifier.
//!
//! Domain modules define the trait seams; infrastructure modules provide
//! the ONNX Runtime and ffmpeg implementations behind them.

pub mod decoding;
pub mod detection;
pub mod pipeline;
pub mod sequence;
pub mod shared;
pub mod video;
