pub mod frame_sequence_builder;
pub mod normalizer;
