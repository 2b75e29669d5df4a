pub mod onnx_sequence_model;
