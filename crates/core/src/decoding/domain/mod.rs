pub mod sequence_model;
