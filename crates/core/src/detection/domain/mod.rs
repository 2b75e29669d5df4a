pub mod face_detector;
pub mod landmark_predictor;
pub mod landmark_set;
pub mod mouth_extractor;
