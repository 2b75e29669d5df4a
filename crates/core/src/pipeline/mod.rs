pub mod export_word_frames_use_case;
pub mod predict_error;
pub mod predict_sentence_use_case;
