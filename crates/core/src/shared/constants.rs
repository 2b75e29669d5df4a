use std::ops::Range;

/// Fixed temporal length of one model input window, in frames.
pub const WINDOW_LEN: usize = 75;

/// Side length of a cropped mouth region, in pixels.
pub const MOUTH_REGION_SIZE: u32 = 64;

/// Padding added on each side of the mouth landmark bounding box, in pixels.
pub const MOUTH_PADDING: f64 = 10.0;

/// Number of points in the standard facial landmark scheme.
pub const LANDMARK_COUNT: usize = 68;

/// Indices of the mouth contour within the 68-point scheme (20 points).
pub const MOUTH_LANDMARK_RANGE: Range<usize> = 48..68;

/// Side length of exported dataset frames, in pixels.
pub const EXPORT_FRAME_SIZE: u32 = 256;

pub const FACE_MODEL_NAME: &str = "yolov8n-face.onnx";
pub const LANDMARK_MODEL_NAME: &str = "pfld-68.onnx";
pub const SEQUENCE_MODEL_NAME: &str = "word-sequence.onnx";
pub const VOCABULARY_FILE_NAME: &str = "word_index.json";

/// Environment variable naming a directory searched for model files.
pub const MODEL_DIR_ENV: &str = "LIPREAD_MODEL_DIR";

/// Environment variable naming a base URL for downloading missing models.
pub const MODEL_BASE_URL_ENV: &str = "LIPREAD_MODEL_BASE_URL";
