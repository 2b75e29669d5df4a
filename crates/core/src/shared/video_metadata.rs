use std::path::PathBuf;

/// Container-level properties of an opened video.
///
/// `total_frames` is the stream's declared count and may be zero for
/// containers that don't record it; decode the stream to get the truth.
#[derive(Clone, Debug, PartialEq)]
pub struct VideoMetadata {
    pub width: u32,
    pub height: u32,
    pub fps: f64,
    pub total_frames: usize,
    pub source_path: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_construction() {
        let meta = VideoMetadata {
            width: 1920,
            height: 1080,
            fps: 25.0,
            total_frames: 75,
            source_path: Some(PathBuf::from("/tmp/speaker.mp4")),
        };
        assert_eq!(meta.width, 1920);
        assert_eq!(meta.total_frames, 75);
        assert_eq!(meta.source_path, Some(PathBuf::from("/tmp/speaker.mp4")));
    }

    #[test]
    fn test_clone_is_independent() {
        let meta = VideoMetadata {
            width: 640,
            height: 480,
            fps: 24.0,
            total_frames: 100,
            source_path: None,
        };
        assert_eq!(meta, meta.clone());
    }
}
