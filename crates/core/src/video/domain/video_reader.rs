use std::path::Path;

use crate::shared::frame::Frame;
use crate::shared::video_metadata::VideoMetadata;

/// Reads frames from a video source in presentation order.
///
/// Implementations handle I/O details (codec, container format); the
/// pipeline works with the abstract `Frame` and `VideoMetadata` types.
/// An open failure or a mid-stream decode error must surface as an error,
/// never as a silently shortened stream.
pub trait VideoReader: Send {
    /// Opens a video file and returns its metadata.
    fn open(&mut self, path: &Path) -> Result<VideoMetadata, Box<dyn std::error::Error>>;

    /// Returns an iterator over frames in decode order.
    fn frames(
        &mut self,
    ) -> Box<dyn Iterator<Item = Result<Frame, Box<dyn std::error::Error>>> + '_>;

    /// Releases any resources held by the reader. Must be idempotent.
    fn close(&mut self);
}
