use std::path::Path;

use ndarray::ArrayView2;

/// Writes a single-channel frame to an image file.
///
/// Used by the dataset export path to persist mouth crops per word.
pub trait ImageWriter: Send {
    /// Writes `frame` (grayscale, row-major) to `path`, optionally
    /// resizing to `size` (width, height) first.
    fn write(
        &self,
        path: &Path,
        frame: ArrayView2<'_, u8>,
        size: Option<(u32, u32)>,
    ) -> Result<(), Box<dyn std::error::Error>>;
}
