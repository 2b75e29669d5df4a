use std::path::Path;

use ndarray::ArrayView2;

use crate::video::domain::image_writer::ImageWriter;

/// Writes grayscale frames to image files using the `image` crate.
///
/// Supports optional resizing for the dataset export path.
pub struct ImageFileWriter;

impl ImageFileWriter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ImageFileWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageWriter for ImageFileWriter {
    fn write(
        &self,
        path: &Path,
        frame: ArrayView2<'_, u8>,
        size: Option<(u32, u32)>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        // Ensure parent directory exists (infrastructure concern)
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let (h, w) = (frame.nrows() as u32, frame.ncols() as u32);
        let data: Vec<u8> = frame.iter().copied().collect();
        let img = image::GrayImage::from_raw(w, h, data)
            .ok_or("failed to create image from frame data")?;

        let img = if let Some((tw, th)) = size {
            image::imageops::resize(&img, tw, th, image::imageops::FilterType::Triangle)
        } else {
            img
        };

        img.save(path)?;
        Ok(())
    }
}
