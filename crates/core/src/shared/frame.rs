use ndarray::{Array2, ArrayView3};

/// A single decoded video frame: contiguous RGB24 bytes in row-major order.
///
/// Format conversion happens at I/O boundaries; everything downstream of
/// the reader works with tightly-packed RGB.
#[derive(Clone, Debug)]
pub struct Frame {
    data: Vec<u8>,
    width: u32,
    height: u32,
    index: usize,
}

impl Frame {
    pub fn new(data: Vec<u8>, width: u32, height: u32, index: usize) -> Self {
        debug_assert_eq!(
            data.len(),
            (width as usize) * (height as usize) * 3,
            "data length must equal width * height * 3"
        );
        Self {
            data,
            width,
            height,
            index,
        }
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Position of this frame in the source video's presentation order.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn as_ndarray(&self) -> ArrayView3<'_, u8> {
        ArrayView3::from_shape(
            (self.height as usize, self.width as usize, 3),
            &self.data,
        )
        .expect("Frame data length must match dimensions")
    }

    /// Converts to single-channel grayscale using BT.601 luma weights
    /// (integer approximation, matching the common video convention).
    pub fn to_grayscale(&self) -> Array2<u8> {
        let h = self.height as usize;
        let w = self.width as usize;
        let mut out = Array2::<u8>::zeros((h, w));
        for y in 0..h {
            for x in 0..w {
                let i = (y * w + x) * 3;
                let r = self.data[i] as u32;
                let g = self.data[i + 1] as u32;
                let b = self.data[i + 2] as u32;
                out[[y, x]] = ((77 * r + 150 * g + 29 * b + 128) >> 8) as u8;
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_construction_and_accessors() {
        let data = vec![0u8; 12]; // 2x2x3
        let frame = Frame::new(data.clone(), 2, 2, 5);
        assert_eq!(frame.width(), 2);
        assert_eq!(frame.height(), 2);
        assert_eq!(frame.index(), 5);
        assert_eq!(frame.data(), &data[..]);
    }

    #[test]
    #[should_panic(expected = "data length must equal width * height * 3")]
    fn test_mismatched_data_length_panics_in_debug() {
        let data = vec![0u8; 10]; // wrong size for 2x2x3
        Frame::new(data, 2, 2, 0);
    }

    #[test]
    fn test_as_ndarray_shape_and_pixel_access() {
        // 2x2 RGB: set pixel (row=1, col=0) to red
        let mut data = vec![0u8; 12];
        data[6] = 255;
        let frame = Frame::new(data, 2, 2, 0);
        let arr = frame.as_ndarray();
        assert_eq!(arr.shape(), &[2, 2, 3]);
        assert_eq!(arr[[1, 0, 0]], 255);
        assert_eq!(arr[[1, 0, 1]], 0);
    }

    #[test]
    fn test_grayscale_shape() {
        let frame = Frame::new(vec![0u8; 4 * 2 * 3], 4, 2, 0);
        let gray = frame.to_grayscale();
        assert_eq!(gray.shape(), &[2, 4]); // (height, width)
    }

    #[test]
    fn test_grayscale_neutral_pixel_unchanged() {
        // R = G = B means luma equals the channel value
        let frame = Frame::new(vec![128u8; 3], 1, 1, 0);
        assert_eq!(frame.to_grayscale()[[0, 0]], 128);
    }

    #[test]
    fn test_grayscale_weights_green_heaviest() {
        let red = Frame::new(vec![255, 0, 0], 1, 1, 0);
        let green = Frame::new(vec![0, 255, 0], 1, 1, 0);
        let blue = Frame::new(vec![0, 0, 255], 1, 1, 0);
        let (r, g, b) = (
            red.to_grayscale()[[0, 0]],
            green.to_grayscale()[[0, 0]],
            blue.to_grayscale()[[0, 0]],
        );
        assert!(g > r);
        assert!(r > b);
    }
}
