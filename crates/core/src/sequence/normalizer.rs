//! Fixed-length sequence normalization.
//!
//! The model consumes windows of exactly [`WINDOW_LEN`] frames. Two
//! long-video policies exist side by side, intentionally:
//!
//! - [`fixed`] truncates to the first window (the dataset-building
//!   convention).
//! - [`chunked`] splits into consecutive windows and pads the last one
//!   (the serving convention).
//!
//! Both zero-pad short sequences at the end. Pixel values are the raw
//! grayscale intensities cast to `f32`, unscaled, matching what the
//! sequence model was trained on.

use ndarray::{Array2, Array4, Array5};

use crate::shared::constants::{MOUTH_REGION_SIZE, WINDOW_LEN};

/// Number of model windows a sequence of `len` frames produces in
/// chunked mode. Zero frames still produce one (all-padding) window.
pub fn window_count(len: usize) -> usize {
    if len == 0 {
        1
    } else {
        len.div_ceil(WINDOW_LEN)
    }
}

/// One window: truncate to [`WINDOW_LEN`] frames or zero-pad at the end.
///
/// Shape: `(WINDOW_LEN, height, width, 1)`.
pub fn fixed(frames: &[Array2<u8>]) -> Array4<f32> {
    let (h, w) = frame_dims(frames);
    let mut window = Array4::<f32>::zeros((WINDOW_LEN, h, w, 1));
    for (t, frame) in frames.iter().take(WINDOW_LEN).enumerate() {
        copy_frame(frame, |r, c, v| window[[t, r, c, 0]] = v);
    }
    window
}

/// All windows: consecutive non-overlapping chunks of [`WINDOW_LEN`]
/// frames at offsets 0, 75, 150, …; the final chunk is zero-padded.
///
/// Shape: `(window_count(L), WINDOW_LEN, height, width, 1)`. An empty
/// sequence yields exactly one all-zero window, not an error.
pub fn chunked(frames: &[Array2<u8>]) -> Array5<f32> {
    let (h, w) = frame_dims(frames);
    let windows = window_count(frames.len());
    let mut batch = Array5::<f32>::zeros((windows, WINDOW_LEN, h, w, 1));
    for (i, frame) in frames.iter().enumerate() {
        let win = i / WINDOW_LEN;
        let t = i % WINDOW_LEN;
        copy_frame(frame, |r, c, v| batch[[win, t, r, c, 0]] = v);
    }
    batch
}

fn frame_dims(frames: &[Array2<u8>]) -> (usize, usize) {
    frames
        .first()
        .map(|f| (f.nrows(), f.ncols()))
        .unwrap_or((MOUTH_REGION_SIZE as usize, MOUTH_REGION_SIZE as usize))
}

fn copy_frame(frame: &Array2<u8>, mut sink: impl FnMut(usize, usize, f32)) {
    for ((r, c), &v) in frame.indexed_iter() {
        sink(r, c, v as f32);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn frames(count: usize) -> Vec<Array2<u8>> {
        // Frame t is filled with value t+1 so padding (0) is distinguishable
        (0..count)
            .map(|t| Array2::from_elem((64, 64), ((t + 1) % 256) as u8))
            .collect()
    }

    // ── window_count ─────────────────────────────────────────────────

    #[rstest]
    #[case(0, 1)]
    #[case(1, 1)]
    #[case(74, 1)]
    #[case(75, 1)]
    #[case(76, 2)]
    #[case(150, 2)]
    #[case(151, 3)]
    fn test_window_count(#[case] len: usize, #[case] expected: usize) {
        assert_eq!(window_count(len), expected);
    }

    // ── fixed mode ───────────────────────────────────────────────────

    #[rstest]
    #[case(0)]
    #[case(1)]
    #[case(74)]
    #[case(75)]
    #[case(76)]
    #[case(150)]
    #[case(151)]
    fn test_fixed_window_shape(#[case] len: usize) {
        let window = fixed(&frames(len));
        assert_eq!(window.shape(), &[75, 64, 64, 1]);
    }

    #[test]
    fn test_fixed_truncates_to_first_window() {
        let window = fixed(&frames(100));
        // Frame 74 (value 75) is kept; frame 75 (value 76) is cut
        assert_eq!(window[[74, 0, 0, 0]], 75.0);
    }

    #[test]
    fn test_fixed_pads_short_sequence_with_zeros() {
        let window = fixed(&frames(40));
        assert_eq!(window[[39, 0, 0, 0]], 40.0);
        assert_eq!(window[[40, 0, 0, 0]], 0.0);
        assert_eq!(window[[74, 63, 63, 0]], 0.0);
    }

    // ── chunked mode ─────────────────────────────────────────────────

    #[rstest]
    #[case(0, 1)]
    #[case(1, 1)]
    #[case(74, 1)]
    #[case(75, 1)]
    #[case(76, 2)]
    #[case(150, 2)]
    #[case(151, 3)]
    fn test_chunked_batch_shape(#[case] len: usize, #[case] windows: usize) {
        let batch = chunked(&frames(len));
        assert_eq!(batch.shape(), &[windows, 75, 64, 64, 1]);
    }

    #[test]
    fn test_chunked_empty_sequence_is_one_zero_window() {
        let batch = chunked(&[]);
        assert_eq!(batch.shape(), &[1, 75, 64, 64, 1]);
        assert!(batch.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_chunked_windows_are_consecutive() {
        let batch = chunked(&frames(160));
        // Window 0 starts at frame 0, window 1 at frame 75, window 2 at 150
        assert_eq!(batch[[0, 0, 0, 0, 0]], 1.0);
        assert_eq!(batch[[1, 0, 0, 0, 0]], 76.0);
        assert_eq!(batch[[2, 0, 0, 0, 0]], 151.0);
    }

    #[test]
    fn test_chunked_last_window_padded() {
        // 160 frames → 3 windows; last has 10 real + 65 padded
        let batch = chunked(&frames(160));
        assert_eq!(batch[[2, 9, 0, 0, 0]], 160.0);
        assert_eq!(batch[[2, 10, 0, 0, 0]], 0.0);
        assert_eq!(batch[[2, 74, 0, 0, 0]], 0.0);
    }

    #[test]
    fn test_chunked_exact_multiple_has_no_padding() {
        let batch = chunked(&frames(150));
        assert_eq!(batch.shape()[0], 2);
        assert_eq!(batch[[1, 74, 0, 0, 0]], 150.0);
    }

    #[test]
    fn test_chunked_single_short_window_matches_fixed() {
        let input = frames(40);
        let batch = chunked(&input);
        let window = fixed(&input);
        assert_eq!(batch.shape(), &[1, 75, 64, 64, 1]);
        assert_eq!(batch.index_axis(ndarray::Axis(0), 0), window);
    }

    #[test]
    fn test_last_window_real_frame_count() {
        // For L=160: L − 75·(windows−1) = 10 real frames in the last window
        let batch = chunked(&frames(160));
        let last = batch.index_axis(ndarray::Axis(0), 2);
        let real = (0..75)
            .filter(|&t| last[[t, 0, 0, 0]] != 0.0)
            .count();
        assert_eq!(real, 160 - 75 * 2);
    }

    #[test]
    fn test_pixel_values_unscaled() {
        let input = vec![Array2::from_elem((64, 64), 200u8)];
        let batch = chunked(&input);
        assert_eq!(batch[[0, 0, 0, 0, 0]], 200.0);
    }
}
