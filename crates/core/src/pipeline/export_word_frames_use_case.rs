//! Dataset export: distributes a video's mouth crops into per-word
//! directories using a word-level alignment file.
//!
//! Alignment lines are `<start> <end> <word>` with integer timestamps.
//! Frame indices are assigned proportionally: a word spanning the first
//! tenth of the utterance owns the first tenth of the fixed-length frame
//! sequence.

use std::ops::Range;
use std::path::Path;

use ndarray::Array2;

use crate::sequence::frame_sequence_builder::FrameSequenceBuilder;
use crate::shared::constants::{EXPORT_FRAME_SIZE, MOUTH_REGION_SIZE, WINDOW_LEN};
use crate::video::domain::image_writer::ImageWriter;

#[derive(Debug, Clone, PartialEq)]
pub struct WordSegment {
    pub word: String,
    pub start: i64,
    pub end: i64,
}

pub struct ExportWordFramesUseCase {
    builder: FrameSequenceBuilder,
    writer: Box<dyn ImageWriter>,
}

impl ExportWordFramesUseCase {
    pub fn new(builder: FrameSequenceBuilder, writer: Box<dyn ImageWriter>) -> Self {
        Self { builder, writer }
    }

    /// Extracts the video's mouth crops, normalizes to the fixed window
    /// length, and writes each word's share of frames as upscaled images
    /// under `<out_dir>/<video-stem>/<word>/frame_<i>.png`.
    pub fn execute(
        &mut self,
        video_path: &Path,
        alignment_path: &Path,
        out_dir: &Path,
    ) -> Result<usize, Box<dyn std::error::Error>> {
        let alignment = std::fs::read_to_string(alignment_path)?;
        let segments = parse_alignment(&alignment)?;

        let frames = fixed_frames(self.builder.build(video_path)?);

        let stem = video_path
            .file_stem()
            .ok_or("video path has no file name")?;
        let base = out_dir.join(stem);

        let mut written = 0;
        for (word, range) in segment_frame_ranges(&segments, frames.len())? {
            let word_dir = base.join(&word);
            for i in range {
                let path = word_dir.join(format!("frame_{i}.png"));
                self.writer.write(
                    &path,
                    frames[i].view(),
                    Some((EXPORT_FRAME_SIZE, EXPORT_FRAME_SIZE)),
                )?;
                written += 1;
            }
        }

        log::info!(
            "exported {} frames for {} words to {}",
            written,
            segments.len(),
            base.display()
        );
        Ok(written)
    }
}

/// Parses `<start> <end> <word>` lines. Blank lines are skipped.
pub fn parse_alignment(text: &str) -> Result<Vec<WordSegment>, Box<dyn std::error::Error>> {
    let mut segments = Vec::new();
    for (n, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let mut parts = line.split_whitespace();
        let (start, end, word) = match (parts.next(), parts.next(), parts.next()) {
            (Some(s), Some(e), Some(w)) => (s, e, w),
            _ => return Err(format!("alignment line {}: expected 'start end word'", n + 1).into()),
        };
        segments.push(WordSegment {
            word: word.to_string(),
            start: start
                .parse()
                .map_err(|_| format!("alignment line {}: bad start '{start}'", n + 1))?,
            end: end
                .parse()
                .map_err(|_| format!("alignment line {}: bad end '{end}'", n + 1))?,
        });
    }
    Ok(segments)
}

/// Maps each word's timestamp span onto a half-open frame index range,
/// proportional to its share of the total utterance duration.
pub fn segment_frame_ranges(
    segments: &[WordSegment],
    total_frames: usize,
) -> Result<Vec<(String, Range<usize>)>, Box<dyn std::error::Error>> {
    let first = segments.first().ok_or("alignment file has no segments")?;
    let last = segments.last().ok_or("alignment file has no segments")?;
    let total_duration = last.end - first.start;
    if total_duration <= 0 {
        return Err("alignment has zero or negative total duration".into());
    }

    let to_frame = |t: i64| -> usize {
        let f = (t - first.start) as f64 / total_duration as f64 * total_frames as f64;
        (f as usize).min(total_frames)
    };

    Ok(segments
        .iter()
        .map(|s| (s.word.clone(), to_frame(s.start)..to_frame(s.end)))
        .collect())
}

/// Truncates to [`WINDOW_LEN`] frames or pads with black frames, the
/// dataset-building convention.
fn fixed_frames(mut frames: Vec<Array2<u8>>) -> Vec<Array2<u8>> {
    let dims = frames
        .first()
        .map(|f| f.raw_dim())
        .unwrap_or_else(|| {
            Array2::<u8>::zeros((MOUTH_REGION_SIZE as usize, MOUTH_REGION_SIZE as usize))
                .raw_dim()
        });
    frames.truncate(WINDOW_LEN);
    while frames.len() < WINDOW_LEN {
        frames.push(Array2::zeros(dims));
    }
    frames
}
