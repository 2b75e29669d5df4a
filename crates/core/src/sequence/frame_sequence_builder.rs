//! Builds the ordered mouth-crop sequence for one video.
//!
//! Drop policy: frames where no face (and therefore no mouth) is detected
//! are dropped from the sequence entirely — no placeholder, no gap marker.
//! The retained frames keep their original temporal order, but dropped
//! frames shift the alignment of everything after them. Downstream
//! consumers rely on this being the documented behavior.

use std::path::Path;

use ndarray::Array2;

use crate::detection::domain::mouth_extractor::MouthRegionExtractor;
use crate::pipeline::predict_error::PredictError;
use crate::video::domain::video_reader::VideoReader;

pub struct FrameSequenceBuilder {
    reader: Box<dyn VideoReader>,
    extractor: MouthRegionExtractor,
}

impl FrameSequenceBuilder {
    pub fn new(reader: Box<dyn VideoReader>, extractor: MouthRegionExtractor) -> Self {
        Self { reader, extractor }
    }

    /// Decodes the video and returns one 64x64 grayscale mouth crop per
    /// frame with a detected face, in presentation order.
    ///
    /// A zero-length result is valid (no face anywhere); an unreadable or
    /// partially decodable file is a [`PredictError::VideoDecode`]. The
    /// reader is closed on every exit path.
    pub fn build(&mut self, path: &Path) -> Result<Vec<Array2<u8>>, PredictError> {
        if let Err(e) = self.reader.open(path) {
            self.reader.close();
            return Err(PredictError::VideoDecode(e.to_string()));
        }

        // Decode fully before extraction to avoid a borrow conflict
        // between the reader's iterator and the mutable extractor.
        let decoded = match self.reader.frames().collect::<Result<Vec<_>, _>>() {
            Ok(frames) => frames,
            Err(e) => {
                self.reader.close();
                return Err(PredictError::VideoDecode(e.to_string()));
            }
        };

        let mut sequence = Vec::with_capacity(decoded.len());
        for frame in &decoded {
            match self.extractor.extract(frame) {
                Ok(Some(region)) => sequence.push(region.to_grayscale()),
                Ok(None) => {
                    log::debug!("frame {}: no face detected, dropped", frame.index());
                }
                Err(e) => {
                    self.reader.close();
                    return Err(PredictError::Detection(e.to_string()));
                }
            }
        }

        self.reader.close();
        log::info!(
            "retained {} of {} decoded frames",
            sequence.len(),
            decoded.len()
        );
        Ok(sequence)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::domain::face_detector::{FaceBox, FaceDetector};
    use crate::detection::domain::landmark_predictor::LandmarkPredictor;
    use crate::detection::domain::landmark_set::LandmarkSet;
    use crate::shared::constants::LANDMARK_COUNT;
    use crate::shared::frame::Frame;
    use crate::shared::video_metadata::VideoMetadata;
    use std::sync::{Arc, Mutex};

    struct StubReader {
        frames: Vec<Frame>,
        fail_open: bool,
        fail_at: Option<usize>,
        closed: Arc<Mutex<bool>>,
    }

    impl StubReader {
        fn new(frames: Vec<Frame>) -> Self {
            Self {
                frames,
                fail_open: false,
                fail_at: None,
                closed: Arc::new(Mutex::new(false)),
            }
        }
    }

    impl VideoReader for StubReader {
        fn open(&mut self, _path: &Path) -> Result<VideoMetadata, Box<dyn std::error::Error>> {
            if self.fail_open {
                return Err("cannot open".into());
            }
            Ok(VideoMetadata {
                width: 100,
                height: 100,
                fps: 25.0,
                total_frames: self.frames.len(),
                source_path: None,
            })
        }

        fn frames(
            &mut self,
        ) -> Box<dyn Iterator<Item = Result<Frame, Box<dyn std::error::Error>>> + '_> {
            let fail_at = self.fail_at;
            Box::new(
                self.frames
                    .drain(..)
                    .enumerate()
                    .map(move |(i, f)| match fail_at {
                        Some(n) if i == n => Err("decode error".into()),
                        _ => Ok(f),
                    }),
            )
        }

        fn close(&mut self) {
            *self.closed.lock().unwrap() = true;
        }
    }

    /// Detects a face on every frame except the listed indices.
    struct SelectiveDetector {
        skip: Vec<usize>,
    }

    impl FaceDetector for SelectiveDetector {
        fn detect(&mut self, frame: &Frame) -> Result<Vec<FaceBox>, Box<dyn std::error::Error>> {
            if self.skip.contains(&frame.index()) {
                return Ok(vec![]);
            }
            Ok(vec![FaceBox {
                x1: 0.0,
                y1: 0.0,
                x2: 100.0,
                y2: 100.0,
                confidence: 0.9,
            }])
        }
    }

    struct StubPredictor;

    impl LandmarkPredictor for StubPredictor {
        fn predict(
            &mut self,
            _frame: &Frame,
            _face: &FaceBox,
        ) -> Result<LandmarkSet, Box<dyn std::error::Error>> {
            let mut points = [(50.0, 50.0); LANDMARK_COUNT];
            points[48] = (40.0, 60.0);
            points[54] = (60.0, 60.0);
            points[57] = (50.0, 70.0);
            Ok(LandmarkSet::new(points))
        }
    }

    fn make_frames(count: usize) -> Vec<Frame> {
        (0..count)
            .map(|i| Frame::new(vec![100u8; 100 * 100 * 3], 100, 100, i))
            .collect()
    }

    fn builder_with(reader: StubReader, skip: Vec<usize>) -> FrameSequenceBuilder {
        FrameSequenceBuilder::new(
            Box::new(reader),
            MouthRegionExtractor::new(
                Box::new(SelectiveDetector { skip }),
                Box::new(StubPredictor),
            ),
        )
    }

    #[test]
    fn test_all_frames_detected() {
        let mut builder = builder_with(StubReader::new(make_frames(5)), vec![]);
        let seq = builder.build(Path::new("/tmp/in.mp4")).unwrap();
        assert_eq!(seq.len(), 5);
        for frame in &seq {
            assert_eq!(frame.shape(), &[64, 64]);
        }
    }

    #[test]
    fn test_undetected_frames_are_dropped_without_gap() {
        let mut builder = builder_with(StubReader::new(make_frames(5)), vec![1, 3]);
        let seq = builder.build(Path::new("/tmp/in.mp4")).unwrap();
        // 5 frames, 2 dropped → 3 retained, no placeholders
        assert_eq!(seq.len(), 3);
    }

    #[test]
    fn test_no_face_anywhere_yields_empty_sequence() {
        let mut builder = builder_with(
            StubReader::new(make_frames(4)),
            vec![0, 1, 2, 3],
        );
        let seq = builder.build(Path::new("/tmp/in.mp4")).unwrap();
        assert!(seq.is_empty());
    }

    #[test]
    fn test_open_failure_is_video_decode_error() {
        let mut reader = StubReader::new(make_frames(0));
        reader.fail_open = true;
        let closed = reader.closed.clone();
        let mut builder = builder_with(reader, vec![]);

        let err = builder.build(Path::new("/tmp/in.mp4")).unwrap_err();
        assert!(matches!(err, PredictError::VideoDecode(_)));
        assert!(*closed.lock().unwrap());
    }

    #[test]
    fn test_mid_stream_decode_failure_surfaces() {
        let mut reader = StubReader::new(make_frames(5));
        reader.fail_at = Some(2);
        let closed = reader.closed.clone();
        let mut builder = builder_with(reader, vec![]);

        let err = builder.build(Path::new("/tmp/in.mp4")).unwrap_err();
        assert!(matches!(err, PredictError::VideoDecode(_)));
        assert!(*closed.lock().unwrap());
    }

    #[test]
    fn test_reader_closed_on_success() {
        let reader = StubReader::new(make_frames(2));
        let closed = reader.closed.clone();
        let mut builder = builder_with(reader, vec![]);

        builder.build(Path::new("/tmp/in.mp4")).unwrap();
        assert!(*closed.lock().unwrap());
    }
}
