use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};

use lipread_core::decoding::decoder::Decoder;
use lipread_core::decoding::infrastructure::onnx_sequence_model::OnnxSequenceModel;
use lipread_core::decoding::vocabulary::Vocabulary;
use lipread_core::detection::domain::mouth_extractor::MouthRegionExtractor;
use lipread_core::detection::infrastructure::model_resolver;
use lipread_core::detection::infrastructure::onnx_face_detector::OnnxFaceDetector;
use lipread_core::detection::infrastructure::onnx_landmark_predictor::OnnxLandmarkPredictor;
use lipread_core::pipeline::export_word_frames_use_case::ExportWordFramesUseCase;
use lipread_core::pipeline::predict_sentence_use_case::PredictSentenceUseCase;
use lipread_core::sequence::frame_sequence_builder::FrameSequenceBuilder;
use lipread_core::shared::constants::{
    FACE_MODEL_NAME, LANDMARK_MODEL_NAME, SEQUENCE_MODEL_NAME, VOCABULARY_FILE_NAME,
};
use lipread_core::video::domain::video_reader::VideoReader;
use lipread_core::video::infrastructure::ffmpeg_reader::FfmpegReader;
use lipread_core::video::infrastructure::image_file_writer::ImageFileWriter;

/// Lip reading from speaker videos.
#[derive(Parser)]
#[command(name = "lipread")]
struct Cli {
    /// Directory containing the ONNX models and vocabulary file.
    #[arg(long, global = true)]
    model_dir: Option<PathBuf>,

    /// Face detection confidence threshold (0.0-1.0).
    #[arg(long, global = true, default_value = "0.5")]
    confidence: f64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Predict the spoken sentence in a video.
    Predict {
        /// Input video file.
        video: PathBuf,
    },
    /// Export per-word mouth crops for dataset building.
    ExportFrames {
        /// Input video file.
        video: PathBuf,

        /// Word-level alignment file (lines of `start end word`).
        alignment: PathBuf,

        /// Output directory for the exported frames.
        #[arg(long, default_value = "data/processed")]
        out_dir: PathBuf,
    },
    /// Print the number of frames in a video.
    CountFrames {
        /// Input video file.
        video: PathBuf,
    },
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    validate(&cli)?;

    let model_dir = cli.model_dir.as_deref();
    match cli.command {
        Command::Predict { video } => run_predict(&video, model_dir, cli.confidence),
        Command::ExportFrames {
            video,
            alignment,
            out_dir,
        } => run_export(&video, &alignment, &out_dir, model_dir, cli.confidence),
        Command::CountFrames { video } => run_count_frames(&video),
    }
}

fn run_predict(
    video: &Path,
    model_dir: Option<&Path>,
    confidence: f64,
) -> Result<(), Box<dyn std::error::Error>> {
    let builder = build_sequence_builder(model_dir, confidence)?;

    log::info!("Resolving model: {SEQUENCE_MODEL_NAME}");
    let model_path = model_resolver::resolve(SEQUENCE_MODEL_NAME, model_dir)?;
    let model = OnnxSequenceModel::new(&model_path)?;

    let vocabulary_path = model_resolver::resolve(VOCABULARY_FILE_NAME, model_dir)?;
    let vocabulary = Vocabulary::load(&vocabulary_path)?;

    let mut use_case =
        PredictSentenceUseCase::new(builder, Box::new(model), Decoder::new(vocabulary));
    let sentence = use_case.execute(video)?;
    println!("{sentence}");
    Ok(())
}

fn run_export(
    video: &Path,
    alignment: &Path,
    out_dir: &Path,
    model_dir: Option<&Path>,
    confidence: f64,
) -> Result<(), Box<dyn std::error::Error>> {
    let builder = build_sequence_builder(model_dir, confidence)?;

    let mut use_case = ExportWordFramesUseCase::new(builder, Box::new(ImageFileWriter::new()));
    let written = use_case.execute(video, alignment, out_dir)?;
    log::info!("Wrote {written} frames to {}", out_dir.display());
    Ok(())
}

fn run_count_frames(video: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let mut reader = FfmpegReader::new();
    let metadata = reader.open(video)?;

    // Container metadata may not carry a frame count; fall back to decoding.
    let count = if metadata.total_frames > 0 {
        metadata.total_frames
    } else {
        reader.frames().filter(|f| f.is_ok()).count()
    };
    reader.close();

    println!("{count}");
    Ok(())
}

fn build_sequence_builder(
    model_dir: Option<&Path>,
    confidence: f64,
) -> Result<FrameSequenceBuilder, Box<dyn std::error::Error>> {
    log::info!("Resolving model: {FACE_MODEL_NAME}");
    let face_model = model_resolver::resolve(FACE_MODEL_NAME, model_dir)?;
    log::info!("Resolving model: {LANDMARK_MODEL_NAME}");
    let landmark_model = model_resolver::resolve(LANDMARK_MODEL_NAME, model_dir)?;

    let extractor = MouthRegionExtractor::new(
        Box::new(OnnxFaceDetector::new(&face_model, confidence)?),
        Box::new(OnnxLandmarkPredictor::new(&landmark_model)?),
    );
    Ok(FrameSequenceBuilder::new(
        Box::new(FfmpegReader::new()),
        extractor,
    ))
}

fn validate(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    if !(0.0..=1.0).contains(&cli.confidence) {
        return Err(format!(
            "Confidence must be between 0.0 and 1.0, got {}",
            cli.confidence
        )
        .into());
    }
    let input = match &cli.command {
        Command::Predict { video } => video,
        Command::ExportFrames { video, .. } => video,
        Command::CountFrames { video } => video,
    };
    if !input.exists() {
        return Err(format!("Input file not found: {}", input.display()).into());
    }
    if let Command::ExportFrames { alignment, .. } = &cli.command {
        if !alignment.exists() {
            return Err(format!("Alignment file not found: {}", alignment.display()).into());
        }
    }
    Ok(())
}
