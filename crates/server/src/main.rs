mod handlers;
mod router;
mod state;

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use clap::Parser;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use lipread_core::decoding::decoder::Decoder;
use lipread_core::decoding::infrastructure::onnx_sequence_model::OnnxSequenceModel;
use lipread_core::decoding::vocabulary::Vocabulary;
use lipread_core::detection::domain::mouth_extractor::MouthRegionExtractor;
use lipread_core::detection::infrastructure::model_resolver;
use lipread_core::detection::infrastructure::onnx_face_detector::OnnxFaceDetector;
use lipread_core::detection::infrastructure::onnx_landmark_predictor::OnnxLandmarkPredictor;
use lipread_core::pipeline::predict_sentence_use_case::PredictSentenceUseCase;
use lipread_core::sequence::frame_sequence_builder::FrameSequenceBuilder;
use lipread_core::shared::constants::{
    FACE_MODEL_NAME, LANDMARK_MODEL_NAME, SEQUENCE_MODEL_NAME, VOCABULARY_FILE_NAME,
};
use lipread_core::video::infrastructure::ffmpeg_reader::FfmpegReader;

use crate::router::create_router;
use crate::state::AppState;

/// HTTP inference service for lip reading.
#[derive(Parser)]
#[command(name = "lipread-server")]
struct Cli {
    /// Address to bind.
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Port to listen on.
    #[arg(long, default_value = "5050")]
    port: u16,

    /// Directory containing the ONNX models and vocabulary file.
    #[arg(long)]
    model_dir: Option<PathBuf>,

    /// Face detection confidence threshold (0.0-1.0).
    #[arg(long, default_value = "0.5")]
    confidence: f64,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    if !(0.0..=1.0).contains(&cli.confidence) {
        return Err(format!(
            "Confidence must be between 0.0 and 1.0, got {}",
            cli.confidence
        )
        .into());
    }

    let engine = build_engine(cli.model_dir.as_deref(), cli.confidence)?;
    let router = create_router(AppState::new(engine));

    let addr: SocketAddr = format!("{}:{}", cli.host, cli.port).parse()?;
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}

fn build_engine(
    model_dir: Option<&Path>,
    confidence: f64,
) -> Result<PredictSentenceUseCase, Box<dyn std::error::Error>> {
    tracing::info!("Resolving model: {FACE_MODEL_NAME}");
    let face_model = model_resolver::resolve(FACE_MODEL_NAME, model_dir)?;
    tracing::info!("Resolving model: {LANDMARK_MODEL_NAME}");
    let landmark_model = model_resolver::resolve(LANDMARK_MODEL_NAME, model_dir)?;
    tracing::info!("Resolving model: {SEQUENCE_MODEL_NAME}");
    let sequence_model = model_resolver::resolve(SEQUENCE_MODEL_NAME, model_dir)?;
    let vocabulary_path = model_resolver::resolve(VOCABULARY_FILE_NAME, model_dir)?;

    let vocabulary = Vocabulary::load(&vocabulary_path)?;
    tracing::info!("Loaded vocabulary with {} words", vocabulary.len());

    let extractor = MouthRegionExtractor::new(
        Box::new(OnnxFaceDetector::new(&face_model, confidence)?),
        Box::new(OnnxLandmarkPredictor::new(&landmark_model)?),
    );
    let builder = FrameSequenceBuilder::new(Box::new(FfmpegReader::new()), extractor);
    let model = OnnxSequenceModel::new(&sequence_model)?;

    Ok(PredictSentenceUseCase::new(
        builder,
        Box::new(model),
        Decoder::new(vocabulary),
    ))
}
