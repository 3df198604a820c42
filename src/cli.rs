use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use scenelens::api::eval::DEFAULT_GOLDEN_PATH;
use scenelens::core::eval::matcher::DEFAULT_THRESHOLD;
use scenelens::core::video::detector::DEFAULT_MIN_SCENE_DELTA;

#[derive(Parser, Debug)]
#[command(
    name = "scenelens",
    version,
    about = "Keyframe extraction and golden-set scoring for screen-recorded test runs"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Pick scene-change keyframes from a directory of decoded frames.
    Extract(ExtractArgs),
    /// Score a predicted result against the golden issue list.
    Evaluate(EvaluateArgs),
}

#[derive(Args, Debug, Clone)]
pub struct ExtractArgs {
    #[arg(long)]
    pub frames_dir: PathBuf,

    /// Frame rate the sequence was decoded at.
    #[arg(long, default_value_t = 30.0)]
    pub fps: f64,

    #[arg(long)]
    pub out: PathBuf,

    #[arg(long, default_value_t = DEFAULT_MIN_SCENE_DELTA)]
    pub min_scene_delta: f64,

    /// Candidate frames per second; 0 considers every frame.
    #[arg(long, default_value_t = 1.0)]
    pub fps_cap: f64,

    /// Parallel signature batch size; 0 picks one from the CPU count.
    #[arg(long)]
    pub batch_size: Option<usize>,
}

#[derive(Args, Debug, Clone)]
pub struct EvaluateArgs {
    /// Predicted result JSON with bugs / bugs_strong / bugs_minor lists.
    #[arg(long)]
    pub predicted: PathBuf,

    #[arg(long, default_value = DEFAULT_GOLDEN_PATH)]
    pub golden: PathBuf,

    /// Run config (YAML, JSON5 or key: value) supplying the scenario id.
    #[arg(long, conflicts_with = "scenario_id")]
    pub config: Option<PathBuf>,

    #[arg(long)]
    pub scenario_id: Option<String>,

    #[arg(long, default_value_t = DEFAULT_THRESHOLD)]
    pub threshold: u32,

    /// Report path; stdout when omitted.
    #[arg(long)]
    pub out: Option<PathBuf>,
}
