mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use log::{error, info};
use scenelens::api::eval::evaluate_run;
use scenelens::api::models::run::{default_scenario_id, RunConfig};
use scenelens::api::video::KeyframeExtractor;
use scenelens::core::video::SamplerConfig;

use crate::cli::{Cli, Commands, EvaluateArgs, ExtractArgs};

fn main() {
    scenelens::init_logging();

    if let Err(err) = run() {
        error!("command failed: {}", err);
        for cause in err.chain().skip(1) {
            error!("caused by: {}", cause);
        }
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Extract(args) => extract(args),
        Commands::Evaluate(args) => evaluate(args),
    }
}

fn extract(args: ExtractArgs) -> Result<()> {
    let batch_size = match args.batch_size {
        Some(0) => SamplerConfig::parallel().batch_size,
        Some(n) => n,
        None => 0,
    };
    let config = SamplerConfig {
        min_scene_delta: args.min_scene_delta,
        fps_cap: Some(args.fps_cap).filter(|cap| *cap > 0.0),
        batch_size,
    };

    let output = KeyframeExtractor::create(config)
        .extract_dir(&args.frames_dir, args.fps, &args.out)
        .with_context(|| format!("extracting keyframes from {:?}", args.frames_dir))?;

    info!(
        "read {} frames, {} candidates, {} keyframes, manifest {:?}",
        output.stats.frames_read, output.stats.candidates, output.stats.keyframes, output.manifest
    );
    Ok(())
}

fn evaluate(args: EvaluateArgs) -> Result<()> {
    let scenario_id = match (&args.config, args.scenario_id) {
        (Some(path), _) => {
            RunConfig::from_file(path)
                .with_context(|| format!("reading run config {:?}", path))?
                .scenario_id
        }
        (None, Some(id)) => id,
        (None, None) => default_scenario_id(),
    };

    let text = std::fs::read_to_string(&args.predicted)
        .with_context(|| format!("reading predicted result {:?}", args.predicted))?;
    let predicted: serde_json::Value = serde_json::from_str(&text)
        .with_context(|| format!("parsing predicted result {:?}", args.predicted))?;

    let report = evaluate_run(&scenario_id, &predicted, Some(args.golden.as_path()), args.threshold)
        .context("scoring predicted result")?;

    match args.out {
        Some(path) => {
            report
                .write_json(&path)
                .with_context(|| format!("writing report {:?}", path))?;
            info!("report written to {:?}", path);
        }
        None => println!("{}", serde_json::to_string_pretty(&report)?),
    }
    Ok(())
}
