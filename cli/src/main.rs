//! `trafficount` CLI: scenario runs, replay import/export, counting of
//! external detection files.

mod report;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use counter_core::config::EngineConfig;
use counter_core::engine::TrackingEngine;
use counter_core::metrics::{CountingMetrics, LineGroundTruth};
use counter_core::types::DetectionFrame;
use report::{format_metrics, format_report, SpeedPrinter};
use sim::replay::{load_detections, load_engine_config, load_replay, save_replay, ReplayLog};
use sim::scenarios::{Scenario, ScenarioKind};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser)]
#[command(name = "trafficount", about = "Line-crossing vehicle counter")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Engine overrides shared by every subcommand.
#[derive(Args, Clone, Debug)]
struct EngineArgs {
    /// JSON file with `lines` and association parameters
    #[arg(long)]
    config: Option<PathBuf>,
    /// Frames a track may go unmatched before it is dropped
    #[arg(long)]
    max_tracking: Option<u64>,
    /// Gate size in pixels for matching a detection to a track
    #[arg(long)]
    match_distance: Option<f64>,
    /// Print every speed measurement as it is made
    #[arg(long)]
    print_speeds: bool,
    /// Write final statistics to a JSON file
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate a named scenario, count it, and compare with ground truth.
    RunScenario {
        #[arg(value_enum)]
        scenario: ScenarioKind,
        /// Random seed for reproducibility
        #[arg(long, default_value_t = 42)]
        seed: u64,
        /// Also save the detector log for later replay
        #[arg(long)]
        save_replay: Option<PathBuf>,
        #[command(flatten)]
        engine: EngineArgs,
    },
    /// Count a previously recorded replay log.
    Replay {
        /// Path to replay JSON file
        input: PathBuf,
        #[command(flatten)]
        engine: EngineArgs,
    },
    /// Count a JSON array of detection frames from an external detector.
    Count {
        /// Path to detections JSON file
        input: PathBuf,
        #[command(flatten)]
        engine: EngineArgs,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::RunScenario {
            scenario,
            seed,
            save_replay: save_path,
            engine,
        } => {
            run_scenario(scenario, seed, save_path.as_deref(), &engine)?;
        }
        Commands::Replay { input, engine } => {
            run_replay(&input, &engine)?;
        }
        Commands::Count { input, engine } => {
            run_count(&input, &engine)?;
        }
    }

    Ok(())
}

/// Base configuration (file, else `fallback`) with CLI overrides applied.
fn resolve_config(args: &EngineArgs, fallback: EngineConfig) -> Result<EngineConfig> {
    let mut config = match &args.config {
        Some(path) => load_engine_config(path)?,
        None => fallback,
    };
    if let Some(max_tracking) = args.max_tracking {
        config.max_tracking = max_tracking;
    }
    if let Some(distance) = args.match_distance {
        config.match_distance_threshold = distance;
    }
    Ok(config)
}

/// Feed every frame through a fresh engine, report, and optionally write JSON.
fn count_frames(
    label: &str,
    config: EngineConfig,
    frames: &[DetectionFrame],
    ground_truth: &[LineGroundTruth],
    args: &EngineArgs,
) -> Result<()> {
    let mut engine = TrackingEngine::new(config)?;
    let mut printer = SpeedPrinter::default();
    let start = std::time::Instant::now();

    for frame in frames {
        if args.print_speeds {
            engine.process_frame_into(&frame.detections, frame.fps, &mut printer);
        } else {
            engine.process_frame(&frame.detections, frame.fps);
        }
    }

    let elapsed = start.elapsed();
    info!(
        frames = frames.len(),
        speeds_printed = printer.printed,
        elapsed_ms = elapsed.as_millis() as u64,
        "counting finished"
    );
    println!(
        "Done: '{}' {} frames, elapsed={:.3}s",
        label,
        engine.frame_counter(),
        elapsed.as_secs_f64()
    );

    let stats = engine.stats();
    println!("{}", format_report(&stats));

    let metrics = (!ground_truth.is_empty())
        .then(|| CountingMetrics::evaluate(&stats.lines, ground_truth));
    if let Some(m) = &metrics {
        println!("{}", format_metrics(m));
    }

    if let Some(opath) = &args.output {
        let json = serde_json::json!({
            "source": label,
            "elapsed_s": elapsed.as_secs_f64(),
            "stats": stats,
            "metrics": metrics,
        });
        std::fs::write(opath, serde_json::to_string_pretty(&json)?)?;
        println!("Statistics saved to {}", opath.display());
    }

    Ok(())
}

/// Build a scenario whose ground truth is tallied on the lines that will
/// actually be counted: `--config` and the overrides replace the scenario's
/// own engine before simulation.
fn prepare_scenario(kind: ScenarioKind, seed: u64, args: &EngineArgs) -> Result<Scenario> {
    let mut scenario = Scenario::build(kind, seed);
    scenario.engine = resolve_config(args, scenario.engine.clone())?;
    Ok(scenario)
}

fn run_scenario(
    kind: ScenarioKind,
    seed: u64,
    replay_path: Option<&Path>,
    args: &EngineArgs,
) -> Result<()> {
    let mut scenario = prepare_scenario(kind, seed, args)?;
    println!(
        "Running scenario '{}' (seed={}, duration={:.0}s, {} vehicles)...",
        scenario.name,
        seed,
        scenario.duration,
        scenario.vehicles.len()
    );

    let run = sim::simulate(&mut scenario);
    let config = scenario.engine.clone();

    // Save replay if requested
    if let Some(rpath) = replay_path {
        let log = ReplayLog {
            scenario_name: scenario.name.clone(),
            seed,
            engine: config.clone(),
            frames: run.frames.clone(),
            ground_truth: run.ground_truth.clone(),
        };
        save_replay(&log, rpath)?;
        println!("Replay saved to {}", rpath.display());
    }

    count_frames(&scenario.name, config, &run.frames, &run.ground_truth, args)
}

fn run_replay(input: &Path, args: &EngineArgs) -> Result<()> {
    let log = load_replay(input)?;
    println!(
        "Replaying '{}' ({} frames)...",
        log.scenario_name,
        log.frames.len()
    );
    let config = resolve_config(args, log.engine.clone())?;
    count_frames(&log.scenario_name, config, &log.frames, &log.ground_truth, args)
}

fn run_count(input: &Path, args: &EngineArgs) -> Result<()> {
    let frames = load_detections(input)?;
    let config = resolve_config(args, EngineConfig::default())?;
    let label = input.display().to_string();
    count_frames(&label, config, &frames, &[], args)
}
