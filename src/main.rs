//! AlgoViz - Stepwise sorting and searching visualizer
//!
//! Main entry point for the terminal front-end.
//!
//! # Overview
//!
//! The binary initializes:
//! - Configuration loading ([`ConfigManager`], `algoviz.yaml` plus `ALGOVIZ__*` overrides)
//! - Logging infrastructure (file rotation + optional stderr output)
//! - Tokio async runtime
//! - The [`Engine`], wired to a [`TerminalRenderer`] that prints one line per step
//!
//! # Controls
//!
//! While a run is active, lines typed on stdin steer it:
//! - empty line: advance one step (manual mode)
//! - `t`: toggle between manual and timed mode
//! - `+` / `-`: raise or lower the speed by 10
//! - `q`: stop the run
//!
//! Ctrl-C also stops the run.

use algoviz::engine::input;
use algoviz::ui::TerminalRenderer;
use algoviz::{APP_NAME, Algorithm, ConfigManager, Engine, RunReport, VERSION};
use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

/// Speed change applied by `+` and `-`
const SPEED_STEP: u32 = 10;

#[derive(Parser, Debug)]
#[command(name = "algoviz", version, about = "Step through sorting and searching algorithms")]
struct Args {
    /// Algorithm to run (bubble, insertion, selection, merge, quick, linear, binary)
    #[arg(short, long)]
    algorithm: Algorithm,

    /// Comma-separated values, e.g. "5,3,8,1"
    #[arg(long, conflicts_with = "random")]
    values: Option<String>,

    /// Generate this many random values
    #[arg(long)]
    random: Option<usize>,

    /// Value to search for
    #[arg(short, long)]
    target: Option<String>,

    /// Start in manual step mode
    #[arg(long)]
    step: bool,

    /// Raw speed, 1 (slowest) to 100 (fastest)
    #[arg(long)]
    speed: Option<u32>,

    /// Directory holding algoviz.yaml
    #[arg(long, default_value = ".")]
    config: String,

    /// Debug logging, mirrored to stderr
    #[arg(long)]
    debug: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config_manager = ConfigManager::new(&args.config)?;
    let mut settings = config_manager.load_user_config()?.visualizer;
    if let Some(speed) = args.speed {
        settings.speed = speed;
    }
    settings.step_mode |= args.step;
    settings.debug_mode |= args.debug;

    let _log_guard = algoviz::logging::setup_logging_with_console(
        &settings.log_dir,
        APP_NAME,
        settings.debug_mode,
        settings.debug_mode,
    )?;
    tracing::info!("Starting {} v{}", APP_NAME, VERSION);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .worker_threads(2)
        .thread_name("algoviz-worker")
        .build()
        .context("Failed to build tokio runtime")?;

    let engine = Engine::new(Arc::new(TerminalRenderer::stdout()), &settings);
    let result = runtime.block_on(run(&engine, &args));

    engine.metrics().log_summary();
    // A pending stdin read would hold up a graceful shutdown
    runtime.shutdown_background();
    tracing::info!("Shutdown complete");

    let report = result?;
    print_report(&report);
    Ok(())
}

async fn run(engine: &Engine, args: &Args) -> Result<RunReport> {
    let values = match (&args.values, args.random) {
        (Some(raw), _) => input::parse_values(raw)?,
        (None, len) => {
            let settings = engine.settings();
            let len = len.unwrap_or(settings.array_length);
            if args.algorithm == Algorithm::BinarySearch {
                input::random_sorted_values(len, settings.min_value, settings.max_value)?
            } else {
                input::random_values(len, settings.min_value, settings.max_value)?
            }
        }
    };

    engine
        .start_run(args.algorithm, values, args.target.as_deref())
        .await?;
    println!("{}", engine.status());

    let controls = tokio::spawn(handle_controls(engine.clone()));
    let report = engine.wait().await.context("Run task did not produce a report")?;
    controls.abort();

    Ok(report)
}

/// Read control lines from stdin until the run is stopped or stdin closes
async fn handle_controls(engine: Engine) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        let line = tokio::select! {
            line = lines.next_line() => line,
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Interrupted");
                engine.request_stop();
                return;
            }
        };

        let line = match line {
            Ok(Some(line)) => line,
            Ok(None) => return,
            Err(e) => {
                tracing::warn!("Failed to read stdin: {}", e);
                return;
            }
        };

        match line.trim() {
            "" => {
                engine.advance();
            }
            "t" => {
                let mode = engine.toggle_mode();
                eprintln!("mode: {:?}", mode);
            }
            "+" => {
                let raw = engine.state().speed.raw();
                let speed = engine.set_speed(raw.saturating_add(SPEED_STEP));
                eprintln!("speed: {} ({})", speed.raw(), speed.label());
            }
            "-" => {
                let raw = engine.state().speed.raw();
                let speed = engine.set_speed(raw.saturating_sub(SPEED_STEP));
                eprintln!("speed: {} ({})", speed.raw(), speed.label());
            }
            "q" => {
                engine.request_stop();
                return;
            }
            other => eprintln!("unknown command {:?} (enter, t, +, -, q)", other),
        }
    }
}

fn print_report(report: &RunReport) {
    println!(
        "{} {} after {} steps ({:.2}s)",
        report.algorithm,
        report.outcome,
        report.steps,
        report.elapsed.as_secs_f64()
    );
    if let Some(search) = &report.search {
        match search.bound {
            Some(bound) => println!(
                "position {} after {} comparisons (at most {} expected)",
                search.position(),
                search.comparisons,
                bound
            ),
            None => println!(
                "position {} after {} comparisons",
                search.position(),
                search.comparisons
            ),
        }
    }
    println!("final array: {:?}", report.final_array);
}
