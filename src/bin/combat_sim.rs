use clap::Parser;
use raidsim_rs::config::{EffectRegistry, SimSpec, build_simulation};
use raidsim_rs::error::SimError;
use raidsim_rs::log::CombatEvent;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "combat-sim", about = "Run a combat simulation described by a JSON spec")]
struct Args {
    /// Path to the simulation spec (JSON)
    #[arg(long)]
    config: PathBuf,

    /// Override number of iterations
    #[arg(long)]
    iterations: Option<u64>,

    /// Override base seed (iteration i uses seed + i)
    #[arg(long)]
    seed: Option<u64>,

    /// Override encounter duration (seconds)
    #[arg(long)]
    duration_secs: Option<f64>,

    /// Write per-iteration reports and the summary as JSON
    #[arg(long)]
    report_json: Option<PathBuf>,

    /// Write the combat log of the first iteration as JSON
    #[arg(long)]
    log_json: Option<PathBuf>,

    /// Do not print the summary to stdout
    #[arg(long)]
    quiet: bool,
}

#[derive(Serialize)]
struct CombatLogFile<'a> {
    seed: u64,
    events: &'a [CombatEvent],
}

fn write_json(path: &Path, value: &impl Serialize) -> Result<(), SimError> {
    let raw = serde_json::to_string_pretty(value)?;
    fs::write(path, raw).map_err(|source| SimError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn run(args: Args) -> Result<(), SimError> {
    let mut spec = SimSpec::load(&args.config)?;
    if let Some(seed) = args.seed {
        spec.seed = Some(seed);
    }
    if let Some(secs) = args.duration_secs {
        spec.encounter.duration_secs = secs;
    }
    let iterations = args.iterations.or(spec.iterations).unwrap_or(1);

    let registry = EffectRegistry::with_defaults();
    let mut simulation = build_simulation(&spec, &registry)?;

    if let Some(path) = &args.log_json {
        simulation.set_logging(true);
        simulation.run_iteration(0);
        let events = simulation.take_log();
        simulation.set_logging(false);
        write_json(
            path,
            &CombatLogFile {
                seed: simulation.base_seed(),
                events: &events,
            },
        )?;
        tracing::info!(path = %path.display(), events = events.len(), "战斗日志已写出");
    }

    let result = simulation.run(iterations);

    if let Some(path) = &args.report_json {
        write_json(path, &result)?;
        tracing::info!(path = %path.display(), "报告已写出");
    }

    if !args.quiet {
        println!("iterations: {}", result.summary.iterations);
        for u in &result.summary.units {
            println!(
                "{}: dps mean={:.2} stdev={:.2} min={:.2} max={:.2}",
                u.label, u.mean, u.stdev, u.min, u.max
            );
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_file(true)
        .with_line_number(true)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
