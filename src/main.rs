//! Command-line front end: builds a demo arena, runs the decision loop,
//! and optionally streams every substep to a CSV trace.

use std::error::Error;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Parser, ValueEnum};
use tracing::info;

use odortaxis::config::ControllerConfig;
use odortaxis::control::strategy::{GradientClimber, SteeringCommand, SteeringController};
use odortaxis::control::BilateralController;
use odortaxis::params::{CLIMBER_SPEED_FLOOR, SENSOR_NOISE, VISION_GAIN};
use odortaxis::runner::{NullSink, RunReport, Runner, TraceSample, TraceSink};
use odortaxis::sim::{Arena, Walker};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Strategy {
    /// Bilateral multi-channel fusion with the saturating drive mapping.
    Bilateral,
    /// Single-scalar stochastic gradient climber.
    Gradient,
}

#[derive(Debug, Parser)]
#[command(name = "odortaxis", about = "Bilateral odor/vision taxis simulation")]
struct Args {
    /// JSON controller configuration; defaults are used when omitted.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Steering strategy to run.
    #[arg(long, value_enum, default_value_t = Strategy::Bilateral)]
    strategy: Strategy,
    /// Overrides the configured random seed.
    #[arg(long)]
    seed: Option<u64>,
    /// Writes the per-substep observation stream to this CSV file.
    #[arg(long)]
    trace: Option<PathBuf>,
    /// Uses the obstacle arena and enables the vision channel.
    #[arg(long)]
    vision: bool,
    /// Adds uniform receptor noise.
    #[arg(long)]
    noise: bool,
    /// Paces decision ticks against the wall clock (20 Hz).
    #[arg(long)]
    realtime: bool,
}

/// Streams trace samples as CSV rows.
struct CsvSink {
    writer: BufWriter<File>,
}

impl CsvSink {
    fn create(path: &Path) -> std::io::Result<Self> {
        let mut writer = BufWriter::new(File::create(path)?);
        writeln!(
            writer,
            "tick,substep,bias,delta_left,delta_right,heading,speed,x,y"
        )?;
        Ok(Self { writer })
    }
}

impl TraceSink for CsvSink {
    fn record(&mut self, sample: &TraceSample) {
        let row = match sample.command {
            SteeringCommand::Differential(cmd) => format!(
                "{},{},{},{},{},,,{},{}",
                sample.tick,
                sample.substep,
                sample.bias,
                cmd.left,
                cmd.right,
                sample.position.x,
                sample.position.y
            ),
            SteeringCommand::Heading { heading, speed } => format!(
                "{},{},{},,,{},{},{},{}",
                sample.tick,
                sample.substep,
                sample.bias,
                heading,
                speed,
                sample.position.x,
                sample.position.y
            ),
        };
        // Trace output is best-effort; a full disk should not kill the run.
        let _ = writeln!(self.writer, "{row}");
    }
}

fn execute<C: SteeringController>(
    runner: &mut Runner,
    walker: &mut Walker,
    controller: &mut C,
    trace: Option<&Path>,
) -> Result<RunReport, Box<dyn Error>> {
    let report = match trace {
        Some(path) => {
            let mut sink = CsvSink::create(path)?;
            runner.run(walker, controller, &mut sink)?
        }
        None => runner.run(walker, controller, &mut NullSink)?,
    };
    Ok(report)
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let mut config: ControllerConfig = match &args.config {
        Some(path) => serde_json::from_reader(File::open(path)?)?,
        None => ControllerConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.random_seed = seed;
    }

    let mut arena = if args.vision {
        Arena::demo_with_obstacles()
    } else {
        Arena::demo()
    };
    if args.vision && args.config.is_none() {
        // The obstacle arena carries a single odor channel.
        config.channels.truncate(1);
        config.vision_gain = Some(VISION_GAIN);
        config.targets = arena.attractive_targets();
    }
    if args.noise {
        arena = arena.with_noise(SENSOR_NOISE, config.random_seed);
    }

    let timestep = config.physics_timestep;
    let seed = config.random_seed;
    let mut walker = Walker::new(arena, timestep, args.vision);

    let mut runner = Runner::new(config)?;
    if args.realtime {
        runner = runner.with_pacer(Duration::from_millis(50));
    }

    info!(strategy = ?args.strategy, "starting run");
    let report = match args.strategy {
        Strategy::Bilateral => {
            let mut controller = BilateralController::new(runner.config().clone());
            execute(
                &mut runner,
                &mut walker,
                &mut controller,
                args.trace.as_deref(),
            )?
        }
        Strategy::Gradient => {
            let mut controller = GradientClimber::new(seed, CLIMBER_SPEED_FLOOR);
            execute(
                &mut runner,
                &mut walker,
                &mut controller,
                args.trace.as_deref(),
            )?
        }
    };

    info!(
        outcome = %report.outcome,
        ticks = report.ticks,
        substeps = report.substeps,
        x = report.final_position.x,
        y = report.final_position.y,
        "run finished"
    );
    Ok(())
}
