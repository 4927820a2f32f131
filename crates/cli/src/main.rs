use anyhow::{anyhow, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::fmt::SubscriberBuilder;

use reacheval::eval::{evaluate_with_observer, IkCfg, RobotModel, Simulator};
use reacheval::robots::{franka, ur5, FrankaVariant, KinematicSim, SerialChain};
use reacheval::sampler::{sample_poses, Cylinder};
use reacheval::seed::{derive, Stream};

mod provenance;
mod store;

#[derive(Parser)]
#[command(name = "cli")]
#[command(about = "Reachability ground-truth runner")]
struct Cmd {
    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Sample poses, evaluate reachability by IK, write the result arrays
    Run(RunArgs),
    /// Summarize the verdict artifact of a finished run directory
    Report {
        #[arg(long)]
        dir: PathBuf,
    },
}

#[derive(Args)]
struct RunArgs {
    /// Robot type
    #[arg(short, long, value_enum, default_value = "franka")]
    robot_type: RobotType,
    /// Maximum number of samples
    #[arg(short, long, default_value_t = 100_000)]
    num_samples: usize,
    /// mm/deg aberration accepted for IK
    #[arg(short, long, default_value_t = 25.0)]
    threshold: f64,
    /// Number of trials for IK
    #[arg(short, long, default_value_t = 100)]
    iterations: u32,
    /// Range for franka joints 1 and 7 in degrees; only applies to franka
    #[arg(short, long, default_value_t = 166)]
    degrees: u32,
    /// Random seed
    #[arg(short, long, default_value_t = 27)]
    seed: u64,
    /// Output root for run directories
    #[arg(long, default_value = "data")]
    data_dir: PathBuf,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum RobotType {
    Franka,
    Ur5,
}

fn main() -> Result<()> {
    SubscriberBuilder::default().with_target(false).init();
    let cmd = Cmd::parse();
    match cmd.action {
        Action::Run(args) => run(args),
        Action::Report { dir } => report(dir),
    }
}

/// Resolve the configured robot, failing fast on an invalid variant before
/// any sampling or evaluation starts.
fn resolve_robot(robot_type: RobotType, degrees: u32) -> Result<(SerialChain, String)> {
    let variant = FrankaVariant::from_degrees(degrees).ok_or_else(|| {
        anyhow!("unsupported franka joint range: {degrees} degrees (expected 150, 160 or 166)")
    })?;
    Ok(match robot_type {
        RobotType::Franka => (franka(variant), format!("franka{}", variant.degrees())),
        RobotType::Ur5 => (ur5(), "ur5".to_string()),
    })
}

fn run(args: RunArgs) -> Result<()> {
    let (mut robot, robot_name) = resolve_robot(args.robot_type, args.degrees)?;
    let run_dir = store::run_dir(
        &args.data_dir,
        &robot_name,
        args.num_samples,
        args.threshold,
        args.iterations,
    );
    fs::create_dir_all(&run_dir)
        .with_context(|| format!("creating run dir {}", run_dir.display()))?;

    let params = serde_json::json!({
        "robot_type": robot_name,
        "num_samples": args.num_samples,
        "threshold": args.threshold,
        "iterations": args.iterations,
        "seed": args.seed,
    });

    let volume = Cylinder::new(robot.range_radius(), robot.range_z());
    tracing::info!(
        robot = %robot_name,
        radius = volume.radius,
        height = volume.height,
        n = args.num_samples,
        seed = args.seed,
        "sampling poses"
    );
    let poses = sample_poses(volume, args.num_samples, args.seed);
    let poses_path = run_dir.join(store::POSES_FILE);
    store::write_poses(&poses_path, &poses)?;
    provenance::write_sidecar(&poses_path, provenance::Payload::new(params.clone()))?;

    let cfg = IkCfg {
        threshold: args.threshold,
        trials: args.iterations,
        seed: derive(args.seed, Stream::IkRestarts),
    };
    let mut sim = KinematicSim::new();
    let total = poses.len();
    let step = (total / 20).max(1);
    let verdicts = evaluate_with_observer(&poses, &sim, &mut robot, &cfg, |index, _| {
        if (index + 1) % step == 0 {
            tracing::info!(done = index + 1, total, "ik progress");
        }
    })?;
    sim.disconnect();

    let verdicts_path = run_dir.join(store::VERDICTS_FILE);
    store::write_verdicts(&verdicts_path, &verdicts)?;
    provenance::write_sidecar(&verdicts_path, provenance::Payload::new(params))?;

    let reachable = verdicts.iter().filter(|v| **v).count();
    let denom = total.max(1) as f64;
    tracing::info!(
        poses = %poses_path.display(),
        verdicts = %verdicts_path.display(),
        reachable_pct = 100.0 * reachable as f64 / denom,
        unreachable_pct = 100.0 * (total - reachable) as f64 / denom,
        "completed"
    );
    Ok(())
}

#[derive(serde::Serialize)]
struct RunSummary {
    count: usize,
    reachable: usize,
    fraction: f64,
}

fn report(dir: PathBuf) -> Result<()> {
    let verdicts = store::read_verdicts(&dir.join(store::VERDICTS_FILE))?;
    let reachable = verdicts.iter().filter(|v| **v).count();
    let summary = RunSummary {
        count: verdicts.len(),
        reachable,
        fraction: reachable as f64 / verdicts.len().max(1) as f64,
    };
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
