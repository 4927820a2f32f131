//! Quick reachable-fraction probe for the UR5 preset.
//!
//! Purpose
//! - Provide a reproducible, code-backed data point for "what share of the
//!   UR5's evaluation cylinder does IK reach with a small trial budget?"
//! - Exercise the whole pipeline (sample → evaluate → teardown) in one
//!   place, with timings, without touching the filesystem.

use std::time::Instant;

use reacheval::eval::{evaluate, IkCfg, RobotModel, Simulator};
use reacheval::robots::{ur5, KinematicSim};
use reacheval::sampler::{sample_poses, Cylinder};
use reacheval::seed::{derive, Stream};

fn main() {
    let seed = 27;
    let n_samples = 50;
    let mut robot = ur5();
    let volume = Cylinder::new(robot.range_radius(), robot.range_z());

    let sample_start = Instant::now();
    let poses = sample_poses(volume, n_samples, seed);
    let sample_elapsed = sample_start.elapsed().as_secs_f64() * 1e3;

    let cfg = IkCfg {
        threshold: 25.0,
        trials: 10,
        seed: derive(seed, Stream::IkRestarts),
    };
    let mut sim = KinematicSim::new();
    let eval_start = Instant::now();
    let verdicts = evaluate(&poses, &sim, &mut robot, &cfg).expect("solver stays healthy");
    let eval_elapsed = eval_start.elapsed().as_secs_f64() * 1e3;
    sim.disconnect();

    let reachable = verdicts.iter().filter(|v| **v).count();
    println!(
        "cylinder radius={} height={} samples={}",
        volume.radius, volume.height, n_samples
    );
    println!(
        "reachable={reachable} fraction={:.3}",
        reachable as f64 / n_samples as f64
    );
    println!("sample_time_ms={sample_elapsed:.3}");
    println!("eval_time_ms={eval_elapsed:.3}");
}
