//! Run-directory layout and artifact IO.
//!
//! Each run writes two index-aligned arrays under a directory whose name
//! encodes the full configuration, so re-runs with different parameters stay
//! distinguishable: `eval_poses_{robot}_n{N}_t{T}_i{I}/poses.json` (4×4
//! row-major homogeneous matrices) and `reachable_by_ik.json` (booleans).

use anyhow::{anyhow, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use reacheval::pose::{mat4_to_pose, pose_to_mat4, Mat4, Pose};

pub const POSES_FILE: &str = "poses.json";
pub const VERDICTS_FILE: &str = "reachable_by_ik.json";

/// Canonical run directory for a configuration.
pub fn run_dir(
    root: &Path,
    robot_name: &str,
    num_samples: usize,
    threshold: f64,
    iterations: u32,
) -> PathBuf {
    root.join(format!(
        "eval_poses_{robot_name}_n{num_samples}_t{threshold}_i{iterations}"
    ))
}

pub fn write_poses(path: &Path, poses: &[Pose]) -> Result<()> {
    let mats: Vec<Mat4> = poses.iter().map(pose_to_mat4).collect();
    write_json(path, &mats)
}

pub fn read_poses(path: &Path) -> Result<Vec<Pose>> {
    let mats: Vec<Mat4> = read_json(path)?;
    mats.iter()
        .enumerate()
        .map(|(i, m)| {
            mat4_to_pose(m).ok_or_else(|| {
                anyhow!("pose {i} in {} is not a rigid transform", path.display())
            })
        })
        .collect()
}

pub fn write_verdicts(path: &Path, verdicts: &[bool]) -> Result<()> {
    write_json(path, &verdicts)
}

pub fn read_verdicts(path: &Path) -> Result<Vec<bool>> {
    read_json(path)
}

fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
    }
    let bytes = serde_json::to_vec(value)?;
    fs::write(path, bytes).with_context(|| format!("writing {}", path.display()))
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_slice(&bytes).with_context(|| format!("parsing {}", path.display()))
}
