//! Reachability verdicts from an external IK search.
//!
//! Purpose
//! - Treat the scene and the robot's IK as black-box capabilities and reduce
//!   each sampled pose to a boolean verdict, aligned by index with the pose
//!   set.
//! - "No solution within the trial budget" is an expected outcome and maps
//!   to `false`; a hard solver failure aborts the run with the offending
//!   pose index attached.
//!
//! The evaluator holds no cross-call state, never retries beyond the
//! solver's own budget, and processes poses sequentially: the scene is
//! exclusively owned by the run and is not safe for concurrent use.

use std::fmt;

use nalgebra::{Point3, UnitQuaternion};

use crate::pose::Pose;

/// Joint configuration returned by a solver.
pub type JointVec = Vec<f64>;

/// IK acceptance policy. The scalar threshold bounds both error terms: it is
/// read as millimetres of position error and degrees of orientation error,
/// and a trial only counts as solved when both are within it.
#[derive(Clone, Copy, Debug)]
pub struct IkCfg {
    pub threshold: f64,
    /// Randomized restarts the solver may spend per pose. Zero trials is
    /// automatic failure.
    pub trials: u32,
    /// Restart seed, passed through to the solver on every call so each
    /// pose sees the same restart sequence.
    pub seed: u64,
}

impl Default for IkCfg {
    fn default() -> Self {
        Self {
            threshold: 25.0,
            trials: 100,
            seed: 27,
        }
    }
}

/// Hard solver failures, distinct from "no solution found".
#[derive(Debug)]
pub enum IkError {
    /// Target position or orientation contains NaN/inf.
    NonFiniteTarget,
    /// The underlying solver crashed or rejected the call outright.
    Solver { reason: String },
}

impl fmt::Display for IkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonFiniteTarget => write!(f, "target pose has non-finite components"),
            Self::Solver { reason } => write!(f, "solver failure: {reason}"),
        }
    }
}

impl std::error::Error for IkError {}

/// Scene collaborator: owns pose conversions and the run's teardown.
///
/// The scene is exclusively owned by the current run; `disconnect` is called
/// once after all evaluations complete.
pub trait Simulator {
    fn split_pose(&self, pose: &Pose) -> (Point3<f64>, UnitQuaternion<f64>);
    fn disconnect(&mut self);
}

/// Robot collaborator: evaluation-cylinder extents plus the IK search.
pub trait RobotModel {
    /// Radius of the evaluation cylinder enclosing the workspace.
    fn range_radius(&self) -> f64;
    /// Height of the evaluation cylinder.
    fn range_z(&self) -> f64;
    /// Search for a joint configuration reaching the target.
    ///
    /// `Ok(None)` means no solution within the trial budget and threshold —
    /// an expected outcome. `Err` is a hard failure and fatal for the run.
    /// Solvers may mutate internal scene state between calls; callers must
    /// not rely on it being restored.
    fn inverse_kinematics(
        &mut self,
        position: Point3<f64>,
        orientation: UnitQuaternion<f64>,
        cfg: &IkCfg,
    ) -> Result<Option<JointVec>, IkError>;
}

/// Errors that abort an evaluation run.
#[derive(Debug)]
pub enum EvalError {
    Solver { index: usize, source: IkError },
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Solver { index, source } => {
                write!(f, "ik solver failed hard at pose {index}: {source}")
            }
        }
    }
}

impl std::error::Error for EvalError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Solver { source, .. } => Some(source),
        }
    }
}

/// Classify every pose as reachable or not. The verdict vector has the same
/// length and order as `poses`.
pub fn evaluate<S, M>(
    poses: &[Pose],
    sim: &S,
    robot: &mut M,
    cfg: &IkCfg,
) -> Result<Vec<bool>, EvalError>
where
    S: Simulator,
    M: RobotModel,
{
    evaluate_with_observer(poses, sim, robot, cfg, |_, _| {})
}

/// Like [`evaluate`], reporting `(index, verdict)` after each pose. The
/// observer is observability only; it cannot alter verdicts.
pub fn evaluate_with_observer<S, M>(
    poses: &[Pose],
    sim: &S,
    robot: &mut M,
    cfg: &IkCfg,
    mut observer: impl FnMut(usize, bool),
) -> Result<Vec<bool>, EvalError>
where
    S: Simulator,
    M: RobotModel,
{
    let mut verdicts = Vec::with_capacity(poses.len());
    for (index, pose) in poses.iter().enumerate() {
        let (position, orientation) = sim.split_pose(pose);
        let solution = robot
            .inverse_kinematics(position, orientation, cfg)
            .map_err(|source| EvalError::Solver { index, source })?;
        let reachable = solution.is_some();
        observer(index, reachable);
        verdicts.push(reachable);
    }
    Ok(verdicts)
}
