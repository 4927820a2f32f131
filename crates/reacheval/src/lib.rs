//! Empirical reachability evaluation for robot manipulators.
//!
//! Purpose
//! - Sample an unbiased set of end-effector poses over a cylindrical
//!   evaluation volume, then test each pose for reachability with a bounded
//!   inverse-kinematics search. The resulting verdict array is ground truth
//!   for benchmarking reachability models.
//!
//! Layout
//! - `pose`: the rigid-transform type plus matrix/quaternion conversions.
//! - `sampler`: deterministic cylinder pose sampler (Haar-uniform rotations,
//!   area-uniform disk positions).
//! - `eval`: solver capability traits and the per-pose verdict loop.
//! - `robots`: reference serial-chain models with randomized-restart IK.
//! - `seed`: sub-seed derivation so one run seed feeds independent streams.

pub mod eval;
pub mod pose;
pub mod robots;
pub mod sampler;
pub mod seed;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::eval::{
        evaluate, evaluate_with_observer, EvalError, IkCfg, IkError, JointVec, RobotModel,
        Simulator,
    };
    pub use crate::pose::{mat4_to_pose, pose_to_mat4, split_pose, Mat4, Pose};
    pub use crate::robots::{franka, ur5, FrankaVariant, KinematicSim, SerialChain};
    pub use crate::sampler::{sample_poses, Cylinder};
    pub use crate::seed::{derive, Stream};
}
