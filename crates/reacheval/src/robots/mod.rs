//! Reference robot models and the in-process scene.
//!
//! Purpose
//! - Provide `RobotModel` implementations so the evaluation pipeline runs
//!   end-to-end without an external physics process: a revolute serial
//!   chain with forward kinematics and randomized-restart IK, plus presets
//!   for the supported robot types.
//! - `KinematicSim` stands in for the scene collaborator: it owns the pose
//!   conversions and the one-shot teardown the run performs at the end.

mod chain;
mod franka;
mod ur5;

pub use chain::{Joint, SerialChain};
pub use franka::{franka, FrankaVariant};
pub use ur5::ur5;

use nalgebra::{Point3, UnitQuaternion};

use crate::eval::Simulator;
use crate::pose::{split_pose, Pose};

/// In-process scene. Pose conversions are pure; `disconnect` only flips the
/// connected flag, mirroring the teardown contract of an external scene.
pub struct KinematicSim {
    connected: bool,
}

impl KinematicSim {
    pub fn new() -> Self {
        Self { connected: true }
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }
}

impl Default for KinematicSim {
    fn default() -> Self {
        Self::new()
    }
}

impl Simulator for KinematicSim {
    fn split_pose(&self, pose: &Pose) -> (Point3<f64>, UnitQuaternion<f64>) {
        split_pose(pose)
    }

    fn disconnect(&mut self) {
        self.connected = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disconnect_tears_down_once() {
        let mut sim = KinematicSim::new();
        assert!(sim.is_connected());
        sim.disconnect();
        assert!(!sim.is_connected());
    }

    #[test]
    fn split_pose_passes_through() {
        let sim = KinematicSim::new();
        let pose = Pose::translation(0.1, 0.2, 0.3);
        let (p, q) = sim.split_pose(&pose);
        assert_eq!(p, Point3::new(0.1, 0.2, 0.3));
        assert!(q.angle() < 1e-12);
    }
}
