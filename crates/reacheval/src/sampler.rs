//! Unbiased end-effector poses over a cylindrical evaluation volume.
//!
//! Model
//! - Orientations are Haar-uniform on SO(3): a unit quaternion built from
//!   three uniforms (subgroup algorithm). Sampling three Euler angles
//!   independently would over-weight orientations near the poles, so it is
//!   deliberately avoided.
//! - Positions are area-uniform on the disk: `r = R·√u` with `u ~ U(0,1)`
//!   (plain `R·u` would crowd samples toward the axis), angle `θ ~ U(0,2π)`,
//!   and height `z ~ U(0,h)` drawn independently. The height draw does not
//!   rescale with z; the cylinder's cross-section is constant, so the
//!   combined law is nevertheless uniform over the solid volume. Keep both
//!   halves as-is: changing either silently changes the sampling law.
//! - Determinism uses the run seed via `seed::Stream::PoseSampling`; equal
//!   inputs reproduce bit-identical pose sets.

use std::f64::consts::PI;

use nalgebra::{Quaternion, Translation3, UnitQuaternion};
use rand::rngs::StdRng;
use rand::Rng;

use crate::pose::Pose;
use crate::seed::{rng_for, Stream};

/// Cylindrical evaluation volume: base at z = 0, axis through the robot
/// origin. Negative inputs are clamped to zero.
#[derive(Clone, Copy, Debug)]
pub struct Cylinder {
    pub radius: f64,
    pub height: f64,
}

impl Cylinder {
    pub fn new(radius: f64, height: f64) -> Self {
        Self {
            radius: radius.max(0.0),
            height: height.max(0.0),
        }
    }

    /// Containment with slack for boundary samples.
    pub fn contains_eps(&self, x: f64, y: f64, z: f64, eps: f64) -> bool {
        (x * x + y * y).sqrt() <= self.radius + eps && z >= -eps && z <= self.height + eps
    }
}

/// Draw `n_samples` poses for `volume`, reproducibly for a given run seed.
pub fn sample_poses(volume: Cylinder, n_samples: usize, seed: u64) -> Vec<Pose> {
    let mut rng = rng_for(seed, Stream::PoseSampling);
    (0..n_samples).map(|_| sample_pose(volume, &mut rng)).collect()
}

fn sample_pose(volume: Cylinder, rng: &mut StdRng) -> Pose {
    let rotation = haar_rotation(rng);
    let r = volume.radius * rng.gen::<f64>().sqrt();
    let theta = rng.gen::<f64>() * 2.0 * PI;
    let z = rng.gen::<f64>() * volume.height;
    let translation = Translation3::new(r * theta.cos(), r * theta.sin(), z);
    Pose::from_parts(translation, rotation)
}

/// Haar-uniform random rotation (Shoemake's uniform unit quaternion).
pub fn haar_rotation<R: Rng>(rng: &mut R) -> UnitQuaternion<f64> {
    let u1: f64 = rng.gen();
    let t2 = rng.gen::<f64>() * 2.0 * PI;
    let t3 = rng.gen::<f64>() * 2.0 * PI;
    let s1 = (1.0 - u1).sqrt();
    let s2 = u1.sqrt();
    UnitQuaternion::new_normalize(Quaternion::new(
        s2 * t3.cos(),
        s1 * t2.sin(),
        s1 * t2.cos(),
        s2 * t3.sin(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::{Matrix3, Vector3};
    use proptest::prelude::*;
    use rand::SeedableRng;

    const N_STAT: usize = 100_000;

    #[test]
    fn exact_count_and_bounds() {
        let volume = Cylinder::new(0.8, 1.2);
        let poses = sample_poses(volume, 1000, 27);
        assert_eq!(poses.len(), 1000);
        for pose in &poses {
            let p = pose.translation.vector;
            assert!(volume.contains_eps(p.x, p.y, p.z, 1e-9));
        }
    }

    #[test]
    fn rotations_are_orthonormal_with_det_one() {
        for pose in sample_poses(Cylinder::new(1.0, 1.0), 200, 3) {
            let r: Matrix3<f64> = *pose.rotation.to_rotation_matrix().matrix();
            let gram = r.transpose() * r - Matrix3::identity();
            assert!(gram.abs().max() < 1e-6);
            assert!((r.determinant() - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn sampling_is_deterministic() {
        let a = sample_poses(Cylinder::new(0.8, 1.2), 64, 27);
        let b = sample_poses(Cylinder::new(0.8, 1.2), 64, 27);
        for (x, y) in a.iter().zip(&b) {
            assert_eq!(x.translation.vector, y.translation.vector);
            assert_eq!(x.rotation.coords, y.rotation.coords);
        }
        let c = sample_poses(Cylinder::new(0.8, 1.2), 64, 28);
        assert_ne!(a[0].translation.vector, c[0].translation.vector);
    }

    #[test]
    fn radius_law_is_area_uniform() {
        // For area-uniform disk samples, (r/R)² is U(0,1): mean 1/2, and half
        // the samples land inside r = R/√2.
        let poses = sample_poses(Cylinder::new(1.0, 1.0), N_STAT, 11);
        let mut mean_r2 = 0.0;
        let mut inner = 0usize;
        for pose in &poses {
            let p = pose.translation.vector;
            let r2 = p.x * p.x + p.y * p.y;
            mean_r2 += r2;
            if r2.sqrt() <= std::f64::consts::FRAC_1_SQRT_2 {
                inner += 1;
            }
        }
        mean_r2 /= N_STAT as f64;
        let inner_frac = inner as f64 / N_STAT as f64;
        assert!((mean_r2 - 0.5).abs() < 0.01, "mean r² = {mean_r2}");
        assert!((inner_frac - 0.5).abs() < 0.015, "inner fraction = {inner_frac}");
    }

    #[test]
    fn height_is_uniform() {
        let height = 1.2;
        let poses = sample_poses(Cylinder::new(1.0, height), N_STAT, 5);
        let mean_z: f64 = poses.iter().map(|p| p.translation.vector.z).sum::<f64>() / N_STAT as f64;
        assert!((mean_z - height / 2.0).abs() < 0.01, "mean z = {mean_z}");
    }

    #[test]
    fn rotations_have_no_preferred_axis() {
        // Push a fixed body axis through the sampled rotations: the images
        // must cover the sphere with no drift and hit every octant.
        let mut rng = rand::rngs::StdRng::seed_from_u64(99);
        let mut mean = Vector3::zeros();
        let mut octants = [0usize; 8];
        for _ in 0..N_STAT {
            let d = haar_rotation(&mut rng) * Vector3::x();
            mean += d;
            let idx = (d.x > 0.0) as usize | ((d.y > 0.0) as usize) << 1 | ((d.z > 0.0) as usize) << 2;
            octants[idx] += 1;
        }
        mean /= N_STAT as f64;
        assert!(mean.norm() < 0.02, "mean direction = {mean}");
        for (idx, count) in octants.iter().enumerate() {
            assert!(*count > N_STAT / 16, "octant {idx} underfilled: {count}");
        }
    }

    #[test]
    fn degenerate_volumes_collapse_coordinates() {
        for pose in sample_poses(Cylinder::new(0.0, 1.0), 32, 1) {
            let p = pose.translation.vector;
            assert_eq!((p.x, p.y), (0.0, 0.0));
        }
        for pose in sample_poses(Cylinder::new(1.0, 0.0), 32, 1) {
            assert_eq!(pose.translation.vector.z, 0.0);
        }
    }

    #[test]
    fn zero_samples_is_empty() {
        assert!(sample_poses(Cylinder::new(0.8, 1.2), 0, 27).is_empty());
    }

    proptest! {
        #[test]
        fn any_volume_keeps_samples_in_bounds(
            radius in 0.0..10.0f64,
            height in 0.0..5.0f64,
            n in 0usize..50,
            seed in any::<u64>(),
        ) {
            let volume = Cylinder::new(radius, height);
            let poses = sample_poses(volume, n, seed);
            prop_assert_eq!(poses.len(), n);
            for pose in &poses {
                let p = pose.translation.vector;
                prop_assert!(volume.contains_eps(p.x, p.y, p.z, 1e-9));
            }
        }
    }
}
