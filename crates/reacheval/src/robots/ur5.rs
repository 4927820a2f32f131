//! UR5 preset: 6-DOF arm in standard-DH form.

use std::f64::consts::{FRAC_PI_2, PI};

use nalgebra::Isometry3;

use super::chain::{standard_dh, Joint, SerialChain};

/// Build the UR5 chain.
pub fn ur5() -> SerialChain {
    let tau = 2.0 * PI;
    // (d_i, a_i, alpha_i, limits); the trailing part of row i sits ahead of
    // joint i+1, the last one becomes the tool transform.
    let rows = [
        (0.089159, 0.0, FRAC_PI_2, (-tau, tau)),
        (0.0, -0.425, 0.0, (-tau, tau)),
        (0.0, -0.39225, 0.0, (-PI, PI)),
        (0.10915, 0.0, FRAC_PI_2, (-tau, tau)),
        (0.09465, 0.0, -FRAC_PI_2, (-tau, tau)),
        (0.0823, 0.0, 0.0, (-tau, tau)),
    ];
    let mut joints = Vec::with_capacity(rows.len());
    let mut pre = Isometry3::identity();
    for &(d, a, alpha, limits) in &rows {
        joints.push(Joint::about_z(pre, limits));
        pre = standard_dh(d, a, alpha);
    }
    SerialChain::new(joints, pre, 0.85, 1.0)
}
