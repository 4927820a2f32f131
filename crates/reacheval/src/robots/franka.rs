//! Franka preset: 7-DOF arm in modified-DH form, with selectable joint-1/7
//! range variants (the vendor shipped 150°, 160° and 166° firmware limits).

use std::f64::consts::FRAC_PI_2;

use nalgebra::Isometry3;

use super::chain::{modified_dh, Joint, SerialChain};

/// Joint-1/7 range variant, in degrees.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrankaVariant {
    Deg150,
    Deg160,
    Deg166,
}

impl FrankaVariant {
    /// Resolve a degree count; unknown values are a configuration error the
    /// caller must surface before any sampling starts.
    pub fn from_degrees(degrees: u32) -> Option<Self> {
        match degrees {
            150 => Some(Self::Deg150),
            160 => Some(Self::Deg160),
            166 => Some(Self::Deg166),
            _ => None,
        }
    }

    pub fn degrees(self) -> u32 {
        match self {
            Self::Deg150 => 150,
            Self::Deg160 => 160,
            Self::Deg166 => 166,
        }
    }

    fn limit(self) -> f64 {
        f64::from(self.degrees()).to_radians()
    }
}

impl Default for FrankaVariant {
    fn default() -> Self {
        Self::Deg166
    }
}

/// Build the Franka chain for the given joint-range variant.
pub fn franka(variant: FrankaVariant) -> SerialChain {
    let q17 = variant.limit();
    // (alpha_{i-1}, a_{i-1}, d_i, limits)
    let rows = [
        (0.0, 0.0, 0.333, (-q17, q17)),
        (-FRAC_PI_2, 0.0, 0.0, (-1.7628, 1.7628)),
        (FRAC_PI_2, 0.0, 0.316, (-2.8973, 2.8973)),
        (FRAC_PI_2, 0.0825, 0.0, (-3.0718, -0.0698)),
        (-FRAC_PI_2, -0.0825, 0.384, (-2.8973, 2.8973)),
        (FRAC_PI_2, 0.0, 0.0, (-0.0175, 3.7525)),
        (FRAC_PI_2, 0.088, 0.0, (-q17, q17)),
    ];
    let joints = rows
        .iter()
        .map(|&(alpha, a, d, limits)| Joint::about_z(modified_dh(alpha, a, d), limits))
        .collect();
    let tool = Isometry3::translation(0.0, 0.0, 0.107);
    SerialChain::new(joints, tool, 0.9, 1.2)
}
