//! Vector helpers and orientation for push geometry
//!
//! World space is Z-up with X forward and Y right. All helpers guard their
//! divisions and fall back to zero instead of producing NaN.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Squared-length tolerance below which a vector cannot be normalized
pub const SMALL_NUMBER: f32 = 1.0e-8;

/// Per-component tolerance used by [`is_nearly_zero`] by default
pub const KINDA_SMALL_NUMBER: f32 = 1.0e-4;

/// Divide `a` by `b`, yielding 0 when `b` is zero
#[inline]
pub fn safe_divide(a: f32, b: f32) -> f32 {
    if b != 0.0 {
        a / b
    } else {
        0.0
    }
}

/// Unit vector in the direction of `v`, or zero if `v` is degenerate
#[inline]
pub fn safe_normal(v: Vec3) -> Vec3 {
    let len_sq = v.length_squared();
    if len_sq == 1.0 {
        v
    } else if len_sq < SMALL_NUMBER {
        Vec3::ZERO
    } else {
        v / len_sq.sqrt()
    }
}

/// Unit vector in the horizontal plane, or zero if the planar part is degenerate
#[inline]
pub fn safe_normal_2d(v: Vec3) -> Vec3 {
    safe_normal(Vec3::new(v.x, v.y, 0.0))
}

/// True if every component of `v` is within `tolerance` of zero
#[inline]
pub fn is_nearly_zero(v: Vec3, tolerance: f32) -> bool {
    v.x.abs() <= tolerance && v.y.abs() <= tolerance && v.z.abs() <= tolerance
}

/// Largest absolute component of `v`
#[inline]
pub fn abs_max(v: Vec3) -> f32 {
    v.x.abs().max(v.y.abs()).max(v.z.abs())
}

/// Euler orientation in degrees
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rotator {
    pub pitch: f32,
    pub yaw: f32,
    pub roll: f32,
}

impl Rotator {
    pub const ZERO: Rotator = Rotator {
        pitch: 0.0,
        yaw: 0.0,
        roll: 0.0,
    };

    pub fn new(pitch: f32, yaw: f32, roll: f32) -> Self {
        Self { pitch, yaw, roll }
    }

    /// Orientation facing `yaw` degrees around Z
    pub fn from_yaw(yaw: f32) -> Self {
        Self {
            pitch: 0.0,
            yaw,
            roll: 0.0,
        }
    }

    /// Forward (X) axis of the full orientation
    pub fn forward(&self) -> Vec3 {
        let (sp, cp) = self.pitch.to_radians().sin_cos();
        let (sy, cy) = self.yaw.to_radians().sin_cos();
        Vec3::new(cp * cy, cp * sy, sp)
    }

    /// Right (Y) axis of the full orientation
    pub fn right(&self) -> Vec3 {
        let (sp, _) = self.pitch.to_radians().sin_cos();
        let (sy, cy) = self.yaw.to_radians().sin_cos();
        let (sr, cr) = self.roll.to_radians().sin_cos();
        let cp = self.pitch.to_radians().cos();
        Vec3::new(sr * sp * cy - cr * sy, sr * sp * sy + cr * cy, -sr * cp)
    }

    /// Forward and right axes projected onto the horizontal plane
    ///
    /// Only yaw contributes, so a tilted actor still classifies bearings
    /// the same way on every machine.
    pub fn planar_axes(&self) -> (Vec3, Vec3) {
        let (sy, cy) = self.yaw.to_radians().sin_cos();
        (Vec3::new(cy, sy, 0.0), Vec3::new(-sy, cy, 0.0))
    }
}
