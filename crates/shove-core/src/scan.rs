//! Adaptive scan cadence and range
//!
//! A pushee that is accelerating scans more often and further than one that
//! is coasting or idle.

use crate::capability::{pushee_acceleration, PusheeCapability};
use crate::shape::{max_default_collision_shape_size, ShapeKind};
use crate::Actor;
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Magnitude a normalized acceleration must exceed to count as accelerating
pub const ACCELERATION_EPSILON: f32 = 0.1;

/// How often and how far a pushee scans
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanParams {
    /// Seconds between scans while not accelerating
    pub scan_rate: f32,
    /// Seconds between scans while accelerating
    pub scan_rate_accel: f32,
    /// Base range multiplier while not accelerating
    pub scan_range_scalar: f32,
    /// Base range multiplier while accelerating
    pub scan_range_accel_scalar: f32,
}

impl Default for ScanParams {
    fn default() -> Self {
        Self {
            scan_rate: 0.1,
            scan_rate_accel: 0.05,
            scan_range_scalar: 1.5,
            scan_range_accel_scalar: 2.0,
        }
    }
}

/// Whether an acceleration vector counts as accelerating
pub fn is_accelerating(acceleration: Vec3) -> bool {
    crate::math::safe_normal(acceleration).length() > ACCELERATION_EPSILON
}

/// Whether a pushee is accelerating; a missing pushee never is
pub fn is_pushee_accelerating(pushee: Option<&dyn PusheeCapability>) -> bool {
    is_accelerating(pushee_acceleration(pushee))
}

/// Scan interval for a given acceleration
pub fn scan_rate_for(acceleration: Vec3, params: &ScanParams) -> f32 {
    if is_accelerating(acceleration) {
        params.scan_rate_accel
    } else {
        params.scan_rate
    }
}

/// Scan interval for a pushee
pub fn scan_rate(pushee: Option<&dyn PusheeCapability>, params: &ScanParams) -> f32 {
    scan_rate_for(pushee_acceleration(pushee), params)
}

/// Scan range for a given acceleration
pub fn scan_range_for(acceleration: Vec3, base_scan_range: f32, params: &ScanParams) -> f32 {
    let scalar = if is_accelerating(acceleration) {
        params.scan_range_accel_scalar
    } else {
        params.scan_range_scalar
    };
    base_scan_range * scalar
}

/// Scan range for a pushee
pub fn scan_range(
    pushee: Option<&dyn PusheeCapability>,
    base_scan_range: f32,
    params: &ScanParams,
) -> f32 {
    scan_range_for(pushee_acceleration(pushee), base_scan_range, params)
}

/// Base scan range of an actor: the largest dimension of its default shape
pub fn base_scan_range(actor: &Actor) -> f32 {
    max_default_collision_shape_size(actor, ShapeKind::None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ActorArchetype, ActorId, CollisionComponent, KinematicState};
    use std::sync::Arc;

    fn params() -> ScanParams {
        ScanParams {
            scan_rate: 0.2,
            scan_rate_accel: 0.05,
            scan_range_scalar: 1.0,
            scan_range_accel_scalar: 3.0,
        }
    }

    #[test]
    fn test_is_accelerating() {
        assert!(!is_accelerating(Vec3::ZERO));
        assert!(!is_accelerating(Vec3::splat(1.0e-6)));
        assert!(is_accelerating(Vec3::new(0.0, 0.5, 0.0)));
        assert!(is_accelerating(Vec3::new(2048.0, 0.0, 0.0)));
    }

    #[test]
    fn test_scan_rate() {
        let params = params();
        assert_eq!(scan_rate(None, &params), 0.2);

        let idle = KinematicState::grounded(Vec3::new(100.0, 0.0, 0.0), Vec3::ZERO);
        assert_eq!(scan_rate(Some(&idle), &params), 0.2);

        let running = KinematicState::grounded(Vec3::ZERO, Vec3::new(0.0, 1000.0, 0.0));
        assert_eq!(scan_rate(Some(&running), &params), 0.05);
    }

    #[test]
    fn test_scan_range() {
        let params = params();
        let idle = KinematicState::default();
        let running = KinematicState::grounded(Vec3::ZERO, Vec3::new(1000.0, 0.0, 0.0));
        assert_eq!(scan_range(Some(&idle), 88.0, &params), 88.0);
        assert_eq!(scan_range(Some(&running), 88.0, &params), 264.0);
        assert_eq!(scan_range_for(Vec3::ZERO, 0.0, &params), 0.0);
    }

    #[test]
    fn test_base_scan_range() {
        let actor = Actor::new(
            ActorId::new(0),
            Arc::new(ActorArchetype::new(
                "character",
                CollisionComponent::capsule(34.0, 88.0),
            )),
        );
        assert_eq!(base_scan_range(&actor), 88.0);
    }

    #[test]
    fn test_default_params() {
        let params = ScanParams::default();
        assert!(params.scan_rate_accel < params.scan_rate);
        assert!(params.scan_range_accel_scalar > params.scan_range_scalar);
    }
}
