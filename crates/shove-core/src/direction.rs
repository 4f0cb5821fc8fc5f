//! Cardinal classification of push directions
//!
//! Bearings are signed degrees in `[-180, 180]`: the magnitude says how far
//! from forward the direction is, the sign says which side (positive right).
//!
//! Bucket ranges are closed on both ends, so a bearing exactly on a boundary
//! (45 and 135 for four buckets, 22.5/67.5/112.5/157.5 for eight) belongs to
//! both neighbours. The side buckets are tested first, which is the bucket a
//! boundary sample currently lands in; callers must not rely on that.

use crate::math::{is_nearly_zero, safe_normal_2d, Rotator, KINDA_SMALL_NUMBER};
use crate::Actor;
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Four-way push direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cardinal4 {
    Forward,
    Right,
    Backward,
    Left,
}

/// Eight-way push direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cardinal8 {
    Forward,
    ForwardRight,
    Right,
    BackwardRight,
    Backward,
    BackwardLeft,
    Left,
    ForwardLeft,
}

/// Whether a classified direction came from a usable bearing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DirectionValidity {
    Valid,
    /// Positions coincided in the horizontal plane; the cardinal is a default
    Invalid,
}

/// A cardinal together with its validity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClassifiedDirection<C> {
    pub cardinal: C,
    pub validity: DirectionValidity,
}

impl<C> ClassifiedDirection<C> {
    pub fn is_valid(&self) -> bool {
        self.validity == DirectionValidity::Valid
    }
}

/// Signed bearing of `direction` relative to `base_rotation`, in degrees
///
/// Only the horizontal components are considered. A near-zero direction
/// has bearing 0. A purely vertical direction is not near-zero, but its
/// horizontal part is, so it reports +90 (to the right).
pub fn signed_angle(direction: Vec3, base_rotation: Rotator) -> f32 {
    if is_nearly_zero(direction, KINDA_SMALL_NUMBER) {
        return 0.0;
    }

    let (forward, right) = base_rotation.planar_axes();
    let planar = safe_normal_2d(direction);

    let forward_cos = forward.dot(planar).clamp(-1.0, 1.0);
    let degrees = forward_cos.acos().to_degrees();

    if right.dot(planar) < 0.0 {
        -degrees
    } else {
        degrees
    }
}

/// Bucket a bearing into four directions
pub fn classify_4way(angle: f32) -> Cardinal4 {
    let abs = angle.abs();

    if (45.0..=135.0).contains(&abs) {
        return if angle > 0.0 {
            Cardinal4::Right
        } else {
            Cardinal4::Left
        };
    }

    if abs <= 45.0 {
        return Cardinal4::Forward;
    }

    Cardinal4::Backward
}

/// Bucket a bearing into eight directions
pub fn classify_8way(angle: f32) -> Cardinal8 {
    let abs = angle.abs();
    let right = angle > 0.0;

    if (67.5..=112.5).contains(&abs) {
        return if right { Cardinal8::Right } else { Cardinal8::Left };
    }

    if abs <= 22.5 {
        return Cardinal8::Forward;
    }

    if abs >= 157.5 {
        return Cardinal8::Backward;
    }

    if abs <= 67.5 {
        return if right {
            Cardinal8::ForwardRight
        } else {
            Cardinal8::ForwardLeft
        };
    }

    if abs >= 112.5 {
        return if right {
            Cardinal8::BackwardRight
        } else {
            Cardinal8::BackwardLeft
        };
    }

    // NaN bearings fall through every range
    Cardinal8::Forward
}

/// Planar direction from `to` towards `from`, with its bearing relative to `to`
fn relative_bearing(from: &Actor, to: &Actor) -> Option<f32> {
    let direction = safe_normal_2d(from.location - to.location);
    if is_nearly_zero(direction, KINDA_SMALL_NUMBER) {
        return None;
    }
    Some(signed_angle(direction, to.rotation))
}

/// Four-way direction of `from` as seen by `to`
pub fn push_direction_4way(from: &Actor, to: &Actor) -> ClassifiedDirection<Cardinal4> {
    match relative_bearing(from, to) {
        Some(angle) => ClassifiedDirection {
            cardinal: classify_4way(angle),
            validity: DirectionValidity::Valid,
        },
        None => ClassifiedDirection {
            cardinal: Cardinal4::Forward,
            validity: DirectionValidity::Invalid,
        },
    }
}

/// Eight-way direction of `from` as seen by `to`
pub fn push_direction_8way(from: &Actor, to: &Actor) -> ClassifiedDirection<Cardinal8> {
    match relative_bearing(from, to) {
        Some(angle) => ClassifiedDirection {
            cardinal: classify_8way(angle),
            validity: DirectionValidity::Valid,
        },
        None => ClassifiedDirection {
            cardinal: Cardinal8::Forward,
            validity: DirectionValidity::Invalid,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ActorArchetype, ActorId, CollisionComponent};
    use std::sync::Arc;

    fn actor_at(id: u64, location: Vec3, yaw: f32) -> Actor {
        Actor::new(
            ActorId::new(id),
            Arc::new(ActorArchetype::new(
                "character",
                CollisionComponent::capsule(34.0, 88.0),
            )),
        )
        .with_location(location)
        .with_rotation(Rotator::from_yaw(yaw))
    }

    #[test]
    fn test_signed_angle() {
        let facing_x = Rotator::ZERO;
        assert!(signed_angle(Vec3::X, facing_x).abs() < 1e-3);
        assert!((signed_angle(Vec3::Y, facing_x) - 90.0).abs() < 1e-3);
        assert!((signed_angle(Vec3::NEG_Y, facing_x) + 90.0).abs() < 1e-3);
        assert!((signed_angle(Vec3::NEG_X, facing_x).abs() - 180.0).abs() < 1e-3);
        assert_eq!(signed_angle(Vec3::ZERO, facing_x), 0.0);

        // vertical component is ignored
        assert!((signed_angle(Vec3::new(0.0, 1.0, 5.0), facing_x) - 90.0).abs() < 1e-3);
        // straight up or down has no horizontal bearing but is not zero
        assert!((signed_angle(Vec3::Z, facing_x) - 90.0).abs() < 1e-3);
        assert!((signed_angle(Vec3::NEG_Z, facing_x) - 90.0).abs() < 1e-3);

        // relative to a rotated base
        let facing_y = Rotator::from_yaw(90.0);
        assert!(signed_angle(Vec3::Y, facing_y).abs() < 1e-3);
        assert!((signed_angle(Vec3::X, facing_y) + 90.0).abs() < 1e-3);
    }

    #[test]
    fn test_classify_4way() {
        assert_eq!(classify_4way(0.0), Cardinal4::Forward);
        assert_eq!(classify_4way(30.0), Cardinal4::Forward);
        assert_eq!(classify_4way(-30.0), Cardinal4::Forward);
        assert_eq!(classify_4way(90.0), Cardinal4::Right);
        assert_eq!(classify_4way(-90.0), Cardinal4::Left);
        assert_eq!(classify_4way(180.0), Cardinal4::Backward);
        assert_eq!(classify_4way(-170.0), Cardinal4::Backward);
    }

    #[test]
    fn test_classify_4way_boundaries_are_ambiguous() {
        // Both neighbours are acceptable at an exact boundary
        assert!(matches!(classify_4way(45.0), Cardinal4::Forward | Cardinal4::Right));
        assert!(matches!(classify_4way(-45.0), Cardinal4::Forward | Cardinal4::Left));
        assert!(matches!(classify_4way(135.0), Cardinal4::Right | Cardinal4::Backward));
        assert!(matches!(classify_4way(-135.0), Cardinal4::Left | Cardinal4::Backward));
    }

    #[test]
    fn test_classify_8way() {
        assert_eq!(classify_8way(0.0), Cardinal8::Forward);
        assert_eq!(classify_8way(45.0), Cardinal8::ForwardRight);
        assert_eq!(classify_8way(-45.0), Cardinal8::ForwardLeft);
        assert_eq!(classify_8way(90.0), Cardinal8::Right);
        assert_eq!(classify_8way(-90.0), Cardinal8::Left);
        assert_eq!(classify_8way(135.0), Cardinal8::BackwardRight);
        assert_eq!(classify_8way(-135.0), Cardinal8::BackwardLeft);
        assert_eq!(classify_8way(180.0), Cardinal8::Backward);
        assert_eq!(classify_8way(-180.0), Cardinal8::Backward);
    }

    #[test]
    fn test_classify_8way_boundaries_are_ambiguous() {
        assert!(matches!(
            classify_8way(22.5),
            Cardinal8::Forward | Cardinal8::ForwardRight
        ));
        assert!(matches!(
            classify_8way(67.5),
            Cardinal8::ForwardRight | Cardinal8::Right
        ));
        assert!(matches!(
            classify_8way(-112.5),
            Cardinal8::Left | Cardinal8::BackwardLeft
        ));
        assert!(matches!(
            classify_8way(157.5),
            Cardinal8::BackwardRight | Cardinal8::Backward
        ));
    }

    #[test]
    fn test_push_direction_between_actors() {
        // `to` faces +X; `from` stands to its right (+Y)
        let to = actor_at(0, Vec3::ZERO, 0.0);
        let from = actor_at(1, Vec3::new(0.0, 100.0, 0.0), 180.0);

        let four = push_direction_4way(&from, &to);
        assert!(four.is_valid());
        assert_eq!(four.cardinal, Cardinal4::Right);

        let behind = actor_at(2, Vec3::new(-100.0, -100.0, 0.0), 0.0);
        let eight = push_direction_8way(&behind, &to);
        assert!(eight.is_valid());
        assert_eq!(eight.cardinal, Cardinal8::BackwardLeft);
    }

    #[test]
    fn test_coincident_actors_are_invalid() {
        let to = actor_at(0, Vec3::new(10.0, 10.0, 0.0), 45.0);
        // stacked vertically: planar direction is zero
        let from = actor_at(1, Vec3::new(10.0, 10.0, 200.0), 0.0);

        let four = push_direction_4way(&from, &to);
        assert_eq!(four.cardinal, Cardinal4::Forward);
        assert_eq!(four.validity, DirectionValidity::Invalid);

        let eight = push_direction_8way(&from, &to);
        assert_eq!(eight.cardinal, Cardinal8::Forward);
        assert!(!eight.is_valid());
    }
}
