//! Shove Core - Push resolution between simulated actors
//!
//! This crate turns spatial and kinematic state into push decisions:
//! - Strength resolution from curves and scalars (`StrengthResolver`)
//! - Cardinal classification of relative bearings (`classify_4way`, `classify_8way`)
//! - Discovery of pusher-capable targets (`PushTargets`, `build_push_option`)
//! - Adaptive scan cadence and range (`scan_rate`, `scan_range`)
//!
//! Everything here is synchronous and deterministic: identical inputs give
//! identical outputs on every machine taking part in a session.
//!
//! ## Debug Toggles
//!
//! The default `debug-toggles` feature lets `DebugToggles` switch off the
//! velocity and distance strength curves for tuning. Disable it in shipping
//! builds:
//! ```toml
//! shove-core = { version = "0.1", default-features = false }
//! ```

mod actor;
pub mod capability;
pub mod curve;
pub mod direction;
pub mod discovery;
mod error;
mod identity;
pub mod math;
pub mod scan;
pub mod shape;
pub mod strength;

pub use actor::{Actor, ActorArchetype, ActorStore, Module};
pub use capability::{KinematicState, PushTarget, PusheeCapability};
pub use curve::{Curve, CurveKey, FloatCurve};
pub use direction::{
    classify_4way, classify_8way, push_direction_4way, push_direction_8way, signed_angle,
    Cardinal4, Cardinal8, ClassifiedDirection, DirectionValidity,
};
pub use discovery::{
    build_push_option, HitResult, OverlapResult, PushOption, PushOptionBuilder, PushQuery,
    PushTargets, StruckComponent,
};
pub use error::{Error, Result};
pub use identity::{AbilityId, ActorId, ModuleId};
pub use math::Rotator;
pub use scan::ScanParams;
pub use shape::{
    CollisionComponent, CollisionGeometry, CollisionShape, CollisionShapeDescriptor, ShapeKind,
};
pub use strength::{normalized_push_distance, ActionParams, DebugToggles, StrengthResolver};
