//! Push events as delivered to the pushed actor
//!
//! The pushee is the instigator of the event and the pusher its target. The
//! target data handle must start with a direction segment; hosts only raise a
//! push event after attaching one.

use crate::target_data::{PushTargetData, TargetData};
use crate::Result;
use glam::Vec3;
use serde::{Deserialize, Serialize};
use shove_core::capability::require_pushee;
use shove_core::{
    normalized_push_distance, push_direction_4way, push_direction_8way, ActionParams, ActorId,
    ActorStore, Cardinal4, Cardinal8, ClassifiedDirection, StrengthResolver,
};

/// Event raised when a push is triggered
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PushEventData {
    /// The scanning pushee
    pub instigator: Option<ActorId>,
    /// The pushed pusher
    pub target: Option<ActorId>,
    pub target_data: Vec<TargetData>,
}

impl PushEventData {
    /// Event for a push from `pushee` onto `pusher` carrying both segments
    pub fn new(pushee: ActorId, pusher: ActorId, data: &PushTargetData) -> Self {
        Self {
            instigator: Some(pushee),
            target: Some(pusher),
            target_data: data.to_segments().to_vec(),
        }
    }

    /// Event built from decoded wire segments
    pub fn from_segments(pushee: ActorId, pusher: ActorId, target_data: Vec<TargetData>) -> Self {
        Self {
            instigator: Some(pushee),
            target: Some(pusher),
            target_data,
        }
    }
}

/// The pushee and pusher of an event
pub fn push_actors(event: &PushEventData) -> (Option<ActorId>, Option<ActorId>) {
    (event.instigator, event.target)
}

/// Read the push carried by an event
///
/// The direction is re-normalized, flattened to the horizontal plane when
/// `force_2d` is set. A missing strength segment means a strength scalar of 1
/// without override.
///
/// # Panics
///
/// Panics if the event has no direction segment first. Push events are
/// always raised with one, so this is a bug in the caller.
pub fn extract_push_data(event: &PushEventData, force_2d: bool) -> PushTargetData {
    match PushTargetData::from_segments(&event.target_data, force_2d) {
        Some(data) => data,
        None => panic!(
            "push event from {:?} to {:?} has no direction target data",
            event.instigator, event.target
        ),
    }
}

/// A received push resolved against the current actor state
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedPush {
    pub pushee: ActorId,
    pub pusher: ActorId,
    /// Unit push direction
    pub direction: Vec3,
    /// Distance relative to the combined collision radii
    pub normalized_distance: f32,
    pub strength: f32,
    /// Side of the pusher the pushee is on
    pub cardinal_4way: ClassifiedDirection<Cardinal4>,
    pub cardinal_8way: ClassifiedDirection<Cardinal8>,
}

/// Resolve strength and direction of a push event
///
/// Fails if either actor is unknown or the pushee has no pushee capability.
pub fn resolve_push_event(
    store: &ActorStore,
    event: &PushEventData,
    params: &ActionParams,
    resolver: &StrengthResolver,
    force_2d: bool,
) -> Result<ResolvedPush> {
    let data = extract_push_data(event, force_2d);
    let (Some(pushee_id), Some(pusher_id)) = push_actors(event) else {
        return Err(crate::Error::MissingActor);
    };

    let pushee = store.require(pushee_id)?;
    let pusher = store.require(pusher_id)?;
    let capability = require_pushee(store, pushee_id)?;

    let normalized_distance = normalized_push_distance(pushee, pusher, data.distance());
    let strength = resolver.calculate_push_strength(
        capability,
        data.override_strength(),
        data.strength_scalar(),
        normalized_distance,
        params,
    );

    Ok(ResolvedPush {
        pushee: pushee_id,
        pusher: pusher_id,
        direction: data.direction(),
        normalized_distance,
        strength,
        cardinal_4way: push_direction_4way(pushee, pusher),
        cardinal_8way: push_direction_8way(pushee, pusher),
    })
}
