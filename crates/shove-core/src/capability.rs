//! Push capabilities and their resolution on actors
//!
//! Two capabilities exist. A pushee scans its surroundings and exposes its
//! movement state; a pusher is a candidate that can be pushed. Either may be
//! provided by the actor itself or by one attached module.

use crate::math::safe_normal;
use crate::{Actor, ActorId, ActorStore, ModuleId};
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Movement state exposed by an actor that scans for pushes
pub trait PusheeCapability: fmt::Debug {
    /// Whether the pushee is moving along the ground
    fn is_grounded_moving(&self) -> bool;

    /// Current velocity
    fn velocity(&self) -> Vec3;

    /// Current input acceleration
    fn acceleration(&self) -> Vec3;
}

/// Snapshot of a pushee's movement, usable directly as a capability
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct KinematicState {
    pub grounded: bool,
    pub velocity: Vec3,
    pub acceleration: Vec3,
}

impl KinematicState {
    pub fn grounded(velocity: Vec3, acceleration: Vec3) -> Self {
        Self {
            grounded: true,
            velocity,
            acceleration,
        }
    }

    pub fn airborne(velocity: Vec3, acceleration: Vec3) -> Self {
        Self {
            grounded: false,
            velocity,
            acceleration,
        }
    }

    /// Capture the state of any pushee
    pub fn capture(pushee: &dyn PusheeCapability) -> Self {
        Self {
            grounded: pushee.is_grounded_moving(),
            velocity: pushee.velocity(),
            acceleration: pushee.acceleration(),
        }
    }
}

impl PusheeCapability for KinematicState {
    fn is_grounded_moving(&self) -> bool {
        self.grounded
    }

    fn velocity(&self) -> Vec3 {
        self.velocity
    }

    fn acceleration(&self) -> Vec3 {
        self.acceleration
    }
}

/// Identity of whatever provides a pusher capability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PushTarget {
    /// The actor itself is a pusher
    Actor(ActorId),
    /// A module attached to the actor is a pusher
    Module(ActorId, ModuleId),
}

impl PushTarget {
    /// The actor that owns this target
    pub fn owning_actor(&self) -> ActorId {
        match *self {
            PushTarget::Actor(id) => id,
            PushTarget::Module(id, _) => id,
        }
    }
}

impl fmt::Display for PushTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PushTarget::Actor(id) => write!(f, "{}", id),
            PushTarget::Module(id, module) => write!(f, "{}/{}", id, module),
        }
    }
}

/// Resolve the pushee capability of an actor
///
/// The actor's own capability wins; otherwise the first attached module
/// carrying one is used.
pub fn pushee_capability(actor: &Actor) -> Option<&dyn PusheeCapability> {
    if let Some(own) = actor.own_pushee() {
        return Some(own);
    }

    let mut found = actor
        .modules()
        .iter()
        .filter_map(|m| m.pushee_capability().map(|c| (m.id(), c)));
    let (module, capability) = found.next()?;
    if found.next().is_some() {
        log::debug!(
            "{} has several pushee modules, using {}",
            actor.id(),
            module
        );
    }
    Some(capability)
}

/// Look up an actor's pushee capability, failing if either is missing
pub fn require_pushee(store: &ActorStore, id: ActorId) -> crate::Result<&dyn PusheeCapability> {
    let actor = store.require(id)?;
    pushee_capability(actor).ok_or(crate::Error::NotAPushee(id))
}

/// Resolve the pusher capability of an actor
///
/// Same rule as [`pushee_capability`]: the actor itself, else the first
/// pusher module.
pub fn pusher_target(actor: &Actor) -> Option<PushTarget> {
    if actor.is_pusher() {
        return Some(PushTarget::Actor(actor.id()));
    }
    actor
        .modules()
        .iter()
        .find(|m| m.is_pusher())
        .map(|m| PushTarget::Module(actor.id(), m.id()))
}

/// True if the target still refers to a pusher-capable actor or module
pub fn is_pusher(actor: &Actor, target: PushTarget) -> bool {
    match target {
        PushTarget::Actor(id) => id == actor.id() && actor.is_pusher(),
        PushTarget::Module(id, module) => {
            id == actor.id() && actor.module(module).map(|m| m.is_pusher()).unwrap_or(false)
        }
    }
}

/// Whether the pushee is moving on the ground
pub fn is_pushee_moving_on_ground(pushee: &dyn PusheeCapability) -> bool {
    pushee.is_grounded_moving()
}

/// Velocity used for strength scaling
///
/// Grounded pushees only count their horizontal motion; airborne pushees
/// use their full velocity.
pub fn pushee_ground_velocity(pushee: &dyn PusheeCapability) -> Vec3 {
    let velocity = pushee.velocity();
    if pushee.is_grounded_moving() {
        Vec3::new(velocity.x, velocity.y, 0.0)
    } else {
        velocity
    }
}

/// Magnitude of [`pushee_ground_velocity`]
pub fn pushee_ground_speed(pushee: &dyn PusheeCapability) -> f32 {
    pushee_ground_velocity(pushee).length()
}

/// Normalized acceleration of a pushee, zero when there is none
pub fn pushee_acceleration(pushee: Option<&dyn PusheeCapability>) -> Vec3 {
    pushee
        .map(|p| safe_normal(p.acceleration()))
        .unwrap_or(Vec3::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ActorArchetype, CollisionComponent, Module};
    use std::sync::Arc;

    fn actor(id: u64) -> Actor {
        Actor::new(
            ActorId::new(id),
            Arc::new(ActorArchetype::new(
                "character",
                CollisionComponent::capsule(34.0, 88.0),
            )),
        )
    }

    #[test]
    fn test_own_pushee_wins() {
        let mut a = actor(1);
        a.attach(Module::pushee(
            ModuleId::new(0),
            KinematicState::grounded(Vec3::X, Vec3::ZERO),
        ));
        a.set_pushee(KinematicState::grounded(Vec3::Y, Vec3::ZERO));

        let pushee = pushee_capability(&a).unwrap();
        assert_eq!(pushee.velocity(), Vec3::Y);
    }

    #[test]
    fn test_module_pushee() {
        let mut a = actor(1);
        assert!(pushee_capability(&a).is_none());

        a.attach(Module::new(ModuleId::new(0)));
        a.attach(Module::pushee(
            ModuleId::new(1),
            KinematicState::grounded(Vec3::X, Vec3::ZERO),
        ));
        a.attach(Module::pushee(
            ModuleId::new(2),
            KinematicState::grounded(Vec3::Z, Vec3::ZERO),
        ));

        let pushee = pushee_capability(&a).unwrap();
        assert_eq!(pushee.velocity(), Vec3::X);
    }

    #[test]
    fn test_pusher_target() {
        let mut a = actor(3);
        assert_eq!(pusher_target(&a), None);

        a.attach(Module::pusher(ModuleId::new(5)));
        let target = pusher_target(&a).unwrap();
        assert_eq!(target, PushTarget::Module(ActorId::new(3), ModuleId::new(5)));
        assert_eq!(target.owning_actor(), ActorId::new(3));
        assert!(is_pusher(&a, target));

        a.set_pusher(true);
        assert_eq!(pusher_target(&a), Some(PushTarget::Actor(ActorId::new(3))));
    }

    #[test]
    fn test_ground_speed() {
        let grounded = KinematicState::grounded(Vec3::new(300.0, 400.0, -200.0), Vec3::ZERO);
        assert_eq!(pushee_ground_speed(&grounded), 500.0);

        let airborne = KinematicState::airborne(Vec3::new(0.0, 300.0, 400.0), Vec3::ZERO);
        assert_eq!(pushee_ground_speed(&airborne), 500.0);
    }

    #[test]
    fn test_pushee_acceleration() {
        assert_eq!(pushee_acceleration(None), Vec3::ZERO);
        let state = KinematicState::grounded(Vec3::ZERO, Vec3::new(0.0, 2048.0, 0.0));
        assert_eq!(pushee_acceleration(Some(&state)), Vec3::Y);
    }
}
