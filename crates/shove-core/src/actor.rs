//! Actors, attached modules and the actor store
//!
//! An actor is anything that can take part in a push: it has a transform,
//! a live root collision component, an archetype it was spawned from, and
//! may carry push capabilities either itself or through attached modules.

use crate::capability::PusheeCapability;
use crate::math::Rotator;
use crate::shape::CollisionComponent;
use crate::{ActorId, ModuleId};
use glam::Vec3;
use indexmap::IndexMap;
use std::sync::Arc;

/// Class-default template an actor is spawned from
///
/// Shared between all actors of the same kind and never mutated at runtime.
#[derive(Debug, Clone, PartialEq)]
pub struct ActorArchetype {
    /// Display name of the archetype (e.g. "character", "crate")
    pub name: String,
    /// Default root collision component
    pub root: CollisionComponent,
}

impl ActorArchetype {
    pub fn new(name: impl Into<String>, root: CollisionComponent) -> Self {
        Self {
            name: name.into(),
            root,
        }
    }
}

/// A behavior module attached to an actor
#[derive(Debug)]
pub struct Module {
    id: ModuleId,
    pushee: Option<Box<dyn PusheeCapability>>,
    pusher: bool,
}

impl Module {
    /// Create a module with no capabilities
    pub fn new(id: ModuleId) -> Self {
        Self {
            id,
            pushee: None,
            pusher: false,
        }
    }

    /// Create a module that can be pushed
    pub fn pusher(id: ModuleId) -> Self {
        Self {
            id,
            pushee: None,
            pusher: true,
        }
    }

    /// Create a module that scans for pushes
    pub fn pushee(id: ModuleId, capability: impl PusheeCapability + 'static) -> Self {
        Self {
            id,
            pushee: Some(Box::new(capability)),
            pusher: false,
        }
    }

    pub fn id(&self) -> ModuleId {
        self.id
    }

    pub fn is_pusher(&self) -> bool {
        self.pusher
    }

    pub fn pushee_capability(&self) -> Option<&dyn PusheeCapability> {
        self.pushee.as_deref()
    }
}

/// A simulated actor
#[derive(Debug)]
pub struct Actor {
    id: ActorId,
    archetype: Arc<ActorArchetype>,
    root: CollisionComponent,
    /// World location
    pub location: Vec3,
    /// World orientation
    pub rotation: Rotator,
    alive: bool,
    pushee: Option<Box<dyn PusheeCapability>>,
    pusher: bool,
    modules: Vec<Module>,
}

impl Actor {
    /// Create an actor whose live root starts as a copy of the archetype's
    pub fn new(id: ActorId, archetype: Arc<ActorArchetype>) -> Self {
        let root = archetype.root;
        Self {
            id,
            archetype,
            root,
            location: Vec3::ZERO,
            rotation: Rotator::ZERO,
            alive: true,
            pushee: None,
            pusher: false,
            modules: Vec::new(),
        }
    }

    pub fn id(&self) -> ActorId {
        self.id
    }

    /// The class-default template this actor was spawned from
    pub fn archetype(&self) -> &ActorArchetype {
        &self.archetype
    }

    /// The live root collision component
    pub fn root(&self) -> &CollisionComponent {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut CollisionComponent {
        &mut self.root
    }

    /// Whether the actor is still part of the simulation
    pub fn is_alive(&self) -> bool {
        self.alive
    }

    /// Mark the actor as pending removal
    pub fn destroy(&mut self) {
        self.alive = false;
    }

    /// Radius of the cylinder bounding the live root component
    pub fn simple_collision_radius(&self) -> f32 {
        self.root.bounding_radius()
    }

    /// Forward vector of the actor's orientation
    pub fn forward(&self) -> Vec3 {
        self.rotation.forward()
    }

    pub fn set_pushee(&mut self, capability: impl PusheeCapability + 'static) {
        self.pushee = Some(Box::new(capability));
    }

    pub fn set_pusher(&mut self, pusher: bool) {
        self.pusher = pusher;
    }

    /// The actor's own pushee capability, ignoring modules
    pub fn own_pushee(&self) -> Option<&dyn PusheeCapability> {
        self.pushee.as_deref()
    }

    /// Whether the actor itself is a pusher, ignoring modules
    pub fn is_pusher(&self) -> bool {
        self.pusher
    }

    /// Attach a module
    pub fn attach(&mut self, module: Module) {
        self.modules.push(module);
    }

    /// Attached modules in attachment order
    pub fn modules(&self) -> &[Module] {
        &self.modules
    }

    pub fn module(&self, id: ModuleId) -> Option<&Module> {
        self.modules.iter().find(|m| m.id == id)
    }

    pub fn with_location(mut self, location: Vec3) -> Self {
        self.location = location;
        self
    }

    pub fn with_rotation(mut self, rotation: Rotator) -> Self {
        self.rotation = rotation;
        self
    }
}

/// Storage for all actors taking part in pushes
#[derive(Debug, Default)]
pub struct ActorStore {
    /// All actors by ID, in spawn order
    actors: IndexMap<ActorId, Actor>,
    /// Next actor ID to assign
    next_id: u64,
}

impl ActorStore {
    /// Create a new empty actor store
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn an actor from an archetype
    pub fn spawn(&mut self, archetype: Arc<ActorArchetype>) -> &mut Actor {
        let id = ActorId::new(self.next_id);
        self.next_id = self.next_id.saturating_add(1);
        self.actors
            .entry(id)
            .or_insert_with(|| Actor::new(id, archetype))
    }

    /// Insert an actor built elsewhere, replacing any actor with the same ID
    pub fn insert(&mut self, actor: Actor) -> Option<Actor> {
        self.next_id = self.next_id.max(actor.id().raw().saturating_add(1));
        self.actors.insert(actor.id(), actor)
    }

    /// Get an actor by ID
    pub fn get(&self, id: ActorId) -> Option<&Actor> {
        self.actors.get(&id)
    }

    /// Get a mutable reference to an actor
    pub fn get_mut(&mut self, id: ActorId) -> Option<&mut Actor> {
        self.actors.get_mut(&id)
    }

    /// Look up an actor, failing if it is unknown
    pub fn require(&self, id: ActorId) -> crate::Result<&Actor> {
        self.get(id).ok_or(crate::Error::ActorNotFound(id))
    }

    /// True if the actor exists and has not been destroyed
    pub fn is_alive(&self, id: ActorId) -> bool {
        self.get(id).map(Actor::is_alive).unwrap_or(false)
    }

    /// Remove an actor
    pub fn despawn(&mut self, id: ActorId) -> Option<Actor> {
        self.actors.shift_remove(&id)
    }

    /// Get all actors in spawn order
    pub fn iter(&self) -> impl Iterator<Item = &Actor> {
        self.actors.values()
    }

    /// Get the number of actors
    pub fn len(&self) -> usize {
        self.actors.len()
    }

    /// Check if the store is empty
    pub fn is_empty(&self) -> bool {
        self.actors.is_empty()
    }
}
