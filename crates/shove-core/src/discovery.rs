//! Push target discovery and option building
//!
//! Candidates come from an actor reference, a batch of overlap results or a
//! single hit result. Every entry point appends into [`PushTargets`], which
//! keeps insertion order and never holds the same target twice.

use crate::capability::{pusher_target, PushTarget};
use crate::{AbilityId, Actor, ActorId, ActorStore, ModuleId};
use glam::Vec3;
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

/// Request issued by a scanning pushee for one scan cycle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushQuery {
    /// The pushee performing the scan
    pub requesting_actor: ActorId,
    /// Actors that must never be proposed as pushers
    #[serde(default)]
    pub ignored_actors: Vec<ActorId>,
}

impl PushQuery {
    pub fn new(requesting_actor: ActorId) -> Self {
        Self {
            requesting_actor,
            ignored_actors: Vec::new(),
        }
    }

    pub fn ignoring(mut self, actor: ActorId) -> Self {
        self.ignored_actors.push(actor);
        self
    }

    /// True if candidates owned by `actor` are filtered out
    pub fn excludes(&self, actor: ActorId) -> bool {
        actor == self.requesting_actor || self.ignored_actors.contains(&actor)
    }
}

/// A proposed push, handed to the host straight away
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PushOption {
    /// Ability granted to the pusher to carry out the push
    pub ability: AbilityId,
    /// The actor that will be pushed
    pub pusher: ActorId,
    pub pushee_location: Vec3,
    pub pusher_location: Vec3,
    pub pusher_forward: Vec3,
}

/// Part of an actor struck by a spatial query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StruckComponent {
    /// The actor's root collision
    Root,
    /// An attached module with its own collision
    Module(ModuleId),
}

/// One result of an overlap query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OverlapResult {
    pub actor: ActorId,
    pub component: StruckComponent,
}

impl OverlapResult {
    pub fn root(actor: ActorId) -> Self {
        Self {
            actor,
            component: StruckComponent::Root,
        }
    }

    pub fn module(actor: ActorId, module: ModuleId) -> Self {
        Self {
            actor,
            component: StruckComponent::Module(module),
        }
    }
}

/// Result of a directed cast
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HitResult {
    /// Actor that was hit, if any
    pub actor: Option<ActorId>,
    pub component: StruckComponent,
    pub location: Vec3,
}

impl HitResult {
    pub fn new(actor: ActorId, location: Vec3) -> Self {
        Self {
            actor: Some(actor),
            component: StruckComponent::Root,
            location,
        }
    }

    pub fn miss() -> Self {
        Self {
            actor: None,
            component: StruckComponent::Root,
            location: Vec3::ZERO,
        }
    }
}

/// Deduplicated, insertion-ordered list of push candidates
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PushTargets {
    targets: IndexSet<PushTarget>,
}

impl PushTargets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a target; returns false if it was already present
    pub fn add(&mut self, target: PushTarget) -> bool {
        self.targets.insert(target)
    }

    /// Append the actor if it is a pusher, then every pusher module it carries
    pub fn append_from_actor(&mut self, actor: &Actor) {
        if actor.is_pusher() {
            self.add(PushTarget::Actor(actor.id()));
        }
        for module in actor.modules().iter().filter(|m| m.is_pusher()) {
            self.add(PushTarget::Module(actor.id(), module.id()));
        }
    }

    /// Append the struck actor and struck component of every overlap
    ///
    /// Actor and component are tested independently. Unknown actors are
    /// skipped.
    pub fn append_from_overlaps(&mut self, store: &ActorStore, overlaps: &[OverlapResult]) {
        for overlap in overlaps {
            let Some(actor) = store.get(overlap.actor) else {
                log::trace!("overlap with unknown {}", overlap.actor);
                continue;
            };

            if actor.is_pusher() {
                self.add(PushTarget::Actor(actor.id()));
            }

            if let StruckComponent::Module(module_id) = overlap.component {
                if actor.module(module_id).map(|m| m.is_pusher()).unwrap_or(false) {
                    self.add(PushTarget::Module(actor.id(), module_id));
                }
            }
        }
    }

    /// Append the hit actor and its first pusher module
    pub fn append_from_hit(&mut self, store: &ActorStore, hit: &HitResult) {
        let Some(actor) = hit.actor.and_then(|id| store.get(id)) else {
            return;
        };

        if actor.is_pusher() {
            self.add(PushTarget::Actor(actor.id()));
        }

        if let Some(module) = actor.modules().iter().find(|m| m.is_pusher()) {
            self.add(PushTarget::Module(actor.id(), module.id()));
        }
    }

    /// Drop targets owned by actors the query excludes
    pub fn apply_query(&mut self, query: &PushQuery) {
        self.targets.retain(|t| !query.excludes(t.owning_actor()));
    }

    /// Owning actors of all targets, each listed once, in target order
    pub fn actors(&self) -> Vec<ActorId> {
        let owners: IndexSet<ActorId> = self.targets.iter().map(|t| t.owning_actor()).collect();
        owners.into_iter().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PushTarget> {
        self.targets.iter()
    }

    pub fn contains(&self, target: &PushTarget) -> bool {
        self.targets.contains(target)
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn clear(&mut self) {
        self.targets.clear();
    }
}

impl<'a> IntoIterator for &'a PushTargets {
    type Item = &'a PushTarget;
    type IntoIter = indexmap::set::Iter<'a, PushTarget>;

    fn into_iter(self) -> Self::IntoIter {
        self.targets.iter()
    }
}

/// Push targets reachable from a single actor
pub fn push_targets_from_actor(actor: &Actor) -> PushTargets {
    let mut targets = PushTargets::new();
    targets.append_from_actor(actor);
    targets
}

/// The owning actor of a resolved pusher capability
pub fn actor_from_push_target(store: &ActorStore, target: PushTarget) -> Option<&Actor> {
    store.get(target.owning_actor())
}

/// The resolved pusher of an actor, if any
pub fn resolve_pusher(store: &ActorStore, actor: ActorId) -> Option<PushTarget> {
    store.get(actor).and_then(pusher_target)
}

/// Build a push option for `pusher`
///
/// Succeeds only if the ability is set, the pusher exists and is alive, and
/// the query's requesting actor is alive.
pub fn build_push_option(
    ability: &AbilityId,
    pusher: Option<&Actor>,
    query: &PushQuery,
    store: &ActorStore,
) -> Option<PushOption> {
    if !ability.is_set() {
        log::trace!("push option rejected: no ability to grant");
        return None;
    }
    let Some(pusher) = pusher.filter(|p| p.is_alive()) else {
        log::trace!("push option rejected: pusher is gone");
        return None;
    };
    let Some(requester) = store
        .get(query.requesting_actor)
        .filter(|a| a.is_alive())
    else {
        log::trace!(
            "push option rejected: requester {} is gone",
            query.requesting_actor
        );
        return None;
    };

    Some(PushOption {
        ability: ability.clone(),
        pusher: pusher.id(),
        pushee_location: requester.location,
        pusher_location: pusher.location,
        pusher_forward: pusher.forward(),
    })
}

/// Collects push options over one scan cycle
#[derive(Debug, Clone, Default)]
pub struct PushOptionBuilder {
    options: Vec<PushOption>,
}

impl PushOptionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_push_option(&mut self, option: PushOption) {
        self.options.push(option);
    }

    /// Build an option for `pusher` and add it; returns false if rejected
    pub fn gather(
        &mut self,
        ability: &AbilityId,
        pusher: Option<&Actor>,
        query: &PushQuery,
        store: &ActorStore,
    ) -> bool {
        match build_push_option(ability, pusher, query, store) {
            Some(option) => {
                self.add_push_option(option);
                true
            }
            None => false,
        }
    }

    pub fn options(&self) -> &[PushOption] {
        &self.options
    }

    pub fn finish(self) -> Vec<PushOption> {
        self.options
    }
}
