//! Per-avatar push scanning
//!
//! A `PushScanSession` is owned by whatever drives the locally controlled
//! pushee. It caches the base scan range when the avatar is set, turns the
//! candidates of each scan into push options, and tracks when the predicted
//! pushes it triggered need a sync point.

use crate::clock::{MonotonicClock, SyncClock};
use crate::event::PushEventData;
use crate::net_sync::{NetSyncConfig, NetSyncThrottle};
use crate::target_data::PushTargetData;
use crate::{Error, Result};
use shove_core::capability::pushee_capability;
use shove_core::discovery::actor_from_push_target;
use shove_core::scan;
use shove_core::{
    AbilityId, ActorId, ActorStore, PushOption, PushOptionBuilder, PushQuery, PushTargets,
    ScanParams,
};

/// A push that was carried out, ready to be sent to the pusher
#[derive(Debug, Clone, PartialEq)]
pub struct TriggeredPush {
    pub event: PushEventData,
    /// True if the host should force a sync point now
    pub sync_due: bool,
}

/// Scan state of one pushee
#[derive(Debug)]
pub struct PushScanSession<C: SyncClock = MonotonicClock> {
    clock: C,
    ability: AbilityId,
    scan_params: ScanParams,
    avatar: Option<ActorId>,
    base_scan_range: f32,
    ignored_actors: Vec<ActorId>,
    options: Vec<PushOption>,
    throttle: NetSyncThrottle,
}

impl<C: SyncClock> PushScanSession<C> {
    /// Create a session granting `ability` to the pushers it finds
    pub fn new(clock: C, ability: AbilityId, scan_params: ScanParams, net_sync: NetSyncConfig) -> Self {
        let throttle = NetSyncThrottle::starting_at(net_sync, clock.now());
        Self {
            clock,
            ability,
            scan_params,
            avatar: None,
            base_scan_range: 0.0,
            ignored_actors: Vec::new(),
            options: Vec::new(),
            throttle,
        }
    }

    /// Bind the session to the actor doing the scanning
    ///
    /// The base scan range is taken from the actor's default collision shape
    /// here and not recomputed afterwards.
    pub fn on_avatar_set(&mut self, store: &ActorStore, avatar: ActorId) -> Result<()> {
        let actor = store.require(avatar)?;
        self.base_scan_range = scan::base_scan_range(actor);
        self.avatar = Some(avatar);
        self.options.clear();
        log::debug!(
            "push scan bound to {} with base range {}",
            avatar,
            self.base_scan_range
        );
        Ok(())
    }

    pub fn avatar(&self) -> Option<ActorId> {
        self.avatar
    }

    pub fn base_scan_range(&self) -> f32 {
        self.base_scan_range
    }

    pub fn scan_params(&self) -> &ScanParams {
        &self.scan_params
    }

    pub fn set_scan_params(&mut self, scan_params: ScanParams) {
        self.scan_params = scan_params;
    }

    /// Never propose pushes onto `actor`
    pub fn ignore(&mut self, actor: ActorId) {
        if !self.ignored_actors.contains(&actor) {
            self.ignored_actors.push(actor);
        }
    }

    /// Seconds until the next scan
    pub fn scan_rate(&self, store: &ActorStore) -> f32 {
        let pushee = self
            .avatar
            .and_then(|id| store.get(id))
            .and_then(pushee_capability);
        scan::scan_rate(pushee, &self.scan_params)
    }

    /// Radius of the next scan
    pub fn scan_range(&self, store: &ActorStore) -> f32 {
        let pushee = self
            .avatar
            .and_then(|id| store.get(id))
            .and_then(pushee_capability);
        scan::scan_range(pushee, self.base_scan_range, &self.scan_params)
    }

    /// Replace the current push options with those built from `candidates`
    ///
    /// One option is built per owning actor. Candidates owned by the avatar
    /// or an ignored actor are skipped.
    pub fn update_pushes(&mut self, store: &ActorStore, candidates: &PushTargets) -> &[PushOption] {
        self.options.clear();
        let Some(avatar) = self.avatar else {
            log::trace!("push scan skipped: no avatar");
            return &self.options;
        };

        let query = PushQuery {
            requesting_actor: avatar,
            ignored_actors: self.ignored_actors.clone(),
        };
        let mut targets = candidates.clone();
        targets.apply_query(&query);

        let mut builder = PushOptionBuilder::new();
        for target in &targets {
            if builder.options().iter().any(|o| o.pusher == target.owning_actor()) {
                continue;
            }
            builder.gather(
                &self.ability,
                actor_from_push_target(store, *target),
                &query,
                store,
            );
        }

        self.options = builder.finish();
        &self.options
    }

    /// Options from the latest scan
    pub fn options(&self) -> &[PushOption] {
        &self.options
    }

    /// Carry out a push and record it for sync throttling
    pub fn trigger_push(
        &mut self,
        option: &PushOption,
        strength_scalar: f32,
        override_strength: bool,
    ) -> Result<TriggeredPush> {
        let avatar = self.avatar.ok_or(Error::NoAvatar)?;
        let data = PushTargetData::between(
            option.pushee_location,
            option.pusher_location,
            strength_scalar,
            override_strength,
        );

        let now = self.clock.now();
        self.throttle.record_push(now);
        let sync_due = self.throttle.should_force_sync(now);

        Ok(TriggeredPush {
            event: PushEventData::new(avatar, option.pusher, &data),
            sync_due,
        })
    }

    /// Whether a sync point is due now
    pub fn should_force_sync(&mut self) -> bool {
        let now = self.clock.now();
        self.throttle.should_force_sync(now)
    }

    /// Record that the host performed a sync point
    pub fn consume_sync(&mut self) {
        let now = self.clock.now();
        self.throttle.consume_sync(now);
    }

    pub fn throttle(&self) -> &NetSyncThrottle {
        &self.throttle
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use glam::Vec3;
    use shove_core::{ActorArchetype, CollisionComponent, KinematicState, Module, ModuleId, OverlapResult};
    use std::sync::Arc;

    /// Avatar (0), pusher (1), pusher module holder (2), inert (3)
    fn store() -> ActorStore {
        let archetype = Arc::new(ActorArchetype::new(
            "character",
            CollisionComponent::capsule(34.0, 88.0),
        ));
        let mut store = ActorStore::new();

        store.spawn(archetype.clone()).set_pushee(KinematicState::default());

        let a = store.spawn(archetype.clone());
        a.location = Vec3::new(60.0, 0.0, 0.0);
        a.set_pusher(true);
        a.attach(Module::pusher(ModuleId::new(0)));

        let b = store.spawn(archetype.clone());
        b.location = Vec3::new(0.0, 60.0, 0.0);
        b.attach(Module::pusher(ModuleId::new(3)));

        store.spawn(archetype);
        store
    }

    fn session(clock: &ManualClock, net_sync: NetSyncConfig) -> PushScanSession<ManualClock> {
        PushScanSession::new(clock.clone(), AbilityId::new("push"), ScanParams::default(), net_sync)
    }

    fn candidates(store: &ActorStore) -> PushTargets {
        let mut targets = PushTargets::new();
        targets.append_from_overlaps(
            store,
            &[
                OverlapResult::root(ActorId::new(0)),
                OverlapResult::root(ActorId::new(1)),
                OverlapResult::module(ActorId::new(1), ModuleId::new(0)),
                OverlapResult::module(ActorId::new(2), ModuleId::new(3)),
                OverlapResult::root(ActorId::new(3)),
            ],
        );
        targets
    }

    #[test]
    fn test_on_avatar_set() {
        let store = store();
        let clock = ManualClock::new();
        let mut session = session(&clock, NetSyncConfig::default());

        assert!(session.on_avatar_set(&store, ActorId::new(42)).is_err());
        assert_eq!(session.avatar(), None);

        session.on_avatar_set(&store, ActorId::new(0)).unwrap();
        assert_eq!(session.avatar(), Some(ActorId::new(0)));
        assert_eq!(session.base_scan_range(), 88.0);
    }

    #[test]
    fn test_scan_rate_and_range() {
        let mut store = store();
        let clock = ManualClock::new();
        let mut session = session(&clock, NetSyncConfig::default());
        session.on_avatar_set(&store, ActorId::new(0)).unwrap();

        assert_eq!(session.scan_rate(&store), 0.1);
        assert_eq!(session.scan_range(&store), 88.0 * 1.5);

        store
            .get_mut(ActorId::new(0))
            .unwrap()
            .set_pushee(KinematicState::grounded(Vec3::ZERO, Vec3::new(500.0, 0.0, 0.0)));
        assert_eq!(session.scan_rate(&store), 0.05);
        assert_eq!(session.scan_range(&store), 176.0);
    }

    #[test]
    fn test_update_pushes() {
        let store = store();
        let clock = ManualClock::new();
        let mut session = session(&clock, NetSyncConfig::default());

        assert!(session.update_pushes(&store, &candidates(&store)).is_empty());

        session.on_avatar_set(&store, ActorId::new(0)).unwrap();
        let pushers: Vec<_> = session
            .update_pushes(&store, &candidates(&store))
            .iter()
            .map(|o| o.pusher)
            .collect();
        assert_eq!(pushers, vec![ActorId::new(1), ActorId::new(2)]);

        session.ignore(ActorId::new(1));
        let options = session.update_pushes(&store, &candidates(&store));
        assert_eq!(options.len(), 1);
        assert_eq!(options[0].pusher, ActorId::new(2));
        assert_eq!(options[0].pusher_location, Vec3::new(0.0, 60.0, 0.0));
    }

    #[test]
    fn test_trigger_push_requires_avatar() {
        let store = store();
        let clock = ManualClock::new();
        let mut session = session(&clock, NetSyncConfig::default());
        session.on_avatar_set(&store, ActorId::new(0)).unwrap();
        let option = session.update_pushes(&store, &candidates(&store))[0].clone();

        let mut unbound = PushScanSession::new(
            clock.clone(),
            AbilityId::new("push"),
            ScanParams::default(),
            NetSyncConfig::default(),
        );
        assert!(matches!(
            unbound.trigger_push(&option, 1.0, false),
            Err(Error::NoAvatar)
        ));
    }

    #[test]
    fn test_trigger_push_event() {
        let store = store();
        let clock = ManualClock::new();
        let mut session = session(&clock, NetSyncConfig::default());
        session.on_avatar_set(&store, ActorId::new(0)).unwrap();
        let option = session.update_pushes(&store, &candidates(&store))[0].clone();

        let pushed = session.trigger_push(&option, 0.5, true).unwrap();
        assert!(!pushed.sync_due);
        assert_eq!(pushed.event.instigator, Some(ActorId::new(0)));
        assert_eq!(pushed.event.target, Some(ActorId::new(1)));

        let data = crate::extract_push_data(&pushed.event, false);
        assert_eq!(data.direction(), Vec3::X);
        assert_eq!(data.distance(), 60.0);
        assert_eq!(data.strength_scalar(), 0.5);
        assert!(data.override_strength());
    }

    #[test]
    fn test_sync_after_push_count() {
        let store = store();
        let clock = ManualClock::new();
        let config = NetSyncConfig {
            max_pushes_until_sync: 2,
            min_sync_delay: 0.5,
            ..NetSyncConfig::default()
        };
        let mut session = session(&clock, config);
        session.on_avatar_set(&store, ActorId::new(0)).unwrap();
        let option = session.update_pushes(&store, &candidates(&store))[0].clone();

        clock.advance(0.1);
        assert!(!session.trigger_push(&option, 1.0, false).unwrap().sync_due);
        clock.advance(0.1);
        assert!(!session.trigger_push(&option, 1.0, false).unwrap().sync_due);
        assert!(!session.should_force_sync());

        clock.advance(1.0);
        assert!(session.should_force_sync());

        session.consume_sync();
        assert!(!session.should_force_sync());
        assert_eq!(session.throttle().state().pushes_since_last_sync, 0);
    }
}
