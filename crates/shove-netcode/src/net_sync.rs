//! Net-sync throttling for predicted pushes
//!
//! Client-predicted pushes slowly drift from the server's outcome. Forcing a
//! sync point on every push would be expensive, so the throttle decides when
//! enough has happened to warrant one:
//!
//! - **Push count**: `max_pushes_until_sync` pushes since the last sync, once
//!   `min_sync_delay` has passed since the latest push
//! - **After push**: `sync_delay_after_push` seconds since the latest push
//! - **Without push**: `sync_delay_without_push` seconds since the last sync
//!
//! Setting any threshold to 0 disables it. Once a threshold is met the
//! decision latches until [`NetSyncThrottle::consume_sync`] is called, so
//! further pushes cannot cancel a pending sync.

use crate::clock::Seconds;
use serde::{Deserialize, Serialize};

/// Thresholds that force a net sync
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetSyncConfig {
    /// When false no sync is ever forced and prediction will drift
    pub enabled: bool,
    /// Pushes allowed before a sync is required
    pub max_pushes_until_sync: u32,
    /// Cool-down after the latest push before a count-triggered sync
    pub min_sync_delay: Seconds,
    /// Sync once this long has passed since the latest push
    pub sync_delay_after_push: Seconds,
    /// Sync once this long has passed since the last sync
    pub sync_delay_without_push: Seconds,
}

impl Default for NetSyncConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_pushes_until_sync: 6,
            min_sync_delay: 1.0,
            sync_delay_after_push: 5.0,
            sync_delay_without_push: 12.0,
        }
    }
}

impl NetSyncConfig {
    /// A config that never forces a sync
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }
}

/// Counters and timestamps owned by one throttle
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct NetSyncState {
    pub pushes_since_last_sync: u32,
    pub last_push_time: Seconds,
    pub last_sync_time: Seconds,
}

/// Which threshold forced a sync
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SyncReason {
    PushCount,
    AfterPush,
    WithoutPush,
}

/// Decides when accumulated predicted pushes need a sync point
#[derive(Debug, Clone)]
pub struct NetSyncThrottle {
    config: NetSyncConfig,
    state: NetSyncState,
    pending: Option<SyncReason>,
}

impl NetSyncThrottle {
    /// Create a throttle whose timeline starts at 0
    pub fn new(config: NetSyncConfig) -> Self {
        Self::starting_at(config, 0.0)
    }

    /// Create a throttle treating `now` as the last sync
    pub fn starting_at(config: NetSyncConfig, now: Seconds) -> Self {
        Self {
            config,
            state: NetSyncState {
                pushes_since_last_sync: 0,
                last_push_time: now,
                last_sync_time: now,
            },
            pending: None,
        }
    }

    pub fn config(&self) -> &NetSyncConfig {
        &self.config
    }

    pub fn state(&self) -> &NetSyncState {
        &self.state
    }

    /// The latched reason, if a sync is pending
    pub fn pending(&self) -> Option<SyncReason> {
        self.pending
    }

    /// Record a push at `now`
    ///
    /// Thresholds met before this push are latched first, so the push
    /// resetting `last_push_time` cannot hide them.
    pub fn record_push(&mut self, now: Seconds) {
        self.latch(now);
        self.state.pushes_since_last_sync = self.state.pushes_since_last_sync.saturating_add(1);
        self.state.last_push_time = now;
    }

    /// Whether a sync point should be forced at `now`
    pub fn should_force_sync(&mut self, now: Seconds) -> bool {
        self.latch(now).is_some()
    }

    /// Evaluate the thresholds at `now` without latching
    pub fn evaluate(&self, now: Seconds) -> Option<SyncReason> {
        let config = &self.config;
        if !config.enabled {
            return None;
        }

        let state = &self.state;
        let since_push = now - state.last_push_time;
        let since_sync = now - state.last_sync_time;

        if state.pushes_since_last_sync > 0 {
            if config.max_pushes_until_sync > 0
                && state.pushes_since_last_sync >= config.max_pushes_until_sync
                && since_push >= config.min_sync_delay
            {
                return Some(SyncReason::PushCount);
            }

            if config.sync_delay_after_push > 0.0 && since_push >= config.sync_delay_after_push {
                return Some(SyncReason::AfterPush);
            }
        }

        if config.sync_delay_without_push > 0.0 && since_sync >= config.sync_delay_without_push {
            return Some(SyncReason::WithoutPush);
        }

        None
    }

    /// Mark the sync as performed at `now`
    pub fn consume_sync(&mut self, now: Seconds) {
        if let Some(reason) = self.pending.take() {
            log::debug!(
                "net sync consumed after {} pushes ({:?})",
                self.state.pushes_since_last_sync,
                reason
            );
        }
        self.state.pushes_since_last_sync = 0;
        self.state.last_sync_time = now;
    }

    fn latch(&mut self, now: Seconds) -> Option<SyncReason> {
        if self.pending.is_none() {
            self.pending = self.evaluate(now);
            if let Some(reason) = self.pending {
                log::trace!("net sync due at {:.3}s: {:?}", now, reason);
            }
        }
        self.pending
    }
}

impl Default for NetSyncThrottle {
    fn default() -> Self {
        Self::new(NetSyncConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn config(max: u32, min: f64, after: f64, without: f64) -> NetSyncConfig {
        NetSyncConfig {
            enabled: true,
            max_pushes_until_sync: max,
            min_sync_delay: min,
            sync_delay_after_push: after,
            sync_delay_without_push: without,
        }
    }

    #[test]
    fn test_push_count_waits_for_cool_down() {
        let mut throttle = NetSyncThrottle::new(config(3, 1.0, 0.0, 0.0));
        throttle.record_push(0.1);
        throttle.record_push(0.2);
        assert!(!throttle.should_force_sync(0.3));

        throttle.record_push(0.3);
        assert_eq!(throttle.state().pushes_since_last_sync, 3);
        // at threshold, but still inside the cool-down
        assert!(!throttle.should_force_sync(0.5));
        assert!(throttle.should_force_sync(1.5));
        assert_eq!(throttle.pending(), Some(SyncReason::PushCount));
    }

    #[test]
    fn test_push_count_without_cool_down() {
        let mut throttle = NetSyncThrottle::new(config(2, 0.0, 0.0, 0.0));
        throttle.record_push(1.0);
        assert!(!throttle.should_force_sync(1.0));
        throttle.record_push(1.0);
        assert!(throttle.should_force_sync(1.0));
    }

    #[test]
    fn test_after_push() {
        let mut throttle = NetSyncThrottle::new(config(0, 0.0, 5.0, 0.0));
        assert!(!throttle.should_force_sync(100.0));

        throttle.record_push(100.0);
        assert!(!throttle.should_force_sync(104.9));
        assert!(throttle.should_force_sync(105.0));
        assert_eq!(throttle.pending(), Some(SyncReason::AfterPush));
    }

    #[test]
    fn test_without_push() {
        let mut throttle = NetSyncThrottle::starting_at(config(0, 0.0, 0.0, 12.0), 3.0);
        assert!(!throttle.should_force_sync(14.0));
        assert!(throttle.should_force_sync(15.0));
        assert_eq!(throttle.pending(), Some(SyncReason::WithoutPush));
    }

    #[test]
    fn test_disabled() {
        let mut throttle = NetSyncThrottle::new(NetSyncConfig::disabled());
        for i in 0..100 {
            throttle.record_push(i as f64);
        }
        assert!(!throttle.should_force_sync(1_000.0));

        let mut throttle = NetSyncThrottle::new(config(0, 0.0, 0.0, 0.0));
        throttle.record_push(1.0);
        assert!(!throttle.should_force_sync(1_000.0));
    }

    #[test]
    fn test_latched_through_more_pushes() {
        let mut throttle = NetSyncThrottle::new(config(0, 0.0, 5.0, 0.0));
        throttle.record_push(0.0);
        assert!(throttle.should_force_sync(6.0));

        // a fresh push would reset the after-push timer, but the sync stays due
        throttle.record_push(6.0);
        assert!(throttle.should_force_sync(6.1));
    }

    #[test]
    fn test_threshold_met_between_polls_is_kept() {
        let mut throttle = NetSyncThrottle::new(config(0, 0.0, 5.0, 0.0));
        throttle.record_push(0.0);
        // never polled while due; the next push still latches it
        throttle.record_push(7.0);
        assert!(throttle.should_force_sync(7.0));
    }

    #[test]
    fn test_consume_resets() {
        let mut throttle = NetSyncThrottle::default();
        for i in 0..6 {
            throttle.record_push(i as f64 * 0.1);
        }
        assert!(throttle.should_force_sync(2.0));

        throttle.consume_sync(2.0);
        assert_eq!(throttle.state().pushes_since_last_sync, 0);
        assert_eq!(throttle.state().last_sync_time, 2.0);
        assert!(throttle.pending().is_none());
        assert!(!throttle.should_force_sync(2.0));
        assert!(!throttle.should_force_sync(13.9));
        assert!(throttle.should_force_sync(14.0));
    }

    #[test]
    fn test_config_from_ron() {
        let config: NetSyncConfig = ron::from_str("(max_pushes_until_sync: 3)").unwrap();
        assert_eq!(config.max_pushes_until_sync, 3);
        assert!(config.enabled);
        assert_eq!(config.sync_delay_without_push, 12.0);
    }

    proptest! {
        #[test]
        fn prop_should_force_sync_is_monotonic(
            steps in proptest::collection::vec((0.0f64..3.0, any::<bool>()), 1..60),
        ) {
            let mut throttle = NetSyncThrottle::default();
            let mut now = 0.0;
            let mut due = false;
            for (dt, push) in steps {
                now += dt;
                if push {
                    throttle.record_push(now);
                }
                let forced = throttle.should_force_sync(now);
                if due {
                    prop_assert!(forced);
                }
                due = forced;
            }
        }

        #[test]
        fn prop_consume_clears_decision(
            pushes in 0u32..20,
            elapsed in 0.0f64..11.9,
        ) {
            let mut throttle = NetSyncThrottle::default();
            for i in 0..pushes {
                throttle.record_push(i as f64);
            }
            let now = pushes as f64 + 1.0;
            throttle.consume_sync(now);
            prop_assert!(!throttle.should_force_sync(now + elapsed));
        }
    }
}
