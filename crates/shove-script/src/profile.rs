//! Tuning profile schema

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use shove_core::{AbilityId, ActionParams, DebugToggles, ScanParams, StrengthResolver};
use shove_netcode::{NetSyncConfig, PushScanSession, SyncClock};
use std::fmt;

/// Name of a tuning profile (e.g. "default", "heavy")
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProfileId(String);

impl ProfileId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProfileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ProfileId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ProfileId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// All tuning for one kind of pushee
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TuningProfile {
    /// Unique identifier for this profile
    pub id: ProfileId,
    /// Ability granted to pushers found by the scan
    #[serde(default)]
    pub ability: AbilityId,
    /// Strength curves and scalar
    #[serde(default)]
    pub action: ActionParams,
    /// Scan cadence and range
    #[serde(default)]
    pub scan: ScanParams,
    /// Sync point thresholds
    #[serde(default)]
    pub net_sync: NetSyncConfig,
    #[serde(default)]
    pub debug: DebugToggles,
    /// Flatten received push directions to the horizontal plane
    #[serde(default)]
    pub force_2d: bool,
}

impl TuningProfile {
    /// Create a profile with default tuning
    pub fn new(id: impl Into<ProfileId>) -> Self {
        Self {
            id: id.into(),
            ability: AbilityId::default(),
            action: ActionParams::default(),
            scan: ScanParams::default(),
            net_sync: NetSyncConfig::default(),
            debug: DebugToggles::default(),
            force_2d: false,
        }
    }

    /// Reject rates, scalars and delays that are negative or not finite
    pub fn validate(&self) -> Result<()> {
        let checks: [(&str, f64); 8] = [
            ("scan.scan_rate", self.scan.scan_rate as f64),
            ("scan.scan_rate_accel", self.scan.scan_rate_accel as f64),
            ("scan.scan_range_scalar", self.scan.scan_range_scalar as f64),
            (
                "scan.scan_range_accel_scalar",
                self.scan.scan_range_accel_scalar as f64,
            ),
            ("action.strength_scalar", self.action.strength_scalar as f64),
            ("net_sync.min_sync_delay", self.net_sync.min_sync_delay),
            (
                "net_sync.sync_delay_after_push",
                self.net_sync.sync_delay_after_push,
            ),
            (
                "net_sync.sync_delay_without_push",
                self.net_sync.sync_delay_without_push,
            ),
        ];

        for (field, value) in checks {
            if !value.is_finite() || value < 0.0 {
                log::warn!("profile {}: {} = {} rejected", self.id, field, value);
                return Err(Error::InvalidValue {
                    profile: self.id.to_string(),
                    field: field.to_string(),
                    value,
                });
            }
        }
        Ok(())
    }

    /// Strength resolver honouring this profile's debug toggles
    pub fn strength_resolver(&self) -> StrengthResolver {
        StrengthResolver::new(self.debug)
    }

    /// Scan session using this profile's ability, scan and sync tuning
    pub fn session<C: SyncClock>(&self, clock: C) -> PushScanSession<C> {
        PushScanSession::new(clock, self.ability.clone(), self.scan, self.net_sync)
    }
}
