//! Shove Netcode - Replicating predicted pushes
//!
//! This crate carries pushes between machines and keeps their prediction in
//! check:
//!
//! - **Target data**: fixed two-segment wire format for a push
//! - **Events**: reading a received push back into direction and strength
//! - **Net-sync throttle**: deciding when accumulated pushes need a sync point
//! - **Scan session**: per-avatar scanning that produces push options
//!
//! # Flow
//!
//! ```text
//!  pushee (local)                                   pusher
//!  ┌──────────────┐  options  ┌──────────────┐ event ┌───────────────┐
//!  │  Scan        │──────────▶│ trigger_push │──────▶│ extract_push  │
//!  │  Session     │           └──────┬───────┘       │ _data         │
//!  └──────────────┘                  │               └───────────────┘
//!                                    ▼
//!                            ┌──────────────┐
//!                            │  Throttle    │──▶ sync point
//!                            └──────────────┘
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use shove_netcode::{ManualClock, NetSyncConfig, PushScanSession};
//!
//! let clock = ManualClock::new();
//! let mut session = PushScanSession::new(clock.clone(), ability, scan_params, NetSyncConfig::default());
//! session.on_avatar_set(&store, avatar)?;
//!
//! loop {
//!     for option in session.update_pushes(&store, &overlaps).to_vec() {
//!         let pushed = session.trigger_push(&option, 1.0, false)?;
//!         send(pushed.event);
//!         if pushed.sync_due {
//!             force_sync();
//!             session.consume_sync();
//!         }
//!     }
//!     clock.advance(session.scan_rate(&store) as f64);
//! }
//! ```

pub mod clock;
mod error;
pub mod event;
pub mod net_sync;
pub mod session;
pub mod target_data;

pub use clock::{ManualClock, MonotonicClock, Seconds, SyncClock};
pub use error::{Error, Result};
pub use event::{extract_push_data, push_actors, resolve_push_event, PushEventData, ResolvedPush};
pub use net_sync::{NetSyncConfig, NetSyncState, NetSyncThrottle, SyncReason};
pub use session::{PushScanSession, TriggeredPush};
pub use target_data::{
    decode_segments, encode_segments, PushDirectionData, PushStrengthData, PushTargetData,
    QuantizedNormal, TargetData,
};
