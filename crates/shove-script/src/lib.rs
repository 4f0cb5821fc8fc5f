//! Shove Script - RON loader for push tuning
//!
//! Loads tuning profiles from RON files. Each profile bundles:
//! - Strength curves and scalar (`ActionParams`)
//! - Scan cadence and range (`ScanParams`)
//! - Sync point thresholds (`NetSyncConfig`)
//! - Strength debug toggles

mod error;
mod loader;
mod profile;

pub use error::{Error, Result};
pub use loader::{Loader, TuningDefs};
pub use profile::{ProfileId, TuningProfile};
