//! Platform capability probing.
//!
//! The probe inspects a client-reported runtime environment and derives an
//! immutable [`CapabilityProfile`]: device and browser classification, sensor
//! and API availability, AR hand-off support, and a coarse performance tier.
//!
//! Environment access goes through the [`RuntimeEnv`] trait so the probe
//! itself stays pure: given a fixed environment, [`detect`] is idempotent and
//! never fails. A feature the environment cannot answer for is simply absent.
//!
//! # Example
//!
//! ```
//! use solefit::platform::{detect, EnvSnapshot, Feature};
//!
//! let env = EnvSnapshot::new("Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X) Safari/605.1")
//!     .with_feature(Feature::WebGl)
//!     .with_feature(Feature::Camera);
//! let profile = detect(&env);
//! assert!(profile.device.is_mobile());
//! ```

mod detect;
mod env;
mod gpu;
mod profile;

pub use detect::{detect, detect_with_table};
pub use env::{EnvSnapshot, Feature, RuntimeEnv};
pub use gpu::{GpuInfo, GpuTierTable};
pub use profile::{
    ArSupport, BrowserFamily, CapabilityProfile, Capabilities, DeviceClass, HandoffMode, OsFamily,
};
