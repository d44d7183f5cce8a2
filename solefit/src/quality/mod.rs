//! Rendering and tracking quality tiers.
//!
//! A [`QualityTier`] names a bundle of rendering/tracking parameters chosen
//! for the current device's estimated or measured performance. The tier is
//! derived once from the capability profile and afterwards adjusted only by
//! the performance controller, one step at a time.

mod settings;
mod tier;

pub use settings::{QualitySettings, Resolution, TrackerSettings};
pub use tier::QualityTier;
