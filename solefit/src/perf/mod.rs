//! Performance adaptation.
//!
//! The controller consumes frame-time telemetry from the render loop and
//! periodically moves the quality tier one step at a time toward the
//! device's frame-rate target. Tier changes are published on a watch
//! channel so renderer and tracking configuration can react without
//! polling.

mod controller;
mod window;

pub use controller::{PerfController, PerfControllerConfig, DOWNGRADE_FACTOR, UPGRADE_FACTOR};
pub use window::FrameWindow;
