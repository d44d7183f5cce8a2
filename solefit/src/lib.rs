//! SoleFit - AR shoe try-on engine core
//!
//! This library provides the logic core of an augmented-reality shoe try-on
//! experience: capability probing of the client runtime, device-adaptive
//! rendering quality, an asynchronous model cache with fallback geometry,
//! foot placement from pose landmarks, and platform AR hand-off links.
//!
//! Camera capture, pose inference, and rasterization are performed by
//! external collaborators; SoleFit consumes their outputs (an environment
//! snapshot, landmark frames) and hands positioned scene-graph data back.

pub mod app;
pub mod config;
pub mod handoff;
pub mod model;
pub mod perf;
pub mod platform;
pub mod quality;
pub mod telemetry;
pub mod track;

pub use app::{AppError, SoleFitEngine};
pub use config::AppConfig;
pub use model::{LoadState, ModelCache, ModelEntry, ModelId};
pub use perf::PerfController;
pub use platform::{detect, CapabilityProfile, EnvSnapshot, RuntimeEnv};
pub use quality::{QualitySettings, QualityTier};
pub use track::{FootPlacement, FootTracker, PoseFrame};
