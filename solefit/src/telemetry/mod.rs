//! Engine telemetry for observability and diagnostics.
//!
//! Components record events on lock-free atomic counters; views take a
//! point-in-time [`TelemetrySnapshot`] for display. Recording is cheap
//! enough to sit on the per-frame path.
//!
//! # Example
//!
//! ```
//! use solefit::telemetry::EngineMetrics;
//! use std::sync::Arc;
//!
//! let metrics = Arc::new(EngineMetrics::new());
//! metrics.frame_recorded();
//! metrics.model_loaded(false);
//!
//! let snapshot = metrics.snapshot();
//! assert_eq!(snapshot.frames, 1);
//! assert_eq!(snapshot.model_loads, 1);
//! ```

mod metrics;
mod snapshot;

pub use metrics::EngineMetrics;
pub use snapshot::TelemetrySnapshot;
