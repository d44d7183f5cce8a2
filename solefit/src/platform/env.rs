//! Runtime environment access for the capability probe.
//!
//! The probe never touches platform APIs directly. Instead it queries a
//! [`RuntimeEnv`], the single seam through which the embedding client reports
//! what it knows about its host: the identification string, reported memory,
//! the GPU renderer string, and per-feature availability. A query the
//! environment cannot answer degrades to `false`/`None`, never an error.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// A runtime feature the probe can ask about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    /// Basic WebGL rendering context.
    WebGl,
    /// WebGL 2 rendering context.
    WebGl2,
    /// WebXR session API.
    WebXr,
    /// Camera / media device capture.
    Camera,
    /// Device motion events.
    DeviceMotion,
    /// Device orientation events.
    DeviceOrientation,
    /// Touch input.
    Touch,
    /// Accelerometer sensor API.
    Accelerometer,
    /// Gyroscope sensor API.
    Gyroscope,
    /// Host supports custom elements, i.e. can embed a model viewer.
    ModelViewerHost,
}

/// Read-only view of the client runtime.
///
/// Implementations must answer every query without failing; a feature probe
/// that would error on the client is reported as absent.
pub trait RuntimeEnv: Send + Sync {
    /// The platform/browser identification string (user agent).
    fn identification(&self) -> &str;

    /// Reported device memory in gigabytes, if the client exposes it.
    fn device_memory_gb(&self) -> Option<f64>;

    /// The unmasked GPU vendor string, if available.
    fn gpu_vendor(&self) -> Option<&str>;

    /// The unmasked GPU renderer string, if available.
    fn gpu_renderer(&self) -> Option<&str>;

    /// Whether the given feature is available on the client.
    fn has_feature(&self, feature: Feature) -> bool;
}

/// An explicitly constructed environment snapshot.
///
/// This is the normal production path: the embedding client probes its host
/// once (catching any probe failure into "absent") and ships the result as a
/// snapshot. It also serves as the test fixture type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnvSnapshot {
    /// Identification string, e.g. a browser user agent.
    pub user_agent: String,
    /// Reported device memory in GB.
    #[serde(default)]
    pub device_memory_gb: Option<f64>,
    /// Unmasked GPU vendor string.
    #[serde(default)]
    pub gpu_vendor: Option<String>,
    /// Unmasked GPU renderer string.
    #[serde(default)]
    pub gpu_renderer: Option<String>,
    /// Features the client found available.
    #[serde(default)]
    pub features: HashSet<Feature>,
}

impl EnvSnapshot {
    /// Create a snapshot with the given identification string and no features.
    pub fn new(user_agent: impl Into<String>) -> Self {
        Self {
            user_agent: user_agent.into(),
            ..Self::default()
        }
    }

    /// Mark a feature as available.
    pub fn with_feature(mut self, feature: Feature) -> Self {
        self.features.insert(feature);
        self
    }

    /// Set the reported device memory.
    pub fn with_memory_gb(mut self, gb: f64) -> Self {
        self.device_memory_gb = Some(gb);
        self
    }

    /// Set the GPU vendor/renderer strings.
    pub fn with_gpu(mut self, vendor: impl Into<String>, renderer: impl Into<String>) -> Self {
        self.gpu_vendor = Some(vendor.into());
        self.gpu_renderer = Some(renderer.into());
        self
    }
}

impl RuntimeEnv for EnvSnapshot {
    fn identification(&self) -> &str {
        &self.user_agent
    }

    fn device_memory_gb(&self) -> Option<f64> {
        self.device_memory_gb
    }

    fn gpu_vendor(&self) -> Option<&str> {
        self.gpu_vendor.as_deref()
    }

    fn gpu_renderer(&self) -> Option<&str> {
        self.gpu_renderer.as_deref()
    }

    fn has_feature(&self, feature: Feature) -> bool {
        self.features.contains(&feature)
    }
}
