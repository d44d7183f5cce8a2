//! The capability profile produced by the probe.

use std::fmt;

use crate::quality::QualityTier;

use super::gpu::GpuInfo;

/// Coarse device classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceClass {
    Phone,
    Tablet,
    Desktop,
}

impl DeviceClass {
    /// Phones and tablets target 30 fps; desktops target 60 fps.
    pub fn is_mobile(&self) -> bool {
        matches!(self, DeviceClass::Phone | DeviceClass::Tablet)
    }
}

/// Browser family recognized from the identification string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrowserFamily {
    Chrome,
    Firefox,
    Safari,
    Edge,
    Unknown,
}

/// Operating system family recognized from the identification string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OsFamily {
    Ios,
    Android,
    Windows,
    MacOs,
    Linux,
    Unknown,
}

/// Sensor and API availability flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Capabilities {
    pub webgl: bool,
    pub webgl2: bool,
    pub webxr: bool,
    pub camera: bool,
    pub device_motion: bool,
    pub device_orientation: bool,
    pub touch: bool,
    pub accelerometer: bool,
    pub gyroscope: bool,
}

/// AR hand-off availability flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ArSupport {
    /// WebXR sessions can be requested.
    pub webxr: bool,
    /// ARCore is expected (Android Chrome).
    pub arcore: bool,
    /// ARKit is expected (iOS Safari).
    pub arkit: bool,
    /// iOS Quick Look links will open a native viewer.
    pub quick_look: bool,
    /// Android Scene Viewer intents will open a native viewer.
    pub scene_viewer: bool,
    /// The host can embed a model-viewer element.
    pub model_viewer: bool,
}

/// The platform-specific external AR viewer a hand-off link targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandoffMode {
    /// iOS Quick Look via a USDZ link.
    QuickLook,
    /// Android Scene Viewer via an intent deep link.
    SceneViewer,
    /// In-browser WebXR session.
    WebXr,
    /// Embedded model-viewer element.
    ModelViewer,
    /// Camera-overlay try-on without a native AR viewer.
    Webcam,
    /// No AR experience is possible on this client.
    None,
}

impl fmt::Display for HandoffMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            HandoffMode::QuickLook => "quicklook",
            HandoffMode::SceneViewer => "sceneviewer",
            HandoffMode::WebXr => "webxr",
            HandoffMode::ModelViewer => "modelviewer",
            HandoffMode::Webcam => "webcam",
            HandoffMode::None => "none",
        };
        write!(f, "{name}")
    }
}

/// Immutable snapshot of everything the probe learned about the client.
///
/// Created once at startup and read by every other component; it is never
/// mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct CapabilityProfile {
    pub device: DeviceClass,
    pub os: OsFamily,
    pub browser: BrowserFamily,
    pub capabilities: Capabilities,
    pub ar: ArSupport,
    pub gpu: GpuInfo,
    /// Performance tier estimated from device class, memory, and GPU tier.
    pub performance_tier: QualityTier,
    /// The hand-off mode the presentation layer should prefer.
    pub recommended_mode: HandoffMode,
}

impl CapabilityProfile {
    /// Target frame rate for the performance controller.
    pub fn target_fps(&self) -> u32 {
        if self.device.is_mobile() {
            30
        } else {
            60
        }
    }

    /// Highest tier the adaptation controller may ever reach.
    ///
    /// Devices estimated low-end are pinned at their initial tier; everyone
    /// else may climb to [`QualityTier::High`].
    pub fn tier_ceiling(&self) -> QualityTier {
        if self.performance_tier == QualityTier::Low {
            QualityTier::Low
        } else {
            QualityTier::High
        }
    }
}
