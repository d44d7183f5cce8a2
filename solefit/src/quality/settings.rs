//! Per-tier rendering and tracking parameter bundles.

use std::time::Duration;

use super::QualityTier;

/// A capture/render resolution cap in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Rendering parameters for a quality tier.
///
/// The renderer configuration call site reads these after every tier change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QualitySettings {
    /// Resolution cap applied to the camera feed and render target.
    pub resolution: Resolution,
    /// Whether shadow casting/receiving is enabled.
    pub shadows: bool,
    /// Whether antialiasing is enabled.
    pub antialiasing: bool,
    /// Maximum texture edge length in pixels.
    pub max_texture_size: u32,
    /// Render every Nth frame; 1 means no frames are skipped.
    pub frame_skip: u32,
    /// Pose model complexity hint passed to the external estimator (0-2).
    pub model_complexity: u8,
}

impl QualitySettings {
    /// Settings bundle for the given tier.
    pub fn for_tier(tier: QualityTier) -> Self {
        match tier {
            QualityTier::High => Self {
                resolution: Resolution::new(1280, 720),
                shadows: true,
                antialiasing: true,
                max_texture_size: 1024,
                frame_skip: 1,
                model_complexity: 2,
            },
            QualityTier::Medium => Self {
                resolution: Resolution::new(640, 480),
                shadows: true,
                antialiasing: false,
                max_texture_size: 512,
                frame_skip: 1,
                model_complexity: 1,
            },
            QualityTier::Low => Self {
                resolution: Resolution::new(320, 240),
                shadows: false,
                antialiasing: false,
                max_texture_size: 256,
                // Render every other frame on constrained devices.
                frame_skip: 2,
                model_complexity: 0,
            },
        }
    }
}

/// Tracking parameters for a quality tier.
///
/// Constrained devices process landmarks less often and demand higher
/// detection confidence before trusting an estimate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackerSettings {
    /// Interval between tracking updates.
    pub interval: Duration,
    /// Minimum detection confidence requested from the estimator.
    pub min_detection_confidence: f32,
    /// Minimum tracking confidence requested from the estimator.
    pub min_tracking_confidence: f32,
}

impl TrackerSettings {
    /// Tracker settings bundle for the given tier.
    pub fn for_tier(tier: QualityTier) -> Self {
        match tier {
            QualityTier::Low => Self {
                interval: Duration::from_millis(200),
                min_detection_confidence: 0.7,
                min_tracking_confidence: 0.7,
            },
            QualityTier::Medium | QualityTier::High => Self {
                interval: Duration::from_millis(100),
                min_detection_confidence: 0.5,
                min_tracking_confidence: 0.5,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shadows_disabled_only_at_low() {
        assert!(!QualitySettings::for_tier(QualityTier::Low).shadows);
        assert!(QualitySettings::for_tier(QualityTier::Medium).shadows);
        assert!(QualitySettings::for_tier(QualityTier::High).shadows);
    }

    #[test]
    fn test_antialiasing_only_at_high() {
        assert!(QualitySettings::for_tier(QualityTier::High).antialiasing);
        assert!(!QualitySettings::for_tier(QualityTier::Medium).antialiasing);
    }

    #[test]
    fn test_frame_skip_at_low() {
        assert_eq!(QualitySettings::for_tier(QualityTier::Low).frame_skip, 2);
        assert_eq!(QualitySettings::for_tier(QualityTier::High).frame_skip, 1);
    }

    #[test]
    fn test_texture_sizes_descend_with_tier() {
        let high = QualitySettings::for_tier(QualityTier::High).max_texture_size;
        let medium = QualitySettings::for_tier(QualityTier::Medium).max_texture_size;
        let low = QualitySettings::for_tier(QualityTier::Low).max_texture_size;
        assert!(high > medium && medium > low);
    }

    #[test]
    fn test_tracker_settings_slower_and_stricter_at_low() {
        let low = TrackerSettings::for_tier(QualityTier::Low);
        let high = TrackerSettings::for_tier(QualityTier::High);
        assert!(low.interval > high.interval);
        assert!(low.min_detection_confidence > high.min_detection_confidence);
    }
}
