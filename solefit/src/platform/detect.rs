//! The probe itself: classification of the identification string and
//! derivation of AR support, performance tier, and hand-off mode.

use tracing::debug;

use crate::quality::QualityTier;

use super::env::{Feature, RuntimeEnv};
use super::gpu::GpuTierTable;
use super::profile::{
    ArSupport, BrowserFamily, Capabilities, CapabilityProfile, DeviceClass, HandoffMode, OsFamily,
};

/// Memory assumed when the client does not report any, in GB.
const DEFAULT_MEMORY_GB: f64 = 4.0;

/// Probe the environment and derive a capability profile.
///
/// Pure and idempotent for a fixed environment; callers should run it once
/// at startup and keep the result. Probing never fails: anything the
/// environment cannot answer is treated as absent.
pub fn detect(env: &dyn RuntimeEnv) -> CapabilityProfile {
    detect_with_table(env, &GpuTierTable::default())
}

/// [`detect`] with a caller-supplied GPU tier table.
pub fn detect_with_table(env: &dyn RuntimeEnv, gpu_table: &GpuTierTable) -> CapabilityProfile {
    let ua = env.identification();
    let device = classify_device(ua);
    let os = classify_os(ua);
    let browser = classify_browser(ua);
    let capabilities = collect_capabilities(env);
    let ar = derive_ar_support(os, browser, &capabilities, env);
    let gpu = gpu_table.info(env.gpu_vendor(), env.gpu_renderer());
    let performance_tier = estimate_tier(device, env.device_memory_gb(), gpu.tier);
    let recommended_mode = recommend_mode(&ar, &capabilities);

    debug!(
        device = ?device,
        os = ?os,
        browser = ?browser,
        tier = %performance_tier,
        mode = %recommended_mode,
        "capability profile derived"
    );

    CapabilityProfile {
        device,
        os,
        browser,
        capabilities,
        ar,
        gpu,
        performance_tier,
        recommended_mode,
    }
}

/// Case-insensitive substring check, matching the original pattern tests.
fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_ascii_lowercase().contains(&needle.to_ascii_lowercase())
}

/// Classify the device from the identification string.
///
/// First-match-wins and order matters: phone-or-tablet markers are checked
/// before anything counts as a desktop.
fn classify_device(ua: &str) -> DeviceClass {
    let ios = contains_ci(ua, "iPhone") || contains_ci(ua, "iPad") || contains_ci(ua, "iPod");
    let android = contains_ci(ua, "Android");
    let tablet = contains_ci(ua, "iPad") || (android && contains_ci(ua, "Tablet"));
    let mobile = contains_ci(ua, "Mobi") || android || ios;

    if tablet {
        DeviceClass::Tablet
    } else if mobile {
        DeviceClass::Phone
    } else {
        DeviceClass::Desktop
    }
}

fn classify_os(ua: &str) -> OsFamily {
    if contains_ci(ua, "iPhone") || contains_ci(ua, "iPad") || contains_ci(ua, "iPod") {
        OsFamily::Ios
    } else if contains_ci(ua, "Android") {
        OsFamily::Android
    } else if ua.contains("Windows") {
        OsFamily::Windows
    } else if ua.contains("Mac") {
        OsFamily::MacOs
    } else if ua.contains("Linux") {
        OsFamily::Linux
    } else {
        OsFamily::Unknown
    }
}

fn classify_browser(ua: &str) -> BrowserFamily {
    if ua.contains("Chrome") && !ua.contains("Edg") {
        BrowserFamily::Chrome
    } else if ua.contains("Firefox") {
        BrowserFamily::Firefox
    } else if ua.contains("Safari") && !ua.contains("Chrome") {
        BrowserFamily::Safari
    } else if ua.contains("Edg") {
        BrowserFamily::Edge
    } else {
        BrowserFamily::Unknown
    }
}

fn collect_capabilities(env: &dyn RuntimeEnv) -> Capabilities {
    Capabilities {
        webgl: env.has_feature(Feature::WebGl),
        webgl2: env.has_feature(Feature::WebGl2),
        webxr: env.has_feature(Feature::WebXr),
        camera: env.has_feature(Feature::Camera),
        device_motion: env.has_feature(Feature::DeviceMotion),
        device_orientation: env.has_feature(Feature::DeviceOrientation),
        touch: env.has_feature(Feature::Touch),
        accelerometer: env.has_feature(Feature::Accelerometer),
        gyroscope: env.has_feature(Feature::Gyroscope),
    }
}

fn derive_ar_support(
    os: OsFamily,
    browser: BrowserFamily,
    capabilities: &Capabilities,
    env: &dyn RuntimeEnv,
) -> ArSupport {
    let mut support = ArSupport {
        webxr: capabilities.webxr,
        ..ArSupport::default()
    };

    if os == OsFamily::Ios && browser == BrowserFamily::Safari {
        support.arkit = true;
        support.quick_look = true;
    }
    if os == OsFamily::Android && browser == BrowserFamily::Chrome {
        support.arcore = true;
        support.scene_viewer = true;
    }
    support.model_viewer = env.has_feature(Feature::ModelViewerHost);

    support
}

/// Pick the best hand-off mode for this client, in fixed priority order.
fn recommend_mode(ar: &ArSupport, capabilities: &Capabilities) -> HandoffMode {
    if ar.quick_look {
        HandoffMode::QuickLook
    } else if ar.scene_viewer {
        HandoffMode::SceneViewer
    } else if ar.webxr {
        HandoffMode::WebXr
    } else if ar.model_viewer {
        HandoffMode::ModelViewer
    } else if capabilities.webgl && capabilities.camera {
        HandoffMode::Webcam
    } else {
        HandoffMode::None
    }
}

/// Estimate the performance tier from device class, memory, and GPU tier.
fn estimate_tier(device: DeviceClass, memory_gb: Option<f64>, gpu_tier: u8) -> QualityTier {
    let memory_gb = memory_gb.unwrap_or(DEFAULT_MEMORY_GB);
    match device {
        DeviceClass::Desktop => QualityTier::High,
        DeviceClass::Tablet => QualityTier::Medium,
        DeviceClass::Phone => {
            if memory_gb >= 6.0 && gpu_tier >= 2 {
                QualityTier::High
            } else if memory_gb >= 3.0 && gpu_tier >= 1 {
                QualityTier::Medium
            } else {
                QualityTier::Low
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::env::EnvSnapshot;

    const IPHONE_SAFARI: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X) \
         AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.0 Mobile/15E148 Safari/604.1";
    const PIXEL_CHROME: &str = "Mozilla/5.0 (Linux; Android 14; Pixel 8) AppleWebKit/537.36 \
         (KHTML, like Gecko) Chrome/120.0.0.0 Mobile Safari/537.36";
    const DESKTOP_CHROME: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
         (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
    const DESKTOP_EDGE: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
         (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36 Edg/120.0.0.0";

    #[test]
    fn test_iphone_safari_gets_quick_look() {
        let profile = detect(&EnvSnapshot::new(IPHONE_SAFARI));
        assert_eq!(profile.device, DeviceClass::Phone);
        assert_eq!(profile.os, OsFamily::Ios);
        assert_eq!(profile.browser, BrowserFamily::Safari);
        assert!(profile.ar.quick_look && profile.ar.arkit);
        assert_eq!(profile.recommended_mode, HandoffMode::QuickLook);
    }

    #[test]
    fn test_android_chrome_gets_scene_viewer() {
        let profile = detect(&EnvSnapshot::new(PIXEL_CHROME));
        assert_eq!(profile.device, DeviceClass::Phone);
        assert_eq!(profile.browser, BrowserFamily::Chrome);
        assert!(profile.ar.scene_viewer && profile.ar.arcore);
        assert_eq!(profile.recommended_mode, HandoffMode::SceneViewer);
    }

    #[test]
    fn test_desktop_falls_back_to_webcam() {
        let env = EnvSnapshot::new(DESKTOP_CHROME)
            .with_feature(Feature::WebGl)
            .with_feature(Feature::Camera);
        let profile = detect(&env);
        assert_eq!(profile.device, DeviceClass::Desktop);
        assert_eq!(profile.recommended_mode, HandoffMode::Webcam);
    }

    #[test]
    fn test_webxr_preferred_over_model_viewer() {
        let env = EnvSnapshot::new(DESKTOP_CHROME)
            .with_feature(Feature::WebXr)
            .with_feature(Feature::ModelViewerHost);
        let profile = detect(&env);
        assert_eq!(profile.recommended_mode, HandoffMode::WebXr);
    }

    #[test]
    fn test_bare_client_gets_no_mode() {
        let profile = detect(&EnvSnapshot::new("curl/8.0"));
        assert_eq!(profile.recommended_mode, HandoffMode::None);
    }

    #[test]
    fn test_edge_is_not_chrome() {
        let profile = detect(&EnvSnapshot::new(DESKTOP_EDGE));
        assert_eq!(profile.browser, BrowserFamily::Edge);
    }

    #[test]
    fn test_ipad_is_tablet() {
        let ua = "Mozilla/5.0 (iPad; CPU OS 17_0 like Mac OS X) AppleWebKit/605.1.15 Safari/604.1";
        let profile = detect(&EnvSnapshot::new(ua));
        assert_eq!(profile.device, DeviceClass::Tablet);
        assert_eq!(profile.performance_tier, QualityTier::Medium);
        assert_eq!(profile.target_fps(), 30);
    }

    #[test]
    fn test_desktop_is_high_tier_at_sixty_fps() {
        let profile = detect(&EnvSnapshot::new(DESKTOP_CHROME));
        assert_eq!(profile.performance_tier, QualityTier::High);
        assert_eq!(profile.target_fps(), 60);
        assert_eq!(profile.tier_ceiling(), QualityTier::High);
    }

    #[test]
    fn test_phone_tier_uses_memory_and_gpu() {
        let strong = EnvSnapshot::new(PIXEL_CHROME)
            .with_memory_gb(8.0)
            .with_gpu("Qualcomm", "Adreno (TM) 740");
        assert_eq!(detect(&strong).performance_tier, QualityTier::High);

        let mid = EnvSnapshot::new(PIXEL_CHROME)
            .with_memory_gb(4.0)
            .with_gpu("Qualcomm", "Adreno (TM) 540");
        assert_eq!(detect(&mid).performance_tier, QualityTier::Medium);

        let weak = EnvSnapshot::new(PIXEL_CHROME).with_memory_gb(2.0);
        let weak_profile = detect(&weak);
        assert_eq!(weak_profile.performance_tier, QualityTier::Low);
        assert_eq!(weak_profile.tier_ceiling(), QualityTier::Low);
    }

    #[test]
    fn test_unreported_memory_defaults_to_midrange() {
        let env = EnvSnapshot::new(PIXEL_CHROME).with_gpu("Qualcomm", "Adreno (TM) 540");
        assert_eq!(detect(&env).performance_tier, QualityTier::Medium);
    }

    #[test]
    fn test_probe_is_deterministic() {
        let env = EnvSnapshot::new(PIXEL_CHROME)
            .with_memory_gb(6.0)
            .with_gpu("Qualcomm", "Adreno (TM) 740")
            .with_feature(Feature::WebGl)
            .with_feature(Feature::Camera);
        assert_eq!(detect(&env), detect(&env));
    }
}
