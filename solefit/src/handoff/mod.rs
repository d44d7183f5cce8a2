//! AR hand-off link construction.
//!
//! Two external viewer protocols are supported: an iOS Quick Look link
//! pointing at a USDZ rendition of the model, and an Android Scene Viewer
//! intent deep link embedding the GLB URL. Both are string construction
//! only; no core logic depends on their content beyond the model path.

use crate::model::ModelId;
use crate::platform::{CapabilityProfile, HandoffMode};

/// A constructed hand-off link and the mode it targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandoffLink {
    pub mode: HandoffMode,
    pub url: String,
}

/// USDZ link for the iOS Quick Look viewer.
///
/// The presentation layer attaches `rel="ar"` semantics; the core only
/// builds the URL.
pub fn quick_look_url(origin: &str, id: &ModelId) -> String {
    format!("{}/models/{}.usdz", origin.trim_end_matches('/'), id)
}

/// GLB URL for the given model on the asset origin.
pub fn model_url(origin: &str, id: &ModelId) -> String {
    format!("{}/models/{}.glb", origin.trim_end_matches('/'), id)
}

/// Intent deep link for the Android Scene Viewer.
///
/// Embeds the absolute model URL twice: once as the AR payload and once as
/// the browser fallback for devices without ARCore.
pub fn scene_viewer_intent(origin: &str, id: &ModelId) -> String {
    let encoded = encode_component(&model_url(origin, id));
    format!(
        "intent://arvr.google.com/scene-viewer/1.0?file={encoded}&mode=ar_preferred\
         #Intent;scheme=https;package=com.google.ar.core;\
         action=android.intent.action.VIEW;S.browser_fallback_url={encoded};end;"
    )
}

/// Build the hand-off link matching the profile's recommended mode.
///
/// WebXR and webcam modes run in place rather than handing off to an
/// external viewer, so they produce no link.
pub fn handoff_link(profile: &CapabilityProfile, origin: &str, id: &ModelId) -> Option<HandoffLink> {
    let url = match profile.recommended_mode {
        HandoffMode::QuickLook => quick_look_url(origin, id),
        HandoffMode::SceneViewer => scene_viewer_intent(origin, id),
        HandoffMode::ModelViewer => model_url(origin, id),
        HandoffMode::WebXr | HandoffMode::Webcam | HandoffMode::None => return None,
    };
    Some(HandoffLink {
        mode: profile.recommended_mode,
        url,
    })
}

/// Percent-encode a URL for embedding as a query component.
///
/// Keeps the unreserved set plus the marks a browser's component encoder
/// leaves alone (`! ~ * ' ( )`).
fn encode_component(value: &str) -> String {
    let mut out = String::with_capacity(value.len() * 3);
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z'
            | b'a'..=b'z'
            | b'0'..=b'9'
            | b'-'
            | b'_'
            | b'.'
            | b'~'
            | b'!'
            | b'*'
            | b'\''
            | b'('
            | b')' => out.push(byte as char),
            _ => {
                out.push('%');
                out.push_str(&format!("{byte:02X}"));
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::{detect, EnvSnapshot};

    const IPHONE_SAFARI: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X) \
         AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.0 Mobile/15E148 Safari/604.1";
    const PIXEL_CHROME: &str = "Mozilla/5.0 (Linux; Android 14; Pixel 8) AppleWebKit/537.36 \
         (KHTML, like Gecko) Chrome/120.0.0.0 Mobile Safari/537.36";

    #[test]
    fn test_quick_look_url() {
        let url = quick_look_url("https://shop.example", &ModelId::new("2"));
        assert_eq!(url, "https://shop.example/models/2.usdz");
    }

    #[test]
    fn test_intent_embeds_encoded_model_url() {
        let intent = scene_viewer_intent("https://shop.example", &ModelId::new("2"));
        assert!(intent.starts_with("intent://arvr.google.com/scene-viewer/1.0?file="));
        assert!(intent.contains("https%3A%2F%2Fshop.example%2Fmodels%2F2.glb"));
        assert!(intent.contains("mode=ar_preferred"));
        assert!(intent.contains("package=com.google.ar.core"));
        assert!(intent.contains("S.browser_fallback_url="));
        assert!(intent.ends_with("end;"));
        // The raw URL must not leak unencoded into the query.
        assert!(!intent.contains("file=https://"));
    }

    #[test]
    fn test_handoff_link_follows_recommended_mode() {
        let ios = detect(&EnvSnapshot::new(IPHONE_SAFARI));
        let link = handoff_link(&ios, "https://shop.example", &ModelId::new("1")).unwrap();
        assert_eq!(link.mode, HandoffMode::QuickLook);
        assert!(link.url.ends_with("1.usdz"));

        let android = detect(&EnvSnapshot::new(PIXEL_CHROME));
        let link = handoff_link(&android, "https://shop.example", &ModelId::new("1")).unwrap();
        assert_eq!(link.mode, HandoffMode::SceneViewer);
        assert!(link.url.starts_with("intent://"));
    }

    #[test]
    fn test_no_link_without_external_viewer() {
        let profile = detect(&EnvSnapshot::new("curl/8.0"));
        assert_eq!(handoff_link(&profile, "https://shop.example", &ModelId::new("1")), None);
    }

    #[test]
    fn test_encode_component_preserves_unreserved() {
        assert_eq!(encode_component("abc-123_~.!*'()"), "abc-123_~.!*'()");
        assert_eq!(encode_component("a b"), "a%20b");
        assert_eq!(encode_component("?&="), "%3F%26%3D");
    }
}
