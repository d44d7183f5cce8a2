//! `solefit probe` - print the capability report for a client environment.

use clap::Args;
use solefit::platform::detect;
use solefit::quality::{QualitySettings, TrackerSettings};

use super::common::EnvArgs;
use super::CommandResult;

#[derive(Debug, Args)]
pub struct ProbeArgs {
    #[command(flatten)]
    pub env: EnvArgs,
}

pub fn run(args: ProbeArgs) -> CommandResult {
    let env = args.env.snapshot()?;
    let profile = detect(&env);

    println!("device:            {:?}", profile.device);
    println!("os:                {:?}", profile.os);
    println!("browser:           {:?}", profile.browser);
    println!(
        "gpu:               {} ({}), tier {}",
        profile.gpu.renderer, profile.gpu.vendor, profile.gpu.tier
    );
    println!("performance tier:  {}", profile.performance_tier);
    println!("tier ceiling:      {}", profile.tier_ceiling());
    println!("target fps:        {}", profile.target_fps());
    println!("recommended mode:  {}", profile.recommended_mode);

    let caps = profile.capabilities;
    println!(
        "capabilities:      webgl={} webgl2={} webxr={} camera={} motion={} orientation={} touch={}",
        caps.webgl, caps.webgl2, caps.webxr, caps.camera, caps.device_motion,
        caps.device_orientation, caps.touch
    );
    println!(
        "ar support:        quicklook={} sceneviewer={} webxr={} modelviewer={}",
        profile.ar.quick_look, profile.ar.scene_viewer, profile.ar.webxr, profile.ar.model_viewer
    );

    let quality = QualitySettings::for_tier(profile.performance_tier);
    println!(
        "quality settings:  {}x{}, shadows={}, aa={}, textures<={}, frame skip 1/{}",
        quality.resolution.width,
        quality.resolution.height,
        quality.shadows,
        quality.antialiasing,
        quality.max_texture_size,
        quality.frame_skip
    );
    let tracker = TrackerSettings::for_tier(profile.performance_tier);
    println!(
        "tracker settings:  every {}ms, detection>={}, tracking>={}",
        tracker.interval.as_millis(),
        tracker.min_detection_confidence,
        tracker.min_tracking_confidence
    );

    Ok(())
}
