//! `solefit report` - drive the performance controller with synthetic
//! frames and print what the adaptation logic does.

use std::sync::Arc;
use std::time::Duration;

use clap::Args;
use solefit::perf::PerfController;
use solefit::platform::detect;
use solefit::telemetry::EngineMetrics;

use super::common::EnvArgs;
use super::CommandResult;

#[derive(Debug, Args)]
pub struct ReportArgs {
    /// Number of synthetic frames to record.
    #[arg(long, default_value_t = 300)]
    pub frames: u32,

    /// Duration of each synthetic frame in milliseconds.
    #[arg(long, default_value_t = 16.7)]
    pub frame_ms: f64,

    /// Reassess after every this many frames.
    #[arg(long, default_value_t = 60)]
    pub reassess_every: u32,

    #[command(flatten)]
    pub env: EnvArgs,
}

pub fn run(args: ReportArgs) -> CommandResult {
    let profile = detect(&args.env.snapshot()?);
    let metrics = Arc::new(EngineMetrics::new());
    let controller = PerfController::from_profile(&profile, Arc::clone(&metrics));

    println!(
        "device {:?}, starting at tier {}, ceiling {}, target {} fps",
        profile.device,
        controller.tier(),
        controller.ceiling(),
        profile.target_fps()
    );

    let frame = Duration::from_secs_f64(args.frame_ms / 1000.0);
    for i in 1..=args.frames {
        controller.record_frame(frame);
        if args.reassess_every > 0 && i % args.reassess_every == 0 {
            let tier = controller.reassess();
            println!(
                "frame {i:>5}: avg {:.1}ms, {:.0} fps, tier {tier}",
                controller.average_frame_time().as_secs_f64() * 1000.0,
                controller.current_fps()
            );
        }
    }

    println!();
    println!("{}", metrics.snapshot());
    Ok(())
}
