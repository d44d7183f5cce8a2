//! `solefit handoff` - print AR hand-off links for a model.

use clap::Args;
use solefit::handoff::{handoff_link, quick_look_url, scene_viewer_intent};
use solefit::model::ModelId;
use solefit::platform::detect;
use solefit::AppConfig;

use super::common::EnvArgs;
use super::CommandResult;

#[derive(Debug, Args)]
pub struct HandoffArgs {
    /// Model identifier.
    pub id: String,

    /// Override the configured asset base URL.
    #[arg(long)]
    pub base_url: Option<String>,

    #[command(flatten)]
    pub env: EnvArgs,
}

pub fn run(args: HandoffArgs, config: &AppConfig) -> CommandResult {
    let origin = args
        .base_url
        .clone()
        .unwrap_or_else(|| config.asset_base_url.clone());
    let id = ModelId::new(args.id);

    println!("quick look:    {}", quick_look_url(&origin, &id));
    println!("scene viewer:  {}", scene_viewer_intent(&origin, &id));

    let profile = detect(&args.env.snapshot()?);
    match handoff_link(&profile, &origin, &id) {
        Some(link) => println!("recommended:   {} -> {}", link.mode, link.url),
        None => println!(
            "recommended:   {} (runs in place, no hand-off link)",
            profile.recommended_mode
        ),
    }

    Ok(())
}
