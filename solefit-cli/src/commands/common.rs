//! Shared argument types for commands that need a client environment.

use std::fs;
use std::path::PathBuf;

use clap::Args;
use solefit::platform::{EnvSnapshot, Feature};

/// Desktop Chrome, the default when no environment is given.
const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Client environment description, from a JSON snapshot file or flags.
#[derive(Debug, Args)]
pub struct EnvArgs {
    /// Read the environment snapshot from a JSON file (overrides flags).
    #[arg(long, value_name = "FILE")]
    pub env_file: Option<PathBuf>,

    /// Client identification string.
    #[arg(long, default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    /// Reported device memory in GB.
    #[arg(long)]
    pub memory_gb: Option<f64>,

    /// Unmasked GPU vendor string.
    #[arg(long)]
    pub gpu_vendor: Option<String>,

    /// Unmasked GPU renderer string.
    #[arg(long)]
    pub gpu_renderer: Option<String>,

    /// Available feature, repeatable (webgl, webgl2, webxr, camera,
    /// device_motion, device_orientation, touch, accelerometer, gyroscope,
    /// model_viewer_host).
    #[arg(long = "feature", value_name = "NAME")]
    pub features: Vec<String>,
}

impl EnvArgs {
    /// Build the environment snapshot this invocation describes.
    pub fn snapshot(&self) -> Result<EnvSnapshot, Box<dyn std::error::Error>> {
        if let Some(path) = &self.env_file {
            let content = fs::read_to_string(path)?;
            return Ok(serde_json::from_str(&content)?);
        }

        let mut env = EnvSnapshot::new(self.user_agent.clone());
        env.device_memory_gb = self.memory_gb;
        env.gpu_vendor = self.gpu_vendor.clone();
        env.gpu_renderer = self.gpu_renderer.clone();
        for name in &self.features {
            env.features.insert(parse_feature(name)?);
        }
        Ok(env)
    }
}

fn parse_feature(name: &str) -> Result<Feature, Box<dyn std::error::Error>> {
    let quoted = format!("\"{}\"", name.trim());
    serde_json::from_str(&quoted).map_err(|_| format!("unknown feature: {name}").into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_feature_names() {
        assert_eq!(parse_feature("webgl").unwrap(), Feature::WebGl);
        assert_eq!(parse_feature("model_viewer_host").unwrap(), Feature::ModelViewerHost);
        assert!(parse_feature("teleport").is_err());
    }
}
