//! Probe settings

use std::path::Path;

use anyhow::{Context, Result};
use gfxshim_render::{wgpu, WorkingSetPolicy};
use serde::{Deserialize, Serialize};

/// Settings for `gfxshim-probe`, read from an optional JSON file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeSettings {
    /// `tracing_subscriber::EnvFilter` directives; `RUST_LOG` takes precedence.
    pub log_filter: String,
    pub power_preference: PowerPreference,
    pub working_set: WorkingSetPolicy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PowerPreference {
    None,
    LowPower,
    HighPerformance,
}

impl From<PowerPreference> for wgpu::PowerPreference {
    fn from(preference: PowerPreference) -> Self {
        match preference {
            PowerPreference::None => wgpu::PowerPreference::None,
            PowerPreference::LowPower => wgpu::PowerPreference::LowPower,
            PowerPreference::HighPerformance => wgpu::PowerPreference::HighPerformance,
        }
    }
}

impl ProbeSettings {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading settings from {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("parsing settings in {}", path.display()))
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}

impl Default for ProbeSettings {
    fn default() -> Self {
        Self {
            log_filter: "info".to_string(),
            power_preference: PowerPreference::HighPerformance,
            working_set: WorkingSetPolicy::default(),
        }
    }
}
