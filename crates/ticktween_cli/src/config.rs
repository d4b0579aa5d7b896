//! Demo configuration file handling

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use ticktween_animation::{AnimationCancellationOptions, Easing};

/// Top-level demo configuration (ticktween.toml)
#[derive(Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct DemoConfig {
    #[serde(default)]
    pub animation: AnimationConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

/// Timing and shape of the animation
#[derive(Debug, Deserialize, Serialize, PartialEq)]
pub struct AnimationConfig {
    /// Length of one forward run
    #[serde(default = "default_duration_ms")]
    pub duration_ms: u64,
    /// Tick rate of the driving clock
    #[serde(default = "default_fps")]
    pub fps: u32,
    #[serde(default)]
    pub easing: EasingName,
    /// Play each run backwards once it reaches the end
    #[serde(default = "default_true")]
    pub ping_pong: bool,
    /// What the final frame shows when the demo is cancelled
    #[serde(default)]
    pub cancellation: CancellationName,
}

fn default_duration_ms() -> u64 {
    1000
}

fn default_fps() -> u32 {
    60
}

fn default_true() -> bool {
    true
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            duration_ms: default_duration_ms(),
            fps: default_fps(),
            easing: EasingName::default(),
            ping_pong: true,
            cancellation: CancellationName::default(),
        }
    }
}

impl AnimationConfig {
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }

    pub fn tick_period(&self) -> Duration {
        Duration::from_secs_f64(1.0 / f64::from(self.fps.max(1)))
    }
}

/// Console drawing settings
#[derive(Debug, Deserialize, Serialize, PartialEq)]
pub struct DisplayConfig {
    /// Width of the widest row, in characters
    #[serde(default = "default_diameter")]
    pub diameter: usize,
}

fn default_diameter() -> usize {
    21
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            diameter: default_diameter(),
        }
    }
}

/// Easing preset names accepted in the config file and on the command line
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum EasingName {
    Linear,
    Quadratic,
    Cubic,
    EaseOutQuad,
    EaseOutCubic,
    EaseInOutQuad,
    EaseInOutCubic,
    #[default]
    Bounce,
}

impl From<EasingName> for Easing {
    fn from(name: EasingName) -> Self {
        match name {
            EasingName::Linear => Easing::Linear,
            EasingName::Quadratic => Easing::EaseInQuad,
            EasingName::Cubic => Easing::EaseInCubic,
            EasingName::EaseOutQuad => Easing::EaseOutQuad,
            EasingName::EaseOutCubic => Easing::EaseOutCubic,
            EasingName::EaseInOutQuad => Easing::EaseInOutQuad,
            EasingName::EaseInOutCubic => Easing::EaseInOutCubic,
            EasingName::Bounce => Easing::EaseOutBounce,
        }
    }
}

/// Cancellation behaviour names
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum CancellationName {
    #[default]
    Keep,
    Start,
    End,
}

impl From<CancellationName> for AnimationCancellationOptions {
    fn from(name: CancellationName) -> Self {
        match name {
            CancellationName::Keep => AnimationCancellationOptions::KeepLastValue,
            CancellationName::Start => AnimationCancellationOptions::SnapToStart,
            CancellationName::End => AnimationCancellationOptions::SnapToEnd,
        }
    }
}

impl DemoConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        Self::from_toml_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: DemoConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the demo cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.animation.fps == 0 {
            anyhow::bail!("animation.fps must be at least 1");
        }
        if self.display.diameter == 0 {
            anyhow::bail!("display.diameter must be at least 1");
        }
        Ok(())
    }

    /// Serialize to TOML string
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }
}
