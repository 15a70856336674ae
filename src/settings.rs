use crate::config::{TreeOptions, DEFAULT_ORIGIN, DEFAULT_TIME_STEP, DEFAULT_WAIT};
use crate::error::{FractalError, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// User defaults from `~/.config/fractree/config.toml`
#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    #[serde(default)]
    pub tree: TreeSettings,
    #[serde(default)]
    pub draw: DrawSettings,
}

#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct TreeSettings {
    pub depth: Option<i64>,
    pub length: Option<f64>,
    pub angle: Option<f64>,   // Degrees
    pub color: Option<String>,
    pub rainbow: Option<bool>,
    pub middle_branch: Option<bool>,
}

#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct DrawSettings {
    pub time: Option<f32>,    // Seconds per pen command in live mode
    pub wait: Option<f64>,    // Seconds between trees in infinite mode
    pub origin_x: Option<f64>,
    pub origin_y: Option<f64>,
}

/// Tree flags given on the command line; `None` defers to settings
#[derive(Debug, Default, Clone)]
pub struct TreeOverrides {
    pub depth: Option<i64>,
    pub length: Option<f64>,
    pub angle: Option<f64>,
    pub color: Option<String>,
    pub rainbow: bool,
    pub middle_branch: bool,
}

impl Settings {
    /// Load the user settings file; a missing file means defaults
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .map_err(|e| FractalError::config(format!("cannot read {}: {}", path.display(), e)))?;
        Self::parse(&content)
            .map_err(|e| FractalError::config(format!("{}: {}", path.display(), e)))
    }

    pub fn parse(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("fractree")
            .join("config.toml")
    }

    /// Merge command line flags over file settings over built-in defaults.
    /// Boolean flags can only switch a feature on.
    pub fn tree_options(&self, cli: &TreeOverrides) -> TreeOptions {
        let defaults = TreeOptions::default();
        let tree = &self.tree;
        TreeOptions {
            depth: cli.depth.or(tree.depth).unwrap_or(defaults.depth),
            length: cli.length.or(tree.length).unwrap_or(defaults.length),
            angle: cli.angle.or(tree.angle).unwrap_or(defaults.angle),
            color: cli
                .color
                .clone()
                .or_else(|| tree.color.clone())
                .unwrap_or(defaults.color),
            rainbow: cli.rainbow || tree.rainbow.unwrap_or(defaults.rainbow),
            middle_branch: cli.middle_branch || tree.middle_branch.unwrap_or(defaults.middle_branch),
        }
    }

    pub fn time_step(&self, cli: Option<f32>) -> Result<f32> {
        let step = cli.or(self.draw.time).unwrap_or(DEFAULT_TIME_STEP);
        delay("time", step as f64)?;
        Ok(step.max(0.0))
    }

    pub fn time_wait(&self, cli: Option<f64>) -> Result<f64> {
        delay("wait", cli.or(self.draw.wait).unwrap_or(DEFAULT_WAIT))
    }

    pub fn origin(&self, x: Option<f64>, y: Option<f64>) -> (f64, f64) {
        (
            x.or(self.draw.origin_x).unwrap_or(DEFAULT_ORIGIN.0),
            y.or(self.draw.origin_y).unwrap_or(DEFAULT_ORIGIN.1),
        )
    }
}

/// Negative delays mean no delay; anything a `Duration` cannot hold is rejected
fn delay(name: &str, seconds: f64) -> Result<f64> {
    let seconds = if seconds < 0.0 { 0.0 } else { seconds };
    Duration::try_from_secs_f64(seconds)
        .map(|_| seconds)
        .map_err(|_| FractalError::config(format!("{} must be a finite number of seconds, got {}", name, seconds)))
}
