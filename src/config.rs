//! Configuration management
//!
//! The effective config is built in three layers, each overriding the last:
//! - a section preset (`projects`, `skills`, `contact`)
//! - an optional TOML file
//! - command-line flags
//!
//! ```toml
//! preset = "skills"
//!
//! [cursor]
//! lerp_factor = 0.2
//! hover_scale = 1.75
//! ```

use crate::error::ConfigError;
use crate::hover::DEFAULT_HOVER_SCALE;
use crate::integrator::DEFAULT_LERP_FACTOR;
use crate::render::DEFAULT_CENTER_OFFSET;
use crate::selector::Selector;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Parameters of one cursor effect instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectConfig {
    /// Fraction of the remaining distance covered per frame, in (0, 1]
    pub lerp_factor: f64,
    /// Cursor scale while over a hover target
    pub hover_scale: f64,
    /// Offset that centres the cursor element on the pointer (half its size)
    pub center_offset: f64,
    /// Class selector list naming the hover targets
    pub hover_selector: String,
    /// Track targets inserted or removed after mount
    pub observe_mutations: bool,
    /// Hide the cursor element on touch-capable windows
    pub hide_on_touch: bool,
}

impl EffectConfig {
    /// Checks every field and returns the parsed hover selector
    pub fn validate(&self) -> Result<Selector, ConfigError> {
        if !(self.lerp_factor > 0.0 && self.lerp_factor <= 1.0) {
            return Err(ConfigError::InvalidLerpFactor(self.lerp_factor));
        }
        if !(self.hover_scale.is_finite() && self.hover_scale > 0.0) {
            return Err(ConfigError::InvalidHoverScale(self.hover_scale));
        }
        if !(self.center_offset.is_finite() && self.center_offset >= 0.0) {
            return Err(ConfigError::InvalidCenterOffset(self.center_offset));
        }
        Ok(Selector::parse(&self.hover_selector)?)
    }

    /// Layers `file` and then `cli` over the chosen preset and validates the
    /// result. A preset given on the command line beats one in the file.
    pub fn resolve(
        cli_preset: Option<Preset>,
        file: Option<&ConfigFile>,
        cli: &ConfigOverrides,
    ) -> Result<Self, ConfigError> {
        let mut config = Preset::select(cli_preset, file).config();
        if let Some(file) = file {
            file.cursor.apply(&mut config);
        }
        cli.apply(&mut config);
        config.validate()?;
        Ok(config)
    }

    /// Renders the config as a loadable TOML file
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        let file = ConfigFile {
            preset: None,
            cursor: ConfigOverrides::from(self),
        };
        Ok(toml::to_string(&file)?)
    }
}

impl Default for EffectConfig {
    fn default() -> Self {
        Preset::default().config()
    }
}

/// The portfolio sections that carried a cursor, with their tuning
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    #[default]
    Projects,
    Skills,
    Contact,
}

impl Preset {
    /// The command-line preset, else the file's, else the default
    pub fn select(cli_preset: Option<Preset>, file: Option<&ConfigFile>) -> Preset {
        cli_preset
            .or_else(|| file.and_then(|f| f.preset))
            .unwrap_or_default()
    }

    pub fn config(self) -> EffectConfig {
        let (hover_scale, hover_selector) = match self {
            Preset::Projects => (DEFAULT_HOVER_SCALE, ".projects-box, .view-project-btn"),
            Preset::Skills => (1.7, ".skill-row"),
            Preset::Contact => (DEFAULT_HOVER_SCALE, ".btn, .social-card"),
        };
        EffectConfig {
            lerp_factor: DEFAULT_LERP_FACTOR,
            hover_scale,
            center_offset: DEFAULT_CENTER_OFFSET,
            hover_selector: hover_selector.to_string(),
            observe_mutations: true,
            hide_on_touch: true,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Preset::Projects => "Projects",
            Preset::Skills => "Skills",
            Preset::Contact => "Contact",
        }
    }
}

/// Optional per-field overrides, shared by the config file and the CLI
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lerp_factor: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hover_scale: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub center_offset: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hover_selector: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observe_mutations: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hide_on_touch: Option<bool>,
}

impl ConfigOverrides {
    pub fn apply(&self, config: &mut EffectConfig) {
        if let Some(v) = self.lerp_factor {
            config.lerp_factor = v;
        }
        if let Some(v) = self.hover_scale {
            config.hover_scale = v;
        }
        if let Some(v) = self.center_offset {
            config.center_offset = v;
        }
        if let Some(v) = &self.hover_selector {
            config.hover_selector = v.clone();
        }
        if let Some(v) = self.observe_mutations {
            config.observe_mutations = v;
        }
        if let Some(v) = self.hide_on_touch {
            config.hide_on_touch = v;
        }
    }
}

impl From<&EffectConfig> for ConfigOverrides {
    fn from(config: &EffectConfig) -> Self {
        ConfigOverrides {
            lerp_factor: Some(config.lerp_factor),
            hover_scale: Some(config.hover_scale),
            center_offset: Some(config.center_offset),
            hover_selector: Some(config.hover_selector.clone()),
            observe_mutations: Some(config.observe_mutations),
            hide_on_touch: Some(config.hide_on_touch),
        }
    }
}

/// On-disk configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preset: Option<Preset>,
    pub cursor: ConfigOverrides,
}

impl ConfigFile {
    /// Load configuration from file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }
}
