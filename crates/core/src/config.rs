//! Engine configuration.
//!
//! Every field has a serde default so a partial (or empty) JSON object is valid.

use std::{fs, path::Path, path::PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// How raw device state reaches the tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputSystem {
    /// The host forwards discrete device events (`InputManager::handle_event`).
    #[default]
    Event,
    /// The host exposes a pollable device (`InputManager::scan`).
    Scan,
}

/// What a committed rebind does to other actions holding the same input when
/// the request was *not* limited to the target's category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnscopedConflicts {
    /// Leave other actions alone; the input ends up bound to several actions.
    #[default]
    Allow,
    /// Remove the input from every other action, whatever its category.
    StripEverywhere,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputConfig {
    #[serde(default)]
    pub input_system: InputSystem,

    /// Share of the axis range (percent) beyond which an axis counts as held.
    #[serde(default = "default_press_threshold_pct")]
    pub press_threshold_pct: f32,

    /// Dead zone (raw axis units) given to every joystick on connection.
    #[serde(default = "default_dead_zone")]
    pub default_dead_zone: f32,

    /// Shipped bind definitions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub defaults_path: Option<PathBuf>,

    /// User override file. Falls back to `<data dir of app_name>/actionKeys.xml`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub override_path: Option<PathBuf>,

    #[serde(default = "default_app_name")]
    pub app_name: String,

    /// Drop actions from a stale override file that the defaults no longer define.
    #[serde(default = "default_true")]
    pub prune_orphans_on_load: bool,

    #[serde(default)]
    pub unscoped_conflicts: UnscopedConflicts,
}

fn default_press_threshold_pct() -> f32 {
    75.0
}
fn default_dead_zone() -> f32 {
    10.0
}
fn default_app_name() -> String {
    "actionkeys".to_string()
}
fn default_true() -> bool {
    true
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            input_system: InputSystem::default(),
            press_threshold_pct: default_press_threshold_pct(),
            default_dead_zone: default_dead_zone(),
            defaults_path: None,
            override_path: None,
            app_name: default_app_name(),
            prune_orphans_on_load: true,
            unscoped_conflicts: UnscopedConflicts::default(),
        }
    }
}

impl InputConfig {
    pub fn from_json_str(content: &str) -> Result<Self, ConfigError> {
        let cfg: InputConfig = serde_json::from_str(content)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&content)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.press_threshold_pct > 0.0 && self.press_threshold_pct <= 100.0) {
            return Err(ConfigError::Invalid(format!(
                "press_threshold_pct must be in (0, 100], got {}",
                self.press_threshold_pct
            )));
        }
        if !(self.default_dead_zone >= 0.0 && self.default_dead_zone.is_finite()) {
            return Err(ConfigError::Invalid(format!(
                "default_dead_zone must be a non-negative number, got {}",
                self.default_dead_zone
            )));
        }
        Ok(())
    }
}
