use std::path::PathBuf;

use crate::config::InputConfig;
use crate::error::SaveError;

pub const OVERRIDE_FILE_NAME: &str = "actionKeys.xml";

/// `<user data dir>/<app_name>`. Does not create it.
pub fn app_data_dir(app_name: &str) -> Option<PathBuf> {
    if app_name.trim().is_empty() {
        return None;
    }
    let base = directories::BaseDirs::new()?;
    Some(base.data_dir().join(app_name))
}

/// Where customised binds are written: `override_path` if set, otherwise
/// `<data dir>/<app_name>/actionKeys.xml`.
pub fn override_path(cfg: &InputConfig) -> Result<PathBuf, SaveError> {
    if let Some(p) = &cfg.override_path {
        return Ok(p.clone());
    }
    app_data_dir(&cfg.app_name)
        .map(|d| d.join(OVERRIDE_FILE_NAME))
        .ok_or(SaveError::NoOverrideLocation)
}
