//! Typed errors for the fallible edges of the engine (token parsing and file I/O).
//!
//! Everything else degrades to a neutral value plus a log line; see `CoreLog`.

use std::path::PathBuf;

use thiserror::Error;

/// Why a bind token could not be turned into a [`Bind`](crate::bindings::bind::Bind).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindParseError {
    #[error("empty bind token")]
    NoInput,

    #[error("unknown token '{segment}' in '{input}'")]
    UnknownToken { input: String, segment: String },

    #[error("'{input}' names more than one main key: {main_keys:?}")]
    TooManyMainKeys {
        input: String,
        main_keys: Vec<String>,
    },

    #[error("joystick button '{input}' is out of range (0..{max})")]
    ButtonOutOfRange { input: String, max: usize },

    #[error("unknown joystick axis '{0}'")]
    UnknownAxis(String),

    #[error("unknown axis direction '{0}'")]
    UnknownDirection(String),
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parse bind XML: {0}")]
    Xml(#[from] roxmltree::Error),

    #[error("parse bind JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("missing <{0}> root element")]
    MissingRoot(&'static str),
}

#[derive(Debug, Error)]
pub enum SaveError {
    #[error("write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("emit bind XML: {0}")]
    Xml(String),

    #[error("serialize bind JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("no override location: set `override_path` or `app_name`")]
    NoOverrideLocation,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parse config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}
