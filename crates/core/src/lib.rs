//! Core library for action-based input: named, rebindable actions on top of
//! raw keyboard, mouse and joystick state.
//!
//! This crate is UI-agnostic and backend-agnostic. It exposes:
//! - `input`: primitive channels, the per-tick tracker, host events and polling.
//! - `bindings`: bind values, action keys, XML/JSON bind files.
//! - `registry` / `query` / `rebind`: default and active sets, action queries, live rebinding.
//! - `manager::InputManager`: the facade a host drives once per tick.
//! - `core_log::CoreLog`: thin logging trait the host (game/CLI) can implement.
//!
//! Import the `prelude` if you want the most common types in scope.

pub mod core_log;
pub mod error;
pub mod config;
pub mod paths;

pub mod input;
pub mod bindings;
pub mod registry;
pub mod query;
pub mod rebind;
pub mod manager;

/// Convenient re-exports for downstream users (CLI/tests).
pub use core_log::CoreLog;
pub use manager::InputManager;

pub mod prelude {
    pub use crate::core_log::{CoreLog, NoopLog, TracingLog};
    pub use crate::config::{InputConfig, InputSystem, UnscopedConflicts};
    pub use crate::error::{BindParseError, ConfigError, LoadError, SaveError};

    // Primitive layer
    pub use crate::input::event::{InputEvent, InputSource};
    pub use crate::input::joystick::JoystickInfo;
    pub use crate::input::primitive::{AxisDirection, JoystickAxis, Key, MouseButton};
    pub use crate::input::status::{Status, StatusMask};
    pub use crate::input::tracker::{PrimitiveTracker, WheelDirection};

    // Actions
    pub use crate::bindings::action_key::ActionKey;
    pub use crate::bindings::action_keys::ActionKeySet;
    pub use crate::bindings::bind::{Bind, BindKind, BindTypeMask, DeviceClass};
    pub use crate::bindings::load::load_action_keys;
    pub use crate::bindings::save::save_action_keys;
    pub use crate::registry::ActionKeyRegistry;
    pub use crate::query::BindFilter;
    pub use crate::rebind::{RebindEvent, RebindRequest};

    pub use crate::manager::InputManager;
}
