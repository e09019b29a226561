//! `InputManager`: one explicitly constructed value owning the tracker, the
//! action key registry, the rebind state and the config. Hosts feed it device
//! state, call [`InputManager::update`] once per tick and query actions by name.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crossbeam_channel::Receiver;

use crate::bindings::action_keys::ActionKeySet;
use crate::bindings::bind::{Bind, BindKind, BindTypeMask, DeviceClass};
use crate::bindings::load::load_action_keys;
use crate::bindings::save::save_action_keys;
use crate::config::{InputConfig, InputSystem};
use crate::core_log::CoreLog;
use crate::error::{LoadError, SaveError};
use crate::input::event::{DeviceChange, InputEvent, InputSource};
use crate::input::status::{Status, StatusMask};
use crate::input::tracker::PrimitiveTracker;
use crate::paths;
use crate::query::{ActionQuery, BindFilter};
use crate::rebind::{CaptureSource, CommitOutcome, RebindEvent, RebindRequest, Rebinder};
use crate::registry::ActionKeyRegistry;

pub struct InputManager {
    config: InputConfig,
    tracker: PrimitiveTracker,
    registry: ActionKeyRegistry,
    rebinder: Rebinder,
    logger: Arc<dyn CoreLog>,
}

impl InputManager {
    /// Empty engine: no actions until defaults are installed or loaded.
    pub fn new(config: InputConfig, logger: Arc<dyn CoreLog>) -> Self {
        Self::with_defaults(config, ActionKeySet::new(), logger)
    }

    pub fn with_defaults(config: InputConfig, defaults: ActionKeySet, logger: Arc<dyn CoreLog>) -> Self {
        Self {
            tracker: PrimitiveTracker::from_config(&config),
            registry: ActionKeyRegistry::new(defaults),
            rebinder: Rebinder::new(),
            config,
            logger,
        }
    }

    #[inline]
    pub fn config(&self) -> &InputConfig {
        &self.config
    }

    #[inline]
    pub fn tracker(&self) -> &PrimitiveTracker {
        &self.tracker
    }

    /// Direct sample setters, dead zones and joystick selection.
    #[inline]
    pub fn tracker_mut(&mut self) -> &mut PrimitiveTracker {
        &mut self.tracker
    }

    #[inline]
    pub fn registry(&self) -> &ActionKeyRegistry {
        &self.registry
    }


    // ── loading ────────────────────────────────────────────────────────────

    /// Install the shipped definitions at `path`. Resets the active set.
    pub fn load_defaults<P: AsRef<Path>>(&mut self, path: P) -> Result<usize, LoadError> {
        let set = load_action_keys(path, &self.logger)?;
        let count = set.len();
        self.registry.replace_defaults(set);
        Ok(count)
    }

    /// Lay the override file at `path` over the active set, then fill in
    /// missing defaults (and prune orphans if configured).
    pub fn apply_override_file<P: AsRef<Path>>(&mut self, path: P) -> Result<usize, LoadError> {
        let saved = load_action_keys(path, &self.logger)?;
        let applied = self.registry.apply_overrides(&saved);
        let appended = self.registry.merge_with_defaults();

        if self.config.prune_orphans_on_load {
            let pruned = self.registry.prune_orphaned_actions();
            if !pruned.is_empty() {
                self.logger.info(&format!(
                    "[apply_override_file] dropped {} stale actions: {}",
                    pruned.len(),
                    pruned.join(", ")
                ));
            }
        }

        self.logger.debug(&format!(
            "[apply_override_file] applied {applied} saved actions, appended {appended} defaults"
        ));
        Ok(applied)
    }

    /// Load the user override from the configured location. A missing file is
    /// not an error: the active set simply stays at the defaults.
    pub fn load_custom_action_keys(&mut self) -> Result<usize, LoadError> {
        let Ok(path) = paths::override_path(&self.config) else {
            self.logger.debug("[load_custom_action_keys] no override location");
            return Ok(0);
        };
        if !path.try_exists().unwrap_or(false) {
            self.logger.debug(&format!(
                "[load_custom_action_keys] no override at {}",
                path.display()
            ));
            return Ok(0);
        }
        self.apply_override_file(&path)
    }

    /// `defaults_path` (if set), then the user override.
    pub fn load_from_config(&mut self) -> Result<(), LoadError> {
        if let Some(path) = self.config.defaults_path.clone() {
            self.load_defaults(&path)?;
        }
        self.load_custom_action_keys()?;
        Ok(())
    }

    // ── tick ───────────────────────────────────────────────────────────────

    /// Route one host event. Returns `true` when an armed rebind swallowed it.
    pub fn handle_event(&mut self, event: &InputEvent) -> bool {
        if let Some(capture) = self.rebinder.capture_from_event(event, &self.tracker) {
            self.commit_capture(capture.bind);
            if capture.consume {
                return true;
            }
        }
        if let Some(change) = self.tracker.apply_event(event) {
            self.log_device_change(change);
        }
        if matches!(event, InputEvent::FocusLost) {
            self.logger.debug("[handle_event] focus lost; all inputs released");
        }
        false
    }

    /// Poll the whole device state from `source` into the pending samples.
    pub fn scan(&mut self, source: &dyn InputSource) {
        for change in self.tracker.scan(source) {
            self.log_device_change(change);
        }
    }

    /// Latch this tick's samples. In scan mode an armed rebind captures from
    /// the freshly latched state and the captured channel is suppressed.
    pub fn update(&mut self) {
        for id in self.tracker.update() {
            self.logger.info(&format!("[update] joystick {id} calibrated"));
        }

        if self.config.input_system != InputSystem::Scan {
            return;
        }
        let Some(capture) = self.rebinder.capture_from_tracker(&self.tracker) else {
            return;
        };
        match capture.source {
            CaptureSource::Key(k) => self.tracker.suppress_key(k),
            CaptureSource::Mouse(b) => self.tracker.suppress_mouse(b),
            CaptureSource::JoystickButton { joystick, button } => {
                self.tracker.suppress_joystick_button(joystick, button)
            }
            CaptureSource::ModifierRelease(_) | CaptureSource::JoystickAxis => {}
        }
        self.commit_capture(capture.bind);
    }

    /// Drop every held input, e.g. on a display mode change.
    pub fn reset_inputs(&mut self) {
        self.tracker.reset_all();
    }

    fn commit_capture(&mut self, bind: Bind) {
        let outcome = self
            .rebinder
            .commit(&mut self.registry, bind, self.config.unscoped_conflicts, &self.logger);
        if let CommitOutcome::Committed(RebindEvent::BindDone { action, .. }) = outcome {
            self.logger.debug(&format!("[commit_capture] rebind of {action} done"));
        }
    }

    fn log_device_change(&self, change: DeviceChange) {
        match change {
            DeviceChange::Connected(id) => {
                let name = self
                    .tracker
                    .joystick(id)
                    .and_then(|js| js.info())
                    .map(|i| i.name.clone())
                    .unwrap_or_default();
                self.logger.info(&format!("[joystick] {id} connected '{name}'"));
            }
            DeviceChange::Disconnected(id) => {
                self.logger.info(&format!(
                    "[joystick] {id} disconnected; default is now {:?}",
                    self.tracker.default_joystick()
                ));
            }
        }
    }

    // ── queries ────────────────────────────────────────────────────────────

    #[inline]
    fn query(&self) -> ActionQuery<'_> {
        ActionQuery::new(&self.tracker, self.registry.active())
    }

    pub fn is_action_in(&self, name: &str, mask: StatusMask, filter: BindFilter) -> bool {
        self.query().is_in(name, mask, filter)
    }

    pub fn is_action_pressed(&self, name: &str, ignore_axis: bool) -> bool {
        self.query().is_pressed(name, BindFilter::ignore_axis(ignore_axis))
    }

    pub fn is_action_down(&self, name: &str, ignore_axis: bool) -> bool {
        self.query().is_down(name, BindFilter::ignore_axis(ignore_axis))
    }

    pub fn is_action_released(&self, name: &str, ignore_axis: bool) -> bool {
        self.query().is_released(name, BindFilter::ignore_axis(ignore_axis))
    }

    pub fn is_action_up(&self, name: &str, ignore_axis: bool) -> bool {
        self.query().is_up(name, BindFilter::ignore_axis(ignore_axis))
    }

    pub fn get_action_state(&self, name: &str, ignore_axis: bool) -> Status {
        self.query().state(name, BindFilter::ignore_axis(ignore_axis))
    }

    pub fn get_action_value(&self, name: &str) -> f32 {
        self.query().value(name)
    }

    #[inline]
    pub fn get_action_keys(&self) -> &ActionKeySet {
        self.registry.active()
    }

    pub fn get_action_key_string(&self, name: &str, keyboard: bool, index: usize, with_brackets: bool) -> String {
        self.query().key_string(name, keyboard, index, with_brackets)
    }

    pub fn get_action_binds_label(&self, name: &str) -> String {
        self.query().binds_label(name)
    }

    pub fn is_action_axis_stopped(&self, name: &str) -> bool {
        self.query().is_axis_stopped(name)
    }

    pub fn get_action_axis_position(&self, name: &str) -> Option<f32> {
        self.query().axis_position(name)
    }

    // ── rebinding ──────────────────────────────────────────────────────────

    /// Arm a rebind of `name`'s bind at `slot`. `false` (and nothing armed)
    /// for an empty name, an empty mask or an unknown action.
    pub fn replace_action_key_bind(
        &mut self,
        name: &str,
        accepted: BindTypeMask,
        slot: usize,
        same_category_only: bool,
    ) -> bool {
        if name.is_empty() || accepted.is_empty() {
            self.logger
                .warn("[replace_action_key_bind] empty action name or type mask; ignored");
            return false;
        }
        let Some(action) = self.registry.get(name) else {
            self.logger
                .warn(&format!("[replace_action_key_bind] unknown action '{name}'"));
            return false;
        };

        let request = RebindRequest {
            action: Arc::clone(&action.name),
            accepted,
            slot,
            same_category_only,
        };
        let full_axis = action.full_axis;
        if let Some(previous) = self.rebinder.arm(request, full_axis) {
            self.logger.debug(&format!(
                "[replace_action_key_bind] dropped pending rebind of {}",
                previous.action
            ));
        }
        self.logger.info(&format!(
            "[replace_action_key_bind] waiting for input: {name} slot {slot}"
        ));
        true
    }

    pub fn cancel_action_key_rebind(&mut self) -> bool {
        let cancelled = self.rebinder.cancel();
        if cancelled {
            self.logger.info("[cancel_action_key_rebind] rebind cancelled");
        }
        cancelled
    }

    #[inline]
    pub fn is_waiting_action_key_bind(&self) -> bool {
        self.rebinder.is_waiting()
    }

    pub fn is_waiting_input_for(&self, kind: BindKind) -> bool {
        self.rebinder.is_waiting_input_for(kind)
    }

    pub fn pending_rebind(&self) -> Option<&RebindRequest> {
        self.rebinder.request()
    }

    /// Receiver for `BindDone` / `Cancelled` notifications.
    pub fn subscribe(&mut self) -> Receiver<RebindEvent> {
        self.rebinder.subscribe()
    }

    // ── editing ────────────────────────────────────────────────────────────

    /// `false` for an unknown action or a bind it already has.
    pub fn add_bind(&mut self, action: &str, bind: Bind) -> bool {
        let added = self.registry.add_bind(action, bind.clone());
        if added {
            self.logger.debug(&format!("[add_bind] {action} += '{bind}'"));
        }
        added
    }

    /// `false` for an unknown action or an out-of-range index.
    pub fn remove_bind(&mut self, action: &str, class: DeviceClass, index: usize) -> bool {
        self.registry.remove_bind(action, class, index)
    }

    /// Reset one action's binds. `false` if it is not a default action.
    pub fn restore_default_action_key(&mut self, name: &str) -> bool {
        self.registry.restore_default(name)
    }

    /// Append every default action missing from the active set.
    pub fn merge_with_defaults(&mut self) -> usize {
        self.registry.merge_with_defaults()
    }

    /// Drop active actions the defaults no longer define.
    pub fn prune_orphaned_actions(&mut self) -> Vec<Arc<str>> {
        self.registry.prune_orphaned_actions()
    }

    pub fn backup_action_keys(&mut self) {
        self.registry.backup_active();
        self.logger.debug("[backup_action_keys] snapshot taken");
    }

    pub fn restore_backup_action_keys(&mut self) -> bool {
        let restored = self.registry.restore_backup();
        if restored {
            self.logger.info("[restore_backup_action_keys] binds rolled back");
        } else {
            self.logger.debug("[restore_backup_action_keys] no backup to restore");
        }
        restored
    }

    pub fn discard_backup_action_keys(&mut self) -> bool {
        self.registry.discard_backup()
    }

    pub fn restore_default_action_keys(&mut self) {
        self.registry.restore_defaults();
        self.logger.info("[restore_default_action_keys] binds reset to defaults");
    }

    /// Write every action whose binds differ from the defaults to the override
    /// location. Returns the path written.
    pub fn save_custom_action_keys_to_file(&self) -> Result<PathBuf, SaveError> {
        let path = paths::override_path(&self.config)?;
        save_action_keys(&path, self.registry.modified_actions(), &self.logger)?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests;
