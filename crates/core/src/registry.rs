//! Owner of the default, active and backup action sets.
//!
//! Callers read through `&` views; every mutation goes through a method here
//! (or through the rebind protocol, which calls back into `get_mut`). Swapping
//! the defaults, laying overrides and stripping conflicts stay crate-only so the
//! default set cannot change after load.

use std::sync::Arc;

use crate::bindings::action_key::ActionKey;
use crate::bindings::action_keys::{ActionKeySet, StripScope};
use crate::bindings::bind::{Bind, DeviceClass};

#[derive(Debug, Clone, Default)]
pub struct ActionKeyRegistry {
    defaults: ActionKeySet,
    active: ActionKeySet,
    backup: Option<ActionKeySet>,
}

impl ActionKeyRegistry {
    /// Active starts as a copy of the defaults.
    pub fn new(defaults: ActionKeySet) -> Self {
        Self {
            active: defaults.clone(),
            defaults,
            backup: None,
        }
    }

    #[inline]
    pub fn defaults(&self) -> &ActionKeySet {
        &self.defaults
    }

    #[inline]
    pub fn active(&self) -> &ActionKeySet {
        &self.active
    }

    /// Crate-only: renaming through `&mut ActionKey` would desync the set's keys.
    #[inline]
    pub(crate) fn get_mut(&mut self, name: &str) -> Option<&mut ActionKey> {
        self.active.get_mut(name)
    }

    #[inline]
    pub fn backup(&self) -> Option<&ActionKeySet> {
        self.backup.as_ref()
    }

    #[inline]
    pub fn get(&self, name: &str) -> Option<&ActionKey> {
        self.active.get(name)
    }

    /// `false` for an unknown action or a bind the action already has.
    pub fn add_bind(&mut self, action: &str, bind: Bind) -> bool {
        self.active.get_mut(action).is_some_and(|a| a.add_bind(bind))
    }

    /// `false` for an unknown action or an out-of-range index.
    pub fn remove_bind(&mut self, action: &str, class: DeviceClass, index: usize) -> bool {
        self.active
            .get_mut(action)
            .and_then(|a| a.remove_bind(class, index))
            .is_some()
    }

    /// See [`ActionKeySet::strip_bind`].
    pub(crate) fn strip_bind(&mut self, bind: &Bind, keep: &str, scope: StripScope) -> Vec<Arc<str>> {
        self.active.strip_bind(bind, keep, scope)
    }

    /// Replace the whole active set with a copy of the defaults.
    pub fn restore_defaults(&mut self) {
        self.active = self.defaults.clone();
    }

    /// Reset one action's binds. `false` if either set lacks it.
    pub fn restore_default(&mut self, name: &str) -> bool {
        let Some(def) = self.defaults.get(name) else {
            return false;
        };
        match self.active.get_mut(name) {
            Some(a) => {
                a.copy_binds_from(def);
                true
            }
            None => false,
        }
    }

    /// Install new defaults and reset the active set to them.
    pub(crate) fn replace_defaults(&mut self, defaults: ActionKeySet) {
        self.active = defaults.clone();
        self.defaults = defaults;
        self.backup = None;
    }

    /// Append a copy of every default action missing from the active set.
    /// Actions only present in the active set are left alone.
    /// Returns how many were appended.
    pub fn merge_with_defaults(&mut self) -> usize {
        let missing: Vec<ActionKey> = self
            .defaults
            .iter()
            .filter(|d| !self.active.contains(&d.name))
            .cloned()
            .collect();
        let count = missing.len();
        for action in missing {
            self.active.insert(action);
        }
        count
    }

    /// Drop active actions the defaults no longer define.
    pub fn prune_orphaned_actions(&mut self) -> Vec<Arc<str>> {
        let orphans: Vec<Arc<str>> = self
            .active
            .names()
            .filter(|n| !self.defaults.contains(n))
            .cloned()
            .collect();
        for name in &orphans {
            self.active.remove(name);
        }
        orphans
    }

    /// Lay saved binds over the active set. Known actions keep their default
    /// category and axis mode and take the saved lists; unknown ones are added
    /// as they are. Returns how many actions were applied.
    pub(crate) fn apply_overrides(&mut self, overrides: &ActionKeySet) -> usize {
        let mut applied = 0;
        for saved in overrides {
            match self.active.get_mut(&saved.name) {
                Some(a) => a.copy_binds_from(saved),
                None => {
                    self.active.insert(saved.clone());
                }
            }
            applied += 1;
        }
        applied
    }

    /// Actions whose binds differ from their default, plus orphans.
    pub fn modified_actions(&self) -> impl Iterator<Item = &ActionKey> {
        self.active.iter().filter(|a| match self.defaults.get(&a.name) {
            Some(d) => !a.same_binds(d),
            None => true,
        })
    }

    /// Snapshot the active set (opening an edit session).
    pub fn backup_active(&mut self) {
        self.backup = Some(self.active.clone());
    }

    /// Roll back to the snapshot and close the session. `false` without one.
    pub fn restore_backup(&mut self) -> bool {
        match self.backup.take() {
            Some(b) => {
                self.active = b;
                true
            }
            None => false,
        }
    }

    /// Keep the edits and close the session.
    pub fn discard_backup(&mut self) -> bool {
        self.backup.take().is_some()
    }

    #[inline]
    pub fn has_backup(&self) -> bool {
        self.backup.is_some()
    }
}
