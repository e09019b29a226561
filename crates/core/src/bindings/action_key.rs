use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::bindings::bind::{Bind, DeviceClass};
use crate::bindings::str_intern::intern;
use crate::core_log::CoreLog;

/// A named, rebindable action and its two bind lists.
///
/// `keyboard` holds key combos and mouse buttons, `controller` holds joystick
/// buttons and axes. The lists are only reachable through methods that route
/// a bind by its kind, so a list can never hold the wrong kind or a duplicate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(into = "ActionKeyRecord")]
pub struct ActionKey {
    pub name: Arc<str>,
    /// Conflict scope for rebinding (e.g. gameplay vs menu).
    pub category: i32,
    /// Axis binds report the signed position instead of a [0, 1] magnitude.
    pub full_axis: bool,
    keyboard: Vec<Bind>,
    controller: Vec<Bind>,
}

/// File form of an [`ActionKey`]: binds as tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionKeyRecord {
    pub name: String,
    #[serde(default)]
    pub category: i32,
    #[serde(default)]
    pub full_axis: bool,
    #[serde(default)]
    pub keyboard: Vec<String>,
    #[serde(default)]
    pub controller: Vec<String>,
}

impl From<ActionKey> for ActionKeyRecord {
    fn from(a: ActionKey) -> Self {
        a.to_record()
    }
}

impl ActionKey {
    pub fn new<S: AsRef<str>>(name: S, category: i32, full_axis: bool) -> Self {
        Self {
            name: intern(name),
            category,
            full_axis,
            keyboard: Vec::new(),
            controller: Vec::new(),
        }
    }

    /// Builder-style `add_bind` for literals and tests.
    pub fn with_bind(mut self, bind: Bind) -> Self {
        self.add_bind(bind);
        self
    }

    #[inline]
    pub fn binds(&self, class: DeviceClass) -> &[Bind] {
        match class {
            DeviceClass::Keyboard => &self.keyboard,
            DeviceClass::Controller => &self.controller,
        }
    }

    #[inline]
    pub fn keyboard_binds(&self) -> &[Bind] {
        &self.keyboard
    }

    #[inline]
    pub fn controller_binds(&self) -> &[Bind] {
        &self.controller
    }

    /// Keyboard list first, then controller list.
    pub fn all_binds(&self) -> impl Iterator<Item = &Bind> {
        self.keyboard.iter().chain(self.controller.iter())
    }

    fn list_mut(&mut self, class: DeviceClass) -> &mut Vec<Bind> {
        match class {
            DeviceClass::Keyboard => &mut self.keyboard,
            DeviceClass::Controller => &mut self.controller,
        }
    }

    pub fn contains(&self, bind: &Bind) -> bool {
        self.binds(bind.device_class()).contains(bind)
    }

    pub fn position(&self, bind: &Bind) -> Option<usize> {
        self.binds(bind.device_class()).iter().position(|b| b == bind)
    }

    /// Append to the list matching the bind's kind. `false` if already present
    /// or not [storable](Bind::is_storable).
    pub fn add_bind(&mut self, bind: Bind) -> bool {
        if !bind.is_storable() || self.contains(&bind) {
            return false;
        }
        self.list_mut(bind.device_class()).push(bind);
        true
    }

    /// `None` for an out-of-range index.
    pub fn remove_bind(&mut self, class: DeviceClass, index: usize) -> Option<Bind> {
        let list = self.list_mut(class);
        (index < list.len()).then(|| list.remove(index))
    }

    /// Remove `bind` wherever it sits. `true` if it was there.
    pub fn remove_matching(&mut self, bind: &Bind) -> bool {
        match self.position(bind) {
            Some(ix) => {
                self.list_mut(bind.device_class()).remove(ix);
                true
            }
            None => false,
        }
    }

    /// Put `bind` at `slot` of its list (appending when `slot` is past the
    /// end). Refused when the bind already sits at another slot.
    pub fn replace_bind(&mut self, slot: usize, bind: Bind) -> bool {
        if !bind.is_storable() {
            return false;
        }
        match self.position(&bind) {
            Some(ix) if ix == slot => return true,
            Some(_) => return false,
            None => {}
        }
        let list = self.list_mut(bind.device_class());
        match list.get_mut(slot) {
            Some(existing) => *existing = bind,
            None => list.push(bind),
        }
        true
    }

    pub fn clear_binds(&mut self, class: DeviceClass) {
        self.list_mut(class).clear();
    }

    /// Same bind lists, in the same order.
    pub fn same_binds(&self, other: &ActionKey) -> bool {
        self.keyboard == other.keyboard && self.controller == other.controller
    }

    /// Copy `other`'s bind lists, keeping this action's name and attributes.
    pub fn copy_binds_from(&mut self, other: &ActionKey) {
        self.keyboard = other.keyboard.clone();
        self.controller = other.controller.clone();
    }

    pub fn to_record(&self) -> ActionKeyRecord {
        ActionKeyRecord {
            name: self.name.to_string(),
            category: self.category,
            full_axis: self.full_axis,
            keyboard: self.keyboard.iter().map(Bind::to_string).collect(),
            controller: self.controller.iter().map(Bind::to_string).collect(),
        }
    }

    /// Unknown tokens and binds listed under the wrong device are logged and skipped.
    pub fn from_record(rec: &ActionKeyRecord, logger: &dyn CoreLog) -> Self {
        let mut action = ActionKey::new(&rec.name, rec.category, rec.full_axis);
        let lists = [
            (DeviceClass::Keyboard, &rec.keyboard),
            (DeviceClass::Controller, &rec.controller),
        ];
        for (class, tokens) in lists {
            for token in tokens {
                match token.parse::<Bind>() {
                    Ok(b) if b.device_class() == class => {
                        if !action.add_bind(b) {
                            logger.debug(&format!(
                                "[action_key] duplicate bind '{token}' on {}",
                                rec.name
                            ));
                        }
                    }
                    Ok(_) => logger.warn(&format!(
                        "[action_key] '{token}' is not a {class:?} bind (action {})",
                        rec.name
                    )),
                    Err(e) => logger.warn(&format!("[action_key] {}: {e}", rec.name)),
                }
            }
        }
        action
    }
}
