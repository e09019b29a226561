//! Action-level state: every bind of an action is evaluated against the
//! tracker and the results are OR-ed (or merged into one virtual button).

use crate::bindings::action_key::ActionKey;
use crate::bindings::action_keys::ActionKeySet;
use crate::bindings::bind::{Bind, DeviceClass};
use crate::input::primitive::{AXIS_RANGE, AxisDirection, JoystickAxis};
use crate::input::status::{Status, StatusMask};
use crate::input::tracker::PrimitiveTracker;

/// Which of an action's binds take part in a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BindFilter {
    /// Key combos and mouse buttons.
    pub keyboard: bool,
    /// Joystick buttons, and axes when `axes` is set.
    pub controller: bool,
    pub axes: bool,
}

impl BindFilter {
    pub const ALL: BindFilter = BindFilter {
        keyboard: true,
        controller: true,
        axes: true,
    };
    pub const KEYBOARD_MOUSE: BindFilter = BindFilter {
        keyboard: true,
        controller: false,
        axes: false,
    };
    pub const CONTROLLER: BindFilter = BindFilter {
        keyboard: false,
        controller: true,
        axes: true,
    };

    /// Both devices, with or without axis binds.
    pub const fn ignore_axis(ignore: bool) -> BindFilter {
        BindFilter {
            keyboard: true,
            controller: true,
            axes: !ignore,
        }
    }

    pub fn admits(&self, bind: &Bind) -> bool {
        match bind.device_class() {
            DeviceClass::Keyboard => self.keyboard,
            DeviceClass::Controller => self.controller && (self.axes || !bind.is_axis()),
        }
    }
}

impl Default for BindFilter {
    fn default() -> Self {
        BindFilter::ALL
    }
}

/// Status of one bind this tick. Joystick binds read the default joystick.
pub fn bind_status(tracker: &PrimitiveTracker, bind: &Bind) -> Status {
    match bind {
        Bind::KeyCombo { key, modifiers } => tracker.combo_status(*key, modifiers),
        Bind::MouseButton(b) => tracker.mouse_status(*b),
        Bind::JoystickButton(n) => tracker
            .default_joystick()
            .map_or(Status::Up, |js| tracker.joystick_button_status(js, usize::from(*n))),
        Bind::JoystickAxis { axis, direction } => tracker
            .default_joystick()
            .map_or(Status::Up, |js| tracker.joystick_axis_status(js, *axis, *direction)),
    }
}

/// Read-only view answering action queries for one tick.
#[derive(Clone, Copy)]
pub struct ActionQuery<'a> {
    tracker: &'a PrimitiveTracker,
    actions: &'a ActionKeySet,
}

impl<'a> ActionQuery<'a> {
    pub fn new(tracker: &'a PrimitiveTracker, actions: &'a ActionKeySet) -> Self {
        Self { tracker, actions }
    }

    fn statuses(&self, action: &'a ActionKey, filter: BindFilter) -> impl Iterator<Item = Status> + 'a {
        let tracker = self.tracker;
        action
            .all_binds()
            .filter(move |b| filter.admits(b))
            .map(move |b| bind_status(tracker, b))
    }

    /// Any selected bind in one of `mask`'s statuses. Unknown action: `false`.
    pub fn is_in(&self, name: &str, mask: StatusMask, filter: BindFilter) -> bool {
        self.actions
            .get(name)
            .is_some_and(|a| self.statuses(a, filter).any(|s| mask.matches(s)))
    }

    pub fn is_pressed(&self, name: &str, filter: BindFilter) -> bool {
        self.is_in(name, StatusMask::PRESSED, filter)
    }

    pub fn is_down(&self, name: &str, filter: BindFilter) -> bool {
        self.is_in(name, StatusMask::DOWN, filter)
    }

    pub fn is_released(&self, name: &str, filter: BindFilter) -> bool {
        self.is_in(name, StatusMask::RELEASED, filter)
    }

    /// No selected bind is active. Unknown action: `true`.
    pub fn is_up(&self, name: &str, filter: BindFilter) -> bool {
        !self.is_in(name, StatusMask::PRESSED | StatusMask::DOWN | StatusMask::RELEASED, filter)
    }

    /// The action as a single virtual button. Unknown action: `Up`.
    pub fn state(&self, name: &str, filter: BindFilter) -> Status {
        self.actions
            .get(name)
            .map_or(Status::Up, |a| Status::merge(self.statuses(a, filter)))
    }

    /// Analog value of the action.
    ///
    /// The first axis bind (list order) on a connected default joystick gives
    /// `(position - rest) / AXIS_RANGE`, zero inside the dead zone: signed for
    /// full-axis actions, a `[0, 1]` magnitude otherwise. Without one the
    /// action reads `1.0` while held and `0.0` otherwise.
    pub fn value(&self, name: &str) -> f32 {
        let Some(action) = self.actions.get(name) else {
            return 0.0;
        };

        if let Some(js) = self.tracker.default_joystick_state() {
            let first_axis = action.controller_binds().iter().find_map(|b| match b {
                Bind::JoystickAxis { axis, direction } => Some((*axis, *direction)),
                _ => None,
            });
            if let Some((axis, direction)) = first_axis {
                let offset = js.axis(axis).offset();
                let v = if offset.abs() < js.dead_zone() {
                    0.0
                } else {
                    (offset / AXIS_RANGE).clamp(-1.0, 1.0)
                };
                return match (action.full_axis, direction) {
                    (true, AxisDirection::Full) => v,
                    (true, AxisDirection::Positive) => v.max(0.0),
                    (true, AxisDirection::Negative) => v.min(0.0),
                    (false, AxisDirection::Full) => v.abs(),
                    (false, AxisDirection::Positive) => v.max(0.0),
                    (false, AxisDirection::Negative) => (-v).max(0.0),
                };
            }
        }

        if self.state(name, BindFilter::ALL).is_held() {
            1.0
        } else {
            0.0
        }
    }

    fn first_axis_bind(&self, name: &str) -> Option<JoystickAxis> {
        self.actions.get(name)?.controller_binds().iter().find_map(|b| match b {
            Bind::JoystickAxis { axis, .. } => Some(*axis),
            _ => None,
        })
    }

    /// Stopped test on the action's first axis bind. `true` without one.
    pub fn is_axis_stopped(&self, name: &str) -> bool {
        let Some(axis) = self.first_axis_bind(name) else {
            return true;
        };
        self.tracker
            .default_joystick()
            .and_then(|js| self.tracker.is_axis_stopped(js, axis))
            .unwrap_or(true)
    }

    /// Raw position of the action's first axis bind.
    pub fn axis_position(&self, name: &str) -> Option<f32> {
        let axis = self.first_axis_bind(name)?;
        let js = self.tracker.default_joystick()?;
        self.tracker.axis_position(js, axis)
    }

    /// Label of one bind. Unknown action: the name itself. Bad index: empty.
    pub fn key_string(&self, name: &str, keyboard: bool, index: usize, with_brackets: bool) -> String {
        let Some(action) = self.actions.get(name) else {
            return name.to_string();
        };
        let class = if keyboard {
            DeviceClass::Keyboard
        } else {
            DeviceClass::Controller
        };
        match action.binds(class).get(index) {
            Some(b) if with_brackets => format!("[{}]", b.label()),
            Some(b) => b.label(),
            None => String::new(),
        }
    }

    /// `Ctrl+A, Space | Button 0` style summary of every bind.
    pub fn binds_label(&self, name: &str) -> String {
        let Some(action) = self.actions.get(name) else {
            return String::new();
        };
        let join = |binds: &[Bind]| binds.iter().map(Bind::label).collect::<Vec<_>>().join(", ");
        [join(action.keyboard_binds()), join(action.controller_binds())]
            .into_iter()
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" | ")
    }
}
