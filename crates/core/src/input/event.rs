//! The two ways device state reaches the tracker: discrete events pushed by the
//! host, or a device the engine polls once per tick.

use crate::input::joystick::JoystickInfo;
use crate::input::primitive::{JOYSTICK_BUTTON_COUNT, JOYSTICK_COUNT, JoystickAxis, Key, MouseButton};
use crate::input::tracker::PrimitiveTracker;

#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    KeyPressed(Key),
    KeyReleased(Key),
    MouseButtonPressed(MouseButton),
    MouseButtonReleased(MouseButton),
    /// Positive scrolls away from the user.
    MouseWheelScrolled { delta: f32 },
    /// Cursor position in window coordinates.
    MouseMoved { x: f32, y: f32 },
    JoystickButtonPressed { joystick: usize, button: usize },
    JoystickButtonReleased { joystick: usize, button: usize },
    JoystickMoved { joystick: usize, axis: JoystickAxis, position: f32 },
    JoystickConnected { joystick: usize, info: JoystickInfo },
    JoystickDisconnected { joystick: usize },
    /// The window lost focus; everything held is dropped.
    FocusLost,
}

/// Pollable device state, read by [`PrimitiveTracker::scan`].
pub trait InputSource {
    fn is_key_down(&self, key: Key) -> bool;
    fn is_mouse_button_down(&self, button: MouseButton) -> bool;
    /// Scroll since the previous poll.
    fn mouse_wheel_delta(&self) -> f32 {
        0.0
    }
    fn mouse_position(&self) -> Option<(f32, f32)> {
        None
    }
    fn is_joystick_connected(&self, joystick: usize) -> bool;
    fn joystick_info(&self, joystick: usize) -> JoystickInfo {
        let _ = joystick;
        JoystickInfo::default()
    }
    fn is_joystick_button_down(&self, joystick: usize, button: usize) -> bool;
    fn joystick_axis_position(&self, joystick: usize, axis: JoystickAxis) -> f32;
}

/// Connection change observed while applying an event or scanning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceChange {
    Connected(usize),
    Disconnected(usize),
}

impl PrimitiveTracker {
    /// Route one event into the pending samples. Returns the connection change
    /// it caused, if any.
    pub fn apply_event(&mut self, event: &InputEvent) -> Option<DeviceChange> {
        match event {
            InputEvent::KeyPressed(k) => self.set_key_sample(*k, true),
            InputEvent::KeyReleased(k) => self.set_key_sample(*k, false),
            InputEvent::MouseButtonPressed(b) => self.set_mouse_sample(*b, true),
            InputEvent::MouseButtonReleased(b) => self.set_mouse_sample(*b, false),
            InputEvent::MouseWheelScrolled { delta } => self.add_wheel_sample(*delta),
            InputEvent::MouseMoved { x, y } => self.set_mouse_position_sample(*x, *y),
            InputEvent::JoystickButtonPressed { joystick, button } => {
                self.set_joystick_button_sample(*joystick, *button, true);
            }
            InputEvent::JoystickButtonReleased { joystick, button } => {
                self.set_joystick_button_sample(*joystick, *button, false);
            }
            InputEvent::JoystickMoved { joystick, axis, position } => {
                self.set_joystick_axis_sample(*joystick, *axis, *position);
            }
            InputEvent::JoystickConnected { joystick, info } => {
                return self
                    .connect_joystick(*joystick, info.clone())
                    .then_some(DeviceChange::Connected(*joystick));
            }
            InputEvent::JoystickDisconnected { joystick } => {
                return self
                    .disconnect_joystick(*joystick)
                    .then_some(DeviceChange::Disconnected(*joystick));
            }
            InputEvent::FocusLost => self.reset_all(),
        }
        None
    }

    /// Copy the whole device state from `source` into the pending samples.
    pub fn scan(&mut self, source: &dyn InputSource) -> Vec<DeviceChange> {
        for key in Key::ALL {
            self.set_key_sample(*key, source.is_key_down(*key));
        }
        for button in MouseButton::ALL {
            self.set_mouse_sample(button, source.is_mouse_button_down(button));
        }
        self.add_wheel_sample(source.mouse_wheel_delta());
        if let Some((x, y)) = source.mouse_position() {
            self.set_mouse_position_sample(x, y);
        }

        let mut changes = Vec::new();
        for joystick in 0..JOYSTICK_COUNT {
            let present = source.is_joystick_connected(joystick);
            match (present, self.is_joystick_connected(joystick)) {
                (true, false) => {
                    self.connect_joystick(joystick, source.joystick_info(joystick));
                    changes.push(DeviceChange::Connected(joystick));
                }
                (false, true) => {
                    self.disconnect_joystick(joystick);
                    changes.push(DeviceChange::Disconnected(joystick));
                }
                _ => {}
            }
            if !present {
                continue;
            }
            for button in 0..JOYSTICK_BUTTON_COUNT {
                self.set_joystick_button_sample(
                    joystick,
                    button,
                    source.is_joystick_button_down(joystick, button),
                );
            }
            for axis in JoystickAxis::ALL {
                self.set_joystick_axis_sample(joystick, axis, source.joystick_axis_position(joystick, axis));
            }
        }
        changes
    }
}
