//! Identity of every raw input the tracker knows about.
//!
//! The address space is fixed: one channel per `Key`, per `MouseButton`, and per
//! (joystick slot, button) / (joystick slot, axis). Discriminants double as
//! array indices, so variant order is part of the contract.

use serde::{Deserialize, Serialize};

/// Number of joystick slots tracked.
pub const JOYSTICK_COUNT: usize = 8;
/// Buttons tracked per joystick slot.
pub const JOYSTICK_BUTTON_COUNT: usize = 32;
/// Axes tracked per joystick slot (see [`JoystickAxis`]).
pub const JOYSTICK_AXIS_COUNT: usize = JoystickAxis::ALL.len();
/// Raw axis samples live in `[-AXIS_RANGE, AXIS_RANGE]`.
pub const AXIS_RANGE: f32 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Key {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
    I,
    J,
    K,
    L,
    M,
    N,
    O,
    P,
    Q,
    R,
    S,
    T,
    U,
    V,
    W,
    X,
    Y,
    Z,
    Num0,
    Num1,
    Num2,
    Num3,
    Num4,
    Num5,
    Num6,
    Num7,
    Num8,
    Num9,
    Escape,
    LControl,
    LShift,
    LAlt,
    LSystem,
    RControl,
    RShift,
    RAlt,
    RSystem,
    Menu,
    LBracket,
    RBracket,
    Semicolon,
    Comma,
    Period,
    Quote,
    Slash,
    Backslash,
    Tilde,
    Equal,
    Dash,
    Space,
    Return,
    Backspace,
    Tab,
    PageUp,
    PageDown,
    End,
    Home,
    Insert,
    Delete,
    Add,
    Subtract,
    Multiply,
    Divide,
    Left,
    Right,
    Up,
    Down,
    Numpad0,
    Numpad1,
    Numpad2,
    Numpad3,
    Numpad4,
    Numpad5,
    Numpad6,
    Numpad7,
    Numpad8,
    Numpad9,
    F1,
    F2,
    F3,
    F4,
    F5,
    F6,
    F7,
    F8,
    F9,
    F10,
    F11,
    F12,
    F13,
    F14,
    F15,
    Pause,
}

impl Key {
    pub const ALL: &'static [Key] = &[
        Key::A,
        Key::B,
        Key::C,
        Key::D,
        Key::E,
        Key::F,
        Key::G,
        Key::H,
        Key::I,
        Key::J,
        Key::K,
        Key::L,
        Key::M,
        Key::N,
        Key::O,
        Key::P,
        Key::Q,
        Key::R,
        Key::S,
        Key::T,
        Key::U,
        Key::V,
        Key::W,
        Key::X,
        Key::Y,
        Key::Z,
        Key::Num0,
        Key::Num1,
        Key::Num2,
        Key::Num3,
        Key::Num4,
        Key::Num5,
        Key::Num6,
        Key::Num7,
        Key::Num8,
        Key::Num9,
        Key::Escape,
        Key::LControl,
        Key::LShift,
        Key::LAlt,
        Key::LSystem,
        Key::RControl,
        Key::RShift,
        Key::RAlt,
        Key::RSystem,
        Key::Menu,
        Key::LBracket,
        Key::RBracket,
        Key::Semicolon,
        Key::Comma,
        Key::Period,
        Key::Quote,
        Key::Slash,
        Key::Backslash,
        Key::Tilde,
        Key::Equal,
        Key::Dash,
        Key::Space,
        Key::Return,
        Key::Backspace,
        Key::Tab,
        Key::PageUp,
        Key::PageDown,
        Key::End,
        Key::Home,
        Key::Insert,
        Key::Delete,
        Key::Add,
        Key::Subtract,
        Key::Multiply,
        Key::Divide,
        Key::Left,
        Key::Right,
        Key::Up,
        Key::Down,
        Key::Numpad0,
        Key::Numpad1,
        Key::Numpad2,
        Key::Numpad3,
        Key::Numpad4,
        Key::Numpad5,
        Key::Numpad6,
        Key::Numpad7,
        Key::Numpad8,
        Key::Numpad9,
        Key::F1,
        Key::F2,
        Key::F3,
        Key::F4,
        Key::F5,
        Key::F6,
        Key::F7,
        Key::F8,
        Key::F9,
        Key::F10,
        Key::F11,
        Key::F12,
        Key::F13,
        Key::F14,
        Key::F15,
        Key::Pause,
    ];

    pub const COUNT: usize = Key::ALL.len();

    pub const MODIFIERS: [Key; 8] = [
        Key::LControl,
        Key::RControl,
        Key::LAlt,
        Key::RAlt,
        Key::LShift,
        Key::RShift,
        Key::LSystem,
        Key::RSystem,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    #[inline]
    pub fn from_index(ix: usize) -> Option<Key> {
        Key::ALL.get(ix).copied()
    }

    #[inline]
    pub fn is_modifier(self) -> bool {
        matches!(
            self,
            Key::LControl
                | Key::RControl
                | Key::LShift
                | Key::RShift
                | Key::LAlt
                | Key::RAlt
                | Key::LSystem
                | Key::RSystem
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    XButton1,
    XButton2,
}

impl MouseButton {
    pub const ALL: [MouseButton; 5] = [
        MouseButton::Left,
        MouseButton::Right,
        MouseButton::Middle,
        MouseButton::XButton1,
        MouseButton::XButton2,
    ];

    pub const COUNT: usize = MouseButton::ALL.len();

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum JoystickAxis {
    X,
    Y,
    Z,
    R,
    U,
    V,
    PovX,
    PovY,
}

impl JoystickAxis {
    pub const ALL: [JoystickAxis; 8] = [
        JoystickAxis::X,
        JoystickAxis::Y,
        JoystickAxis::Z,
        JoystickAxis::R,
        JoystickAxis::U,
        JoystickAxis::V,
        JoystickAxis::PovX,
        JoystickAxis::PovY,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Which part of an axis' travel a bind listens to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub enum AxisDirection {
    /// Either side of the rest value.
    #[default]
    Full,
    Positive,
    Negative,
}

impl AxisDirection {
    /// Is `offset` (position minus rest) past `threshold` on this direction's side?
    #[inline]
    pub fn engaged(self, offset: f32, threshold: f32) -> bool {
        match self {
            AxisDirection::Full => offset.abs() > threshold,
            AxisDirection::Positive => offset > threshold,
            AxisDirection::Negative => offset < -threshold,
        }
    }
}
