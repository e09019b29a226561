//! Token vocabulary for bind files and human-readable labels.
//!
//! Tokens are what the files store ("LControl", "MouseLeft", "B3", "X:Positive").
//! Labels are what a UI shows ("Ctrl", "Mouse Left", "Button 3", "Axis X+").
//! Token lookup is case-insensitive and accepts a few aliases on input; output
//! always uses the canonical spelling.

use std::collections::{BTreeSet, HashMap};

use once_cell::sync::Lazy;
use regex::Regex;

use crate::input::primitive::{AxisDirection, JoystickAxis, Key, MouseButton};

/// Render a `Key` into the file vocabulary and into UI text.
pub trait KeyTokenExt {
    fn to_token(&self) -> &'static str;
    fn label(&self) -> &'static str;
}

impl KeyTokenExt for Key {
    fn to_token(&self) -> &'static str {
        use Key::*;
        match *self {
            A => "A",
            B => "B",
            C => "C",
            D => "D",
            E => "E",
            F => "F",
            G => "G",
            H => "H",
            I => "I",
            J => "J",
            K => "K",
            L => "L",
            M => "M",
            N => "N",
            O => "O",
            P => "P",
            Q => "Q",
            R => "R",
            S => "S",
            T => "T",
            U => "U",
            V => "V",
            W => "W",
            X => "X",
            Y => "Y",
            Z => "Z",

            Num0 => "0",
            Num1 => "1",
            Num2 => "2",
            Num3 => "3",
            Num4 => "4",
            Num5 => "5",
            Num6 => "6",
            Num7 => "7",
            Num8 => "8",
            Num9 => "9",

            Escape => "Escape",
            LControl => "LControl",
            LShift => "LShift",
            LAlt => "LAlt",
            LSystem => "LSystem",
            RControl => "RControl",
            RShift => "RShift",
            RAlt => "RAlt",
            RSystem => "RSystem",
            Menu => "Menu",

            LBracket => "LBracket",
            RBracket => "RBracket",
            Semicolon => "SemiColon",
            Comma => "Comma",
            Period => "Period",
            Quote => "Quote",
            Slash => "Slash",
            Backslash => "BackSlash",
            Tilde => "Tilde",
            Equal => "Equal",
            Dash => "Dash",
            Space => "Space",
            Return => "Return",
            Backspace => "BackSpace",
            Tab => "Tab",

            PageUp => "PageUp",
            PageDown => "PageDown",
            End => "End",
            Home => "Home",
            Insert => "Insert",
            Delete => "Delete",
            Add => "Add",
            Subtract => "Subtract",
            Multiply => "Multiply",
            Divide => "Divide",
            Left => "Left",
            Right => "Right",
            Up => "Up",
            Down => "Down",

            Numpad0 => "Numpad0",
            Numpad1 => "Numpad1",
            Numpad2 => "Numpad2",
            Numpad3 => "Numpad3",
            Numpad4 => "Numpad4",
            Numpad5 => "Numpad5",
            Numpad6 => "Numpad6",
            Numpad7 => "Numpad7",
            Numpad8 => "Numpad8",
            Numpad9 => "Numpad9",

            F1 => "F1",
            F2 => "F2",
            F3 => "F3",
            F4 => "F4",
            F5 => "F5",
            F6 => "F6",
            F7 => "F7",
            F8 => "F8",
            F9 => "F9",
            F10 => "F10",
            F11 => "F11",
            F12 => "F12",
            F13 => "F13",
            F14 => "F14",
            F15 => "F15",
            Pause => "Pause",
        }
    }

    fn label(&self) -> &'static str {
        use Key::*;
        match *self {
            LControl => "Ctrl",
            RControl => "Right Ctrl",
            LShift => "Shift",
            RShift => "Right Shift",
            LAlt => "Alt",
            RAlt => "Right Alt",
            LSystem => "Super",
            RSystem => "Right Super",
            Escape => "Esc",
            Semicolon => ";",
            Comma => ",",
            Period => ".",
            Quote => "'",
            Slash => "/",
            Backslash => "\\",
            Tilde => "~",
            Equal => "=",
            Dash => "-",
            LBracket => "[",
            RBracket => "]",
            Return => "Enter",
            Backspace => "Backspace",
            PageUp => "Page Up",
            PageDown => "Page Down",
            Add => "Num +",
            Subtract => "Num -",
            Multiply => "Num *",
            Divide => "Num /",
            Numpad0 => "Num 0",
            Numpad1 => "Num 1",
            Numpad2 => "Num 2",
            Numpad3 => "Num 3",
            Numpad4 => "Num 4",
            Numpad5 => "Num 5",
            Numpad6 => "Num 6",
            Numpad7 => "Num 7",
            Numpad8 => "Num 8",
            Numpad9 => "Num 9",
            other => other.to_token(),
        }
    }
}

/// Extra spellings accepted on input (lowercase).
const KEY_ALIASES: &[(&str, Key)] = &[
    ("ctrl", Key::LControl),
    ("control", Key::LControl),
    ("lctrl", Key::LControl),
    ("rctrl", Key::RControl),
    ("shift", Key::LShift),
    ("alt", Key::LAlt),
    ("cmd", Key::LSystem),
    ("super", Key::LSystem),
    ("win", Key::LSystem),
    ("system", Key::LSystem),
    ("esc", Key::Escape),
    ("enter", Key::Return),
    ("ins", Key::Insert),
    ("inser", Key::Insert),
    ("del", Key::Delete),
    ("substract", Key::Subtract),
    ("minus", Key::Dash),
    ("pgup", Key::PageUp),
    ("pgdn", Key::PageDown),
    ("np0", Key::Numpad0),
    ("np1", Key::Numpad1),
    ("np2", Key::Numpad2),
    ("np3", Key::Numpad3),
    ("np4", Key::Numpad4),
    ("np5", Key::Numpad5),
    ("np6", Key::Numpad6),
    ("np7", Key::Numpad7),
    ("np8", Key::Numpad8),
    ("np9", Key::Numpad9),
];

static KEY_BY_TOKEN: Lazy<HashMap<String, Key>> = Lazy::new(|| {
    let mut map: HashMap<String, Key> = Key::ALL
        .iter()
        .map(|k| (k.to_token().to_ascii_lowercase(), *k))
        .collect();
    for (alias, key) in KEY_ALIASES {
        map.entry((*alias).to_string()).or_insert(*key);
    }
    map
});

static JOYSTICK_BUTTON_RE: Lazy<Regex> = Lazy::new(|| {
    // range is checked by the caller so "B99" reports out-of-range
    Regex::new(r"^(?i)b(\d{1,3})$").expect("joystick button pattern")
});

pub fn key_from_token(token: &str) -> Option<Key> {
    KEY_BY_TOKEN.get(&token.trim().to_ascii_lowercase()).copied()
}

/// Mouse tokens used in files.
pub fn mouse_to_token(btn: MouseButton) -> &'static str {
    match btn {
        MouseButton::Left => "MouseLeft",
        MouseButton::Right => "MouseRight",
        MouseButton::Middle => "MouseMiddle",
        MouseButton::XButton1 => "MouseX1",
        MouseButton::XButton2 => "MouseX2",
    }
}

pub fn mouse_label(btn: MouseButton) -> &'static str {
    match btn {
        MouseButton::Left => "Mouse Left",
        MouseButton::Right => "Mouse Right",
        MouseButton::Middle => "Mouse Middle",
        MouseButton::XButton1 => "Mouse X1",
        MouseButton::XButton2 => "Mouse X2",
    }
}

pub fn mouse_from_token(token: &str) -> Option<MouseButton> {
    match token.trim().to_ascii_lowercase().as_str() {
        "mouseleft" | "mouse1" | "lmb" => Some(MouseButton::Left),
        "mouseright" | "mouse2" | "rmb" => Some(MouseButton::Right),
        "mousemiddle" | "mouse3" | "mmb" => Some(MouseButton::Middle),
        "mousex1" | "mouse4" => Some(MouseButton::XButton1),
        "mousex2" | "mouse5" => Some(MouseButton::XButton2),
        _ => None,
    }
}

/// Bare button names found in `Type="Mouse"` entries.
pub fn mouse_from_legacy_name(name: &str) -> Option<MouseButton> {
    match name.trim().to_ascii_lowercase().as_str() {
        "left" => Some(MouseButton::Left),
        "right" => Some(MouseButton::Right),
        "middle" => Some(MouseButton::Middle),
        "extrabutton1" | "x1" => Some(MouseButton::XButton1),
        "extrabutton2" | "x2" => Some(MouseButton::XButton2),
        _ => None,
    }
}

/// `Some(n)` for anything shaped like a joystick button token, in range or not.
pub fn joystick_button_number(token: &str) -> Option<usize> {
    JOYSTICK_BUTTON_RE
        .captures(token.trim())
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

pub fn axis_to_token(axis: JoystickAxis) -> &'static str {
    match axis {
        JoystickAxis::X => "X",
        JoystickAxis::Y => "Y",
        JoystickAxis::Z => "Z",
        JoystickAxis::R => "R",
        JoystickAxis::U => "U",
        JoystickAxis::V => "V",
        JoystickAxis::PovX => "PovX",
        JoystickAxis::PovY => "PovY",
    }
}

pub fn axis_from_token(token: &str) -> Option<JoystickAxis> {
    let t = token.trim();
    JoystickAxis::ALL
        .into_iter()
        .find(|a| axis_to_token(*a).eq_ignore_ascii_case(t))
}

pub fn direction_to_token(direction: AxisDirection) -> &'static str {
    match direction {
        AxisDirection::Full => "Full",
        AxisDirection::Positive => "Positive",
        AxisDirection::Negative => "Negative",
    }
}

pub fn direction_from_token(token: &str) -> Option<AxisDirection> {
    match token.trim().to_ascii_lowercase().as_str() {
        "full" | "" => Some(AxisDirection::Full),
        "positive" | "pos" | "+" => Some(AxisDirection::Positive),
        "negative" | "neg" | "-" => Some(AxisDirection::Negative),
        _ => None,
    }
}

/// Deterministic modifier ordering: ctrl, alt, shift, system; left before right.
fn mod_bucket(key: Key) -> u8 {
    match key {
        Key::LControl | Key::RControl => 0,
        Key::LAlt | Key::RAlt => 1,
        Key::LShift | Key::RShift => 2,
        _ => 3,
    }
}

pub fn ordered_modifiers(mods: &BTreeSet<Key>) -> Vec<Key> {
    let mut m: Vec<Key> = mods.iter().copied().collect();
    m.sort_by_key(|k| (mod_bucket(*k), *k));
    m
}
