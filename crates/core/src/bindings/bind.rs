use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use bitflags::bitflags;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::bindings::bind_tokens::{
    KeyTokenExt, axis_from_token, axis_to_token, direction_from_token, direction_to_token,
    joystick_button_number, key_from_token, mouse_from_legacy_name, mouse_from_token,
    mouse_label, mouse_to_token, ordered_modifiers,
};
use crate::error::BindParseError;
use crate::input::primitive::{AxisDirection, JOYSTICK_BUTTON_COUNT, JoystickAxis, Key, MouseButton};

/// One concrete physical input an action listens to.
///
/// The token form (`Display` / `FromStr`) is what bind files store; it
/// round-trips exactly for every value that passes [`Bind::is_storable`],
/// which covers everything built through [`Bind::key`], [`Bind::combo`],
/// [`Bind::joystick_button`] or parsed from a token. The variants stay public
/// for matching; a hand-built `JoystickButton(200)` or a combo whose modifier
/// set holds a plain key is refused by [`ActionKey`](super::action_key::ActionKey).
/// [`Bind::label`] is the UI form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Bind {
    /// `key` held together with every key of `modifiers`.
    KeyCombo { key: Key, modifiers: BTreeSet<Key> },
    MouseButton(MouseButton),
    /// Button index on the default joystick.
    JoystickButton(u8),
    JoystickAxis { axis: JoystickAxis, direction: AxisDirection },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BindKind {
    Key,
    MouseButton,
    JoystickButton,
    JoystickAxis,
}

bitflags! {
    /// Which bind kinds a rebind request will accept.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct BindTypeMask: u8 {
        const KEY = 1 << 0;
        const MOUSE_BUTTON = 1 << 1;
        const JOYSTICK_BUTTON = 1 << 2;
        const JOYSTICK_AXIS = 1 << 3;
        const KEYBOARD_MOUSE = Self::KEY.bits() | Self::MOUSE_BUTTON.bits();
        const CONTROLLER = Self::JOYSTICK_BUTTON.bits() | Self::JOYSTICK_AXIS.bits();
    }
}

/// The two bind lists every action keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeviceClass {
    Keyboard,
    Controller,
}

impl BindKind {
    #[inline]
    pub fn mask(self) -> BindTypeMask {
        match self {
            BindKind::Key => BindTypeMask::KEY,
            BindKind::MouseButton => BindTypeMask::MOUSE_BUTTON,
            BindKind::JoystickButton => BindTypeMask::JOYSTICK_BUTTON,
            BindKind::JoystickAxis => BindTypeMask::JOYSTICK_AXIS,
        }
    }

    #[inline]
    pub fn device_class(self) -> DeviceClass {
        match self {
            BindKind::Key | BindKind::MouseButton => DeviceClass::Keyboard,
            BindKind::JoystickButton | BindKind::JoystickAxis => DeviceClass::Controller,
        }
    }
}

impl BindTypeMask {
    #[inline]
    pub fn accepts(self, kind: BindKind) -> bool {
        self.contains(kind.mask())
    }
}

impl Bind {
    pub fn key(key: Key) -> Self {
        Bind::KeyCombo {
            key,
            modifiers: BTreeSet::new(),
        }
    }

    /// Non-modifier entries in `modifiers` and a repeat of `key` are dropped.
    pub fn combo<I: IntoIterator<Item = Key>>(key: Key, modifiers: I) -> Self {
        let modifiers = modifiers
            .into_iter()
            .filter(|m| m.is_modifier() && *m != key)
            .collect();
        Bind::KeyCombo { key, modifiers }
    }

    /// `None` when `button` is outside the tracked range.
    pub fn joystick_button(button: usize) -> Option<Self> {
        (button < JOYSTICK_BUTTON_COUNT).then(|| Bind::JoystickButton(button as u8))
    }

    pub fn axis(axis: JoystickAxis, direction: AxisDirection) -> Self {
        Bind::JoystickAxis { axis, direction }
    }

    #[inline]
    pub fn kind(&self) -> BindKind {
        match self {
            Bind::KeyCombo { .. } => BindKind::Key,
            Bind::MouseButton(_) => BindKind::MouseButton,
            Bind::JoystickButton(_) => BindKind::JoystickButton,
            Bind::JoystickAxis { .. } => BindKind::JoystickAxis,
        }
    }

    #[inline]
    pub fn device_class(&self) -> DeviceClass {
        self.kind().device_class()
    }

    /// Button in range, modifiers all modifier keys and distinct from `key`.
    pub fn is_storable(&self) -> bool {
        match self {
            Bind::KeyCombo { key, modifiers } => modifiers.iter().all(|m| m.is_modifier() && m != key),
            Bind::JoystickButton(n) => usize::from(*n) < JOYSTICK_BUTTON_COUNT,
            Bind::MouseButton(_) | Bind::JoystickAxis { .. } => true,
        }
    }

    #[inline]
    pub fn is_axis(&self) -> bool {
        matches!(self, Bind::JoystickAxis { .. })
    }

    /// UI text, e.g. `Ctrl+Shift+A`, `Mouse Left`, `Button 3`, `Axis X+`.
    pub fn label(&self) -> String {
        match self {
            Bind::KeyCombo { key, modifiers } => {
                let mut parts: Vec<&str> = ordered_modifiers(modifiers)
                    .into_iter()
                    .map(|m| m.label())
                    .collect();
                parts.push(key.label());
                parts.join("+")
            }
            Bind::MouseButton(b) => mouse_label(*b).to_string(),
            Bind::JoystickButton(n) => format!("Button {n}"),
            Bind::JoystickAxis { axis, direction } => {
                let sign = match direction {
                    AxisDirection::Full => "",
                    AxisDirection::Positive => "+",
                    AxisDirection::Negative => "-",
                };
                format!("Axis {}{sign}", axis_to_token(*axis))
            }
        }
    }

    /// Parse a `Map` value whose device is named separately by a `Type`
    /// attribute (`Keyboard`, `Mouse`, `JoystickButton`, `JoystickAxis`).
    /// Besides tagged tokens this accepts the bare names such files use:
    /// `Left` for a mouse button, `3` for a joystick button, `X` for a whole axis.
    pub fn from_typed(ty: &str, map: &str) -> Result<Self, BindParseError> {
        let map = map.trim();
        if map.is_empty() {
            return Err(BindParseError::NoInput);
        }
        let mismatch = || BindParseError::UnknownToken {
            input: map.to_string(),
            segment: ty.to_string(),
        };

        let bind = match ty.trim().to_ascii_lowercase().as_str() {
            "keyboard" | "key" => parse_key_combo(map)?,
            "mouse" | "mousebutton" => match mouse_from_legacy_name(map) {
                Some(b) => Bind::MouseButton(b),
                None => map.parse()?,
            },
            "joystickbutton" | "button" => match map.parse::<usize>() {
                Ok(n) => Bind::joystick_button(n).ok_or(BindParseError::ButtonOutOfRange {
                    input: map.to_string(),
                    max: JOYSTICK_BUTTON_COUNT,
                })?,
                Err(_) => map.parse()?,
            },
            "joystickaxis" | "axis" => parse_axis(map)?,
            _ => return Err(mismatch()),
        };

        let expected = match ty.trim().to_ascii_lowercase().as_str() {
            "keyboard" | "key" => BindKind::Key,
            "mouse" | "mousebutton" => BindKind::MouseButton,
            "joystickbutton" | "button" => BindKind::JoystickButton,
            _ => BindKind::JoystickAxis,
        };
        if bind.kind() != expected {
            return Err(mismatch());
        }
        Ok(bind)
    }
}

impl fmt::Display for Bind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bind::KeyCombo { key, modifiers } => {
                for m in ordered_modifiers(modifiers) {
                    write!(f, "{}+", m.to_token())?;
                }
                f.write_str(key.to_token())
            }
            Bind::MouseButton(b) => f.write_str(mouse_to_token(*b)),
            Bind::JoystickButton(n) => write!(f, "B{n}"),
            Bind::JoystickAxis { axis, direction } => write!(
                f,
                "{}:{}",
                axis_to_token(*axis),
                direction_to_token(*direction)
            ),
        }
    }
}

impl FromStr for Bind {
    type Err = BindParseError;

    /// `X:Positive`, `MouseLeft`, `B3`, `LControl+A` (tried in that order).
    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let s = input.trim();
        if s.is_empty() {
            return Err(BindParseError::NoInput);
        }
        if s.contains(':') {
            return parse_axis(s);
        }
        if let Some(b) = mouse_from_token(s) {
            return Ok(Bind::MouseButton(b));
        }
        if let Some(n) = joystick_button_number(s) {
            return Bind::joystick_button(n).ok_or(BindParseError::ButtonOutOfRange {
                input: s.to_string(),
                max: JOYSTICK_BUTTON_COUNT,
            });
        }
        parse_key_combo(s)
    }
}

/// `Axis`, `Axis:Direction`, or `Axis+` / `Axis-`.
fn parse_axis(s: &str) -> Result<Bind, BindParseError> {
    let (axis_tok, dir_tok) = match s.split_once(':') {
        Some((a, d)) => (a, d),
        None => match s.strip_suffix('+').or_else(|| s.strip_suffix('-')) {
            Some(a) => (a, &s[a.len()..]),
            None => (s, ""),
        },
    };
    let axis = axis_from_token(axis_tok)
        .ok_or_else(|| BindParseError::UnknownAxis(axis_tok.trim().to_string()))?;
    let direction = direction_from_token(dir_tok)
        .ok_or_else(|| BindParseError::UnknownDirection(dir_tok.trim().to_string()))?;
    Ok(Bind::axis(axis, direction))
}

/// `+`-separated keys; at most one non-modifier. With only modifiers the
/// last one written is the main key, which is how a lone modifier (or a
/// modifier captured while others were held) is stored.
fn parse_key_combo(input: &str) -> Result<Bind, BindParseError> {
    let segments: Vec<&str> = input
        .split('+')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();
    if segments.is_empty() {
        return Err(BindParseError::NoInput);
    }

    let mut modifiers: Vec<Key> = Vec::new();
    let mut main_keys: Vec<Key> = Vec::new();
    for seg in segments {
        let key = key_from_token(seg).ok_or_else(|| BindParseError::UnknownToken {
            input: input.to_string(),
            segment: seg.to_string(),
        })?;
        if key.is_modifier() {
            modifiers.push(key);
        } else {
            main_keys.push(key);
        }
    }

    let main = match main_keys.as_slice() {
        [] => modifiers.pop().ok_or(BindParseError::NoInput)?,
        [k] => *k,
        _ => {
            return Err(BindParseError::TooManyMainKeys {
                input: input.to_string(),
                main_keys: main_keys.iter().map(|k| k.to_token().to_string()).collect(),
            });
        }
    };
    Ok(Bind::combo(main, modifiers))
}

impl Serialize for Bind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Bind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
