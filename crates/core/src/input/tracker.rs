use std::collections::BTreeSet;

use crate::config::InputConfig;
use crate::input::joystick::{JoystickInfo, JoystickState};
use crate::input::primitive::{AXIS_RANGE, AxisDirection, JOYSTICK_COUNT, JoystickAxis, Key, MouseButton};
use crate::input::status::{DigitalChannel, Status};

/// Which way the wheel turned on the last tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WheelDirection {
    Up,
    Down,
}

/// Owns every primitive channel. Samples go in through the setters (or
/// [`apply_event`](Self::apply_event) / [`scan`](Self::scan)), [`update`](Self::update)
/// latches them once per tick, and the accessors publish the classified state.
#[derive(Debug, Clone)]
pub struct PrimitiveTracker {
    keys: [DigitalChannel; Key::COUNT],
    mouse: [DigitalChannel; MouseButton::COUNT],
    joysticks: Vec<JoystickState>,
    default_joystick: Option<usize>,
    held_modifiers: BTreeSet<Key>,
    /// Raw axis offset beyond which an axis counts as held.
    press_threshold: f32,
    default_dead_zone: f32,
    keyboard_hit: bool,
    mouse_hit: bool,
    /// Scroll accumulated since the last latch.
    pending_wheel: f32,
    wheel_delta: f32,
    pending_mouse_pos: Option<(f32, f32)>,
    mouse_pos: Option<(f32, f32)>,
    mouse_moved: bool,
}

impl Default for PrimitiveTracker {
    fn default() -> Self {
        Self::from_config(&InputConfig::default())
    }
}

impl PrimitiveTracker {
    pub fn new(press_threshold_pct: f32, default_dead_zone: f32) -> Self {
        Self {
            keys: [DigitalChannel::default(); Key::COUNT],
            mouse: [DigitalChannel::default(); MouseButton::COUNT],
            joysticks: (0..JOYSTICK_COUNT)
                .map(|_| JoystickState::new(default_dead_zone))
                .collect(),
            default_joystick: None,
            held_modifiers: BTreeSet::new(),
            press_threshold: press_threshold_pct / 100.0 * AXIS_RANGE,
            default_dead_zone,
            keyboard_hit: false,
            mouse_hit: false,
            pending_wheel: 0.0,
            wheel_delta: 0.0,
            pending_mouse_pos: None,
            mouse_pos: None,
            mouse_moved: false,
        }
    }

    pub fn from_config(cfg: &InputConfig) -> Self {
        Self::new(cfg.press_threshold_pct, cfg.default_dead_zone)
    }

    // ── samples ────────────────────────────────────────────────────────────

    #[inline]
    pub fn set_key_sample(&mut self, key: Key, held: bool) {
        self.keys[key.index()].set_sample(held);
    }

    #[inline]
    pub fn set_mouse_sample(&mut self, button: MouseButton, held: bool) {
        self.mouse[button.index()].set_sample(held);
    }

    /// `false` for an unknown slot or button.
    pub fn set_joystick_button_sample(&mut self, joystick: usize, button: usize, held: bool) -> bool {
        self.joysticks
            .get_mut(joystick)
            .is_some_and(|js| js.set_button_sample(button, held))
    }

    pub fn set_joystick_axis_sample(&mut self, joystick: usize, axis: JoystickAxis, position: f32) -> bool {
        match self.joysticks.get_mut(joystick) {
            Some(js) => {
                js.set_axis_sample(axis, position.clamp(-AXIS_RANGE, AXIS_RANGE));
                true
            }
            None => false,
        }
    }

    /// Scroll ticks add up until the next [`update`](Self::update).
    #[inline]
    pub fn add_wheel_sample(&mut self, delta: f32) {
        self.pending_wheel += delta;
    }

    #[inline]
    pub fn set_mouse_position_sample(&mut self, x: f32, y: f32) {
        self.pending_mouse_pos = Some((x, y));
    }

    // ── tick ───────────────────────────────────────────────────────────────

    /// Latch every pending sample. Returns the joysticks that calibrated
    /// themselves on this tick.
    pub fn update(&mut self) -> Vec<usize> {
        self.keyboard_hit = false;
        for ch in self.keys.iter_mut() {
            ch.update();
            self.keyboard_hit |= ch.status() == Status::Pressed;
        }

        self.mouse_hit = false;
        for ch in self.mouse.iter_mut() {
            ch.update();
            self.mouse_hit |= ch.status() == Status::Pressed;
        }

        self.held_modifiers = self.sampled_modifiers();

        self.wheel_delta = std::mem::take(&mut self.pending_wheel);
        // the first reported position only seeds the tracker
        self.mouse_moved = match (self.mouse_pos, self.pending_mouse_pos) {
            (Some(old), Some(new)) => old != new,
            _ => false,
        };
        if self.pending_mouse_pos.is_some() {
            self.mouse_pos = self.pending_mouse_pos;
        }

        self.joysticks
            .iter_mut()
            .enumerate()
            .filter_map(|(id, js)| js.update().then_some(id))
            .collect()
    }

    /// Drop every sample and status (focus loss, display mode change).
    pub fn reset_all(&mut self) {
        self.keys.iter_mut().for_each(DigitalChannel::reset);
        self.mouse.iter_mut().for_each(DigitalChannel::reset);
        self.joysticks.iter_mut().for_each(JoystickState::reset_channels);
        self.held_modifiers.clear();
        self.keyboard_hit = false;
        self.mouse_hit = false;
        self.pending_wheel = 0.0;
        self.wheel_delta = 0.0;
        self.mouse_moved = false;
    }

    // ── digital state ──────────────────────────────────────────────────────

    #[inline]
    pub fn key_status(&self, key: Key) -> Status {
        self.keys[key.index()].status()
    }

    #[inline]
    pub fn mouse_status(&self, button: MouseButton) -> Status {
        self.mouse[button.index()].status()
    }

    /// `Up` for a disconnected slot or an out-of-range button.
    pub fn joystick_button_status(&self, joystick: usize, button: usize) -> Status {
        self.connected(joystick)
            .and_then(|js| js.button(button))
            .map_or(Status::Up, DigitalChannel::status)
    }

    pub fn joystick_axis_status(&self, joystick: usize, axis: JoystickAxis, direction: AxisDirection) -> Status {
        self.connected(joystick)
            .map_or(Status::Up, |js| js.axis(axis).status(direction, self.press_threshold))
    }

    /// Combo status: the main key and every modifier held, on both ticks.
    pub fn combo_status(&self, key: Key, modifiers: &BTreeSet<Key>) -> Status {
        let held = |k: Key, f: fn(&DigitalChannel) -> bool| f(&self.keys[k.index()]);
        let prev = held(key, DigitalChannel::previous)
            && modifiers.iter().all(|m| held(*m, DigitalChannel::previous));
        let cur = held(key, DigitalChannel::current)
            && modifiers.iter().all(|m| held(*m, DigitalChannel::current));
        Status::classify(prev, cur)
    }

    /// Modifiers held as of the last `update()`.
    #[inline]
    pub fn held_modifiers(&self) -> &BTreeSet<Key> {
        &self.held_modifiers
    }

    /// Modifiers held in the pending samples, i.e. including events that
    /// arrived since the last `update()`.
    pub fn sampled_modifiers(&self) -> BTreeSet<Key> {
        Key::MODIFIERS
            .iter()
            .copied()
            .filter(|m| self.keys[m.index()].sample())
            .collect()
    }

    #[inline]
    pub fn keyboard_hit(&self) -> bool {
        self.keyboard_hit
    }

    #[inline]
    pub fn mouse_hit(&self) -> bool {
        self.mouse_hit
    }

    /// Scroll latched on the last tick; positive is away from the user.
    #[inline]
    pub fn wheel_delta(&self) -> f32 {
        self.wheel_delta
    }

    pub fn wheel_direction(&self) -> Option<WheelDirection> {
        if self.wheel_delta > 0.0 {
            Some(WheelDirection::Up)
        } else if self.wheel_delta < 0.0 {
            Some(WheelDirection::Down)
        } else {
            None
        }
    }

    #[inline]
    pub fn is_wheel_going_up(&self) -> bool {
        self.wheel_direction() == Some(WheelDirection::Up)
    }

    #[inline]
    pub fn is_wheel_going_down(&self) -> bool {
        self.wheel_direction() == Some(WheelDirection::Down)
    }

    #[inline]
    pub fn has_wheel_moved(&self) -> bool {
        self.wheel_delta != 0.0
    }

    #[inline]
    pub fn has_mouse_moved(&self) -> bool {
        self.mouse_moved
    }

    pub fn mouse_position(&self) -> Option<(f32, f32)> {
        self.mouse_pos
    }

    pub fn joystick_hit(&self) -> bool {
        self.default_joystick_state().is_some_and(JoystickState::hit)
    }

    pub fn joystick_moved(&self) -> bool {
        self.default_joystick_state().is_some_and(JoystickState::moved)
    }

    pub(crate) fn suppress_key(&mut self, key: Key) {
        self.keys[key.index()].suppress();
    }

    pub(crate) fn suppress_mouse(&mut self, button: MouseButton) {
        self.mouse[button.index()].suppress();
    }

    pub(crate) fn suppress_joystick_button(&mut self, joystick: usize, button: usize) {
        if let Some(ch) = self.joysticks.get_mut(joystick).and_then(|js| js.button_mut(button)) {
            ch.suppress();
        }
    }

    // ── joysticks ──────────────────────────────────────────────────────────

    #[inline]
    pub fn press_threshold(&self) -> f32 {
        self.press_threshold
    }

    pub fn connect_joystick(&mut self, joystick: usize, info: JoystickInfo) -> bool {
        let Some(js) = self.joysticks.get_mut(joystick) else {
            return false;
        };
        js.connect(info);
        js.set_dead_zone(self.default_dead_zone);
        if self.default_joystick.is_none() {
            self.default_joystick = Some(joystick);
        }
        true
    }

    pub fn disconnect_joystick(&mut self, joystick: usize) -> bool {
        let Some(js) = self.joysticks.get_mut(joystick) else {
            return false;
        };
        if !js.is_connected() {
            return false;
        }
        js.disconnect();
        if self.default_joystick == Some(joystick) {
            self.default_joystick = self.joysticks.iter().position(JoystickState::is_connected);
        }
        true
    }

    #[inline]
    pub fn is_joystick_connected(&self, joystick: usize) -> bool {
        self.connected(joystick).is_some()
    }

    /// Connected joystick at `joystick`, if any.
    #[inline]
    pub fn joystick(&self, joystick: usize) -> Option<&JoystickState> {
        self.connected(joystick)
    }

    #[inline]
    pub fn default_joystick(&self) -> Option<usize> {
        self.default_joystick
    }

    pub fn set_default_joystick(&mut self, joystick: usize) -> bool {
        if !self.is_joystick_connected(joystick) {
            return false;
        }
        self.default_joystick = Some(joystick);
        true
    }

    pub fn default_joystick_state(&self) -> Option<&JoystickState> {
        self.default_joystick.and_then(|id| self.connected(id))
    }

    pub fn calibrate_joystick(&mut self, joystick: usize) -> bool {
        match self.joysticks.get_mut(joystick) {
            Some(js) if js.is_connected() => {
                js.calibrate();
                true
            }
            _ => false,
        }
    }

    pub fn dead_zone(&self, joystick: usize) -> Option<f32> {
        self.connected(joystick).map(JoystickState::dead_zone)
    }

    /// Negative dead zones and unknown slots are rejected.
    pub fn set_dead_zone(&mut self, joystick: usize, dead_zone: f32) -> bool {
        self.joysticks
            .get_mut(joystick)
            .is_some_and(|js| js.is_connected() && js.set_dead_zone(dead_zone))
    }

    pub fn axis_position(&self, joystick: usize, axis: JoystickAxis) -> Option<f32> {
        self.connected(joystick).map(|js| js.axis(axis).position())
    }

    pub fn is_axis_stopped(&self, joystick: usize, axis: JoystickAxis) -> Option<bool> {
        self.connected(joystick).map(|js| js.is_axis_stopped(axis))
    }

    fn connected(&self, joystick: usize) -> Option<&JoystickState> {
        self.joysticks.get(joystick).filter(|js| js.is_connected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracker_with_pad() -> PrimitiveTracker {
        let mut t = PrimitiveTracker::new(75.0, 10.0);
        assert!(t.connect_joystick(0, JoystickInfo::default()));
        t
    }

    #[test]
    fn key_walks_through_all_statuses() {
        let mut t = PrimitiveTracker::default();
        t.set_key_sample(Key::Space, true);
        t.update();
        assert_eq!(t.key_status(Key::Space), Status::Pressed);
        assert!(t.keyboard_hit());
        t.update();
        assert_eq!(t.key_status(Key::Space), Status::Down);
        assert!(!t.keyboard_hit());
        t.set_key_sample(Key::Space, false);
        t.update();
        assert_eq!(t.key_status(Key::Space), Status::Released);
        t.update();
        assert_eq!(t.key_status(Key::Space), Status::Up);
    }

    #[test]
    fn held_modifiers_follow_modifier_keys() {
        let mut t = PrimitiveTracker::default();
        t.set_key_sample(Key::LControl, true);
        t.set_key_sample(Key::LShift, true);
        t.set_key_sample(Key::A, true);
        t.update();
        assert_eq!(
            t.held_modifiers().iter().copied().collect::<Vec<_>>(),
            vec![Key::LControl, Key::LShift]
        );

        t.set_key_sample(Key::LShift, false);
        t.update();
        assert_eq!(t.held_modifiers().len(), 1);
    }

    #[test]
    fn combo_needs_every_modifier() {
        let mut t = PrimitiveTracker::default();
        let mods: BTreeSet<Key> = [Key::LControl].into();
        t.set_key_sample(Key::A, true);
        t.update();
        assert_eq!(t.combo_status(Key::A, &mods), Status::Up);

        t.set_key_sample(Key::LControl, true);
        t.update();
        assert_eq!(t.combo_status(Key::A, &mods), Status::Pressed);
        t.update();
        assert_eq!(t.combo_status(Key::A, &mods), Status::Down);

        t.set_key_sample(Key::LControl, false);
        t.update();
        assert_eq!(t.combo_status(Key::A, &mods), Status::Released);
    }

    #[test]
    fn invalid_ids_read_as_neutral() {
        let t = PrimitiveTracker::default();
        assert_eq!(t.joystick_button_status(0, 0), Status::Up);
        assert_eq!(t.joystick_button_status(99, 0), Status::Up);
        assert_eq!(t.axis_position(0, JoystickAxis::X), None);
        assert_eq!(t.is_axis_stopped(42, JoystickAxis::X), None);
        assert!(t.joystick(JOYSTICK_COUNT).is_none());
    }

    #[test]
    fn default_joystick_falls_back_to_lowest_connected() {
        let mut t = PrimitiveTracker::default();
        t.connect_joystick(3, JoystickInfo::default());
        t.connect_joystick(1, JoystickInfo::default());
        assert_eq!(t.default_joystick(), Some(3));

        t.disconnect_joystick(3);
        assert_eq!(t.default_joystick(), Some(1));
        t.disconnect_joystick(1);
        assert_eq!(t.default_joystick(), None);
        assert!(!t.disconnect_joystick(1));
    }

    #[test]
    fn first_press_calibration_is_reported() {
        let mut t = tracker_with_pad();
        t.set_joystick_axis_sample(0, JoystickAxis::X, 12.0);
        t.update();
        assert_eq!(t.is_axis_stopped(0, JoystickAxis::X), Some(false));

        t.set_joystick_button_sample(0, 2, true);
        assert_eq!(t.update(), vec![0]);
        assert!(t.joystick_hit());
        assert_eq!(t.is_axis_stopped(0, JoystickAxis::X), Some(true));
        assert!(t.update().is_empty());
    }

    #[test]
    fn axis_reads_as_a_button_past_the_threshold() {
        let mut t = tracker_with_pad();
        t.set_joystick_axis_sample(0, JoystickAxis::Y, -90.0);
        t.update();
        assert_eq!(t.joystick_axis_status(0, JoystickAxis::Y, AxisDirection::Negative), Status::Pressed);
        assert_eq!(t.joystick_axis_status(0, JoystickAxis::Y, AxisDirection::Positive), Status::Up);
        assert_eq!(t.joystick_axis_status(0, JoystickAxis::Y, AxisDirection::Full), Status::Pressed);
    }

    #[test]
    fn out_of_range_samples_are_clamped() {
        let mut t = tracker_with_pad();
        t.set_joystick_axis_sample(0, JoystickAxis::Z, 250.0);
        t.update();
        assert_eq!(t.axis_position(0, JoystickAxis::Z), Some(AXIS_RANGE));
    }

    #[test]
    fn reset_all_clears_everything() {
        let mut t = tracker_with_pad();
        t.set_key_sample(Key::LAlt, true);
        t.set_mouse_sample(MouseButton::Left, true);
        t.set_joystick_button_sample(0, 0, true);
        t.update();
        t.reset_all();
        assert_eq!(t.key_status(Key::LAlt), Status::Up);
        assert_eq!(t.mouse_status(MouseButton::Left), Status::Up);
        assert_eq!(t.joystick_button_status(0, 0), Status::Up);
        assert!(t.held_modifiers().is_empty());

        // samples were dropped too
        t.update();
        assert_eq!(t.key_status(Key::LAlt), Status::Up);
    }

    #[test]
    fn wheel_scroll_lasts_one_tick() {
        let mut t = PrimitiveTracker::default();
        assert!(!t.has_wheel_moved());
        t.add_wheel_sample(1.0);
        t.add_wheel_sample(2.0);
        t.update();
        assert_eq!(t.wheel_delta(), 3.0);
        assert!(t.is_wheel_going_up());
        assert_eq!(t.wheel_direction(), Some(WheelDirection::Up));

        t.update();
        assert!(!t.has_wheel_moved());
        assert_eq!(t.wheel_direction(), None);

        t.add_wheel_sample(-1.0);
        t.update();
        assert!(t.is_wheel_going_down());
        t.add_wheel_sample(-1.0);
        t.reset_all();
        t.update();
        assert!(!t.has_wheel_moved());
    }

    #[test]
    fn mouse_motion_is_flagged_per_tick() {
        let mut t = PrimitiveTracker::default();
        t.set_mouse_position_sample(10.0, 20.0);
        t.update();
        assert!(!t.has_mouse_moved());
        assert_eq!(t.mouse_position(), Some((10.0, 20.0)));

        t.set_mouse_position_sample(12.0, 20.0);
        t.update();
        assert!(t.has_mouse_moved());
        t.update();
        assert!(!t.has_mouse_moved());

        t.set_mouse_position_sample(12.0, 20.0);
        t.update();
        assert!(!t.has_mouse_moved());
    }

    #[test]
    fn negative_dead_zone_is_a_no_op() {
        let mut t = tracker_with_pad();
        assert!(!t.set_dead_zone(0, -3.0));
        assert_eq!(t.dead_zone(0), Some(10.0));
        assert!(!t.set_dead_zone(5, 3.0));
    }
}
