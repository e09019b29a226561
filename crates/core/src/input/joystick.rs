//! Per-slot joystick state: button channels, axis channels, dead zone, and the
//! rest-value calibration that compensates for sticks that don't idle at 0.

use serde::{Deserialize, Serialize};

use crate::input::primitive::{
    AxisDirection, JOYSTICK_AXIS_COUNT, JOYSTICK_BUTTON_COUNT, JoystickAxis,
};
use crate::input::status::{DigitalChannel, Status};

/// What the host knows about a connected device.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct JoystickInfo {
    pub name: String,
    pub vendor_id: u32,
    pub product_id: u32,
    pub button_count: usize,
    pub axis_count: usize,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AxisChannel {
    sample: f32,
    previous: f32,
    current: f32,
    /// Captured idle position; `0.0` until calibrated.
    rest: f32,
}

impl AxisChannel {
    #[inline]
    pub fn position(&self) -> f32 {
        self.current
    }

    #[inline]
    pub fn rest(&self) -> f32 {
        self.rest
    }

    #[inline]
    pub fn offset(&self) -> f32 {
        self.current - self.rest
    }

    #[inline]
    pub fn previous_offset(&self) -> f32 {
        self.previous - self.rest
    }

    /// Status of this axis read as a button on one side of its travel.
    pub fn status(&self, direction: AxisDirection, threshold: f32) -> Status {
        Status::classify(
            direction.engaged(self.previous_offset(), threshold),
            direction.engaged(self.offset(), threshold),
        )
    }
}

#[derive(Debug, Clone)]
pub struct JoystickState {
    info: Option<JoystickInfo>,
    buttons: [DigitalChannel; JOYSTICK_BUTTON_COUNT],
    axes: [AxisChannel; JOYSTICK_AXIS_COUNT],
    dead_zone: f32,
    calibrated: bool,
    hit: bool,
    moved: bool,
}

impl JoystickState {
    pub fn new(dead_zone: f32) -> Self {
        Self {
            info: None,
            buttons: [DigitalChannel::default(); JOYSTICK_BUTTON_COUNT],
            axes: [AxisChannel::default(); JOYSTICK_AXIS_COUNT],
            dead_zone,
            calibrated: false,
            hit: false,
            moved: false,
        }
    }

    #[inline]
    pub fn is_connected(&self) -> bool {
        self.info.is_some()
    }

    #[inline]
    pub fn info(&self) -> Option<&JoystickInfo> {
        self.info.as_ref()
    }

    /// (Re)initialise the slot for a freshly connected device. Calibration is
    /// dropped because the new device may idle somewhere else.
    pub fn connect(&mut self, info: JoystickInfo) {
        self.reset_channels();
        self.calibrated = false;
        self.info = Some(info);
    }

    pub fn disconnect(&mut self) {
        self.reset_channels();
        self.calibrated = false;
        self.info = None;
    }

    pub fn reset_channels(&mut self) {
        self.buttons.iter_mut().for_each(DigitalChannel::reset);
        self.axes = [AxisChannel::default(); JOYSTICK_AXIS_COUNT];
        self.hit = false;
        self.moved = false;
    }

    #[inline]
    pub fn dead_zone(&self) -> f32 {
        self.dead_zone
    }

    /// Negative values are ignored.
    pub fn set_dead_zone(&mut self, dead_zone: f32) -> bool {
        if !(dead_zone >= 0.0 && dead_zone.is_finite()) {
            return false;
        }
        self.dead_zone = dead_zone;
        true
    }

    #[inline]
    pub fn is_calibrated(&self) -> bool {
        self.calibrated
    }

    /// Capture the current axis samples as rest values. Samples inside the
    /// dead zone are treated as a centred stick (rest `0.0`).
    pub fn calibrate(&mut self) {
        let dz = self.dead_zone;
        for axis in self.axes.iter_mut() {
            axis.rest = if axis.sample.abs() > dz {
                axis.sample
            } else {
                0.0
            };
            axis.previous = axis.sample;
            axis.current = axis.sample;
        }
        self.calibrated = true;
    }

    pub fn set_button_sample(&mut self, button: usize, held: bool) -> bool {
        match self.buttons.get_mut(button) {
            Some(ch) => {
                ch.set_sample(held);
                true
            }
            None => false,
        }
    }

    pub fn set_axis_sample(&mut self, axis: JoystickAxis, position: f32) {
        self.axes[axis.index()].sample = position;
    }

    #[inline]
    pub fn button(&self, button: usize) -> Option<&DigitalChannel> {
        self.buttons.get(button)
    }

    #[inline]
    pub(crate) fn button_mut(&mut self, button: usize) -> Option<&mut DigitalChannel> {
        self.buttons.get_mut(button)
    }

    #[inline]
    pub fn axis(&self, axis: JoystickAxis) -> &AxisChannel {
        &self.axes[axis.index()]
    }

    /// `|position - rest| < dead_zone`
    #[inline]
    pub fn is_axis_stopped(&self, axis: JoystickAxis) -> bool {
        self.axis(axis).offset().abs() < self.dead_zone
    }

    #[inline]
    pub fn hit(&self) -> bool {
        self.hit
    }

    #[inline]
    pub fn moved(&self) -> bool {
        self.moved
    }

    /// Returns true when this tick's update ran a first-press calibration.
    pub fn update(&mut self) -> bool {
        self.hit = false;
        self.moved = false;

        if !self.is_connected() {
            return false;
        }

        for ch in self.buttons.iter_mut() {
            ch.update();
            if ch.status() == Status::Pressed {
                self.hit = true;
            }
        }

        let calibrated_now = self.hit && !self.calibrated;
        if calibrated_now {
            self.calibrate();
        }

        let dz = self.dead_zone;
        for axis in self.axes.iter_mut() {
            axis.previous = axis.current;
            axis.current = axis.sample;
            if self.calibrated && axis.offset().abs() > dz {
                self.moved = true;
            }
        }

        calibrated_now
    }
}
