use bitflags::bitflags;
use serde::{Deserialize, Serialize};

/// Per-tick classification of a digital signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Status {
    /// Went from released to held this tick.
    Pressed,
    /// Held last tick and this tick.
    Down,
    /// Went from held to released this tick.
    Released,
    /// Released last tick and this tick.
    #[default]
    Up,
}

impl Status {
    pub const ALL: [Status; 4] = [Status::Pressed, Status::Down, Status::Released, Status::Up];

    #[inline]
    pub fn classify(previous: bool, current: bool) -> Status {
        match (previous, current) {
            (false, false) => Status::Up,
            (false, true) => Status::Pressed,
            (true, true) => Status::Down,
            (true, false) => Status::Released,
        }
    }

    /// Was the signal held on the previous tick?
    #[inline]
    pub fn was_held(self) -> bool {
        matches!(self, Status::Down | Status::Released)
    }

    /// Is the signal held on this tick?
    #[inline]
    pub fn is_held(self) -> bool {
        matches!(self, Status::Pressed | Status::Down)
    }

    /// Combine several signals as one virtual button: held whenever any of them is.
    pub fn merge<I: IntoIterator<Item = Status>>(statuses: I) -> Status {
        let (prev, cur) = statuses
            .into_iter()
            .fold((false, false), |(p, c), s| (p || s.was_held(), c || s.is_held()));
        Status::classify(prev, cur)
    }

    #[inline]
    pub fn mask(self) -> StatusMask {
        match self {
            Status::Pressed => StatusMask::PRESSED,
            Status::Down => StatusMask::DOWN,
            Status::Released => StatusMask::RELEASED,
            Status::Up => StatusMask::UP,
        }
    }
}

bitflags! {
    /// Set of statuses, for "is it any of these?" queries.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct StatusMask: u8 {
        const PRESSED = 1 << 0;
        const DOWN = 1 << 1;
        const RELEASED = 1 << 2;
        const UP = 1 << 3;
        const HELD = Self::PRESSED.bits() | Self::DOWN.bits();
    }
}

impl StatusMask {
    #[inline]
    pub fn matches(self, status: Status) -> bool {
        self.intersects(status.mask())
    }
}

/// One digital primitive (key, mouse button, joystick button).
#[derive(Debug, Clone, Copy, Default)]
pub struct DigitalChannel {
    /// Sample delivered for the upcoming tick.
    sample: bool,
    previous: bool,
    current: bool,
    status: Status,
    /// Reports `Up` until the physical input is let go (used after a rebind capture).
    suppressed: bool,
}

impl DigitalChannel {
    #[inline]
    pub fn set_sample(&mut self, held: bool) {
        self.sample = held;
    }

    #[inline]
    pub fn sample(&self) -> bool {
        self.sample
    }

    /// Latch the pending sample and reclassify.
    pub fn update(&mut self) {
        self.previous = self.current;
        self.current = self.sample;

        if self.suppressed {
            if !self.current {
                self.suppressed = false;
            }
            self.previous = false;
            self.current = false;
            self.status = Status::Up;
            return;
        }

        self.status = Status::classify(self.previous, self.current);
    }

    #[inline]
    pub fn status(&self) -> Status {
        self.status
    }

    #[inline]
    pub fn previous(&self) -> bool {
        self.previous
    }

    #[inline]
    pub fn current(&self) -> bool {
        self.current
    }

    /// Swallow the current press: the channel reads `Up` until released.
    pub fn suppress(&mut self) {
        self.suppressed = self.sample || self.current;
        self.previous = false;
        self.current = false;
        self.status = Status::Up;
    }

    pub fn reset(&mut self) {
        *self = DigitalChannel::default();
    }
}
