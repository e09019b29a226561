// Primitive state tracking: raw channels, joysticks, and the tick latch.
pub mod event;
pub mod joystick;
pub mod primitive;
pub mod status;
pub mod tracker;
