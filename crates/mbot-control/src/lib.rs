//! Hardware-independent control logic for the mbot.
//!
//! Everything in this crate is pure logic over values and a small line
//! capability trait, so it runs under host `cargo test` as well as on the
//! robot. The firmware crate owns the pins and the executor and calls in
//! here once per control-loop iteration.

#![no_std]

pub mod drive;
pub mod joystick;
pub mod obstacle;
pub mod ranging;

// Re-export commonly used types
pub use drive::{MotorCommand, WheelCommand, WheelSense};
pub use joystick::{Direction, JoystickPins, Turn};
pub use obstacle::ObstacleClass;
pub use ranging::{RangeFinder, RangeLine, RangingEvent, RangingState};
