//! Joystick input decoding
//!
//! An arcade joystick has a five-pin connection: ground plus one pin per
//! direction. Moving the stick grounds the matching pin, so the inputs run
//! with pull-ups enabled and a direction is asserted when its pin reads
//! low.

/// Raw levels of the four joystick pins, sampled once per control cycle.
/// `true` is high (released); an asserted direction reads low.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct JoystickPins {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl JoystickPins {
    /// All pins high: stick centered.
    pub const fn released() -> Self {
        Self {
            up: true,
            down: true,
            left: true,
            right: true,
        }
    }
}

impl Default for JoystickPins {
    fn default() -> Self {
        Self::released()
    }
}

/// Commanded direction of travel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    Stopped,
    Forward,
    Reverse,
}

impl Direction {
    /// Up wins over down when both are asserted; neither asserted means
    /// stopped.
    pub fn from_pins(pins: JoystickPins) -> Self {
        if !pins.up {
            Direction::Forward
        } else if !pins.down {
            Direction::Reverse
        } else {
            Direction::Stopped
        }
    }
}

/// Commanded turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Turn {
    None,
    Left,
    Right,
}

impl Turn {
    /// Left wins over right when both are asserted.
    pub fn from_pins(pins: JoystickPins) -> Self {
        if !pins.left {
            Turn::Left
        } else if !pins.right {
            Turn::Right
        } else {
            Turn::None
        }
    }
}
