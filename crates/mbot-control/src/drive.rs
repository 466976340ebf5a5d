//! Drive mixing
//!
//! Combines the joystick sample with the current obstacle classification
//! into per-wheel commands. Pure: the same inputs always produce the same
//! [`MotorCommand`], and all sequencing (when to sample, when to apply)
//! belongs to the control loop.

use crate::joystick::{Direction, JoystickPins, Turn};
use crate::obstacle::ObstacleClass;

/// Rotational sense of one wheel.
///
/// Logical sense only; the firmware's motor layer maps senses onto
/// direction-pin levels (the two motors are mounted mirrored).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WheelSense {
    Forward,
    Reverse,
}

/// Sense and 8-bit PWM duty for one wheel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WheelCommand {
    pub sense: WheelSense,
    pub duty: u8,
}

/// Commands for both wheels, recomputed and applied every cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MotorCommand {
    pub left: WheelCommand,
    pub right: WheelCommand,
}

impl MotorCommand {
    /// Both wheels unpowered.
    pub const fn stopped() -> Self {
        const IDLE: WheelCommand = WheelCommand {
            sense: WheelSense::Forward,
            duty: 0,
        };
        Self {
            left: IDLE,
            right: IDLE,
        }
    }
}

/// Computes the wheel commands for one control cycle.
///
/// The obstacle override suppresses forward motion only: the sensor faces
/// forward, so reverse is never blocked. A turn while driving halves the
/// duty of the wheel on the turning side; a turn while stopped spins in
/// place by running the wheels in opposite senses at the tier's full
/// speed.
pub fn update(obstacle: ObstacleClass, pins: JoystickPins) -> MotorCommand {
    let mut dir = Direction::from_pins(pins);
    let turn = Turn::from_pins(pins);

    if dir == Direction::Forward && obstacle.is_blocked() {
        dir = Direction::Stopped;
    }

    let max_speed = obstacle.max_speed();

    let mut cmd = MotorCommand::stopped();
    if let Some(sense) = match dir {
        Direction::Forward => Some(WheelSense::Forward),
        Direction::Reverse => Some(WheelSense::Reverse),
        Direction::Stopped => None,
    } {
        cmd.left = WheelCommand {
            sense,
            duty: max_speed,
        };
        cmd.right = WheelCommand {
            sense,
            duty: max_speed,
        };
    }

    // While rolling, both wheels keep their sense and the turning side
    // drops to half duty. From a standstill a turn spins in place instead.
    match turn {
        Turn::Left => {
            if dir != Direction::Stopped {
                cmd.left.duty /= 2;
            } else {
                cmd.left = WheelCommand {
                    sense: WheelSense::Forward,
                    duty: max_speed,
                };
                cmd.right = WheelCommand {
                    sense: WheelSense::Reverse,
                    duty: max_speed,
                };
            }
        }
        Turn::Right => {
            if dir != Direction::Stopped {
                cmd.right.duty /= 2;
            } else {
                cmd.left = WheelCommand {
                    sense: WheelSense::Reverse,
                    duty: max_speed,
                };
                cmd.right = WheelCommand {
                    sense: WheelSense::Forward,
                    duty: max_speed,
                };
            }
        }
        Turn::None => {}
    }

    cmd
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::obstacle::{MAX_SPEED, MED_SPEED};

    fn pins(up: bool, down: bool, left: bool, right: bool) -> JoystickPins {
        // Arguments are logical assertions; pins are active low.
        JoystickPins {
            up: !up,
            down: !down,
            left: !left,
            right: !right,
        }
    }

    #[test]
    fn centered_stick_stops_both_wheels() {
        let cmd = update(ObstacleClass::Clear, JoystickPins::released());
        assert_eq!(cmd, MotorCommand::stopped());
        assert_eq!(cmd.left.duty, 0);
        assert_eq!(cmd.right.duty, 0);
    }

    #[test]
    fn forward_runs_both_wheels_at_tier_speed() {
        let cmd = update(ObstacleClass::Clear, pins(true, false, false, false));
        assert_eq!(cmd.left.sense, WheelSense::Forward);
        assert_eq!(cmd.right.sense, WheelSense::Forward);
        assert_eq!(cmd.left.duty, MAX_SPEED);
        assert_eq!(cmd.right.duty, MAX_SPEED);

        let cmd = update(ObstacleClass::Approaching, pins(true, false, false, false));
        assert_eq!(cmd.left.duty, MED_SPEED);
        assert_eq!(cmd.right.duty, MED_SPEED);
    }

    #[test]
    fn blocked_suppresses_forward() {
        let cmd = update(ObstacleClass::Blocked, pins(true, false, false, false));
        assert_eq!(cmd, MotorCommand::stopped());
    }

    #[test]
    fn blocked_never_suppresses_reverse() {
        let cmd = update(ObstacleClass::Blocked, pins(false, true, false, false));
        assert_eq!(cmd.left.sense, WheelSense::Reverse);
        assert_eq!(cmd.right.sense, WheelSense::Reverse);
        assert_eq!(cmd.left.duty, MED_SPEED);
        assert_eq!(cmd.right.duty, MED_SPEED);
    }

    #[test]
    fn moving_turn_halves_the_turning_side() {
        let cmd = update(ObstacleClass::Clear, pins(true, false, true, false));
        assert_eq!(cmd.left.duty, MAX_SPEED / 2);
        assert_eq!(cmd.right.duty, MAX_SPEED);
        assert_eq!(cmd.left.sense, WheelSense::Forward);
        assert_eq!(cmd.right.sense, WheelSense::Forward);

        // Integer halving floors at the reduced tier.
        let cmd = update(ObstacleClass::Approaching, pins(true, false, false, true));
        assert_eq!(cmd.left.duty, MED_SPEED);
        assert_eq!(cmd.right.duty, 63);
    }

    #[test]
    fn reverse_turn_halves_the_turning_side_too() {
        let cmd = update(ObstacleClass::Clear, pins(false, true, false, true));
        assert_eq!(cmd.left.sense, WheelSense::Reverse);
        assert_eq!(cmd.right.sense, WheelSense::Reverse);
        assert_eq!(cmd.left.duty, MAX_SPEED);
        assert_eq!(cmd.right.duty, MAX_SPEED / 2);
    }

    #[test]
    fn stopped_turn_spins_in_place() {
        let cmd = update(ObstacleClass::Clear, pins(false, false, false, true));
        assert_eq!(cmd.left.sense, WheelSense::Reverse);
        assert_eq!(cmd.right.sense, WheelSense::Forward);
        assert_eq!(cmd.left.duty, MAX_SPEED);
        assert_eq!(cmd.right.duty, MAX_SPEED);

        let cmd = update(ObstacleClass::Clear, pins(false, false, true, false));
        assert_eq!(cmd.left.sense, WheelSense::Forward);
        assert_eq!(cmd.right.sense, WheelSense::Reverse);
    }

    #[test]
    fn spin_uses_current_tier_speed_in_every_tier() {
        for (class, speed) in [
            (ObstacleClass::Clear, MAX_SPEED),
            (ObstacleClass::Approaching, MED_SPEED),
            (ObstacleClass::Blocked, MED_SPEED),
        ] {
            let cmd = update(class, pins(false, false, false, true));
            assert_eq!(cmd.left.duty, speed);
            assert_eq!(cmd.right.duty, speed);
            assert_ne!(cmd.left.sense, cmd.right.sense);
        }
    }

    #[test]
    fn blocked_forward_with_turn_spins_instead_of_arcing() {
        // The override downgrades Forward to Stopped, so a held turn
        // becomes a spin away from the obstacle.
        let cmd = update(ObstacleClass::Blocked, pins(true, false, true, false));
        assert_eq!(cmd.left.sense, WheelSense::Forward);
        assert_eq!(cmd.right.sense, WheelSense::Reverse);
        assert_eq!(cmd.left.duty, MED_SPEED);
        assert_eq!(cmd.right.duty, MED_SPEED);
    }

    #[test]
    fn update_is_idempotent_for_unchanged_inputs() {
        let inputs = pins(true, false, true, false);
        let first = update(ObstacleClass::Approaching, inputs);
        for _ in 0..10 {
            assert_eq!(update(ObstacleClass::Approaching, inputs), first);
        }
    }
}
