//! Hardware Resource Management
//!
//! Manages and allocates hardware resources (pins, peripherals) to different
//! system components. This module ensures safe and organized access to the
//! robot's hardware by:
//! - Defining clear ownership of hardware resources
//! - Preventing conflicts in hardware access
//!
//! # Resource Groups
//! - Joystick: four active-low direction inputs
//! - Range Sensor: the shared trigger/echo data pin
//! - Motor Driver: per-wheel direction pins plus one PWM slice (A/B)
//! - Obstacle LED: obstacle indicator output

use assign_resources::assign_resources;
use embassy_rp::peripherals;

assign_resources! {
    /// Arcade joystick direction pins (pulled up, grounded on activation)
    joystick: JoystickResources {
        up_pin: PIN_10,
        down_pin: PIN_11,
        left_pin: PIN_12,
        right_pin: PIN_13,
    },
    /// Ultrasonic range sensor shared trigger/echo pin
    range_sensor: RangeSensorResources {
        data_pin: PIN_14,
    },
    /// Motor driver pins; both wheels share PWM slice 0 (left on channel A,
    /// right on channel B), mirroring the single-timer arrangement of the
    /// original mbot board
    motor_driver: MotorDriverResources {
        pwm_slice: PWM_SLICE0,
        left_pwm_pin: PIN_16,
        right_pwm_pin: PIN_17,
        left_dir_pin: PIN_20,
        right_dir_pin: PIN_21,
    },
    /// Obstacle indicator LED
    obstacle_led: ObstacleLedResources {
        led_pin: PIN_25,
    },
}
