//! mbot firmware entry point
//!
//! Initializes system and spawns control tasks.

#![no_std]
#![no_main]

use crate::task::{control_loop::control_loop, obstacle_indicate::obstacle_indicate};
use embassy_executor::Spawner;
use embassy_rp::block::ImageDef;
use embassy_rp::config::Config;
use system::resources::{
    AssignedResources, JoystickResources, MotorDriverResources, ObstacleLedResources,
    RangeSensorResources,
};
use {defmt_rtt as _, panic_probe as _};

/// Firmware image type for bootloader
#[link_section = ".start_block"]
#[used]
pub static IMAGE_DEF: ImageDef = ImageDef::secure_exe();

/// System core modules
mod system;
/// Task implementations
mod task;

/// Firmware entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let p = embassy_rp::init(Config::default());

    // Split the resources into separate groups, one per task.
    let r = split_resources!(p);

    // Spawn the indicator first so the control loop's initial
    // classification is never missed.
    spawner.spawn(obstacle_indicate(r.obstacle_led)).unwrap();
    spawner
        .spawn(control_loop(r.joystick, r.range_sensor, r.motor_driver))
        .unwrap();
}
