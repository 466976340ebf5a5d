//! Obstacle LED indication
//!
//! Lights the indicator LED while the path ahead is classified as
//! blocked. The control loop signals transitions; this task just latches
//! them onto the pin.

use crate::system::indicator;
use crate::system::resources::ObstacleLedResources;
use embassy_rp::gpio::{Level, Output};

/// Obstacle indicator task
#[embassy_executor::task]
pub async fn obstacle_indicate(r: ObstacleLedResources) {
    let mut led = Output::new(r.led_pin, Level::Low);

    loop {
        let blocked = indicator::wait().await;
        led.set_level(if blocked { Level::High } else { Level::Low });
    }
}
