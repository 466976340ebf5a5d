//! Control loop
//!
//! The single cooperative cycle that drives the robot. Every iteration:
//! 1. advances the ranging state machine one step and, when a sample
//!    completed, reclassifies the obstacle state;
//! 2. samples the joystick pins;
//! 3. mixes both into per-wheel commands (the obstacle override happens in
//!    the mixer);
//! 4. writes the commands to the motor driver.
//!
//! There is no timer delay between iterations: ranging measures echo
//! pulses in loop iterations, so the loop free-runs and only yields to the
//! executor once per cycle. The sole busy-waits are the microsecond-level
//! trigger pulses on the sensor line.

use crate::system::indicator;
use crate::system::resources::{JoystickResources, MotorDriverResources, RangeSensorResources};
use defmt::{debug, info, warn};
use embassy_futures::yield_now;
use embassy_rp::gpio::{Flex, Input, Level, Output, Pull};
use embassy_rp::pwm;
use embassy_time::{block_for, Duration};
use mbot_control::ranging::{LineMode, RangeFinder, RangeLine, RangingEvent};
use mbot_control::{drive, JoystickPins, MotorCommand, ObstacleClass, WheelSense};

/// Motor PWM carrier frequency. Cheap brushed motors behave well around
/// 1kHz; this matches the 976Hz the original mbot timer produced.
const PWM_FREQ_HZ: u32 = 976;

/// The range sensor's shared trigger/echo pin.
///
/// Output only while shaping the trigger pulse, input otherwise. The pin
/// is owned by the [`RangeFinder`] for the lifetime of the task, so
/// nothing else can drive it mid-measurement.
struct SensorLine {
    pin: Flex<'static>,
}

impl SensorLine {
    fn new(mut pin: Flex<'static>) -> Self {
        // The sensor actively drives the echo; no pull wanted.
        pin.set_pull(Pull::None);
        pin.set_as_input();
        Self { pin }
    }
}

impl RangeLine for SensorLine {
    fn set_mode(&mut self, mode: LineMode) {
        match mode {
            LineMode::Input => self.pin.set_as_input(),
            LineMode::Output => self.pin.set_as_output(),
        }
    }

    fn write(&mut self, high: bool) {
        if high {
            self.pin.set_high();
        } else {
            self.pin.set_low();
        }
    }

    fn read(&mut self) -> bool {
        self.pin.is_high()
    }

    fn delay_us(&mut self, us: u32) {
        block_for(Duration::from_micros(us as u64));
    }
}

/// Per-wheel direction pins plus the shared PWM slice (left wheel on
/// channel A, right on channel B).
struct Motors {
    left_dir: Output<'static>,
    right_dir: Output<'static>,
    pwm: pwm::Pwm<'static>,
    config: pwm::Config,
}

impl Motors {
    fn new(r: MotorDriverResources) -> Self {
        let clock_freq_hz = embassy_rp::clocks::clk_sys_freq(); // 150MHz

        // Calculate minimum divider needed to keep period under 16-bit limit (65535)
        let divider = ((clock_freq_hz / PWM_FREQ_HZ) / 65535 + 1) as u8;
        let period = (clock_freq_hz / (PWM_FREQ_HZ * divider as u32)) as u16 - 1;

        let mut config = pwm::Config::default();
        config.divider = divider.into();
        config.top = period;

        let pwm =
            pwm::Pwm::new_output_ab(r.pwm_slice, r.left_pwm_pin, r.right_pwm_pin, config.clone());

        Self {
            left_dir: Output::new(r.left_dir_pin, Level::Low),
            right_dir: Output::new(r.right_dir_pin, Level::Low),
            pwm,
            config,
        }
    }

    /// Applies both wheel commands. Written every cycle, like the OCR
    /// registers on the original board.
    fn apply(&mut self, cmd: &MotorCommand) {
        // The motors are mounted mirrored: forward is direction-pin high
        // on the left wheel and low on the right.
        self.left_dir.set_level(match cmd.left.sense {
            WheelSense::Forward => Level::High,
            WheelSense::Reverse => Level::Low,
        });
        self.right_dir.set_level(match cmd.right.sense {
            WheelSense::Forward => Level::Low,
            WheelSense::Reverse => Level::High,
        });

        self.config.compare_a = Self::duty_to_compare(cmd.left.duty, self.config.top);
        self.config.compare_b = Self::duty_to_compare(cmd.right.duty, self.config.top);
        self.pwm.set_config(&self.config);
    }

    /// Scales an 8-bit duty command onto the configured PWM period.
    fn duty_to_compare(duty: u8, top: u16) -> u16 {
        ((duty as u32 * (top as u32 + 1)) / 255) as u16
    }
}

/// Main control task.
///
/// Owns the joystick inputs, the range sensor line and the motor driver;
/// obstacle classification is the only state carried across iterations
/// (sticky until the next sample).
#[embassy_executor::task]
pub async fn control_loop(
    joystick: JoystickResources,
    range_sensor: RangeSensorResources,
    motor: MotorDriverResources,
) {
    // The joystick grounds a pin when the stick is deflected, so all four
    // inputs idle high on internal pull-ups.
    let up = Input::new(joystick.up_pin, Pull::Up);
    let down = Input::new(joystick.down_pin, Pull::Up);
    let left = Input::new(joystick.left_pin, Pull::Up);
    let right = Input::new(joystick.right_pin, Pull::Up);

    let mut finder = RangeFinder::new(SensorLine::new(Flex::new(range_sensor.data_pin)));

    let mut motors = Motors::new(motor);
    motors.apply(&MotorCommand::stopped());

    let mut obstacle = ObstacleClass::default();
    indicator::send(obstacle.is_blocked());

    info!("control loop started");

    loop {
        // Advance ranging by one tick; a finished measurement updates the
        // sticky classification. No sample means no reclassification.
        match finder.step() {
            RangingEvent::Sample(distance) => {
                debug!("distance: {}", distance);
                let class = ObstacleClass::classify(distance);
                if class != obstacle {
                    info!("obstacle class changed from {} to {}", obstacle, class);
                    obstacle = class;
                    indicator::send(class.is_blocked());
                }
            }
            RangingEvent::EchoTimeout => {
                warn!("no echo from range sensor, re-triggering");
            }
            RangingEvent::Pending => {}
        }

        let pins = JoystickPins {
            up: up.is_high(),
            down: down.is_high(),
            left: left.is_high(),
            right: right.is_high(),
        };

        motors.apply(&drive::update(obstacle, pins));

        // Let the indicator task run; the loop itself never sleeps.
        yield_now().await;
    }
}
