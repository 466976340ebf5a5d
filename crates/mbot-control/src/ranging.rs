//! Ultrasonic ranging state machine
//!
//! The mbot's range sensor is a three-pin device whose single data line is
//! shared between triggering and echo: a 10 µs high pulse starts a
//! measurement, then the sensor raises the same line for a duration
//! proportional to target distance. This module measures that pulse width
//! by counting control-loop iterations, advancing one small step per call
//! so the loop never blocks on the sensor.
//!
//! # Time units
//! Distances are reported in loop ticks, not physical units. Tying the
//! unit to the loop's own cycle time keeps the comparison against the
//! obstacle thresholds free of any timer hardware; the thresholds in
//! [`crate::obstacle`] are calibration constants for the loop speed.
//!
//! # Fault handling
//! A disconnected or faulty sensor never answers. Both waiting states are
//! bounded by [`ECHO_TIMEOUT_TICKS`]; on expiry `step()` reports
//! [`RangingEvent::EchoTimeout`] and the machine falls back to `Trigger`,
//! so ranging recovers as soon as the sensor does.

/// Direction of the shared trigger/echo line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LineMode {
    Input,
    Output,
}

/// Capability interface for the sensor's data line.
///
/// The [`RangeFinder`] is the sole owner of the handle passed to it; no
/// other component may touch the line while ranging is in flight. The
/// microsecond delays are the bounded busy-waits needed to shape the
/// trigger pulse and must not suspend.
pub trait RangeLine {
    fn set_mode(&mut self, mode: LineMode);
    fn write(&mut self, high: bool);
    fn read(&mut self) -> bool;
    fn delay_us(&mut self, us: u32);
}

/// States of one ranging cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RangingState {
    /// Fire the trigger pulse and release the line.
    Trigger,
    /// Echo line is expected to go high.
    WaitEchoStart,
    /// Echo line is high; waiting for it to drop.
    WaitEchoEnd,
    /// Quiescent period before the next firing.
    Cooldown,
}

/// Outcome of a single [`RangeFinder::step`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RangingEvent {
    /// No completed measurement this call.
    Pending,
    /// Echo pulse measured; the value is its width in loop ticks.
    Sample(u16),
    /// The echo never arrived (or never ended) within the bounded wait.
    EchoTimeout,
}

/// Ticks to hold in `Cooldown` before re-triggering, letting stray echoes
/// settle.
pub const COOLDOWN_TICKS: u16 = 2000;

/// Bound on each echo wait. A healthy sensor answers within a few thousand
/// ticks; past this the sensor is treated as absent for the cycle.
pub const ECHO_TIMEOUT_TICKS: u16 = 30_000;

/// Non-blocking driver for the range sensor.
///
/// Call [`step`](Self::step) exactly once per control-loop iteration; the
/// internal tick counter is what turns echo pulse widths into distance
/// samples, so skipped or doubled calls skew the measurement.
pub struct RangeFinder<L: RangeLine> {
    line: L,
    state: RangingState,
    counter: u16,
}

impl<L: RangeLine> RangeFinder<L> {
    /// Takes exclusive ownership of the sensor line. The first `step()`
    /// fires a trigger pulse.
    pub fn new(line: L) -> Self {
        Self {
            line,
            state: RangingState::Trigger,
            counter: 0,
        }
    }

    /// Current state, for diagnostics.
    pub fn state(&self) -> RangingState {
        self.state
    }

    /// Releases the sensor line.
    pub fn into_line(self) -> L {
        self.line
    }

    /// Advances the ranging cycle by one tick.
    ///
    /// Returns [`RangingEvent::Sample`] exactly on the transition out of
    /// `WaitEchoEnd`, carrying the echo width in ticks.
    pub fn step(&mut self) -> RangingEvent {
        // The counter bumps on every call before any state logic runs;
        // Cooldown's threshold check relies on this ordering.
        self.counter = self.counter.wrapping_add(1);

        match self.state {
            RangingState::Trigger => {
                self.counter = 0;
                self.line.set_mode(LineMode::Output);
                self.line.write(false);
                self.line.delay_us(2);
                self.line.write(true);
                self.line.delay_us(10);
                self.line.write(false);
                self.line.set_mode(LineMode::Input);
                self.state = RangingState::WaitEchoStart;
                RangingEvent::Pending
            }
            RangingState::WaitEchoStart => {
                if self.line.read() {
                    // Echo started; measure its width from zero.
                    self.counter = 0;
                    self.state = RangingState::WaitEchoEnd;
                    RangingEvent::Pending
                } else if self.counter > ECHO_TIMEOUT_TICKS {
                    self.state = RangingState::Trigger;
                    RangingEvent::EchoTimeout
                } else {
                    RangingEvent::Pending
                }
            }
            RangingState::WaitEchoEnd => {
                if !self.line.read() {
                    let width = self.counter;
                    self.counter = 0;
                    self.state = RangingState::Cooldown;
                    RangingEvent::Sample(width)
                } else if self.counter > ECHO_TIMEOUT_TICKS {
                    self.state = RangingState::Trigger;
                    RangingEvent::EchoTimeout
                } else {
                    RangingEvent::Pending
                }
            }
            RangingState::Cooldown => {
                if self.counter > COOLDOWN_TICKS {
                    self.state = RangingState::Trigger;
                }
                RangingEvent::Pending
            }
        }
    }
}
