//! Obstacle Indicator Module
//!
//! This module provides functionality for signaling changes in the
//! obstacle indicator. It uses an embassy-sync Signal for thread-safe
//! communication between the control loop and the LED task.
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;

/// Signal for obstacle indicator changes
///
/// Carries `true` while the path ahead is blocked. Only transitions are
/// signaled; the LED task latches the last value.
pub static OBSTACLE_INDICATOR: Signal<CriticalSectionRawMutex, bool> = Signal::new();

/// Signals a change in the obstacle indicator
///
/// It's a synchronous operation that doesn't require awaiting, so the
/// control loop can call it mid-cycle.
pub fn send(blocked: bool) {
    OBSTACLE_INDICATOR.signal(blocked);
}

/// Waits for a change in the obstacle indicator
///
/// This asynchronous function blocks until a change is signaled, then
/// returns the new value.
pub async fn wait() -> bool {
    OBSTACLE_INDICATOR.wait().await
}
