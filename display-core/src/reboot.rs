//! Synthetic reboot progress.
//!
//! The console has no way to observe a reboot, so it shows a timer dressed
//! as a progress bar: 0 to 100 in steps of 1, one step every 50 ms. The
//! device may still be coming up when the bar completes; callers re-read
//! device state afterwards rather than trusting the animation.

use std::time::Duration;

/// Delay between progress steps.
pub const TICK_INTERVAL: Duration = Duration::from_millis(50);

/// Progress values in display order, 0 through 100 inclusive.
pub fn ticks() -> impl Iterator<Item = u8> {
    0..=100
}

/// Drive the whole reboot flow: fire the reboot request, step the
/// progress display through [`ticks`] (the `step` callback owns the
/// per-tick delay), then dismiss the display and reload device state.
pub fn run_reboot(
    fire: impl FnOnce(),
    mut step: impl FnMut(u8),
    dismiss: impl FnOnce(),
    reload: impl FnOnce(),
) {
    fire();
    for tick in ticks() {
        step(tick);
    }
    dismiss();
    reload();
}
