//! Fixed-step defaults for headless runs.
//!
//! The core accepts any `dt` per tick; hosts that drive it from a frame loop
//! pass their own frame time. These are used by the CLI and the JSON API when
//! no step is given.

/// Ticks per simulated second at the default step
pub const TICKS_PER_SECOND: u32 = 60;

/// Default step (1/60 s)
pub const DEFAULT_DT: f32 = 1.0 / TICKS_PER_SECOND as f32;

/// Number of `dt` steps needed to cover `seconds` (rounded up).
///
/// Returns 0 for a non-positive or non-finite step or duration.
pub fn ticks_for(seconds: f32, dt: f32) -> u64 {
    if !(seconds.is_finite() && dt.is_finite()) || seconds <= 0.0 || dt <= 0.0 {
        return 0;
    }
    (seconds / dt).ceil() as u64
}
