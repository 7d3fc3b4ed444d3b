//! Trim window computation.

use super::types::TrimBounds;
use crate::converter::TrimWindow;

/// Converts seconds to milliseconds, truncating toward zero.
fn secs_to_ms(secs: f64) -> f64 {
    (secs * 1000.0).trunc()
}

/// Clamps requested bounds against a file of `duration_ms`.
///
/// Start defaults to 0 and end to the full duration. Both land in
/// `[0, duration_ms]`, and end is raised to start when it falls below it.
pub fn clamp_window(bounds: &TrimBounds, duration_ms: u64) -> TrimWindow {
    let duration = duration_ms as f64;
    let clamp = |ms: f64| ms.clamp(0.0, duration) as u64;

    let start_ms = bounds.start_secs.map(secs_to_ms).map_or(0, clamp);
    let end_ms = bounds.end_secs.map(secs_to_ms).map_or(duration_ms, clamp);

    TrimWindow {
        start_ms,
        end_ms: end_ms.max(start_ms),
    }
}
