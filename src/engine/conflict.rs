use std::collections::HashSet;

use crate::limits::*;
use crate::model::{Ms, Reservation, Window};

use super::EngineError;

pub(crate) fn validate_window(window: &Window) -> Result<(), EngineError> {
    if window.start < MIN_VALID_TIMESTAMP_MS || window.end > MAX_VALID_TIMESTAMP_MS {
        return Err(EngineError::LimitExceeded("timestamp out of range"));
    }
    if window.duration_ms() > MAX_WINDOW_DURATION_MS {
        return Err(EngineError::LimitExceeded("window too wide"));
    }
    Ok(())
}

/// Resource ids occupied at a single instant: `start <= instant <= end`.
/// Both boundaries count as busy. Linear scan; duplicates across
/// reservations for the same resource collapse into the set.
pub(crate) fn busy_at<'a>(
    reservations: impl Iterator<Item = &'a Reservation>,
    instant: Ms,
) -> HashSet<String> {
    reservations
        .filter(|r| r.window().contains_instant(instant))
        .map(|r| r.resource_id.clone())
        .collect()
}

/// Resource ids with any reservation overlapping `window`. The interval
/// generalization of `busy_at`: the closed-boundary rule applies to both
/// endpoints of the query window, so a reservation touching either edge
/// blocks its resource.
pub(crate) fn busy_during<'a>(
    reservations: impl Iterator<Item = &'a Reservation>,
    window: &Window,
) -> HashSet<String> {
    reservations
        .filter(|r| r.window().overlaps(window))
        .map(|r| r.resource_id.clone())
        .collect()
}
