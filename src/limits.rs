//! Hard input bounds, kept in one place so hygiene checks read the same
//! everywhere.

use crate::model::Ms;

/// Earliest timestamp accepted anywhere (unix epoch).
pub const MIN_VALID_TIMESTAMP_MS: Ms = 0;

/// Latest timestamp accepted anywhere (2100-01-01T00:00:00Z).
pub const MAX_VALID_TIMESTAMP_MS: Ms = 4_102_444_800_000;

/// Longest single reservation window the store accepts.
pub const MAX_WINDOW_DURATION_MS: Ms = 366 * 24 * 3_600_000;

/// Longest accepted make/model attribute.
pub const MAX_ATTRIBUTE_LEN: usize = 128;

/// Pool size cap.
pub const MAX_RESOURCES: usize = 10_000;
