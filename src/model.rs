use serde::{Deserialize, Serialize};
use ulid::Ulid;

/// Unix milliseconds — the only time type.
pub type Ms = i64;

/// Closed interval `[start, end]`. Both endpoints count as occupied: a
/// reservation ending exactly when another begins is a conflict, not a
/// handover.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Window {
    pub start: Ms,
    pub end: Ms,
}

impl Window {
    pub fn new(start: Ms, end: Ms) -> Self {
        debug_assert!(start <= end, "Window start must not be after end");
        Self { start, end }
    }

    pub fn duration_ms(&self) -> Ms {
        self.end - self.start
    }

    pub fn overlaps(&self, other: &Window) -> bool {
        self.start <= other.end && other.start <= self.end
    }

    pub fn contains_instant(&self, t: Ms) -> bool {
        self.start <= t && t <= self.end
    }
}

/// A bookable unit in the pool. Make and model are descriptive only; the
/// allocator never looks at them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    pub id: String,
    pub make: String,
    pub model: String,
}

impl Resource {
    /// Sequential id scheme: "R1", "R2", ... Counters only go up, so ids are
    /// never reused even after removal.
    pub fn id_for(n: u64) -> String {
        format!("R{n}")
    }
}

/// A confirmed claim on exactly one resource for a time window. Immutable
/// once committed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservation {
    pub id: Ulid,
    pub resource_id: String,
    pub start: Ms,
    /// Strictly positive span length.
    pub duration: Ms,
}

impl Reservation {
    /// End instant — always derived as `start + duration`, never stored.
    pub fn end(&self) -> Ms {
        self.start + self.duration
    }

    pub fn window(&self) -> Window {
        Window::new(self.start, self.end())
    }
}

/// What a caller asks for: a window, no resource, no id yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservationRequest {
    pub start: Ms,
    pub duration: Ms,
}

impl ReservationRequest {
    /// Only meaningful once the request has passed validation (`duration > 0`).
    pub fn window(&self) -> Window {
        Window::new(self.start, self.start + self.duration)
    }
}

/// Outcome of a reservation attempt. Rejections are expected business
/// results, returned as values so callers can render them without error
/// handling ceremony.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AllocationResult {
    Confirmed {
        reservation_id: Ulid,
        resource_id: String,
        message: String,
    },
    Rejected {
        reason: String,
    },
}

impl AllocationResult {
    pub fn is_confirmed(&self) -> bool {
        matches!(self, AllocationResult::Confirmed { .. })
    }
}
