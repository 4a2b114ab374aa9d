mod allocate;
mod conflict;
mod error;
mod policy;
mod queries;
mod store;

pub use allocate::NO_RESOURCE_AVAILABLE;
pub use error::EngineError;
pub use policy::ReservationPolicy;
pub use store::{ReservationStore, ResourceStore};

use std::sync::Arc;

use crate::clock::Clock;
use crate::model::Ms;

/// The allocation engine: validates a request, finds a free resource and
/// commits the reservation against the two stores. Holds no entity state of
/// its own — the stores own their tables, the engine only orchestrates.
pub struct Engine {
    pub resources: Arc<ResourceStore>,
    pub reservations: Arc<ReservationStore>,
    policy: ReservationPolicy,
    clock: Arc<dyn Clock>,
}

impl Engine {
    pub fn new(
        resources: Arc<ResourceStore>,
        reservations: Arc<ReservationStore>,
        policy: ReservationPolicy,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            resources,
            reservations,
            policy,
            clock,
        }
    }

    pub(crate) fn now_ms(&self) -> Ms {
        self.clock.now_ms()
    }
}
