use tracing::{debug, info};
use ulid::Ulid;

use crate::model::{AllocationResult, Reservation, ReservationRequest};

use super::Engine;

pub const NO_RESOURCE_AVAILABLE: &str =
    "There's no resource available for the requested window.";

impl Engine {
    /// Attempt a reservation.
    ///
    /// Policy violations and pool exhaustion come back as `Rejected` values;
    /// neither store is touched in those cases. On the success path the
    /// conflict query and the commit run under one write lock on the
    /// reservation table, so two racing calls can never both claim the last
    /// free resource.
    pub async fn reserve(&self, request: ReservationRequest) -> AllocationResult {
        let now = self.now_ms();

        let violations = self.policy.validate(&request, now);
        if !violations.is_empty() {
            debug!(count = violations.len(), "reservation rejected by policy");
            return AllocationResult::Rejected {
                reason: rejection_reason(&violations),
            };
        }

        let window = request.window();

        // Critical section: every path from here to the insert holds the
        // reservation write lock.
        let mut table = self.reservations.table().write().await;
        let busy = table.busy_during(&window);
        let chosen = {
            let resources = self.resources.table().read().await;
            // First fit in insertion order — deterministic, nothing smarter.
            resources
                .iter()
                .find(|r| !busy.contains(&r.id))
                .map(|r| r.id.clone())
        };

        let Some(resource_id) = chosen else {
            info!(start = window.start, end = window.end, "no resource available");
            return AllocationResult::Rejected {
                reason: NO_RESOURCE_AVAILABLE.to_string(),
            };
        };

        let draft = Reservation {
            id: Ulid::nil(), // replaced by the store
            resource_id: resource_id.clone(),
            start: request.start,
            duration: request.duration,
        };
        match table.insert(draft) {
            Ok(reservation_id) => {
                info!(%reservation_id, %resource_id, start = request.start, "reservation confirmed");
                AllocationResult::Confirmed {
                    reservation_id,
                    resource_id,
                    message: format!(
                        "Reservation successfully created for {}. Your reservation ID is: {reservation_id}.",
                        request.start
                    ),
                }
            }
            Err(e) => AllocationResult::Rejected {
                reason: e.to_string(),
            },
        }
    }
}

fn rejection_reason(violations: &[String]) -> String {
    let mut reason = String::from("The reservation cannot be made. The following errors occurred:");
    for violation in violations {
        reason.push_str("\n* ");
        reason.push_str(violation);
    }
    reason
}
