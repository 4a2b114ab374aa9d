use ulid::Ulid;

use crate::model::{Ms, Reservation, Resource};

use super::Engine;

impl Engine {
    /// Reservations starting strictly after now, optionally bounded by a
    /// limit instant (inclusive). No ordering guarantee beyond "each match
    /// exactly once".
    pub async fn list_upcoming(&self, limit: Option<Ms>) -> Vec<Reservation> {
        let now = self.now_ms();
        let mut upcoming = self.reservations.upcoming_from(now).await;
        if let Some(limit) = limit {
            upcoming.retain(|r| r.start <= limit);
        }
        upcoming
    }

    pub async fn list_resources(&self) -> Vec<Resource> {
        self.resources.list().await
    }

    pub async fn get_resource(&self, id: &str) -> Option<Resource> {
        self.resources.get(id).await
    }

    pub async fn get_reservation(&self, id: &Ulid) -> Option<Reservation> {
        self.reservations.get(id).await
    }
}
