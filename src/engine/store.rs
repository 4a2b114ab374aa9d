use std::collections::{HashMap, HashSet};

use tokio::sync::RwLock;
use ulid::Ulid;

use crate::limits::*;
use crate::model::*;

use super::conflict::{busy_at, busy_during, validate_window};
use super::EngineError;

// ── Resources ────────────────────────────────────────────

/// Insertion-ordered resource table. The order doubles as the first-fit
/// preference order, so it must stay stable — no hash-map iteration order.
#[derive(Default)]
pub struct ResourceTable {
    entries: Vec<Resource>,
    next_id: u64,
}

impl ResourceTable {
    /// Assigns the next sequential id. Caller-supplied ids are never
    /// accepted; the counter never goes backwards, so removal cannot free an
    /// id for reuse.
    pub fn add(&mut self, make: String, model: String) -> Result<String, EngineError> {
        if self.entries.len() >= MAX_RESOURCES {
            return Err(EngineError::LimitExceeded("too many resources"));
        }
        check_attributes(&make, &model)?;
        self.next_id += 1;
        let id = Resource::id_for(self.next_id);
        self.entries.push(Resource {
            id: id.clone(),
            make,
            model,
        });
        Ok(id)
    }

    pub fn get(&self, id: &str) -> Option<&Resource> {
        self.entries.iter().find(|r| r.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Resource> {
        self.entries.iter()
    }

    /// Replaces the stored value wholesale under the same id — entities are
    /// immutable values, not mutated field by field.
    pub fn update(&mut self, id: &str, make: String, model: String) -> Result<Resource, EngineError> {
        check_attributes(&make, &model)?;
        let entry = self
            .entries
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| EngineError::NotFound(id.to_string()))?;
        *entry = Resource {
            id: entry.id.clone(),
            make,
            model,
        };
        Ok(entry.clone())
    }

    pub fn remove(&mut self, id: &str) -> Result<(), EngineError> {
        let pos = self
            .entries
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| EngineError::NotFound(id.to_string()))?;
        self.entries.remove(pos);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn check_attributes(make: &str, model: &str) -> Result<(), EngineError> {
    if make.len() > MAX_ATTRIBUTE_LEN || model.len() > MAX_ATTRIBUTE_LEN {
        return Err(EngineError::LimitExceeded("attribute too long"));
    }
    Ok(())
}

/// Shared handle around the resource table. Mutations serialize on the
/// write lock; readers never observe a half-applied change.
pub struct ResourceStore {
    table: RwLock<ResourceTable>,
}

impl Default for ResourceStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ResourceStore {
    pub fn new() -> Self {
        Self {
            table: RwLock::new(ResourceTable::default()),
        }
    }

    pub async fn add(&self, make: String, model: String) -> Result<String, EngineError> {
        self.table.write().await.add(make, model)
    }

    pub async fn get(&self, id: &str) -> Option<Resource> {
        self.table.read().await.get(id).cloned()
    }

    /// All resources, insertion order.
    pub async fn list(&self) -> Vec<Resource> {
        self.table.read().await.iter().cloned().collect()
    }

    pub async fn update(&self, id: &str, make: String, model: String) -> Result<Resource, EngineError> {
        self.table.write().await.update(id, make, model)
    }

    pub async fn remove(&self, id: &str) -> Result<(), EngineError> {
        self.table.write().await.remove(id)
    }

    pub async fn count(&self) -> usize {
        self.table.read().await.len()
    }

    pub(crate) fn table(&self) -> &RwLock<ResourceTable> {
        &self.table
    }
}

// ── Reservations ─────────────────────────────────────────

/// Reservation arena keyed by id. The conflict queries and the insert live
/// on the same table so a caller holding the write lock gets
/// check-then-commit as one critical section.
#[derive(Default)]
pub struct ReservationTable {
    entries: HashMap<Ulid, Reservation>,
}

impl ReservationTable {
    /// Assigns a fresh unique id and stores the reservation under it. The
    /// input id is ignored. A reservation reaching the store must already
    /// carry its resource; anything else is caller misuse, not a business
    /// outcome.
    pub fn insert(&mut self, reservation: Reservation) -> Result<Ulid, EngineError> {
        if reservation.resource_id.is_empty() {
            return Err(EngineError::InvalidArgument("reservation without a resource"));
        }
        if reservation.duration <= 0 {
            return Err(EngineError::InvalidArgument("non-positive duration"));
        }
        validate_window(&reservation.window())?;
        let id = Ulid::new();
        self.entries.insert(id, Reservation { id, ..reservation });
        Ok(id)
    }

    pub fn get(&self, id: &Ulid) -> Option<&Reservation> {
        self.entries.get(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Reservation> {
        self.entries.values()
    }

    /// Resource ids busy at a single instant (boundaries inclusive).
    pub fn busy_at(&self, instant: Ms) -> HashSet<String> {
        busy_at(self.entries.values(), instant)
    }

    /// Resource ids with any reservation overlapping the window.
    pub fn busy_during(&self, window: &Window) -> HashSet<String> {
        busy_during(self.entries.values(), window)
    }

    /// Reservations starting strictly after `now`.
    pub fn upcoming_from(&self, now: Ms) -> Vec<Reservation> {
        self.entries
            .values()
            .filter(|r| r.start > now)
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Shared handle around the reservation table.
pub struct ReservationStore {
    table: RwLock<ReservationTable>,
}

impl Default for ReservationStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ReservationStore {
    pub fn new() -> Self {
        Self {
            table: RwLock::new(ReservationTable::default()),
        }
    }

    pub async fn add(&self, reservation: Reservation) -> Result<Ulid, EngineError> {
        self.table.write().await.insert(reservation)
    }

    pub async fn get(&self, id: &Ulid) -> Option<Reservation> {
        self.table.read().await.get(id).cloned()
    }

    pub async fn list(&self) -> Vec<Reservation> {
        self.table.read().await.iter().cloned().collect()
    }

    pub async fn busy_at(&self, instant: Ms) -> HashSet<String> {
        self.table.read().await.busy_at(instant)
    }

    pub async fn upcoming_from(&self, now: Ms) -> Vec<Reservation> {
        self.table.read().await.upcoming_from(now)
    }

    pub async fn count(&self) -> usize {
        self.table.read().await.len()
    }

    /// The raw lock, for callers that must pin the table across a
    /// check-then-commit sequence (see `Engine::reserve`).
    pub(crate) fn table(&self) -> &RwLock<ReservationTable> {
        &self.table
    }
}
