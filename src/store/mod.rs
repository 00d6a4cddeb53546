//! Schedule store.
//!
//! Authoritative in-memory set of events, mutated only through the four
//! operations below. Every mutation is validated first, confirmed by the
//! persistence collaborator, and only then reflected in memory; callers read
//! snapshots and never mutate directly.
//!
//! Mutations against the same event id are serialized: a second operation
//! while one is in flight is rejected with [`StoreError::Busy`] rather than
//! silently racing (a race could resurrect a deleted record or apply a stale
//! update). Operations on different ids may overlap freely.

pub mod catalog;

use std::collections::HashSet;
use std::sync::{Mutex, RwLock};

use chrono::{NaiveDate, NaiveDateTime};
use thiserror::Error;

use crate::models::event::{Event, EventDraft, EventValidationError};
use crate::models::goal::GoalValidationError;
use crate::models::task::TaskValidationError;
use crate::services::storage::{Collection, StorageError};
use crate::utils::date::is_same_day;

/// Outcome of the most recent load, mirrored for the presentation layer.
/// A load always terminates in `Succeeded` or `Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStatus {
    Idle,
    Loading,
    Succeeded,
    Failed,
}

/// Failures surfaced by store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Rejected before any persistence call; never partially applied.
    #[error("validation failed: {0}")]
    Invalid(String),

    /// The targeted record no longer exists.
    #[error("event '{id}' not found")]
    NotFound { id: String },

    /// A mutation for the same id is still in flight.
    #[error("a change to '{id}' is already in flight")]
    Busy { id: String },

    /// The persistence collaborator failed.
    #[error(transparent)]
    Storage(StorageError),
}

impl From<StorageError> for StoreError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound { id } => StoreError::NotFound { id },
            other => StoreError::Storage(other),
        }
    }
}

impl From<EventValidationError> for StoreError {
    fn from(err: EventValidationError) -> Self {
        StoreError::Invalid(err.to_string())
    }
}

impl From<GoalValidationError> for StoreError {
    fn from(err: GoalValidationError) -> Self {
        StoreError::Invalid(err.to_string())
    }
}

impl From<TaskValidationError> for StoreError {
    fn from(err: TaskValidationError) -> Self {
        StoreError::Invalid(err.to_string())
    }
}

/// Marks an id as having an in-flight mutation; releases it on drop so a
/// failed persistence call cannot leave the id permanently busy.
struct InFlight<'a> {
    set: &'a Mutex<HashSet<String>>,
    id: String,
}

impl<'a> InFlight<'a> {
    fn begin(set: &'a Mutex<HashSet<String>>, id: &str) -> Result<Self, StoreError> {
        let mut guard = set.lock().expect("in-flight set poisoned");
        if !guard.insert(id.to_string()) {
            return Err(StoreError::Busy { id: id.to_string() });
        }
        Ok(Self {
            set,
            id: id.to_string(),
        })
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.set
            .lock()
            .expect("in-flight set poisoned")
            .remove(&self.id);
    }
}

/// Authoritative event collection.
pub struct ScheduleStore<C> {
    backend: C,
    events: RwLock<Vec<Event>>,
    status: RwLock<LoadStatus>,
    in_flight: Mutex<HashSet<String>>,
}

impl<C> ScheduleStore<C>
where
    C: Collection<Record = Event, Draft = EventDraft>,
{
    pub fn new(backend: C) -> Self {
        Self {
            backend,
            events: RwLock::new(Vec::new()),
            status: RwLock::new(LoadStatus::Idle),
            in_flight: Mutex::new(HashSet::new()),
        }
    }

    pub fn status(&self) -> LoadStatus {
        *self.status.read().expect("status lock poisoned")
    }

    #[cfg(test)]
    pub(crate) fn backend(&self) -> &C {
        &self.backend
    }

    /// Whether a mutation for this id is still awaiting confirmation.
    pub fn is_pending(&self, id: &str) -> bool {
        self.in_flight
            .lock()
            .expect("in-flight set poisoned")
            .contains(id)
    }

    /// Snapshot of the full event set.
    pub fn events(&self) -> Vec<Event> {
        self.events.read().expect("events lock poisoned").clone()
    }

    pub fn find(&self, id: &str) -> Option<Event> {
        self.events
            .read()
            .expect("events lock poisoned")
            .iter()
            .find(|e| e.id == id)
            .cloned()
    }

    /// Replace the whole in-memory set from the backing store.
    ///
    /// Always reaches a terminal status: on failure the previous set is kept
    /// and the status becomes `Failed`.
    pub async fn load(&self) -> Result<Vec<Event>, StoreError> {
        self.set_status(LoadStatus::Loading);
        match self.backend.list().await {
            Ok(listed) => {
                *self.events.write().expect("events lock poisoned") = listed.clone();
                self.set_status(LoadStatus::Succeeded);
                log::info!("loaded {} events", listed.len());
                Ok(listed)
            }
            Err(err) => {
                self.set_status(LoadStatus::Failed);
                log::warn!("event load failed: {}", err);
                Err(err.into())
            }
        }
    }

    /// Validate and persist a new event; the stored record (with its id
    /// assigned upstream) is appended to the set and returned.
    pub async fn create(&self, draft: EventDraft) -> Result<Event, StoreError> {
        draft.validate()?;
        let created = self.backend.insert(draft).await?;
        self.events
            .write()
            .expect("events lock poisoned")
            .push(created.clone());
        log::info!("created event '{}' ({})", created.title, created.id);
        Ok(created)
    }

    /// Validate and persist a changed event, replacing the matching record
    /// in place (collection order is preserved).
    pub async fn update(&self, event: Event) -> Result<Event, StoreError> {
        event.validate()?;
        let _pending = InFlight::begin(&self.in_flight, &event.id)?;

        let stored = self.backend.replace(&event.id, &event).await?;

        let mut events = self.events.write().expect("events lock poisoned");
        match events.iter_mut().find(|e| e.id == stored.id) {
            Some(slot) => *slot = stored.clone(),
            // Confirmed upstream but absent locally (e.g. modal dismissed
            // before a prior create settled): surface it rather than lose it.
            None => events.push(stored.clone()),
        }
        Ok(stored)
    }

    /// Remove an event. Deleting an id that is already gone is a no-op
    /// success.
    pub async fn delete(&self, id: &str) -> Result<(), StoreError> {
        let _pending = InFlight::begin(&self.in_flight, id)?;

        self.backend.remove(id).await?;

        self.events
            .write()
            .expect("events lock poisoned")
            .retain(|e| e.id != id);
        log::info!("deleted event {}", id);
        Ok(())
    }

    /// Events whose start falls on `day`. Computed fresh each call.
    pub fn events_on(&self, day: NaiveDate) -> Vec<Event> {
        self.events
            .read()
            .expect("events lock poisoned")
            .iter()
            .filter(|e| is_same_day(e.start, day))
            .cloned()
            .collect()
    }

    /// Events overlapping the half-open range `[start, end)`.
    pub fn events_in_range(&self, start: NaiveDateTime, end: NaiveDateTime) -> Vec<Event> {
        self.events
            .read()
            .expect("events lock poisoned")
            .iter()
            .filter(|e| e.start < end && e.end > start)
            .cloned()
            .collect()
    }

    fn set_status(&self, status: LoadStatus) {
        *self.status.write().expect("status lock poisoned") = status;
    }
}
