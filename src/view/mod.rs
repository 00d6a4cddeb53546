//! View orchestration.
//!
//! Owns the displayed date/view range and the create/edit modal workflow,
//! and is the boundary the presentation layer calls into. All schedule
//! mutations funnel through here into the store; the orchestrator never
//! touches persistence directly.

use std::fmt;

use chrono::{Duration, Months, NaiveDate, NaiveDateTime};

use crate::geometry::week_days_of;
use crate::interaction::{EventSeed, Intent};
use crate::models::event::{Category, Event, EventDraft};
use crate::services::auth::Identity;
use crate::services::storage::Collection;
use crate::store::{ScheduleStore, StoreError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalendarView {
    Day,
    Week,
    Month,
    Year,
}

/// Displayed date and range. The range is always the Monday-first week
/// containing the current date, which is what the grid renders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    pub current_view: CalendarView,
    pub current_date: NaiveDate,
    pub date_range: (NaiveDate, NaiveDate),
}

impl ViewState {
    pub fn new(today: NaiveDate) -> Self {
        let mut state = Self {
            current_view: CalendarView::Week,
            current_date: today,
            date_range: (today, today),
        };
        state.recompute_range();
        state
    }

    pub fn set_view(&mut self, view: CalendarView) {
        self.current_view = view;
    }

    /// Reset to the real current date, regardless of prior navigation.
    pub fn today(&mut self, today: NaiveDate) {
        self.current_date = today;
        self.recompute_range();
    }

    pub fn prev(&mut self) {
        self.step(-1);
    }

    pub fn next(&mut self) {
        self.step(1);
    }

    /// Week view moves by whole weeks; the other views by one of their own
    /// unit.
    fn step(&mut self, direction: i64) {
        self.current_date = match self.current_view {
            CalendarView::Day => self.current_date + Duration::days(direction),
            CalendarView::Week => self.current_date + Duration::days(7 * direction),
            CalendarView::Month => shift_months(self.current_date, direction),
            CalendarView::Year => shift_months(self.current_date, 12 * direction),
        };
        self.recompute_range();
    }

    pub fn week_days(&self) -> [NaiveDate; 7] {
        week_days_of(self.current_date)
    }

    fn recompute_range(&mut self) {
        let days = self.week_days();
        self.date_range = (days[0], days[6]);
    }
}

fn shift_months(date: NaiveDate, direction: i64) -> NaiveDate {
    let months = Months::new(direction.unsigned_abs() as u32);
    let shifted = if direction >= 0 {
        date.checked_add_months(months)
    } else {
        date.checked_sub_months(months)
    };
    shifted.unwrap_or(date)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalMode {
    Create,
    Edit,
}

/// User-entered field values. Kept intact across failed submissions.
#[derive(Debug, Clone, PartialEq)]
pub struct EventForm {
    pub title: String,
    pub category: Category,
    pub start: Option<NaiveDateTime>,
    pub end: Option<NaiveDateTime>,
    pub goal_id: Option<String>,
    pub task_id: Option<String>,
}

impl Default for EventForm {
    fn default() -> Self {
        Self {
            title: String::new(),
            category: Category::Work,
            start: None,
            end: None,
            goal_id: None,
            task_id: None,
        }
    }
}

impl EventForm {
    pub fn from_seed(seed: &EventSeed) -> Self {
        Self {
            title: seed.title.clone().unwrap_or_default(),
            category: seed.category.unwrap_or(Category::Work),
            start: Some(seed.start),
            end: Some(seed.end),
            goal_id: seed.goal_id.clone(),
            task_id: seed.task_id.clone(),
        }
    }

    pub fn from_event(event: &Event) -> Self {
        Self {
            title: event.title.clone(),
            category: event.category,
            start: Some(event.start),
            end: Some(event.end),
            goal_id: event.goal_id.clone(),
            task_id: event.task_id.clone(),
        }
    }

    /// Field-level validation, checked before any store call.
    pub fn validate(&self) -> Result<(NaiveDateTime, NaiveDateTime), FormError> {
        if self.title.trim().is_empty() {
            return Err(FormError::MissingTitle);
        }
        let start = self.start.ok_or(FormError::MissingStart)?;
        let end = self.end.ok_or(FormError::MissingEnd)?;
        if end <= start {
            return Err(FormError::EndNotAfterStart);
        }
        Ok((start, end))
    }

    fn draft(&self, start: NaiveDateTime, end: NaiveDateTime) -> EventDraft {
        EventDraft {
            title: self.title.trim().to_string(),
            category: self.category,
            start,
            end,
            goal_id: self.goal_id.clone(),
            task_id: self.task_id.clone(),
            created_by: None,
        }
    }
}

/// Form validation errors, surfaced inline on the open modal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormError {
    MissingTitle,
    MissingStart,
    MissingEnd,
    EndNotAfterStart,
}

impl fmt::Display for FormError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingTitle => write!(f, "Title is required"),
            Self::MissingStart => write!(f, "Start time is required"),
            Self::MissingEnd => write!(f, "End time is required"),
            Self::EndNotAfterStart => write!(f, "End time must be after start time"),
        }
    }
}

impl std::error::Error for FormError {}

/// An open create/edit modal.
#[derive(Debug, Clone, PartialEq)]
pub struct ModalSession {
    pub mode: ModalMode,
    /// Set in edit mode; the record being edited.
    pub event_id: Option<String>,
    pub form: EventForm,
    /// Duplicate-submission guard; set while a store operation is in flight.
    submitting: bool,
    /// Inline error from the last failed submission.
    pub error: Option<String>,
}

impl ModalSession {
    pub fn is_submitting(&self) -> bool {
        self.submitting
    }
}

/// Composes view state, modal workflow and the schedule store.
pub struct Orchestrator {
    pub view: ViewState,
    modal: Option<ModalSession>,
}

impl Orchestrator {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            view: ViewState::new(today),
            modal: None,
        }
    }

    pub fn modal(&self) -> Option<&ModalSession> {
        self.modal.as_ref()
    }

    pub fn is_modal_open(&self) -> bool {
        self.modal.is_some()
    }

    /// Mutable access to the open modal's form, for field edits.
    pub fn form_mut(&mut self) -> Option<&mut EventForm> {
        self.modal.as_mut().map(|session| &mut session.form)
    }

    /// Open the create modal, optionally prefilled (grid click, task drop).
    pub fn open_create(&mut self, seed: Option<&EventSeed>) {
        self.modal = Some(ModalSession {
            mode: ModalMode::Create,
            event_id: None,
            form: seed.map(EventForm::from_seed).unwrap_or_default(),
            submitting: false,
            error: None,
        });
    }

    /// Open the edit modal for an existing event.
    pub fn open_edit(&mut self, event: &Event) {
        self.modal = Some(ModalSession {
            mode: ModalMode::Edit,
            event_id: Some(event.id.clone()),
            form: EventForm::from_event(event),
            submitting: false,
            error: None,
        });
    }

    /// Close the modal and clear all edit context.
    pub fn close_modal(&mut self) {
        self.modal = None;
    }

    /// Submit the open modal.
    ///
    /// Duplicate submissions while an operation is in flight are ignored.
    /// On success the modal closes; on failure it stays open with an inline
    /// error and the entered field values intact.
    pub async fn submit<C>(
        &mut self,
        store: &ScheduleStore<C>,
        identity: &impl Identity,
    ) -> Result<Option<Event>, StoreError>
    where
        C: Collection<Record = Event, Draft = EventDraft>,
    {
        let Some(session) = self.modal.as_mut() else {
            return Ok(None);
        };
        if session.submitting {
            log::debug!("duplicate submission ignored");
            return Ok(None);
        }

        let (start, end) = match session.form.validate() {
            Ok(span) => span,
            Err(err) => {
                session.error = Some(err.to_string());
                return Err(StoreError::Invalid(err.to_string()));
            }
        };

        session.submitting = true;
        session.error = None;
        let mode = session.mode;
        let event_id = session.event_id.clone();
        let form = session.form.clone();

        let result = match mode {
            ModalMode::Create => {
                let mut draft = form.draft(start, end);
                draft.created_by = identity.current_user_id().map(String::from);
                store.create(draft).await
            }
            ModalMode::Edit => {
                let id = event_id.unwrap_or_default();
                let mut event = form.draft(start, end).into_event(id);
                // Keep the original creator when editing.
                event.created_by = store.find(&event.id).and_then(|e| e.created_by);
                store.update(event).await
            }
        };

        match result {
            Ok(stored) => {
                self.modal = None;
                Ok(Some(stored))
            }
            Err(err) => {
                // The session may have been closed while the operation was in
                // flight; the store is already consistent either way.
                if let Some(session) = self.modal.as_mut() {
                    session.submitting = false;
                    session.error = Some(err.to_string());
                }
                Err(err)
            }
        }
    }

    /// Delete the event behind the open edit modal. Closes on success.
    pub async fn delete_event<C>(&mut self, store: &ScheduleStore<C>) -> Result<bool, StoreError>
    where
        C: Collection<Record = Event, Draft = EventDraft>,
    {
        let Some(session) = self.modal.as_mut() else {
            return Ok(false);
        };
        let Some(id) = session.event_id.clone() else {
            return Ok(false);
        };
        if session.submitting {
            return Ok(false);
        }
        session.submitting = true;

        match store.delete(&id).await {
            Ok(()) => {
                self.modal = None;
                Ok(true)
            }
            Err(err) => {
                if let Some(session) = self.modal.as_mut() {
                    session.submitting = false;
                    session.error = Some(err.to_string());
                }
                Err(err)
            }
        }
    }

    /// Route a resolved gesture: direct mutations go to the store; click
    /// prefills open the create modal.
    pub async fn apply_intent<C>(
        &mut self,
        store: &ScheduleStore<C>,
        identity: &impl Identity,
        intent: Intent,
    ) -> Result<Option<Event>, StoreError>
    where
        C: Collection<Record = Event, Draft = EventDraft>,
    {
        match intent {
            Intent::UpdateEvent(event) => store.update(event).await.map(Some),
            Intent::CreateEvent(mut draft) => {
                draft.created_by = identity.current_user_id().map(String::from);
                store.create(draft).await.map(Some)
            }
            Intent::OpenCreateModal(seed) => {
                self.open_create(Some(&seed));
                Ok(None)
            }
        }
    }
}

/// Load events, goals and tasks concurrently. Without an authenticated user
/// nothing is fetched and every store stays idle.
pub async fn load_workspace<E, G, T>(
    events: &ScheduleStore<E>,
    goals: &crate::store::catalog::GoalCatalog<G>,
    tasks: &crate::store::catalog::TaskCatalog<T>,
    identity: &impl Identity,
) -> Result<(), StoreError>
where
    E: Collection<Record = Event, Draft = EventDraft>,
    G: Collection<Record = crate::models::goal::Goal, Draft = crate::models::goal::GoalDraft>,
    T: Collection<Record = crate::models::task::Task, Draft = crate::models::task::TaskDraft>,
{
    if identity.current_user_id().is_none() {
        log::warn!("no authenticated user; skipping workspace load");
        return Ok(());
    }

    let (events_loaded, goals_loaded, tasks_loaded) =
        tokio::join!(events.load(), goals.load(), tasks.load());
    events_loaded?;
    goals_loaded?;
    tasks_loaded?;
    Ok(())
}
