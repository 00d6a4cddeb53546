//! SQLite-backed collections.
//!
//! The only place wire column names appear: `start_time`/`end_time` map to
//! the model's `start`/`end`, `goal_id`/`task_id`/`created_by` to the
//! optional back-references. Ids are uuid-v4 strings assigned on insert.

use chrono::NaiveDateTime;
use rusqlite::{params, Connection, Row};
use uuid::Uuid;

use super::{Collection, StorageError};
use crate::models::event::{Category, Event, EventDraft};
use crate::models::goal::{Goal, GoalDraft};
use crate::models::task::{Task, TaskDraft};

const WIRE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

fn encode_time(t: NaiveDateTime) -> String {
    t.format(WIRE_TIME_FORMAT).to_string()
}

fn decode_time(column: usize, value: String) -> Result<NaiveDateTime, rusqlite::Error> {
    NaiveDateTime::parse_from_str(&value, WIRE_TIME_FORMAT).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(column, rusqlite::types::Type::Text, Box::new(e))
    })
}

fn decode_category(column: usize, value: String) -> Result<Category, rusqlite::Error> {
    value.parse::<Category>().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(column, rusqlite::types::Type::Text, Box::new(e))
    })
}

/// Events collection backed by the `events` table.
pub struct SqliteEvents<'a> {
    conn: &'a Connection,
}

impl<'a> SqliteEvents<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }
}

fn map_event_row(row: &Row<'_>) -> Result<Event, rusqlite::Error> {
    Ok(Event {
        id: row.get(0)?,
        title: row.get(1)?,
        category: decode_category(2, row.get::<_, String>(2)?)?,
        start: decode_time(3, row.get::<_, String>(3)?)?,
        end: decode_time(4, row.get::<_, String>(4)?)?,
        goal_id: row.get(5)?,
        task_id: row.get(6)?,
        created_by: row.get(7)?,
    })
}

impl Collection for SqliteEvents<'_> {
    type Record = Event;
    type Draft = EventDraft;

    async fn list(&self) -> Result<Vec<Event>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, title, category, start_time, end_time, goal_id, task_id, created_by
             FROM events
             ORDER BY start_time ASC",
        )?;

        let events = stmt
            .query_map([], map_event_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(events)
    }

    async fn insert(&self, draft: EventDraft) -> Result<Event, StorageError> {
        let id = Uuid::new_v4().to_string();

        self.conn.execute(
            "INSERT INTO events (id, title, category, start_time, end_time, goal_id, task_id, created_by)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
            params![
                id,
                draft.title,
                draft.category.as_str(),
                encode_time(draft.start),
                encode_time(draft.end),
                draft.goal_id,
                draft.task_id,
                draft.created_by,
            ],
        )?;

        Ok(draft.into_event(id))
    }

    async fn replace(&self, id: &str, record: &Event) -> Result<Event, StorageError> {
        let rows_affected = self.conn.execute(
            "UPDATE events SET
                title = ?, category = ?, start_time = ?, end_time = ?,
                goal_id = ?, task_id = ?, created_by = ?, updated_at = CURRENT_TIMESTAMP
             WHERE id = ?",
            params![
                record.title,
                record.category.as_str(),
                encode_time(record.start),
                encode_time(record.end),
                record.goal_id,
                record.task_id,
                record.created_by,
                id,
            ],
        )?;

        if rows_affected == 0 {
            return Err(StorageError::NotFound { id: id.to_string() });
        }

        let mut stored = record.clone();
        stored.id = id.to_string();
        Ok(stored)
    }

    async fn remove(&self, id: &str) -> Result<(), StorageError> {
        // Idempotent: removing a missing id is a no-op success.
        let rows_affected = self
            .conn
            .execute("DELETE FROM events WHERE id = ?", [id])?;
        if rows_affected == 0 {
            log::debug!("remove event {}: already absent", id);
        }
        Ok(())
    }
}

/// Goals collection backed by the `goals` table.
pub struct SqliteGoals<'a> {
    conn: &'a Connection,
}

impl<'a> SqliteGoals<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }
}

impl Collection for SqliteGoals<'_> {
    type Record = Goal;
    type Draft = GoalDraft;

    async fn list(&self) -> Result<Vec<Goal>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, color FROM goals ORDER BY created_at ASC, id ASC",
        )?;

        let goals = stmt
            .query_map([], |row| {
                Ok(Goal {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    color: row.get(2)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(goals)
    }

    async fn insert(&self, draft: GoalDraft) -> Result<Goal, StorageError> {
        let id = Uuid::new_v4().to_string();
        self.conn.execute(
            "INSERT INTO goals (id, name, color) VALUES (?, ?, ?)",
            params![id, draft.name, draft.color],
        )?;
        Ok(draft.into_goal(id))
    }

    async fn replace(&self, id: &str, record: &Goal) -> Result<Goal, StorageError> {
        let rows_affected = self.conn.execute(
            "UPDATE goals SET name = ?, color = ?, updated_at = CURRENT_TIMESTAMP WHERE id = ?",
            params![record.name, record.color, id],
        )?;

        if rows_affected == 0 {
            return Err(StorageError::NotFound { id: id.to_string() });
        }

        let mut stored = record.clone();
        stored.id = id.to_string();
        Ok(stored)
    }

    async fn remove(&self, id: &str) -> Result<(), StorageError> {
        self.conn.execute("DELETE FROM goals WHERE id = ?", [id])?;
        Ok(())
    }
}

/// Tasks collection backed by the `tasks` table.
pub struct SqliteTasks<'a> {
    conn: &'a Connection,
}

impl<'a> SqliteTasks<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }
}

impl Collection for SqliteTasks<'_> {
    type Record = Task;
    type Draft = TaskDraft;

    async fn list(&self) -> Result<Vec<Task>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, COALESCE(goal_id, '') FROM tasks ORDER BY created_at ASC, id ASC",
        )?;

        let tasks = stmt
            .query_map([], |row| {
                Ok(Task {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    goal_id: row.get(2)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(tasks)
    }

    async fn insert(&self, draft: TaskDraft) -> Result<Task, StorageError> {
        let id = Uuid::new_v4().to_string();
        self.conn.execute(
            "INSERT INTO tasks (id, name, goal_id) VALUES (?, ?, ?)",
            params![id, draft.name, draft.goal_id],
        )?;
        Ok(draft.into_task(id))
    }

    async fn replace(&self, id: &str, record: &Task) -> Result<Task, StorageError> {
        let rows_affected = self.conn.execute(
            "UPDATE tasks SET name = ?, goal_id = ?, updated_at = CURRENT_TIMESTAMP WHERE id = ?",
            params![record.name, record.goal_id, id],
        )?;

        if rows_affected == 0 {
            return Err(StorageError::NotFound { id: id.to_string() });
        }

        let mut stored = record.clone();
        stored.id = id.to_string();
        Ok(stored)
    }

    async fn remove(&self, id: &str) -> Result<(), StorageError> {
        self.conn.execute("DELETE FROM tasks WHERE id = ?", [id])?;
        Ok(())
    }
}
