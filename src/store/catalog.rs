//! Goal and task catalogs.
//!
//! Read-through collaborators of the schedule store: the sidebar lists goals,
//! tracks at most one selected goal, and shows that goal's tasks. Deleting a
//! goal applies the configured cascade policy to its tasks; events are never
//! touched and simply keep dangling references.

use std::sync::RwLock;

use crate::config::CascadePolicy;
use crate::models::goal::{Goal, GoalDraft};
use crate::models::task::{Task, TaskDraft};
use crate::services::storage::Collection;
use crate::store::{LoadStatus, StoreError};

/// Goals plus the selected-goal marker driving the task view.
pub struct GoalCatalog<C> {
    backend: C,
    goals: RwLock<Vec<Goal>>,
    selected: RwLock<Option<String>>,
    status: RwLock<LoadStatus>,
}

impl<C> GoalCatalog<C>
where
    C: Collection<Record = Goal, Draft = GoalDraft>,
{
    pub fn new(backend: C) -> Self {
        Self {
            backend,
            goals: RwLock::new(Vec::new()),
            selected: RwLock::new(None),
            status: RwLock::new(LoadStatus::Idle),
        }
    }

    pub fn status(&self) -> LoadStatus {
        *self.status.read().expect("status lock poisoned")
    }

    pub fn goals(&self) -> Vec<Goal> {
        self.goals.read().expect("goals lock poisoned").clone()
    }

    pub fn selected_goal_id(&self) -> Option<String> {
        self.selected.read().expect("selection lock poisoned").clone()
    }

    /// Select a goal to filter the task view. Unknown ids clear nothing and
    /// report false.
    pub fn select(&self, id: &str) -> bool {
        let known = self
            .goals
            .read()
            .expect("goals lock poisoned")
            .iter()
            .any(|g| g.id == id);
        if known {
            *self.selected.write().expect("selection lock poisoned") = Some(id.to_string());
        }
        known
    }

    pub fn clear_selection(&self) {
        *self.selected.write().expect("selection lock poisoned") = None;
    }

    pub async fn load(&self) -> Result<Vec<Goal>, StoreError> {
        *self.status.write().expect("status lock poisoned") = LoadStatus::Loading;
        match self.backend.list().await {
            Ok(listed) => {
                *self.goals.write().expect("goals lock poisoned") = listed.clone();
                *self.status.write().expect("status lock poisoned") = LoadStatus::Succeeded;
                Ok(listed)
            }
            Err(err) => {
                *self.status.write().expect("status lock poisoned") = LoadStatus::Failed;
                log::warn!("goal load failed: {}", err);
                Err(err.into())
            }
        }
    }

    pub async fn create(&self, draft: GoalDraft) -> Result<Goal, StoreError> {
        draft.validate()?;
        let created = self.backend.insert(draft).await?;
        self.goals
            .write()
            .expect("goals lock poisoned")
            .push(created.clone());
        Ok(created)
    }

    pub async fn delete(&self, id: &str) -> Result<(), StoreError> {
        self.backend.remove(id).await?;
        self.goals
            .write()
            .expect("goals lock poisoned")
            .retain(|g| g.id != id);

        let mut selected = self.selected.write().expect("selection lock poisoned");
        if selected.as_deref() == Some(id) {
            *selected = None;
        }
        Ok(())
    }
}

/// Tasks grouped under goals.
pub struct TaskCatalog<C> {
    backend: C,
    tasks: RwLock<Vec<Task>>,
    status: RwLock<LoadStatus>,
}

impl<C> TaskCatalog<C>
where
    C: Collection<Record = Task, Draft = TaskDraft>,
{
    pub fn new(backend: C) -> Self {
        Self {
            backend,
            tasks: RwLock::new(Vec::new()),
            status: RwLock::new(LoadStatus::Idle),
        }
    }

    pub fn status(&self) -> LoadStatus {
        *self.status.read().expect("status lock poisoned")
    }

    pub fn tasks(&self) -> Vec<Task> {
        self.tasks.read().expect("tasks lock poisoned").clone()
    }

    /// Tasks shown when `goal_id` is the selected goal.
    pub fn for_goal(&self, goal_id: &str) -> Vec<Task> {
        self.tasks
            .read()
            .expect("tasks lock poisoned")
            .iter()
            .filter(|t| t.goal_id == goal_id)
            .cloned()
            .collect()
    }

    pub fn find(&self, id: &str) -> Option<Task> {
        self.tasks
            .read()
            .expect("tasks lock poisoned")
            .iter()
            .find(|t| t.id == id)
            .cloned()
    }

    pub async fn load(&self) -> Result<Vec<Task>, StoreError> {
        *self.status.write().expect("status lock poisoned") = LoadStatus::Loading;
        match self.backend.list().await {
            Ok(listed) => {
                *self.tasks.write().expect("tasks lock poisoned") = listed.clone();
                *self.status.write().expect("status lock poisoned") = LoadStatus::Succeeded;
                Ok(listed)
            }
            Err(err) => {
                *self.status.write().expect("status lock poisoned") = LoadStatus::Failed;
                log::warn!("task load failed: {}", err);
                Err(err.into())
            }
        }
    }

    pub async fn create(&self, draft: TaskDraft) -> Result<Task, StoreError> {
        draft.validate()?;
        let created = self.backend.insert(draft).await?;
        self.tasks
            .write()
            .expect("tasks lock poisoned")
            .push(created.clone());
        Ok(created)
    }

    pub async fn delete(&self, id: &str) -> Result<(), StoreError> {
        self.backend.remove(id).await?;
        self.tasks
            .write()
            .expect("tasks lock poisoned")
            .retain(|t| t.id != id);
        Ok(())
    }
}

/// Delete a goal and apply the configured policy to its tasks.
///
/// `OrphanTasks` leaves the tasks in place with a now-dangling `goal_id`
/// (tolerated everywhere, like event back-references). `DeleteTasks`
/// removes them. Events are never cascaded.
pub async fn delete_goal_cascading<G, T>(
    goals: &GoalCatalog<G>,
    tasks: &TaskCatalog<T>,
    goal_id: &str,
    policy: CascadePolicy,
) -> Result<(), StoreError>
where
    G: Collection<Record = Goal, Draft = GoalDraft>,
    T: Collection<Record = Task, Draft = TaskDraft>,
{
    goals.delete(goal_id).await?;

    if policy == CascadePolicy::DeleteTasks {
        for task in tasks.for_goal(goal_id) {
            tasks.delete(&task.id).await?;
        }
        log::info!("deleted goal {} and its tasks", goal_id);
    } else {
        log::info!("deleted goal {}, tasks orphaned", goal_id);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::storage::StorageError;
    use std::cell::RefCell;

    #[derive(Default)]
    struct MemoryGoals {
        rows: RefCell<Vec<Goal>>,
    }

    impl Collection for MemoryGoals {
        type Record = Goal;
        type Draft = GoalDraft;

        async fn list(&self) -> Result<Vec<Goal>, StorageError> {
            Ok(self.rows.borrow().clone())
        }

        async fn insert(&self, draft: GoalDraft) -> Result<Goal, StorageError> {
            let id = format!("g-{}", self.rows.borrow().len() + 1);
            let goal = draft.into_goal(id);
            self.rows.borrow_mut().push(goal.clone());
            Ok(goal)
        }

        async fn replace(&self, id: &str, record: &Goal) -> Result<Goal, StorageError> {
            let mut rows = self.rows.borrow_mut();
            let slot = rows
                .iter_mut()
                .find(|g| g.id == id)
                .ok_or_else(|| StorageError::NotFound { id: id.to_string() })?;
            *slot = record.clone();
            Ok(record.clone())
        }

        async fn remove(&self, id: &str) -> Result<(), StorageError> {
            self.rows.borrow_mut().retain(|g| g.id != id);
            Ok(())
        }
    }

    #[derive(Default)]
    struct MemoryTasks {
        rows: RefCell<Vec<Task>>,
    }

    impl Collection for MemoryTasks {
        type Record = Task;
        type Draft = TaskDraft;

        async fn list(&self) -> Result<Vec<Task>, StorageError> {
            Ok(self.rows.borrow().clone())
        }

        async fn insert(&self, draft: TaskDraft) -> Result<Task, StorageError> {
            let id = format!("t-{}", self.rows.borrow().len() + 1);
            let task = draft.into_task(id);
            self.rows.borrow_mut().push(task.clone());
            Ok(task)
        }

        async fn replace(&self, id: &str, record: &Task) -> Result<Task, StorageError> {
            let mut rows = self.rows.borrow_mut();
            let slot = rows
                .iter_mut()
                .find(|t| t.id == id)
                .ok_or_else(|| StorageError::NotFound { id: id.to_string() })?;
            *slot = record.clone();
            Ok(record.clone())
        }

        async fn remove(&self, id: &str) -> Result<(), StorageError> {
            self.rows.borrow_mut().retain(|t| t.id != id);
            Ok(())
        }
    }

    async fn seeded() -> (GoalCatalog<MemoryGoals>, TaskCatalog<MemoryTasks>) {
        let goals = GoalCatalog::new(MemoryGoals::default());
        let tasks = TaskCatalog::new(MemoryTasks::default());
        let goal = goals
            .create(GoalDraft::new("Be fit", "bg-goal-fit"))
            .await
            .unwrap();
        tasks
            .create(TaskDraft::new("Morning run", goal.id.clone()))
            .await
            .unwrap();
        tasks
            .create(TaskDraft::new("Stretch", goal.id))
            .await
            .unwrap();
        (goals, tasks)
    }

    #[tokio::test]
    async fn test_selection_requires_known_goal() {
        let (goals, _tasks) = seeded().await;
        assert!(!goals.select("nope"));
        assert_eq!(goals.selected_goal_id(), None);

        assert!(goals.select("g-1"));
        assert_eq!(goals.selected_goal_id(), Some("g-1".to_string()));

        goals.clear_selection();
        assert_eq!(goals.selected_goal_id(), None);
    }

    #[tokio::test]
    async fn test_for_goal_filters_tasks() {
        let (_goals, tasks) = seeded().await;
        assert_eq!(tasks.for_goal("g-1").len(), 2);
        assert!(tasks.for_goal("g-2").is_empty());
    }

    #[tokio::test]
    async fn test_delete_selected_goal_clears_selection() {
        let (goals, _tasks) = seeded().await;
        goals.select("g-1");
        goals.delete("g-1").await.unwrap();
        assert_eq!(goals.selected_goal_id(), None);
        assert!(goals.goals().is_empty());
    }

    #[tokio::test]
    async fn test_cascade_orphan_keeps_tasks() {
        let (goals, tasks) = seeded().await;
        delete_goal_cascading(&goals, &tasks, "g-1", CascadePolicy::OrphanTasks)
            .await
            .unwrap();
        assert!(goals.goals().is_empty());
        // Tasks survive with a dangling goal reference.
        assert_eq!(tasks.tasks().len(), 2);
        assert_eq!(tasks.tasks()[0].goal_id, "g-1");
    }

    #[tokio::test]
    async fn test_cascade_delete_removes_tasks() {
        let (goals, tasks) = seeded().await;
        delete_goal_cascading(&goals, &tasks, "g-1", CascadePolicy::DeleteTasks)
            .await
            .unwrap();
        assert!(goals.goals().is_empty());
        assert!(tasks.tasks().is_empty());
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_task() {
        let tasks = TaskCatalog::new(MemoryTasks::default());
        let err = tasks.create(TaskDraft::new("", "g-1")).await.unwrap_err();
        assert!(matches!(err, StoreError::Invalid(_)));
        assert!(tasks.tasks().is_empty());
    }
}
