//! Runtime configuration.
//!
//! Loaded once from a TOML file in the platform config directory; every
//! field has a default matching the reference behavior, so a missing file
//! is not an error.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::geometry::DayWindow;

/// What happens to a deleted goal's tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CascadePolicy {
    /// Tasks keep a dangling goal reference (default; matches the schema,
    /// where references are never enforced).
    #[default]
    OrphanTasks,
    /// Tasks under the goal are deleted with it.
    DeleteTasks,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// First visible hour of the day grid.
    pub window_start_hour: u32,
    /// Last visible hour of the day grid.
    pub window_end_hour: u32,
    /// Work window for task-drop default times, inclusive on both ends.
    pub work_start_hour: u32,
    pub work_end_hour: u32,
    /// Duration given to events created by drops and grid clicks.
    pub default_duration_minutes: i64,
    pub cascade: CascadePolicy,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            window_start_hour: 7,
            window_end_hour: 23,
            work_start_hour: 9,
            work_end_hour: 17,
            default_duration_minutes: 30,
            cascade: CascadePolicy::OrphanTasks,
        }
    }
}

impl PlannerConfig {
    /// The visible grid window; falls back to 07:00–23:00 when the
    /// configured hours are unusable.
    pub fn day_window(&self) -> DayWindow {
        DayWindow::from_hours(self.window_start_hour, self.window_end_hour)
            .unwrap_or_default()
    }

    /// Load from the platform config directory, or defaults when no file
    /// exists. A present-but-invalid file is an error, not a silent default.
    pub fn load() -> Result<Self> {
        match config_file_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config at {}", path.display()))?;
        let config: Self = toml::from_str(&raw)
            .with_context(|| format!("Failed to parse config at {}", path.display()))?;
        Ok(config)
    }
}

fn config_file_path() -> Option<PathBuf> {
    ProjectDirs::from("com", "weekplan", "weekplan")
        .map(|dirs| dirs.config_dir().join("weekplan.toml"))
}
