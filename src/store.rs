use std::{
    fs, io,
    path::{Path, PathBuf},
};

use chrono::NaiveDate;
use uuid::Uuid;

use crate::models::{
    AppState, Category, GoalDefinition, RecurrenceRule, RecurrenceUnit, Settings, Task,
    Timestamp, STATE_VERSION,
};

pub const DEFAULT_DB_PATH: &str = "data/db.json";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

// Whole-state JSON file: load (or seed), save, reset
#[derive(Debug, Clone)]
pub struct StateStore {
    path: PathBuf,
}

impl StateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the saved state.
    ///
    /// A missing file, unparseable JSON or a blob without a positive
    /// `version` all yield the seed state. Never fails.
    pub fn load(&self, today: NaiveDate, now: Timestamp) -> AppState {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::info!(path = %self.path.display(), "no saved state, seeding");
                return seed_state(today, now);
            }
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "unreadable state, seeding");
                return seed_state(today, now);
            }
        };

        match parse_state(&text) {
            Some(state) => {
                tracing::debug!(
                    tasks = state.tasks.len(),
                    goals = state.goals.len(),
                    "loaded state"
                );
                state
            }
            None => {
                tracing::warn!(path = %self.path.display(), "invalid or unversioned state, seeding");
                seed_state(today, now)
            }
        }
    }

    // Write to a temp file first, then rename over the old one
    pub fn save(&self, state: &AppState) -> Result<(), StoreError> {
        let tmp_path = self.path.with_extension("json.tmp");
        let text = serde_json::to_string_pretty(state)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| self.io_err(source))?;
        }

        fs::write(&tmp_path, text).map_err(|source| StoreError::Io {
            path: tmp_path.clone(),
            source,
        })?;
        fs::rename(&tmp_path, &self.path).map_err(|source| self.io_err(source))?;
        Ok(())
    }

    // Remove the saved state; the next load seeds again
    pub fn reset(&self) -> Result<(), StoreError> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                tracing::info!(path = %self.path.display(), "saved state erased");
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(self.io_err(source)),
        }
    }

    fn io_err(&self, source: io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

fn parse_state(text: &str) -> Option<AppState> {
    let value: serde_json::Value = serde_json::from_str(text).ok()?;
    let version = value.get("version").and_then(|v| v.as_u64()).unwrap_or(0);
    if version == 0 {
        return None;
    }
    serde_json::from_value(value).ok()
}

fn category(id: &str, name: &str, sort_order: i64) -> Category {
    Category {
        id: id.to_string(),
        name: name.to_string(),
        sort_order,
    }
}

fn goal(title: &str, sort_order: i64) -> GoalDefinition {
    GoalDefinition {
        id: Uuid::new_v4(),
        title: title.to_string(),
        active: true,
        sort_order,
    }
}

fn chore(
    title: &str,
    category_id: &str,
    interval: u32,
    unit: RecurrenceUnit,
    today: NaiveDate,
    now: Timestamp,
) -> Task {
    Task {
        id: Uuid::new_v4(),
        title: title.to_string(),
        category_id: category_id.to_string(),
        notes: None,
        created_at: now,
        due_date: None,
        planned_month: None,
        planned_week: None,
        recurrence: RecurrenceRule::Every { interval, unit },
        next_due_date: Some(today),
        recurrence_month: None,
        recurrence_week: None,
        last_completed_at: None,
        completed_at: None,
        archived: false,
    }
}

/// First-run state: default categories, five daily goals and a few
/// recurring house chores due today.
pub fn seed_state(today: NaiveDate, now: Timestamp) -> AppState {
    let categories = vec![
        category("cat_house", "House", 1),
        category("cat_personal", "Personal", 2),
        category("cat_health", "Health", 3),
        category("cat_finance", "Finance", 4),
        category("cat_errands", "Errands", 5),
        category("cat_other", "Other", 6),
    ];

    let goals = vec![
        goal("Workout / Move 30+ min", 1),
        goal("Drink water goal", 2),
        goal("Read 10 pages", 3),
        goal("Eat on plan", 4),
        goal("Plan tomorrow (5 min)", 5),
    ];

    let tasks = vec![
        chore("Take out trash", "cat_house", 1, RecurrenceUnit::Week, today, now),
        chore("Vacuum main areas", "cat_house", 1, RecurrenceUnit::Week, today, now),
        chore("Clean bathrooms", "cat_house", 2, RecurrenceUnit::Week, today, now),
        chore("Replace furnace filter", "cat_house", 3, RecurrenceUnit::Month, today, now),
        chore("Pay credit card", "cat_finance", 1, RecurrenceUnit::Month, today, now),
    ];

    AppState {
        version: STATE_VERSION,
        categories,
        tasks,
        goals,
        goal_logs: Vec::new(),
        settings: Settings { strict_mode: false },
    }
}
