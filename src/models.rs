use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

pub const STATE_VERSION: u32 = 1;

pub type Timestamp = DateTime<FixedOffset>;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RecurrenceUnit {
    Day,
    Week,
    Month,
    Year,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RecurrenceRule {
    #[serde(rename = "none")]
    NoRepeat,
    Every { interval: u32, unit: RecurrenceUnit },
}

impl RecurrenceRule {
    pub fn is_recurring(&self) -> bool {
        matches!(self, RecurrenceRule::Every { .. })
    }
}

// Optional month/week pin on a recurring rule.
// Only honored for yearly (month, week) and monthly (week) rules.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecurrenceConstraint {
    pub month: Option<u32>, // 1..=12
    pub week: Option<u32>,  // 1..=5
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,
    pub name: String,
    pub sort_order: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: Uuid,
    pub title: String,
    pub category_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: Timestamp,

    // one-time tasks
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub planned_month: Option<u32>, // only used when due_date is unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub planned_week: Option<u32>,

    // recurring tasks
    pub recurrence: RecurrenceRule,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_due_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurrence_month: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurrence_week: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_completed_at: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<Timestamp>, // one-time completion, terminal
    #[serde(default)]
    pub archived: bool,
}

impl Task {
    pub fn is_recurring(&self) -> bool {
        self.recurrence.is_recurring()
    }

    pub fn is_completed(&self) -> bool {
        self.completed_at.is_some()
    }

    pub fn constraint(&self) -> RecurrenceConstraint {
        RecurrenceConstraint {
            month: self.recurrence_month,
            week: self.recurrence_week,
        }
    }

    /// The date the task currently counts as due: `next_due_date` for
    /// recurring tasks, `due_date` for one-time tasks.
    pub fn live_due_date(&self) -> Option<NaiveDate> {
        if self.is_recurring() {
            self.next_due_date
        } else {
            self.due_date
        }
    }
}

// Everything a new task carries except identity and creation time
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TaskDraft {
    pub title: String,
    pub category_id: String,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub planned_month: Option<u32>,
    #[serde(default)]
    pub planned_week: Option<u32>,
    pub recurrence: RecurrenceRule,
    #[serde(default)]
    pub next_due_date: Option<NaiveDate>,
    #[serde(default)]
    pub recurrence_month: Option<u32>,
    #[serde(default)]
    pub recurrence_week: Option<u32>,
}

// Raw add-task form input. Which fields survive depends on the rule;
// see logic::draft_from_request.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewTaskRequest {
    pub title: String,
    pub category_id: String,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default = "no_repeat")]
    pub recurrence: RecurrenceRule,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub planned_month: Option<u32>,
    #[serde(default)]
    pub planned_week: Option<u32>,
    #[serde(default)]
    pub recurrence_month: Option<u32>,
    #[serde(default)]
    pub recurrence_week: Option<u32>,
}

fn no_repeat() -> RecurrenceRule {
    RecurrenceRule::NoRepeat
}

// Shallow patch for an existing task.
//
// Outer None leaves the field alone. For nullable fields an explicit
// JSON null (inner None) clears the value. The rule itself is not patchable:
// changing it goes through logic::reconfigure_recurrence.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TaskPatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub category_id: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub notes: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub due_date: Option<Option<NaiveDate>>,
    #[serde(default, deserialize_with = "double_option")]
    pub planned_month: Option<Option<u32>>,
    #[serde(default, deserialize_with = "double_option")]
    pub planned_week: Option<Option<u32>>,
    #[serde(default, deserialize_with = "double_option")]
    pub next_due_date: Option<Option<NaiveDate>>,
    #[serde(default, deserialize_with = "double_option")]
    pub recurrence_month: Option<Option<u32>>,
    #[serde(default, deserialize_with = "double_option")]
    pub recurrence_week: Option<Option<u32>>,
    #[serde(default)]
    pub archived: Option<bool>,
}

impl TaskPatch {
    pub fn apply(&self, task: &Task) -> Task {
        let p = self.clone();
        Task {
            title: p.title.unwrap_or_else(|| task.title.clone()),
            category_id: p.category_id.unwrap_or_else(|| task.category_id.clone()),
            notes: p.notes.unwrap_or_else(|| task.notes.clone()),
            due_date: p.due_date.unwrap_or(task.due_date),
            planned_month: p.planned_month.unwrap_or(task.planned_month),
            planned_week: p.planned_week.unwrap_or(task.planned_week),
            next_due_date: p.next_due_date.unwrap_or(task.next_due_date),
            recurrence_month: p.recurrence_month.unwrap_or(task.recurrence_month),
            recurrence_week: p.recurrence_week.unwrap_or(task.recurrence_week),
            archived: p.archived.unwrap_or(task.archived),
            ..task.clone()
        }
    }
}

fn double_option<'de, T, D>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(de).map(Some)
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GoalDefinition {
    pub id: Uuid,
    pub title: String,
    pub active: bool,
    pub sort_order: i64,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GoalPatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub active: Option<bool>,
    #[serde(default)]
    pub sort_order: Option<i64>,
}

impl GoalPatch {
    pub fn apply(&self, goal: &GoalDefinition) -> GoalDefinition {
        GoalDefinition {
            title: self.title.clone().unwrap_or_else(|| goal.title.clone()),
            active: self.active.unwrap_or(goal.active),
            sort_order: self.sort_order.unwrap_or(goal.sort_order),
            ..goal.clone()
        }
    }
}

// One record per (goal, date)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DailyGoalLog {
    pub date: NaiveDate,
    pub goal_id: Uuid,
    pub completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<Timestamp>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default)]
    pub strict_mode: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    pub version: u32,
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub goals: Vec<GoalDefinition>,
    #[serde(default)]
    pub goal_logs: Vec<DailyGoalLog>,
    #[serde(default)]
    pub settings: Settings,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            version: STATE_VERSION,
            categories: Vec::new(),
            tasks: Vec::new(),
            goals: Vec::new(),
            goal_logs: Vec::new(),
            settings: Settings::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rule_uses_kind_tag() {
        let none = serde_json::to_value(RecurrenceRule::NoRepeat).unwrap();
        assert_eq!(none, serde_json::json!({ "kind": "none" }));

        let every: RecurrenceRule =
            serde_json::from_str(r#"{"kind":"every","interval":2,"unit":"week"}"#).unwrap();
        assert_eq!(
            every,
            RecurrenceRule::Every { interval: 2, unit: RecurrenceUnit::Week }
        );
    }

    #[test]
    fn patch_distinguishes_missing_from_null() {
        let patch: TaskPatch =
            serde_json::from_str(r#"{"title":"Mow lawn","dueDate":null}"#).unwrap();
        assert_eq!(patch.title.as_deref(), Some("Mow lawn"));
        assert_eq!(patch.due_date, Some(None));
        assert_eq!(patch.notes, None);

        let patch: TaskPatch = serde_json::from_str(r#"{"plannedMonth":4}"#).unwrap();
        assert_eq!(patch.planned_month, Some(Some(4)));
    }

    #[test]
    fn patch_cannot_change_the_rule() {
        let attempt = serde_json::from_str::<TaskPatch>(
            r#"{"recurrence":{"kind":"every","interval":1,"unit":"week"}}"#,
        );
        assert!(attempt.is_err());
    }
}
