// --------------------------------------------------
// Handles API endpoints related to task CRUD operations
// and global settings management.
//
// Responsibilities:
// - Create / read / update / delete tasks
// - Complete tasks (recurring ones roll their due date)
// - Reconfigure a task's repeat rule
// - Get / update settings, reset all data
// --------------------------------------------------

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::clock;
use crate::date::{month_name, to_iso_date};
use crate::logic;
use crate::models::{
    AppState, Category, NewTaskRequest, RecurrenceRule, Settings, Task, TaskPatch,
};
use crate::recurrence::describe;
use crate::server::{save_failed, DayQuery, SharedState};

// Task plus a human-readable schedule line
#[derive(Debug, Serialize)]
pub struct TaskView<'a> {
    #[serde(flatten)]
    pub task: &'a Task,
    pub schedule: String,
}

impl<'a> TaskView<'a> {
    pub fn new(task: &'a Task) -> Self {
        Self {
            task,
            schedule: schedule_label(task),
        }
    }

    pub fn list(tasks: Vec<&'a Task>) -> Vec<Self> {
        tasks.into_iter().map(Self::new).collect()
    }
}

// "Every 2 weeks", "Due 2024-05-10", "Planned: Sep (week 2)", "Anytime"
pub fn schedule_label(task: &Task) -> String {
    if task.is_recurring() {
        return describe(task.recurrence, task.constraint());
    }
    match (task.due_date, task.planned_month, task.planned_week) {
        (Some(due), _, _) => format!("Due {}", to_iso_date(due)),
        (None, Some(m), Some(w)) => format!("Planned: {} (week {w})", month_name(m)),
        (None, Some(m), None) => format!("Planned: {}", month_name(m)),
        (None, None, _) => "Anytime".to_string(),
    }
}

pub(crate) fn parse_id(id: &str) -> Result<Uuid, Response> {
    Uuid::parse_str(id).map_err(|_| (StatusCode::BAD_REQUEST, "invalid id").into_response())
}

fn find_task(state: &AppState, id: Uuid) -> Option<Task> {
    state.tasks.iter().find(|t| t.id == id).cloned()
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TasksResponse<'a> {
    pub date: String,
    pub tasks: Vec<TaskView<'a>>,
    pub planned: Vec<TaskView<'a>>,
    pub categories: Vec<&'a Category>,
}

// -----------------------------
// GET /api/tasks
// All non-archived tasks plus the categories to group them by
// -----------------------------
pub async fn get_tasks(State(app): State<SharedState>, Query(q): Query<DayQuery>) -> impl IntoResponse {
    let today = match q.resolve() {
        Ok(d) => d,
        Err(resp) => return resp,
    };
    let state = match app.observe(today).await {
        Ok(s) => s,
        Err(e) => return save_failed(e),
    };

    let mut categories: Vec<&Category> = state.categories.iter().collect();
    categories.sort_by_key(|c| c.sort_order);

    Json(TasksResponse {
        date: to_iso_date(today),
        tasks: TaskView::list(logic::active_tasks(&state)),
        planned: TaskView::list(logic::get_planned(&state)),
        categories,
    })
    .into_response()
}

// -----------------------------
// POST /api/tasks
// Creates a new task; recurring tasks get their first due date here
// -----------------------------
pub async fn create_task(
    State(app): State<SharedState>,
    Query(q): Query<DayQuery>,
    Json(input): Json<NewTaskRequest>,
) -> impl IntoResponse {
    if input.title.trim().is_empty() {
        return (StatusCode::BAD_REQUEST, "title required").into_response();
    }
    let today = match q.resolve() {
        Ok(d) => d,
        Err(resp) => return resp,
    };

    let draft = logic::draft_from_request(input, today);
    let mut created = None;
    let result = app
        .commit(today, |s| {
            let (next, id) = logic::add_task(s, draft, clock::now_fixed_offset());
            created = Some(id);
            next
        })
        .await;

    match (result, created) {
        (Ok(state), Some(id)) => {
            tracing::info!(task = %id, "task created");
            Json(find_task(&state, id)).into_response()
        }
        (Ok(_), None) => (StatusCode::INTERNAL_SERVER_ERROR, "task not created").into_response(),
        (Err(e), _) => save_failed(e),
    }
}

// -----------------------------
// PUT /api/tasks/:id
// Shallow patch; unknown ids leave everything as is (responds null)
// -----------------------------
pub async fn update_task(
    State(app): State<SharedState>,
    Path(id): Path<String>,
    Json(patch): Json<TaskPatch>,
) -> impl IntoResponse {
    let id = match parse_id(&id) {
        Ok(u) => u,
        Err(resp) => return resp,
    };

    match app
        .commit(clock::today_local(), |s| logic::update_task(s, id, &patch))
        .await
    {
        Ok(state) => Json(find_task(&state, id)).into_response(),
        Err(e) => save_failed(e),
    }
}

// -----------------------------
// DELETE /api/tasks/:id
// Removes a task permanently
// -----------------------------
pub async fn delete_task(State(app): State<SharedState>, Path(id): Path<String>) -> impl IntoResponse {
    let id = match parse_id(&id) {
        Ok(u) => u,
        Err(resp) => return resp,
    };

    match app
        .commit(clock::today_local(), |s| logic::delete_task(s, id))
        .await
    {
        Ok(_) => Json(serde_json::json!({ "ok": true })).into_response(),
        Err(e) => save_failed(e),
    }
}

// -----------------------------
// POST /api/tasks/:id/complete
// Recurring: roll to the next due date. One-time: mark completed.
// -----------------------------
pub async fn complete_task(
    State(app): State<SharedState>,
    Path(id): Path<String>,
    Query(q): Query<DayQuery>,
) -> impl IntoResponse {
    let id = match parse_id(&id) {
        Ok(u) => u,
        Err(resp) => return resp,
    };
    let today = match q.resolve() {
        Ok(d) => d,
        Err(resp) => return resp,
    };

    let now = clock::now_fixed_offset();
    match app
        .commit(today, |s| logic::complete_task(s, id, today, now))
        .await
    {
        Ok(state) => Json(find_task(&state, id)).into_response(),
        Err(e) => save_failed(e),
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecurrenceInput {
    pub recurrence: RecurrenceRule,
    #[serde(default)]
    pub recurrence_month: Option<u32>,
    #[serde(default)]
    pub recurrence_week: Option<u32>,
}

// -----------------------------
// PUT /api/tasks/:id/recurrence
// Replaces the repeat rule and recomputes the due date from today
// -----------------------------
pub async fn set_recurrence(
    State(app): State<SharedState>,
    Path(id): Path<String>,
    Query(q): Query<DayQuery>,
    Json(input): Json<RecurrenceInput>,
) -> impl IntoResponse {
    let id = match parse_id(&id) {
        Ok(u) => u,
        Err(resp) => return resp,
    };
    let today = match q.resolve() {
        Ok(d) => d,
        Err(resp) => return resp,
    };

    match app
        .commit(today, |s| {
            logic::reconfigure_recurrence(
                s,
                id,
                input.recurrence,
                input.recurrence_month,
                input.recurrence_week,
                today,
            )
        })
        .await
    {
        Ok(state) => Json(find_task(&state, id)).into_response(),
        Err(e) => save_failed(e),
    }
}

// -----------------------------
// GET /api/settings
// -----------------------------
pub async fn get_settings(State(app): State<SharedState>) -> impl IntoResponse {
    match app.observe(clock::today_local()).await {
        Ok(state) => Json(state.settings).into_response(),
        Err(e) => save_failed(e),
    }
}

// -----------------------------
// PUT /api/settings
// -----------------------------
pub async fn put_settings(State(app): State<SharedState>, Json(settings): Json<Settings>) -> impl IntoResponse {
    match app
        .commit(clock::today_local(), |s| AppState {
            settings,
            ..s.clone()
        })
        .await
    {
        Ok(state) => Json(state.settings).into_response(),
        Err(e) => save_failed(e),
    }
}

// -----------------------------
// POST /api/reset
// Erases saved data; the app starts over from the seed state
// -----------------------------
pub async fn reset(State(app): State<SharedState>) -> impl IntoResponse {
    match app.reset().await {
        Ok(_) => Json(serde_json::json!({ "ok": true })).into_response(),
        Err(e) => save_failed(e),
    }
}
