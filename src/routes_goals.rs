// --------------------------------------------------
// Daily goal endpoints: CRUD plus today's check-off toggle
// --------------------------------------------------

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;

use crate::clock;
use crate::logic;
use crate::models::{AppState, GoalDefinition, GoalPatch};
use crate::routes_tasks::parse_id;
use crate::server::{save_failed, DayQuery, SharedState};

fn sorted_goals(state: &AppState) -> Vec<&GoalDefinition> {
    let mut goals: Vec<&GoalDefinition> = state.goals.iter().collect();
    goals.sort_by_key(|g| g.sort_order);
    goals
}

// -----------------------------
// GET /api/goals
// All goals (active or not) by sort order
// -----------------------------
pub async fn get_goals(State(app): State<SharedState>) -> impl IntoResponse {
    match app.observe(clock::today_local()).await {
        Ok(state) => Json(sorted_goals(&state)).into_response(),
        Err(e) => save_failed(e),
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateGoalInput {
    pub title: String,
}

// -----------------------------
// POST /api/goals
// New goals are active and go to the end of the list
// -----------------------------
pub async fn create_goal(State(app): State<SharedState>, Json(input): Json<CreateGoalInput>) -> impl IntoResponse {
    if input.title.trim().is_empty() {
        return (StatusCode::BAD_REQUEST, "title required").into_response();
    }

    let mut created = None;
    let result = app
        .commit(clock::today_local(), |s| {
            let (next, id) = logic::add_goal(s, &input.title);
            created = Some(id);
            next
        })
        .await;

    match result {
        Ok(state) => {
            let goal = created.and_then(|id| state.goals.iter().find(|g| g.id == id).cloned());
            Json(goal).into_response()
        }
        Err(e) => save_failed(e),
    }
}

// -----------------------------
// PUT /api/goals/:id
// -----------------------------
pub async fn update_goal(
    State(app): State<SharedState>,
    Path(id): Path<String>,
    Json(patch): Json<GoalPatch>,
) -> impl IntoResponse {
    let id = match parse_id(&id) {
        Ok(u) => u,
        Err(resp) => return resp,
    };

    match app
        .commit(clock::today_local(), |s| logic::update_goal(s, id, &patch))
        .await
    {
        Ok(state) => Json(state.goals.iter().find(|g| g.id == id)).into_response(),
        Err(e) => save_failed(e),
    }
}

// -----------------------------
// DELETE /api/goals/:id
// Also removes the goal's whole history
// -----------------------------
pub async fn delete_goal(State(app): State<SharedState>, Path(id): Path<String>) -> impl IntoResponse {
    let id = match parse_id(&id) {
        Ok(u) => u,
        Err(resp) => return resp,
    };

    match app
        .commit(clock::today_local(), |s| logic::delete_goal(s, id))
        .await
    {
        Ok(_) => Json(serde_json::json!({ "ok": true })).into_response(),
        Err(e) => save_failed(e),
    }
}

// -----------------------------
// POST /api/goals/:id/toggle
// Flips today's check-off; responds with today's goal list
// -----------------------------
pub async fn toggle_goal(
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
        .commit(today, |s| logic::toggle_goal_for_today(s, today, id, now))
        .await
    {
        Ok(state) => Json(logic::goals_for_today(&state, today)).into_response(),
        Err(e) => save_failed(e),
    }
}
