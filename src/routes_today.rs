use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use serde::Serialize;

use crate::date::{format_nice, to_iso_date};
use crate::logic::{self, GoalForToday, GoalProgress};
use crate::routes_tasks::TaskView;
use crate::server::{save_failed, DayQuery, SharedState};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TodayResponse<'a> {
    pub date: String,
    pub label: String,
    pub goals: Vec<GoalForToday<'a>>,
    pub goal_progress: GoalProgress,
    pub due_today: Vec<TaskView<'a>>,
    pub overdue: Vec<TaskView<'a>>,
    pub anytime: Vec<TaskView<'a>>,
    pub planned_recurring: Vec<TaskView<'a>>,
}

// GET /api/today
// Everything the Today pane shows, in one response
pub async fn get_today(State(app): State<SharedState>, Query(q): Query<DayQuery>) -> impl IntoResponse {
    let today = match q.resolve() {
        Ok(d) => d,
        Err(resp) => return resp,
    };
    let state = match app.observe(today).await {
        Ok(s) => s,
        Err(e) => return save_failed(e),
    };

    let goals = logic::goals_for_today(&state, today);
    let goal_progress = logic::goal_progress(&goals);

    Json(TodayResponse {
        date: to_iso_date(today),
        label: format_nice(today),
        goals,
        goal_progress,
        due_today: TaskView::list(logic::get_due_today(&state, today)),
        overdue: TaskView::list(logic::get_overdue(&state, today)),
        anytime: TaskView::list(logic::get_anytime(&state)),
        planned_recurring: TaskView::list(logic::get_planned_recurring(&state)),
    })
    .into_response()
}
