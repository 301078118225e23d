// --------------------------------------------------
// Process-wide state holder and router.
//
// The current snapshot lives behind one mutex. Each request:
// - creates today's goal logs if missing
// - applies its transition to the snapshot
// - installs the result and writes it to disk once (only if it changed)
// --------------------------------------------------

use std::path::Path;
use std::sync::Arc;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Router,
};
use chrono::NaiveDate;
use serde::Deserialize;
use tokio::sync::Mutex;
use tower_http::services::ServeDir;

use crate::clock;
use crate::date::parse_iso_date;
use crate::logic;
use crate::models::AppState;
use crate::store::{StateStore, StoreError};
use crate::{routes_goals, routes_tasks, routes_today};

pub type SharedState = Arc<AppContext>;

pub struct AppContext {
    store: StateStore,
    state: Mutex<AppState>,
}

impl AppContext {
    // Load (or seed) the saved state
    pub fn open(store: StateStore) -> Self {
        let state = store.load(clock::today_local(), clock::now_fixed_offset());
        Self {
            store,
            state: Mutex::new(state),
        }
    }

    /// Apply one transition on top of today's goal logs and persist the result.
    pub async fn commit(
        &self,
        today: NaiveDate,
        f: impl FnOnce(&AppState) -> AppState,
    ) -> Result<AppState, StoreError> {
        let mut current = self.state.lock().await;
        let base = logic::ensure_today_goal_logs(&current, today);
        let next = f(&base);
        if next == *current {
            return Ok(next);
        }

        *current = next.clone();
        self.store.save(&next)?;
        Ok(next)
    }

    // Current snapshot as of `today` (may still persist new goal logs)
    pub async fn observe(&self, today: NaiveDate) -> Result<AppState, StoreError> {
        self.commit(today, AppState::clone).await
    }

    /// Erase the saved file and start over from the seed state.
    pub async fn reset(&self) -> Result<AppState, StoreError> {
        let mut current = self.state.lock().await;
        self.store.reset()?;
        let seeded = self.store.load(clock::today_local(), clock::now_fixed_offset());
        *current = seeded.clone();
        Ok(seeded)
    }
}

// Optional "?date=YYYY-MM-DD" override of the local clock
#[derive(Debug, Default, Deserialize)]
pub struct DayQuery {
    pub date: Option<String>,
}

impl DayQuery {
    pub fn resolve(&self) -> Result<NaiveDate, Response> {
        match self.date.as_deref() {
            None => Ok(clock::today_local()),
            Some(s) => parse_iso_date(s)
                .ok_or_else(|| (StatusCode::BAD_REQUEST, "invalid date").into_response()),
        }
    }
}

pub fn save_failed(e: StoreError) -> Response {
    tracing::error!(error = %e, "failed to persist state");
    (StatusCode::INTERNAL_SERVER_ERROR, "failed to save state").into_response()
}

pub fn router(app: SharedState, static_dir: &Path) -> Router {
    let api = Router::new()
        // today pane
        .route("/today", get(routes_today::get_today))
        // tasks
        .route("/tasks", get(routes_tasks::get_tasks).post(routes_tasks::create_task))
        .route(
            "/tasks/:id",
            put(routes_tasks::update_task).delete(routes_tasks::delete_task),
        )
        .route("/tasks/:id/complete", post(routes_tasks::complete_task))
        .route("/tasks/:id/recurrence", put(routes_tasks::set_recurrence))
        // goals
        .route("/goals", get(routes_goals::get_goals).post(routes_goals::create_goal))
        .route(
            "/goals/:id",
            put(routes_goals::update_goal).delete(routes_goals::delete_goal),
        )
        .route("/goals/:id/toggle", post(routes_goals::toggle_goal))
        // settings
        .route(
            "/settings",
            get(routes_tasks::get_settings).put(routes_tasks::put_settings),
        )
        .route("/reset", post(routes_tasks::reset))
        .with_state(app);

    Router::new()
        .nest("/api", api)
        .fallback_service(ServeDir::new(static_dir))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn commit_persists_once_and_observe_adds_goal_logs() {
        let dir = tempfile::tempdir().unwrap();
        let store = StateStore::new(dir.path().join("db.json"));
        let app = AppContext::open(store.clone());
        let today = parse_iso_date("2024-05-10").unwrap();

        // nothing saved until the first change
        assert!(!store.path().exists());

        let seen = app.observe(today).await.unwrap();
        assert_eq!(seen.goal_logs.len(), 5);
        assert!(store.path().exists());

        let after = app
            .commit(today, |s| logic::add_goal(s, "Stretch").0)
            .await
            .unwrap();
        let reloaded = store.load(today, clock::now_fixed_offset());
        assert_eq!(reloaded, after);
        assert_eq!(reloaded.goals.len(), 6);
    }

    #[test]
    fn bad_date_query_is_rejected() {
        let q = DayQuery { date: Some("2024-13-01".into()) };
        assert!(q.resolve().is_err());
        let q = DayQuery { date: Some("2024-02-29".into()) };
        assert_eq!(q.resolve().ok(), parse_iso_date("2024-02-29"));
    }
}
