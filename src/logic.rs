/*
Task and goal state transitions.
Every function takes the current snapshot by reference and returns a new one;
nothing here does I/O. Module was independently written from HTTP / Axum for testing.
*/

use chrono::NaiveDate;
use serde::Serialize;
use uuid::Uuid;

use crate::models::{
    AppState, DailyGoalLog, GoalDefinition, GoalPatch, NewTaskRequest, RecurrenceConstraint,
    RecurrenceRule, Task, TaskDraft, TaskPatch, Timestamp,
};
use crate::recurrence::{compute_initial_due_date, compute_next_due_date};

// An active goal joined with today's log (if one exists yet)
#[derive(Debug, Clone, Serialize)]
pub struct GoalForToday<'a> {
    pub goal: &'a GoalDefinition,
    pub log: Option<&'a DailyGoalLog>,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct GoalProgress {
    pub done: usize,
    pub total: usize,
}

// -----------------------------
// Tasks
// -----------------------------

/// Turn add-task form input into a draft.
///
/// - One-time: keeps the due date; a planned month (and week) only when
///   there is no due date. Recurring fields are dropped.
/// - Recurring: keeps the month/week pin the rule can honor and computes the
///   first due date from `today`. One-time fields are dropped.
pub fn draft_from_request(req: NewTaskRequest, today: NaiveDate) -> TaskDraft {
    let title = req.title.trim().to_string();
    let notes = req.notes.filter(|n| !n.trim().is_empty());

    match req.recurrence {
        RecurrenceRule::NoRepeat => {
            let planned_month = match req.due_date {
                Some(_) => None,
                None => req.planned_month.filter(|m| (1..=12).contains(m)),
            };
            let planned_week = planned_month.and(req.planned_week.filter(|w| (1..=5).contains(w)));
            TaskDraft {
                title,
                category_id: req.category_id,
                notes,
                due_date: req.due_date,
                planned_month,
                planned_week,
                recurrence: RecurrenceRule::NoRepeat,
                next_due_date: None,
                recurrence_month: None,
                recurrence_week: None,
            }
        }
        RecurrenceRule::Every { interval, unit } => {
            let rule = RecurrenceRule::Every { interval: interval.max(1), unit };
            let pin = RecurrenceConstraint::normalized(rule, req.recurrence_month, req.recurrence_week);
            let next_due_date = compute_initial_due_date(today, rule, pin).unwrap_or(today);
            tracing::debug!(?rule, %next_due_date, "initial due date for recurring task");
            TaskDraft {
                title,
                category_id: req.category_id,
                notes,
                due_date: None,
                planned_month: None,
                planned_week: None,
                recurrence: rule,
                next_due_date: Some(next_due_date),
                recurrence_month: pin.month,
                recurrence_week: pin.week,
            }
        }
    }
}

pub fn add_task(state: &AppState, draft: TaskDraft, now: Timestamp) -> (AppState, Uuid) {
    let id = Uuid::new_v4();
    let task = Task {
        id,
        title: draft.title,
        category_id: draft.category_id,
        notes: draft.notes,
        created_at: now,
        due_date: draft.due_date,
        planned_month: draft.planned_month,
        planned_week: draft.planned_week,
        recurrence: draft.recurrence,
        next_due_date: draft.next_due_date,
        recurrence_month: draft.recurrence_month,
        recurrence_week: draft.recurrence_week,
        last_completed_at: None,
        completed_at: None,
        archived: false,
    };

    let mut tasks = state.tasks.clone();
    tasks.push(task);
    (AppState { tasks, ..state.clone() }, id)
}

// Unknown id: unchanged copy, not an error
pub fn update_task(state: &AppState, task_id: Uuid, patch: &TaskPatch) -> AppState {
    map_task(state, task_id, |t| patch.apply(t))
}

pub fn delete_task(state: &AppState, task_id: Uuid) -> AppState {
    AppState {
        tasks: state.tasks.iter().filter(|t| t.id != task_id).cloned().collect(),
        ..state.clone()
    }
}

/// Mark a task done on `today`.
///
/// Recurring tasks with a live due date roll forward and get
/// `last_completed_at`; everything else gets `completed_at` (a repeat call
/// just overwrites the timestamp).
pub fn complete_task(state: &AppState, task_id: Uuid, today: NaiveDate, now: Timestamp) -> AppState {
    map_task(state, task_id, |t| match (t.recurrence, t.next_due_date) {
        (rule @ RecurrenceRule::Every { .. }, Some(due)) => {
            let next = compute_next_due_date(due, rule, today, t.constraint());
            tracing::debug!(task = %t.id, %due, ?next, "recurring task completed");
            Task {
                last_completed_at: Some(now),
                next_due_date: next,
                ..t.clone()
            }
        }
        _ => Task {
            completed_at: Some(now),
            ..t.clone()
        },
    })
}

/// Replace a task's rule wholesale.
///
/// Switching to a recurring rule recomputes the first due date from `today`
/// and drops one-time fields; switching to no-repeat drops the recurring ones.
pub fn reconfigure_recurrence(
    state: &AppState,
    task_id: Uuid,
    rule: RecurrenceRule,
    month: Option<u32>,
    week: Option<u32>,
    today: NaiveDate,
) -> AppState {
    map_task(state, task_id, |t| match rule {
        RecurrenceRule::NoRepeat => Task {
            recurrence: RecurrenceRule::NoRepeat,
            next_due_date: None,
            recurrence_month: None,
            recurrence_week: None,
            last_completed_at: None,
            ..t.clone()
        },
        RecurrenceRule::Every { interval, unit } => {
            let rule = RecurrenceRule::Every { interval: interval.max(1), unit };
            let pin = RecurrenceConstraint::normalized(rule, month, week);
            Task {
                recurrence: rule,
                next_due_date: compute_initial_due_date(today, rule, pin),
                recurrence_month: pin.month,
                recurrence_week: pin.week,
                due_date: None,
                planned_month: None,
                planned_week: None,
                completed_at: None,
                ..t.clone()
            }
        }
    })
}

fn map_task(state: &AppState, task_id: Uuid, f: impl Fn(&Task) -> Task) -> AppState {
    if !state.tasks.iter().any(|t| t.id == task_id) {
        tracing::debug!(%task_id, "no such task, leaving state unchanged");
    }
    AppState {
        tasks: state
            .tasks
            .iter()
            .map(|t| if t.id == task_id { f(t) } else { t.clone() })
            .collect(),
        ..state.clone()
    }
}

// -----------------------------
// Task views
// -----------------------------

fn open_tasks(state: &AppState) -> impl Iterator<Item = &Task> {
    state.tasks.iter().filter(|t| !t.archived && !t.is_completed())
}

// Open tasks whose live due date is today
pub fn get_due_today(state: &AppState, today: NaiveDate) -> Vec<&Task> {
    open_tasks(state)
        .filter(|t| t.live_due_date() == Some(today))
        .collect()
}

// Open tasks whose live due date is before today
pub fn get_overdue(state: &AppState, today: NaiveDate) -> Vec<&Task> {
    open_tasks(state)
        .filter(|t| t.live_due_date().is_some_and(|due| due < today))
        .collect()
}

// One-time tasks with neither a due date nor a planned month
pub fn get_anytime(state: &AppState) -> Vec<&Task> {
    open_tasks(state)
        .filter(|t| !t.is_recurring() && t.due_date.is_none() && t.planned_month.is_none())
        .collect()
}

// One-time tasks parked on a month (and maybe a week), earliest first
pub fn get_planned(state: &AppState) -> Vec<&Task> {
    let mut planned: Vec<&Task> = open_tasks(state)
        .filter(|t| !t.is_recurring() && t.due_date.is_none() && t.planned_month.is_some())
        .collect();
    planned.sort_by_key(|t| (t.planned_month, t.planned_week.unwrap_or(0)));
    planned
}

// Recurring tasks pinned to a month and/or week
pub fn get_planned_recurring(state: &AppState) -> Vec<&Task> {
    open_tasks(state)
        .filter(|t| t.is_recurring() && (t.recurrence_month.is_some() || t.recurrence_week.is_some()))
        .collect()
}

// All non-archived tasks, alphabetical by title
pub fn active_tasks(state: &AppState) -> Vec<&Task> {
    let mut tasks: Vec<&Task> = state.tasks.iter().filter(|t| !t.archived).collect();
    tasks.sort_by(|a, b| a.title.to_lowercase().cmp(&b.title.to_lowercase()));
    tasks
}

// -----------------------------
// Goals
// -----------------------------

pub fn add_goal(state: &AppState, title: &str) -> (AppState, Uuid) {
    let max_sort = state.goals.iter().map(|g| g.sort_order).max().unwrap_or(0).max(0);
    let id = Uuid::new_v4();
    let goal = GoalDefinition {
        id,
        title: title.trim().to_string(),
        active: true,
        sort_order: max_sort.saturating_add(1),
    };

    let mut goals = state.goals.clone();
    goals.push(goal);
    (AppState { goals, ..state.clone() }, id)
}

pub fn update_goal(state: &AppState, goal_id: Uuid, patch: &GoalPatch) -> AppState {
    if !state.goals.iter().any(|g| g.id == goal_id) {
        tracing::debug!(%goal_id, "no such goal, leaving state unchanged");
    }
    AppState {
        goals: state
            .goals
            .iter()
            .map(|g| if g.id == goal_id { patch.apply(g) } else { g.clone() })
            .collect(),
        ..state.clone()
    }
}

// Also drops every log of that goal
pub fn delete_goal(state: &AppState, goal_id: Uuid) -> AppState {
    AppState {
        goals: state.goals.iter().filter(|g| g.id != goal_id).cloned().collect(),
        goal_logs: state
            .goal_logs
            .iter()
            .filter(|l| l.goal_id != goal_id)
            .cloned()
            .collect(),
        ..state.clone()
    }
}

/// Insert an open log for every active goal that has none for `today`.
/// Safe to call on every request; inactive goals and other days are left alone.
pub fn ensure_today_goal_logs(state: &AppState, today: NaiveDate) -> AppState {
    let missing: Vec<DailyGoalLog> = state
        .goals
        .iter()
        .filter(|g| g.active)
        .filter(|g| !state.goal_logs.iter().any(|l| l.date == today && l.goal_id == g.id))
        .map(|g| DailyGoalLog {
            date: today,
            goal_id: g.id,
            completed: false,
            completed_at: None,
        })
        .collect();

    if missing.is_empty() {
        return state.clone();
    }
    tracing::debug!(%today, count = missing.len(), "created goal logs");

    let mut goal_logs = state.goal_logs.clone();
    goal_logs.extend(missing);
    AppState { goal_logs, ..state.clone() }
}

// Flip today's log for the goal. No log yet -> nothing happens.
pub fn toggle_goal_for_today(
    state: &AppState,
    today: NaiveDate,
    goal_id: Uuid,
    now: Timestamp,
) -> AppState {
    AppState {
        goal_logs: state
            .goal_logs
            .iter()
            .map(|l| {
                if l.date != today || l.goal_id != goal_id {
                    return l.clone();
                }
                let completed = !l.completed;
                DailyGoalLog {
                    completed,
                    completed_at: completed.then_some(now),
                    ..l.clone()
                }
            })
            .collect(),
        ..state.clone()
    }
}

// Active goals by sort order, each with today's log
pub fn goals_for_today(state: &AppState, today: NaiveDate) -> Vec<GoalForToday<'_>> {
    let mut active: Vec<&GoalDefinition> = state.goals.iter().filter(|g| g.active).collect();
    active.sort_by_key(|g| g.sort_order);

    active
        .into_iter()
        .map(|goal| GoalForToday {
            goal,
            log: state
                .goal_logs
                .iter()
                .find(|l| l.date == today && l.goal_id == goal.id),
        })
        .collect()
}

pub fn goal_progress(goals: &[GoalForToday<'_>]) -> GoalProgress {
    GoalProgress {
        done: goals.iter().filter(|g| g.log.is_some_and(|l| l.completed)).count(),
        total: goals.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::date::parse_iso_date;
    use crate::models::RecurrenceUnit;
    use chrono::{DateTime, Duration};

    fn d(s: &str) -> NaiveDate {
        parse_iso_date(s).unwrap()
    }

    fn ts(s: &str) -> Timestamp {
        DateTime::parse_from_rfc3339(s).unwrap()
    }

    fn request(title: &str, recurrence: RecurrenceRule) -> NewTaskRequest {
        NewTaskRequest {
            title: title.to_string(),
            category_id: "cat_house".to_string(),
            notes: None,
            recurrence,
            due_date: None,
            planned_month: None,
            planned_week: None,
            recurrence_month: None,
            recurrence_week: None,
        }
    }

    fn with_task(state: &AppState, req: NewTaskRequest, today: NaiveDate) -> (AppState, Uuid) {
        add_task(state, draft_from_request(req, today), ts("2024-05-01T09:00:00+00:00"))
    }

    fn task(state: &AppState, id: Uuid) -> &Task {
        state.tasks.iter().find(|t| t.id == id).unwrap()
    }

    #[test]
    fn one_time_request_keeps_planned_month_only_without_due_date() {
        let today = d("2024-05-01");
        let mut req = request("Renew passport", RecurrenceRule::NoRepeat);
        req.planned_month = Some(9);
        req.planned_week = Some(2);
        req.recurrence_month = Some(3);
        let draft = draft_from_request(req.clone(), today);
        assert_eq!(draft.planned_month, Some(9));
        assert_eq!(draft.planned_week, Some(2));
        assert_eq!(draft.recurrence_month, None);
        assert_eq!(draft.next_due_date, None);

        req.due_date = Some(d("2024-06-01"));
        let draft = draft_from_request(req, today);
        assert_eq!(draft.due_date, Some(d("2024-06-01")));
        assert_eq!(draft.planned_month, None);
        assert_eq!(draft.planned_week, None);
    }

    #[test]
    fn recurring_request_gets_initial_due_date() {
        let today = d("2024-03-15");
        let mut req = request(
            "Clean gutters",
            RecurrenceRule::Every { interval: 1, unit: RecurrenceUnit::Year },
        );
        req.recurrence_month = Some(6);
        req.due_date = Some(d("2024-04-01"));
        let draft = draft_from_request(req, today);
        assert_eq!(draft.next_due_date, Some(d("2024-06-01")));
        assert_eq!(draft.recurrence_month, Some(6));
        assert_eq!(draft.due_date, None);

        let draft = draft_from_request(
            request("Trash", RecurrenceRule::Every { interval: 0, unit: RecurrenceUnit::Week }),
            today,
        );
        assert_eq!(draft.next_due_date, Some(today));
        assert_eq!(
            draft.recurrence,
            RecurrenceRule::Every { interval: 1, unit: RecurrenceUnit::Week }
        );
    }

    #[test]
    fn transitions_do_not_touch_their_input() {
        let state = AppState::default();
        let (next, id) = with_task(&state, request("Dishes", RecurrenceRule::NoRepeat), d("2024-05-01"));
        assert!(state.tasks.is_empty());
        assert_eq!(next.tasks.len(), 1);

        let done = complete_task(&next, id, d("2024-05-01"), ts("2024-05-01T10:00:00+00:00"));
        assert!(task(&next, id).completed_at.is_none());
        assert!(task(&done, id).completed_at.is_some());
    }

    #[test]
    fn update_merges_and_ignores_unknown_ids() {
        let (state, id) = with_task(
            &AppState::default(),
            request("Dishes", RecurrenceRule::NoRepeat),
            d("2024-05-01"),
        );
        let patch = TaskPatch {
            title: Some("Wash dishes".into()),
            due_date: Some(Some(d("2024-05-03"))),
            ..TaskPatch::default()
        };
        let updated = update_task(&state, id, &patch);
        assert_eq!(task(&updated, id).title, "Wash dishes");
        assert_eq!(task(&updated, id).due_date, Some(d("2024-05-03")));
        assert_eq!(task(&updated, id).category_id, "cat_house");

        let unchanged = update_task(&state, Uuid::new_v4(), &patch);
        assert_eq!(unchanged, state);

        let cleared = update_task(
            &updated,
            id,
            &TaskPatch { due_date: Some(None), ..TaskPatch::default() },
        );
        assert_eq!(task(&cleared, id).due_date, None);

        let deleted = delete_task(&updated, id);
        assert!(deleted.tasks.is_empty());
    }

    #[test]
    fn completing_recurring_task_rolls_due_date() {
        let today = d("2024-05-01");
        let (state, id) = with_task(
            &AppState::default(),
            request("Trash", RecurrenceRule::Every { interval: 1, unit: RecurrenceUnit::Week }),
            today,
        );
        let now = ts("2024-05-03T18:00:00+00:00");
        let done = complete_task(&state, id, d("2024-05-03"), now);
        let t = task(&done, id);
        assert_eq!(t.next_due_date, Some(d("2024-05-10")));
        assert_eq!(t.last_completed_at, Some(now));
        assert_eq!(t.completed_at, None);
    }

    #[test]
    fn completing_one_time_task_overwrites_timestamp() {
        let (state, id) = with_task(
            &AppState::default(),
            request("Call bank", RecurrenceRule::NoRepeat),
            d("2024-05-01"),
        );
        let first = ts("2024-05-01T10:00:00+00:00");
        let second = first + Duration::minutes(5);
        let once = complete_task(&state, id, d("2024-05-01"), first);
        let twice = complete_task(&once, id, d("2024-05-01"), second);
        assert_eq!(task(&once, id).completed_at, Some(first));
        assert_eq!(task(&twice, id).completed_at, Some(second));
    }

    #[test]
    fn one_time_task_becomes_recurring_only_through_reconfigure() {
        let today = d("2024-05-01");
        let (state, id) = with_task(
            &AppState::default(),
            request("Water plants", RecurrenceRule::NoRepeat),
            today,
        );

        // recurring-side fields in a patch do not turn the task recurring
        let patched = update_task(
            &state,
            id,
            &TaskPatch { recurrence_week: Some(Some(2)), ..TaskPatch::default() },
        );
        assert!(!task(&patched, id).is_recurring());

        let weekly = RecurrenceRule::Every { interval: 1, unit: RecurrenceUnit::Week };
        let recurring = reconfigure_recurrence(&state, id, weekly, None, None, today);
        assert_eq!(task(&recurring, id).next_due_date, Some(today));

        let now = ts("2024-05-01T10:00:00+00:00");
        let done = complete_task(&recurring, id, today, now);
        let t = task(&done, id);
        assert!(t.is_recurring());
        assert_eq!(t.next_due_date, Some(d("2024-05-08")));
        assert_eq!(t.last_completed_at, Some(now));
        assert_eq!(t.completed_at, None);
        assert_eq!(get_due_today(&done, d("2024-05-08")).len(), 1);
    }

    #[test]
    fn reconfigure_switches_rule_kind() {
        let today = d("2024-03-15");
        let mut req = request("Taxes", RecurrenceRule::NoRepeat);
        req.due_date = Some(d("2024-04-15"));
        let (state, id) = with_task(&AppState::default(), req, today);

        let yearly = RecurrenceRule::Every { interval: 1, unit: RecurrenceUnit::Year };
        let recurring = reconfigure_recurrence(&state, id, yearly, Some(4), Some(3), today);
        let t = task(&recurring, id);
        assert_eq!(t.next_due_date, Some(d("2024-04-15")));
        assert_eq!(t.due_date, None);
        assert_eq!((t.recurrence_month, t.recurrence_week), (Some(4), Some(3)));

        let back = reconfigure_recurrence(&recurring, id, RecurrenceRule::NoRepeat, None, None, today);
        let t = task(&back, id);
        assert!(!t.is_recurring());
        assert_eq!(t.next_due_date, None);
        assert_eq!(t.recurrence_month, None);
    }

    #[test]
    fn due_views_partition_open_tasks() {
        let today = d("2024-05-10");
        let weekly = RecurrenceRule::Every { interval: 1, unit: RecurrenceUnit::Week };
        let mut state = AppState::default();
        let mut ids = Vec::new();

        for due in [Some("2024-05-10"), Some("2024-05-01"), Some("2024-06-01"), None] {
            let mut req = request("one-time", RecurrenceRule::NoRepeat);
            req.due_date = due.map(d);
            let (next, id) = with_task(&state, req, today);
            state = next;
            ids.push(id);
        }
        let mut planned = request("planned", RecurrenceRule::NoRepeat);
        planned.planned_month = Some(8);
        state = with_task(&state, planned, today).0;
        for start in ["2024-05-10", "2024-05-03"] {
            state = with_task(&state, request("recurring", weekly), d(start)).0;
        }
        // completed and archived tasks never show up
        let (next, done_id) = with_task(&state, request("done", RecurrenceRule::NoRepeat), today);
        state = complete_task(&next, done_id, today, ts("2024-05-10T08:00:00+00:00"));
        let (next, archived_id) = with_task(&state, request("archived", RecurrenceRule::NoRepeat), today);
        state = update_task(
            &next,
            archived_id,
            &TaskPatch { archived: Some(true), ..TaskPatch::default() },
        );

        let due = get_due_today(&state, today);
        let overdue = get_overdue(&state, today);
        let anytime = get_anytime(&state);

        assert_eq!(due.len(), 2);
        assert_eq!(overdue.len(), 2);
        assert_eq!(anytime.len(), 1);
        assert_eq!(anytime[0].id, ids[3]);
        for t in &due {
            assert!(!overdue.iter().any(|o| o.id == t.id));
            assert!(!anytime.iter().any(|a| a.id == t.id));
        }
        for t in &overdue {
            assert!(!anytime.iter().any(|a| a.id == t.id));
        }
        assert_eq!(get_planned(&state).len(), 1);
        assert!(get_planned_recurring(&state).is_empty());
    }

    fn goal_state() -> (AppState, Uuid, Uuid) {
        let (state, a) = add_goal(&AppState::default(), "  Read 10 pages ");
        let (state, b) = add_goal(&state, "Walk");
        (state, a, b)
    }

    #[test]
    fn new_goals_append_to_sort_order() {
        let (state, a, b) = goal_state();
        let ga = state.goals.iter().find(|g| g.id == a).unwrap();
        let gb = state.goals.iter().find(|g| g.id == b).unwrap();
        assert_eq!(ga.title, "Read 10 pages");
        assert_eq!((ga.sort_order, gb.sort_order), (1, 2));
        assert!(ga.active);
    }

    #[test]
    fn sort_order_saturates_at_the_top() {
        let (state, a, _) = goal_state();
        let state = update_goal(&state, a, &GoalPatch { sort_order: Some(i64::MAX), ..GoalPatch::default() });
        let (state, c) = add_goal(&state, "Stretch");
        let gc = state.goals.iter().find(|g| g.id == c).unwrap();
        assert_eq!(gc.sort_order, i64::MAX);
        assert_eq!(state.goals.len(), 3);
    }

    #[test]
    fn ensure_logs_is_idempotent_and_skips_inactive_goals() {
        let today = d("2024-05-10");
        let (state, a, b) = goal_state();
        let state = update_goal(&state, b, &GoalPatch { active: Some(false), ..GoalPatch::default() });

        let once = ensure_today_goal_logs(&state, today);
        let twice = ensure_today_goal_logs(&once, today);
        assert_eq!(once.goal_logs, twice.goal_logs);
        assert_eq!(once.goal_logs.len(), 1);
        assert_eq!(once.goal_logs[0].goal_id, a);
        assert!(!once.goal_logs[0].completed);

        let tomorrow = ensure_today_goal_logs(&twice, d("2024-05-11"));
        assert_eq!(tomorrow.goal_logs.len(), 2);
    }

    #[test]
    fn toggle_flips_existing_log_only() {
        let today = d("2024-05-10");
        let now = ts("2024-05-10T07:30:00+00:00");
        let (state, a, b) = goal_state();

        let untouched = toggle_goal_for_today(&state, today, a, now);
        assert!(untouched.goal_logs.is_empty());

        let state = ensure_today_goal_logs(&state, today);
        let on = toggle_goal_for_today(&state, today, a, now);
        let log = on.goal_logs.iter().find(|l| l.goal_id == a).unwrap();
        assert!(log.completed);
        assert_eq!(log.completed_at, Some(now));

        let progress = goal_progress(&goals_for_today(&on, today));
        assert_eq!(progress, GoalProgress { done: 1, total: 2 });

        let off = toggle_goal_for_today(&on, today, a, now);
        let log = off.goal_logs.iter().find(|l| l.goal_id == a).unwrap();
        assert!(!log.completed);
        assert_eq!(log.completed_at, None);
        assert!(off.goal_logs.iter().filter(|l| l.goal_id == b).all(|l| !l.completed));
    }

    #[test]
    fn deleting_goal_drops_only_its_logs() {
        let (state, a, b) = goal_state();
        let state = ensure_today_goal_logs(&state, d("2024-05-10"));
        let state = ensure_today_goal_logs(&state, d("2024-05-11"));
        assert_eq!(state.goal_logs.len(), 4);

        let after = delete_goal(&state, a);
        assert_eq!(after.goals.len(), 1);
        assert_eq!(after.goal_logs.len(), 2);
        assert!(after.goal_logs.iter().all(|l| l.goal_id == b));
    }

    #[test]
    fn goals_for_today_sorted_by_order() {
        let today = d("2024-05-10");
        let (state, a, b) = goal_state();
        let state = update_goal(&state, a, &GoalPatch { sort_order: Some(9), ..GoalPatch::default() });
        let state = ensure_today_goal_logs(&state, today);
        let view = goals_for_today(&state, today);
        assert_eq!(view[0].goal.id, b);
        assert_eq!(view[1].goal.id, a);
        assert!(view.iter().all(|g| g.log.is_some()));
    }
}
