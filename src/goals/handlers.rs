use std::collections::HashSet;

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use time::OffsetDateTime;
use tracing::{info, instrument};

use crate::{
    auth::services::AuthUser,
    error::ApiError,
    goals::{
        dto::{CatalogGoal, ToggleResponse, UpdateGoalsRequest},
        period::period_start,
        repo::{GoalCompletion, SystemGoal, UserGoals},
    },
    state::AppState,
};

pub fn goal_routes() -> Router<AppState> {
    Router::new().route("/goals", get(get_goals).put(put_goals))
}

pub fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/goals/catalog", get(list_catalog))
        .route("/goals/catalog/:goal_key/toggle", post(toggle_goal))
}

#[instrument(skip(state))]
pub async fn get_goals(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<UserGoals>, ApiError> {
    let goals = UserGoals::get_or_create(&state.db, user_id).await?;
    Ok(Json(goals))
}

#[instrument(skip(state, payload))]
pub async fn put_goals(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<UpdateGoalsRequest>,
) -> Result<Json<UserGoals>, ApiError> {
    for (value, field) in [
        (payload.target_daily_steps, "target_daily_steps"),
        (
            payload.target_weekly_workout_minutes,
            "target_weekly_workout_minutes",
        ),
        (payload.target_calorie_intake, "target_calorie_intake"),
    ] {
        if value.is_some_and(|v| v < 0) {
            return Err(ApiError::Validation(format!("{field} must be non-negative")));
        }
    }
    if payload.target_water_intake.is_some_and(|v| v < 0.0 || !v.is_finite()) {
        return Err(ApiError::Validation("target_water_intake must be non-negative".into()));
    }
    if payload.target_sleep_hours.is_some_and(|v| !(0.0..=24.0).contains(&v)) {
        return Err(ApiError::Validation("target_sleep_hours must be within 0-24".into()));
    }

    let goals = UserGoals::update(
        &state.db,
        user_id,
        payload.target_daily_steps,
        payload.target_weekly_workout_minutes,
        payload.target_calorie_intake,
        payload.target_water_intake,
        payload.target_sleep_hours,
    )
    .await?;

    info!(user_id = %user_id, "goal targets updated");
    Ok(Json(goals))
}

#[instrument(skip(state))]
pub async fn list_catalog(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Vec<CatalogGoal>>, ApiError> {
    let today = OffsetDateTime::now_utc().date();
    let catalog = SystemGoal::list(&state.db).await?;

    let mut periods: Vec<_> = catalog
        .iter()
        .map(|g| period_start(g.goal_type, today))
        .collect();
    periods.sort_unstable();
    periods.dedup();

    let completed: HashSet<_> = GoalCompletion::completed_keys(&state.db, user_id, &periods)
        .await?
        .into_iter()
        .collect();

    let items = catalog
        .into_iter()
        .map(|g| {
            let period = period_start(g.goal_type, today);
            let done = completed.contains(&(g.goal_key.clone(), period));
            CatalogGoal {
                goal_key: g.goal_key,
                goal_text: g.goal_text,
                goal_type: g.goal_type,
                period_start: period.to_string(),
                completed: done,
            }
        })
        .collect();

    Ok(Json(items))
}

#[instrument(skip(state))]
pub async fn toggle_goal(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(goal_key): Path<String>,
) -> Result<Json<ToggleResponse>, ApiError> {
    let goal = SystemGoal::find(&state.db, &goal_key)
        .await?
        .ok_or_else(|| ApiError::UnknownGoalKey(goal_key.clone()))?;

    let today = OffsetDateTime::now_utc().date();
    let period = period_start(goal.goal_type, today);
    let completed = GoalCompletion::toggle(&state.db, user_id, &goal.goal_key, period).await?;

    info!(user_id = %user_id, goal_key = %goal.goal_key, %completed, "goal completion toggled");
    Ok(Json(ToggleResponse {
        goal_key: goal.goal_key,
        period_start: period.to_string(),
        completed,
    }))
}
