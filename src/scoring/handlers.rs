use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use time::{Duration, OffsetDateTime};
use tracing::instrument;

use crate::{
    auth::services::AuthUser,
    entries::repo::{DietEntry, ExerciseEntry},
    error::ApiError,
    goals::period::period_start,
    goals::repo::{GoalCompletion, GoalType, SystemGoal},
    profile::repo::UserProfile,
    scoring::compose::{
        compute_diet_score, compute_exercise_score, compute_total_score, DietBreakdown,
        ExerciseBreakdown, GoalStatus, TotalScore,
    },
    scoring::ScoreError,
    state::AppState,
};

pub fn score_routes() -> Router<AppState> {
    Router::new()
        .route("/score", get(total_score))
        .route("/score/diet", get(diet_score))
        .route("/score/exercise", get(exercise_score))
}

/// Sub-score envelope: a failed computation is still a 200 with score 0 and
/// an error message, so the client can render a partial dashboard.
#[derive(Debug, Serialize)]
pub struct SubScoreResponse<B> {
    pub score: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub breakdown: Option<B>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<B> SubScoreResponse<B> {
    fn from_result(score: u8, breakdown: Option<B>, error: Option<ScoreError>) -> Self {
        Self {
            score,
            breakdown,
            error: error.map(|e| e.to_string()),
        }
    }
}

#[instrument(skip(state))]
pub async fn diet_score(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<SubScoreResponse<DietBreakdown>>, ApiError> {
    let (entries, profile) = tokio::try_join!(
        DietEntry::list_by_user(&state.db, user_id),
        UserProfile::find(&state.db, user_id),
    )?;

    let response = match compute_diet_score(&entries, profile.as_ref(), OffsetDateTime::now_utc()) {
        Ok(result) => SubScoreResponse::from_result(result.score, Some(result.breakdown), None),
        Err(e) => SubScoreResponse::from_result(0, None, Some(e)),
    };
    Ok(Json(response))
}

#[instrument(skip(state))]
pub async fn exercise_score(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<SubScoreResponse<ExerciseBreakdown>>, ApiError> {
    let (entries, profile) = tokio::try_join!(
        ExerciseEntry::list_by_user(&state.db, user_id),
        UserProfile::find(&state.db, user_id),
    )?;

    let response =
        match compute_exercise_score(&entries, profile.as_ref(), OffsetDateTime::now_utc()) {
            Ok(result) => SubScoreResponse::from_result(result.score, Some(result.breakdown), None),
            Err(e) => SubScoreResponse::from_result(0, None, Some(e)),
        };
    Ok(Json(response))
}

#[instrument(skip(state))]
pub async fn total_score(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<TotalScore>, ApiError> {
    let now = OffsetDateTime::now_utc();
    let today = now.date();
    let daily_since = today - Duration::days(6);
    let week_start = period_start(GoalType::Weekly, today);

    let (diet_entries, exercise_entries, profile, catalog_counts, completed_counts) = tokio::try_join!(
        DietEntry::list_by_user(&state.db, user_id),
        ExerciseEntry::list_by_user(&state.db, user_id),
        UserProfile::find(&state.db, user_id),
        SystemGoal::counts(&state.db),
        GoalCompletion::counts_for_bonus(&state.db, user_id, daily_since, week_start),
    )?;

    let goals = GoalStatus {
        completed_daily: completed_counts.0,
        completed_weekly: completed_counts.1,
        catalog_daily: catalog_counts.0,
        catalog_weekly: catalog_counts.1,
    };

    let total = compute_total_score(&diet_entries, &exercise_entries, profile.as_ref(), goals, now);
    Ok(Json(total))
}
