use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get},
    Json, Router,
};
use time::OffsetDateTime;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    auth::services::AuthUser,
    entries::{
        dto::{CreateDietEntry, CreateExerciseEntry},
        repo::{DietEntry, ExerciseEntry},
    },
    error::ApiError,
    state::AppState,
};

pub fn diet_routes() -> Router<AppState> {
    Router::new()
        .route("/entries/diet", get(list_diet).post(create_diet))
        .route("/entries/diet/:id", delete(delete_diet))
}

pub fn exercise_routes() -> Router<AppState> {
    Router::new()
        .route("/entries/exercise", get(list_exercise).post(create_exercise))
        .route("/entries/exercise/:id", delete(delete_exercise))
}

fn require_non_negative(value: f64, field: &str) -> Result<(), ApiError> {
    if value < 0.0 || !value.is_finite() {
        return Err(ApiError::Validation(format!("{field} must be non-negative")));
    }
    Ok(())
}

#[instrument(skip(state))]
pub async fn list_diet(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Vec<DietEntry>>, ApiError> {
    let entries = DietEntry::list_by_user(&state.db, user_id).await?;
    Ok(Json(entries))
}

#[instrument(skip(state, payload))]
pub async fn create_diet(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<CreateDietEntry>,
) -> Result<(StatusCode, Json<DietEntry>), ApiError> {
    if payload.meal_type.trim().is_empty() {
        return Err(ApiError::Validation("meal_type is required".into()));
    }
    require_non_negative(payload.calories, "calories")?;
    require_non_negative(payload.protein_g, "protein_g")?;
    require_non_negative(payload.carbs_g, "carbs_g")?;
    require_non_negative(payload.fats_g, "fats_g")?;

    let entry_time = payload.entry_time.unwrap_or_else(OffsetDateTime::now_utc);
    let entry = DietEntry::create(
        &state.db,
        user_id,
        payload.meal_type.trim(),
        payload.calories,
        payload.protein_g,
        payload.carbs_g,
        payload.fats_g,
        entry_time,
    )
    .await?;

    info!(user_id = %user_id, entry_id = %entry.id, "diet entry logged");
    Ok((StatusCode::CREATED, Json(entry)))
}

#[instrument(skip(state))]
pub async fn delete_diet(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    if !DietEntry::delete_by_user(&state.db, user_id, id).await? {
        return Err(ApiError::NotFound("Entry"));
    }
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state))]
pub async fn list_exercise(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Vec<ExerciseEntry>>, ApiError> {
    let entries = ExerciseEntry::list_by_user(&state.db, user_id).await?;
    Ok(Json(entries))
}

#[instrument(skip(state, payload))]
pub async fn create_exercise(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<CreateExerciseEntry>,
) -> Result<(StatusCode, Json<ExerciseEntry>), ApiError> {
    if payload.exercise_type.trim().is_empty() {
        return Err(ApiError::Validation("exercise_type is required".into()));
    }
    require_non_negative(payload.duration_min, "duration_min")?;
    require_non_negative(payload.calories_burned, "calories_burned")?;
    if payload.steps.is_some_and(|s| s < 0) {
        return Err(ApiError::Validation("steps must be non-negative".into()));
    }

    let entry_time = payload.entry_time.unwrap_or_else(OffsetDateTime::now_utc);
    let entry = ExerciseEntry::create(
        &state.db,
        user_id,
        payload.exercise_type.trim(),
        payload.duration_min,
        payload.calories_burned,
        payload.steps,
        entry_time,
    )
    .await?;

    info!(user_id = %user_id, entry_id = %entry.id, "exercise entry logged");
    Ok((StatusCode::CREATED, Json(entry)))
}

#[instrument(skip(state))]
pub async fn delete_exercise(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    if !ExerciseEntry::delete_by_user(&state.db, user_id, id).await? {
        return Err(ApiError::NotFound("Entry"));
    }
    Ok(StatusCode::NO_CONTENT)
}
