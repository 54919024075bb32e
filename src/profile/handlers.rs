use axum::{
    extract::State,
    routing::get,
    Json, Router,
};
use tracing::{info, instrument};

use crate::{
    auth::services::AuthUser,
    error::ApiError,
    profile::{dto::UpdateProfileRequest, repo::UserProfile},
    state::AppState,
};

pub fn profile_routes() -> Router<AppState> {
    Router::new().route("/profile", get(get_profile).put(put_profile))
}

#[instrument(skip(state))]
pub async fn get_profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<UserProfile>, ApiError> {
    let profile = UserProfile::find(&state.db, user_id)
        .await?
        .ok_or(ApiError::NotFound("Profile"))?;
    Ok(Json(profile))
}

#[instrument(skip(state, payload))]
pub async fn put_profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<Json<UserProfile>, ApiError> {
    if payload.age.is_some_and(|a| !(1..=130).contains(&a)) {
        return Err(ApiError::Validation("age is out of range".into()));
    }
    if payload.weight_kg.is_some_and(|w| w <= 0.0 || !w.is_finite()) {
        return Err(ApiError::Validation("weight_kg must be positive".into()));
    }
    if payload.height_cm.is_some_and(|h| h <= 0.0 || !h.is_finite()) {
        return Err(ApiError::Validation("height_cm must be positive".into()));
    }

    let profile = UserProfile::upsert(
        &state.db,
        user_id,
        payload.age,
        payload.weight_kg,
        payload.height_cm,
        payload.gender.as_deref(),
        payload.activity_level,
    )
    .await?;

    info!(user_id = %user_id, "profile updated");
    Ok(Json(profile))
}
