use axum::{extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::{
    auth::services::AuthUser,
    coach::client::ChatMessage,
    error::ApiError,
    goals::repo::UserGoals,
    profile::repo::UserProfile,
    state::AppState,
};

const SYSTEM_PROMPT: &str = "You are a supportive health coach. The user logs meals and \
workouts in a tracking app. Give short, practical suggestions grounded in their profile \
and goal targets. Do not give medical diagnoses; recommend a professional for anything \
clinical.";

const MAX_HISTORY: usize = 32;
const MAX_MESSAGE_CHARS: usize = 4000;

/// Conversation history comes from the client on every call; the server keeps
/// no chat state between requests.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub messages: Vec<ChatMessage>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub reply: String,
}

pub fn coach_routes() -> Router<AppState> {
    Router::new().route("/coach/chat", post(chat))
}

fn context_message(profile: Option<&UserProfile>, goals: &UserGoals) -> ChatMessage {
    let profile_line = match profile {
        Some(p) => format!(
            "Profile: age {}, weight {} kg, activity level {}.",
            p.age.map_or("unknown".into(), |v| v.to_string()),
            p.weight_kg.map_or("unknown".into(), |v| v.to_string()),
            p.activity_level.map_or("unknown", |a| a.as_str()),
        ),
        None => "Profile: not filled in yet.".to_string(),
    };
    ChatMessage {
        role: "system".into(),
        content: format!(
            "{SYSTEM_PROMPT}\n{profile_line}\nTargets: {} kcal/day, {} min/week, {} steps/day.",
            goals.target_calorie_intake,
            goals.target_weekly_workout_minutes,
            goals.target_daily_steps,
        ),
    }
}

#[instrument(skip(state, payload))]
pub async fn chat(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    if payload.messages.is_empty() {
        return Err(ApiError::Validation("messages must be non-empty".into()));
    }
    if payload.messages.len() > MAX_HISTORY {
        return Err(ApiError::Validation(format!(
            "conversation history is capped at {MAX_HISTORY} messages"
        )));
    }
    for message in &payload.messages {
        if !matches!(message.role.as_str(), "user" | "assistant") {
            return Err(ApiError::Validation("role must be user or assistant".into()));
        }
        if message.content.is_empty() || message.content.len() > MAX_MESSAGE_CHARS {
            return Err(ApiError::Validation(format!(
                "message content must be 1-{MAX_MESSAGE_CHARS} characters"
            )));
        }
    }

    let (profile, goals) = tokio::try_join!(
        UserProfile::find(&state.db, user_id),
        UserGoals::get_or_create(&state.db, user_id),
    )?;

    let mut messages = Vec::with_capacity(payload.messages.len() + 1);
    messages.push(context_message(profile.as_ref(), &goals));
    messages.extend(payload.messages);

    let reply = state
        .coach
        .chat(&messages)
        .await
        .map_err(ApiError::CoachUpstream)?;

    info!(user_id = %user_id, "coach reply sent");
    Ok(Json(ChatResponse { reply }))
}
