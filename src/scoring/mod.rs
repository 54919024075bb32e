use crate::state::AppState;
use axum::Router;
use thiserror::Error;

pub mod aggregate;
pub mod components;
pub mod compose;
pub mod handlers;
pub mod targets;

pub use compose::{compute_diet_score, compute_exercise_score, compute_total_score};

/// Trailing lookback window for all score computations, in days.
pub const WINDOW_DAYS: i64 = 7;

/// Hard failures a sub-score can surface. Component scorers never produce
/// these — they degrade to a zero score with a message. The composer returns
/// the first one it hits as an explicit field so callers can render partial UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ScoreError {
    #[error("Profile is missing weight or activity level")]
    MissingProfileData,
    #[error("No entries logged in the last 7 days")]
    NoRecentData,
}

pub fn router() -> Router<AppState> {
    handlers::score_routes()
}
