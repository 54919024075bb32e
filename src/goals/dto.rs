use serde::{Deserialize, Serialize};

use crate::goals::repo::GoalType;

/// Partial goal-targets update; absent fields keep their stored value.
#[derive(Debug, Deserialize)]
pub struct UpdateGoalsRequest {
    pub target_daily_steps: Option<i64>,
    pub target_weekly_workout_minutes: Option<i64>,
    pub target_calorie_intake: Option<i64>,
    pub target_water_intake: Option<f64>,
    pub target_sleep_hours: Option<f64>,
}

/// A catalog goal with its completion state for the current period.
#[derive(Debug, Serialize)]
pub struct CatalogGoal {
    pub goal_key: String,
    pub goal_text: String,
    pub goal_type: GoalType,
    pub period_start: String,
    pub completed: bool,
}

/// Result of a completion toggle.
#[derive(Debug, Serialize)]
pub struct ToggleResponse {
    pub goal_key: String,
    pub period_start: String,
    pub completed: bool,
}
