use serde::Deserialize;
use time::OffsetDateTime;

/// Request body for logging a meal. Defaults entry_time to "now".
#[derive(Debug, Deserialize)]
pub struct CreateDietEntry {
    pub meal_type: String,
    pub calories: f64,
    #[serde(default)]
    pub protein_g: f64,
    #[serde(default)]
    pub carbs_g: f64,
    #[serde(default)]
    pub fats_g: f64,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub entry_time: Option<OffsetDateTime>,
}

/// Request body for logging a workout.
#[derive(Debug, Deserialize)]
pub struct CreateExerciseEntry {
    pub exercise_type: String,
    pub duration_min: f64,
    #[serde(default)]
    pub calories_burned: f64,
    #[serde(default)]
    pub steps: Option<i64>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub entry_time: Option<OffsetDateTime>,
}
