use serde::Deserialize;

use crate::profile::repo::ActivityLevel;

/// Partial profile update; absent fields keep their stored value.
#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub age: Option<i32>,
    pub weight_kg: Option<f64>,
    pub height_cm: Option<f64>,
    pub gender: Option<String>,
    pub activity_level: Option<ActivityLevel>,
}
