use crate::profile::repo::ActivityLevel;

/// Weekly exercise targets derived from the profile's activity level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActivityTargets {
    pub minutes_per_week: f64,
    pub steps_per_day: f64,
    pub calories_per_minute: f64,
}

impl ActivityTargets {
    pub fn weekly_calories(&self) -> f64 {
        self.minutes_per_week * self.calories_per_minute
    }

    pub fn weekly_steps(&self) -> f64 {
        self.steps_per_day * 7.0
    }
}

const SEDENTARY: ActivityTargets = ActivityTargets {
    minutes_per_week: 90.0,
    steps_per_day: 5000.0,
    calories_per_minute: 5.0,
};
const MODERATE: ActivityTargets = ActivityTargets {
    minutes_per_week: 150.0,
    steps_per_day: 7500.0,
    calories_per_minute: 6.0,
};
const INTERMEDIATE: ActivityTargets = ActivityTargets {
    minutes_per_week: 200.0,
    steps_per_day: 8500.0,
    calories_per_minute: 7.0,
};
const CHALLENGING: ActivityTargets = ActivityTargets {
    minutes_per_week: 250.0,
    steps_per_day: 10000.0,
    calories_per_minute: 8.0,
};
const ADVANCED: ActivityTargets = ActivityTargets {
    minutes_per_week: 300.0,
    steps_per_day: 12000.0,
    calories_per_minute: 9.0,
};

/// Fixed lookup; absent or unrecognized levels fall back to Moderate.
pub fn resolve_targets(level: Option<ActivityLevel>) -> ActivityTargets {
    match level {
        Some(ActivityLevel::Sedentary) => SEDENTARY,
        Some(ActivityLevel::Moderate) | None => MODERATE,
        Some(ActivityLevel::Intermediate) => INTERMEDIATE,
        Some(ActivityLevel::Challenging) => CHALLENGING,
        Some(ActivityLevel::Advanced) => ADVANCED,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_level_falls_back_to_moderate() {
        assert_eq!(resolve_targets(None), MODERATE);
    }

    #[test]
    fn derived_weekly_targets() {
        let t = resolve_targets(Some(ActivityLevel::Moderate));
        assert!((t.weekly_calories() - 900.0).abs() < 1e-9);
        assert!((t.weekly_steps() - 52500.0).abs() < 1e-9);
    }

    #[test]
    fn targets_scale_with_activity_level() {
        let sedentary = resolve_targets(Some(ActivityLevel::Sedentary));
        let advanced = resolve_targets(Some(ActivityLevel::Advanced));
        assert!(sedentary.minutes_per_week < advanced.minutes_per_week);
        assert!(sedentary.steps_per_day < advanced.steps_per_day);
        assert!(sedentary.calories_per_minute < advanced.calories_per_minute);
    }
}
