//! Weighted composition of component scores into diet, exercise, and total
//! scores. This is the single place the blend lives; handlers only fetch
//! inputs and serialize the result.

use serde::Serialize;
use time::OffsetDateTime;

use crate::entries::repo::{DietEntry, ExerciseEntry};
use crate::profile::repo::UserProfile;
use crate::scoring::aggregate::{aggregate_diet, aggregate_exercise};
use crate::scoring::components::{
    calorie_score, consistency_score, macro_score, macro_share_pct, target_ratio_score,
    ComponentScore, CARBS_BAND, CARBS_KCAL_PER_G, FATS_BAND, FATS_KCAL_PER_G, PROTEIN_BAND,
    PROTEIN_KCAL_PER_G,
};
use crate::scoring::targets::resolve_targets;
use crate::scoring::{ScoreError, WINDOW_DAYS};

pub const CALORIES_WEIGHT: f64 = 0.30;
pub const PROTEIN_WEIGHT: f64 = 0.25;
pub const CARBS_WEIGHT: f64 = 0.20;
pub const FATS_WEIGHT: f64 = 0.15;
pub const CONSISTENCY_WEIGHT: f64 = 0.10;

pub const MINUTES_WEIGHT: f64 = 0.50;
pub const EXERCISE_CALORIES_WEIGHT: f64 = 0.40;
pub const STEPS_WEIGHT: f64 = 0.10;

pub const MAX_GOAL_BONUS: f64 = 15.0;

#[derive(Debug, Clone, Serialize)]
pub struct DietBreakdown {
    pub calories: ComponentScore,
    pub protein: ComponentScore,
    pub carbs: ComponentScore,
    pub fats: ComponentScore,
    pub consistency: ComponentScore,
}

#[derive(Debug, Clone, Serialize)]
pub struct DietScore {
    pub score: u8,
    pub breakdown: DietBreakdown,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExerciseBreakdown {
    pub minutes: ComponentScore,
    pub calories: ComponentScore,
    pub steps: ComponentScore,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExerciseScore {
    pub score: u8,
    pub breakdown: ExerciseBreakdown,
}

/// Goal-completion inputs for the bonus. Catalog counts come from the live
/// catalog so the denominator tracks catalog size instead of a hardcoded
/// "3 daily + 4 weekly".
#[derive(Debug, Clone, Copy, Default)]
pub struct GoalStatus {
    pub completed_daily: i64,
    pub completed_weekly: i64,
    pub catalog_daily: i64,
    pub catalog_weekly: i64,
}

#[derive(Debug, Serialize)]
pub struct TotalScore {
    /// Blended score plus goal bonus; intentionally not clamped at 100
    /// (ceiling 115 with a full bonus).
    pub score: u16,
    pub diet: Option<DietScore>,
    pub exercise: Option<ExerciseScore>,
    pub goal_bonus: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

fn profile_ready(profile: Option<&UserProfile>) -> Result<&UserProfile, ScoreError> {
    let profile = profile.ok_or(ScoreError::MissingProfileData)?;
    if profile.weight_kg.is_none() || profile.activity_level.is_none() {
        return Err(ScoreError::MissingProfileData);
    }
    Ok(profile)
}

pub fn compute_diet_score(
    entries: &[DietEntry],
    profile: Option<&UserProfile>,
    now: OffsetDateTime,
) -> Result<DietScore, ScoreError> {
    profile_ready(profile)?;

    let agg = aggregate_diet(entries, WINDOW_DAYS, now);
    if agg.day_count == 0 {
        return Err(ScoreError::NoRecentData);
    }

    let breakdown = DietBreakdown {
        calories: calorie_score(agg.avg_calories),
        protein: macro_score(
            macro_share_pct(agg.avg_protein_g, PROTEIN_KCAL_PER_G, agg.avg_calories),
            PROTEIN_BAND,
            "Protein",
        ),
        carbs: macro_score(
            macro_share_pct(agg.avg_carbs_g, CARBS_KCAL_PER_G, agg.avg_calories),
            CARBS_BAND,
            "Carbs",
        ),
        fats: macro_score(
            macro_share_pct(agg.avg_fats_g, FATS_KCAL_PER_G, agg.avg_calories),
            FATS_BAND,
            "Fats",
        ),
        consistency: consistency_score(agg.day_count),
    };

    let score = (f64::from(breakdown.calories.score) * CALORIES_WEIGHT
        + f64::from(breakdown.protein.score) * PROTEIN_WEIGHT
        + f64::from(breakdown.carbs.score) * CARBS_WEIGHT
        + f64::from(breakdown.fats.score) * FATS_WEIGHT
        + f64::from(breakdown.consistency.score) * CONSISTENCY_WEIGHT)
        .round()
        .clamp(0.0, 100.0) as u8;

    Ok(DietScore { score, breakdown })
}

/// Effective (minutes, calories, steps) weights. Without step data in the
/// window the steps weight is redistributed proportionally onto minutes and
/// calories and the steps contribution drops out.
pub fn exercise_weights(has_step_data: bool) -> (f64, f64, f64) {
    if has_step_data {
        (MINUTES_WEIGHT, EXERCISE_CALORIES_WEIGHT, STEPS_WEIGHT)
    } else {
        let base = MINUTES_WEIGHT + EXERCISE_CALORIES_WEIGHT;
        (
            MINUTES_WEIGHT + STEPS_WEIGHT * (MINUTES_WEIGHT / base),
            EXERCISE_CALORIES_WEIGHT + STEPS_WEIGHT * (EXERCISE_CALORIES_WEIGHT / base),
            0.0,
        )
    }
}

pub fn compute_exercise_score(
    entries: &[ExerciseEntry],
    profile: Option<&UserProfile>,
    now: OffsetDateTime,
) -> Result<ExerciseScore, ScoreError> {
    let profile = profile_ready(profile)?;

    let agg = aggregate_exercise(entries, WINDOW_DAYS, now);
    if agg.day_count == 0 {
        return Err(ScoreError::NoRecentData);
    }

    let targets = resolve_targets(profile.activity_level);
    let breakdown = ExerciseBreakdown {
        minutes: target_ratio_score(
            agg.total_minutes,
            targets.minutes_per_week,
            "minutes",
            "No minutes logged this week",
        ),
        calories: target_ratio_score(
            agg.total_calories,
            targets.weekly_calories(),
            "calories",
            "No calories burned logged this week",
        ),
        steps: if agg.has_step_data {
            target_ratio_score(
                agg.total_steps,
                targets.weekly_steps(),
                "steps",
                "No steps logged this week",
            )
        } else {
            ComponentScore {
                score: 0,
                message: "No step data this week; weight shifted to minutes and calories".into(),
            }
        },
    };

    let (w_minutes, w_calories, w_steps) = exercise_weights(agg.has_step_data);
    let score = (f64::from(breakdown.minutes.score) * w_minutes
        + f64::from(breakdown.calories.score) * w_calories
        + f64::from(breakdown.steps.score) * w_steps)
        .round()
        .clamp(0.0, 100.0) as u8;

    Ok(ExerciseScore { score, breakdown })
}

/// Bonus points for completed catalog goals, scaled against the number of
/// completion slots in the window (7 per daily goal, 1 per weekly goal).
pub fn goal_bonus(status: GoalStatus) -> u8 {
    let slots = status.catalog_daily * 7 + status.catalog_weekly;
    if slots <= 0 {
        return 0;
    }
    let completed = (status.completed_daily + status.completed_weekly).max(0);
    let raw = completed as f64 / slots as f64 * MAX_GOAL_BONUS;
    raw.round().clamp(0.0, MAX_GOAL_BONUS) as u8
}

pub fn compute_total_score(
    diet_entries: &[DietEntry],
    exercise_entries: &[ExerciseEntry],
    profile: Option<&UserProfile>,
    goals: GoalStatus,
    now: OffsetDateTime,
) -> TotalScore {
    let diet = compute_diet_score(diet_entries, profile, now);
    let exercise = compute_exercise_score(exercise_entries, profile, now);
    let bonus = goal_bonus(goals);

    // Surface the first error and let the failed sub-score contribute 0.
    let error = match (&diet, &exercise) {
        (Err(e), _) => Some(e.to_string()),
        (_, Err(e)) => Some(e.to_string()),
        _ => None,
    };

    let diet_points = diet.as_ref().map_or(0.0, |d| f64::from(d.score));
    let exercise_points = exercise.as_ref().map_or(0.0, |e| f64::from(e.score));
    let score = (diet_points * 0.5 + exercise_points * 0.5 + f64::from(bonus)).round() as u16;

    TotalScore {
        score,
        diet: diet.ok(),
        exercise: exercise.ok(),
        goal_bonus: bonus,
        error,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::repo::ActivityLevel;
    use time::macros::datetime;
    use time::Duration;
    use uuid::Uuid;

    const NOW: OffsetDateTime = datetime!(2025-03-14 12:00:00 UTC);
    const EPS: f64 = 1e-9;

    fn profile() -> UserProfile {
        UserProfile {
            user_id: Uuid::new_v4(),
            age: Some(30),
            weight_kg: Some(75.0),
            height_cm: Some(178.0),
            gender: Some("female".into()),
            activity_level: Some(ActivityLevel::Moderate),
        }
    }

    fn diet_entry(days_ago: i64, calories: f64, protein: f64, carbs: f64, fats: f64) -> DietEntry {
        DietEntry {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            meal_type: "lunch".into(),
            calories,
            protein_g: protein,
            carbs_g: carbs,
            fats_g: fats,
            entry_time: NOW - Duration::days(days_ago),
        }
    }

    fn exercise_entry(days_ago: i64, minutes: f64, calories: f64, steps: Option<i64>) -> ExerciseEntry {
        ExerciseEntry {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            exercise_type: "run".into(),
            duration_min: minutes,
            calories_burned: calories,
            steps,
            entry_time: NOW - Duration::days(days_ago),
        }
    }

    #[test]
    fn diet_weights_sum_to_one() {
        let sum = CALORIES_WEIGHT + PROTEIN_WEIGHT + CARBS_WEIGHT + FATS_WEIGHT + CONSISTENCY_WEIGHT;
        assert!((sum - 1.0).abs() < EPS);
    }

    #[test]
    fn exercise_weights_sum_to_one_either_way() {
        let (m, c, s) = exercise_weights(true);
        assert!((m + c + s - 1.0).abs() < EPS);
        let (m, c, s) = exercise_weights(false);
        assert!((m + c + s - 1.0).abs() < EPS);
    }

    #[test]
    fn missing_step_data_redistributes_proportionally() {
        let (m, c, s) = exercise_weights(false);
        assert!((m - 0.50 - 0.10 * (0.50 / 0.90)).abs() < EPS);
        assert!((c - 0.40 - 0.10 * (0.40 / 0.90)).abs() < EPS);
        assert_eq!(s, 0.0);
        // ~0.556 / ~0.444 split.
        assert!((m - 0.5556).abs() < 1e-3);
        assert!((c - 0.4444).abs() < 1e-3);
    }

    #[test]
    fn diet_score_requires_profile() {
        let entries = vec![diet_entry(0, 2150.0, 100.0, 250.0, 70.0)];
        let err = compute_diet_score(&entries, None, NOW).unwrap_err();
        assert_eq!(err, ScoreError::MissingProfileData);

        let mut bare = profile();
        bare.weight_kg = None;
        let err = compute_diet_score(&entries, Some(&bare), NOW).unwrap_err();
        assert_eq!(err, ScoreError::MissingProfileData);
    }

    #[test]
    fn diet_score_requires_recent_entries() {
        let p = profile();
        let err = compute_diet_score(&[], Some(&p), NOW).unwrap_err();
        assert_eq!(err, ScoreError::NoRecentData);

        let stale = vec![diet_entry(30, 2000.0, 100.0, 250.0, 70.0)];
        let err = compute_diet_score(&stale, Some(&p), NOW).unwrap_err();
        assert_eq!(err, ScoreError::NoRecentData);
    }

    #[test]
    fn diet_score_blends_components() {
        // One day at the calorie midpoint with a textbook macro split:
        // protein 20%, carbs 55%, fats 30% of 2150 kcal.
        let entries = vec![diet_entry(
            0,
            2150.0,
            2150.0 * 0.20 / 4.0,
            2150.0 * 0.55 / 4.0,
            2150.0 * 0.30 / 9.0,
        )];
        let p = profile();
        let result = compute_diet_score(&entries, Some(&p), NOW).expect("scores");
        assert_eq!(result.breakdown.calories.score, 100);
        assert_eq!(result.breakdown.protein.score, 100);
        assert_eq!(result.breakdown.carbs.score, 100);
        assert_eq!(result.breakdown.fats.score, 100);
        // Only one logged day drags consistency to 0.
        assert_eq!(result.breakdown.consistency.score, 0);
        assert_eq!(result.score, 90);
    }

    #[test]
    fn exercise_score_with_steps() {
        // Moderate targets: 150 min, 900 kcal, 52500 steps per week.
        let entries = vec![
            exercise_entry(0, 75.0, 450.0, Some(26250)),
            exercise_entry(1, 75.0, 450.0, Some(26250)),
        ];
        let p = profile();
        let result = compute_exercise_score(&entries, Some(&p), NOW).expect("scores");
        assert_eq!(result.breakdown.minutes.score, 100);
        assert_eq!(result.breakdown.calories.score, 100);
        assert_eq!(result.breakdown.steps.score, 100);
        assert_eq!(result.score, 100);
    }

    #[test]
    fn exercise_score_without_steps_redistributes() {
        let entries = vec![exercise_entry(0, 150.0, 0.0, None)];
        let p = profile();
        let result = compute_exercise_score(&entries, Some(&p), NOW).expect("scores");
        assert_eq!(result.breakdown.minutes.score, 100);
        assert_eq!(result.breakdown.calories.score, 0);
        assert_eq!(result.breakdown.steps.score, 0);
        // 100 * 0.5556 rounds to 56.
        assert_eq!(result.score, 56);
    }

    #[test]
    fn zero_minutes_scores_zero_with_message() {
        let entries = vec![exercise_entry(0, 0.0, 100.0, None)];
        let p = profile();
        let result = compute_exercise_score(&entries, Some(&p), NOW).expect("scores");
        assert_eq!(result.breakdown.minutes.score, 0);
        assert!(result.breakdown.minutes.message.contains("No minutes logged"));
    }

    #[test]
    fn goal_bonus_examples() {
        // 7 completed of 3*7 + 4 = 25 slots rounds to 4.
        let status = GoalStatus {
            completed_daily: 5,
            completed_weekly: 2,
            catalog_daily: 3,
            catalog_weekly: 4,
        };
        assert_eq!(goal_bonus(status), 4);

        // Full completion earns the whole bonus.
        let full = GoalStatus {
            completed_daily: 21,
            completed_weekly: 4,
            catalog_daily: 3,
            catalog_weekly: 4,
        };
        assert_eq!(goal_bonus(full), 15);

        // An empty catalog yields no bonus instead of dividing by zero.
        assert_eq!(goal_bonus(GoalStatus::default()), 0);
    }

    #[test]
    fn total_score_can_exceed_100() {
        // Seven perfect days: midpoint calories, protein 20%, carbs 55%, fats 30%.
        let diet: Vec<_> = (0..7)
            .map(|d| diet_entry(d, 2150.0, 107.5, 295.6, 71.7))
            .collect();
        let exercise = vec![exercise_entry(0, 150.0, 900.0, Some(52500))];
        let p = profile();
        let full_goals = GoalStatus {
            completed_daily: 21,
            completed_weekly: 4,
            catalog_daily: 3,
            catalog_weekly: 4,
        };
        let total = compute_total_score(&diet, &exercise, Some(&p), full_goals, NOW);
        assert!(total.error.is_none());
        assert_eq!(total.goal_bonus, 15);
        assert_eq!(total.score, 115);
    }

    #[test]
    fn total_score_surfaces_first_error_and_degrades() {
        let exercise = vec![exercise_entry(0, 150.0, 900.0, Some(52500))];
        let p = profile();
        let total = compute_total_score(&[], &exercise, Some(&p), GoalStatus::default(), NOW);
        assert_eq!(total.error.as_deref(), Some("No entries logged in the last 7 days"));
        assert!(total.diet.is_none());
        // Exercise half still counts: 100 * 0.5 = 50.
        assert_eq!(total.score, 50);
    }

    #[test]
    fn total_score_without_profile_is_zero_with_error() {
        let total = compute_total_score(&[], &[], None, GoalStatus::default(), NOW);
        assert_eq!(total.score, 0);
        assert_eq!(
            total.error.as_deref(),
            Some("Profile is missing weight or activity level")
        );
    }
}
