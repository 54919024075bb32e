use std::collections::BTreeMap;

use time::{Date, Duration, OffsetDateTime};

use crate::entries::repo::{DietEntry, ExerciseEntry};

/// Per-day diet totals within the trailing window, averaged over the days
/// that have data. day_count = 0 means the window was empty; every average
/// is 0 in that case and downstream scorers special-case it.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DietAggregate {
    pub day_count: u32,
    pub avg_calories: f64,
    pub avg_protein_g: f64,
    pub avg_carbs_g: f64,
    pub avg_fats_g: f64,
}

/// Window totals for exercise. Minutes/calories/steps are summed across the
/// window (targets are weekly); has_step_data records whether any entry in
/// the window carried a step count at all.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ExerciseAggregate {
    pub day_count: u32,
    pub total_minutes: f64,
    pub total_calories: f64,
    pub total_steps: f64,
    pub has_step_data: bool,
}

fn in_window(entry_time: OffsetDateTime, now: OffsetDateTime, window_days: i64) -> bool {
    let start = now - Duration::days(window_days);
    entry_time >= start && entry_time <= now
}

fn sanitize(value: f64) -> f64 {
    if value.is_finite() {
        value.max(0.0)
    } else {
        0.0
    }
}

#[derive(Default)]
struct DietDayTotals {
    calories: f64,
    protein_g: f64,
    carbs_g: f64,
    fats_g: f64,
}

pub fn aggregate_diet(entries: &[DietEntry], window_days: i64, now: OffsetDateTime) -> DietAggregate {
    let mut days: BTreeMap<Date, DietDayTotals> = BTreeMap::new();
    for entry in entries {
        if !in_window(entry.entry_time, now, window_days) {
            continue;
        }
        let day = days.entry(entry.entry_time.date()).or_default();
        day.calories += sanitize(entry.calories);
        day.protein_g += sanitize(entry.protein_g);
        day.carbs_g += sanitize(entry.carbs_g);
        day.fats_g += sanitize(entry.fats_g);
    }

    let day_count = days.len() as u32;
    if day_count == 0 {
        return DietAggregate::default();
    }

    let n = f64::from(day_count);
    let (mut calories, mut protein, mut carbs, mut fats) = (0.0, 0.0, 0.0, 0.0);
    for day in days.values() {
        calories += day.calories;
        protein += day.protein_g;
        carbs += day.carbs_g;
        fats += day.fats_g;
    }

    DietAggregate {
        day_count,
        avg_calories: calories / n,
        avg_protein_g: protein / n,
        avg_carbs_g: carbs / n,
        avg_fats_g: fats / n,
    }
}

pub fn aggregate_exercise(
    entries: &[ExerciseEntry],
    window_days: i64,
    now: OffsetDateTime,
) -> ExerciseAggregate {
    let mut days: BTreeMap<Date, ()> = BTreeMap::new();
    let mut agg = ExerciseAggregate::default();
    for entry in entries {
        if !in_window(entry.entry_time, now, window_days) {
            continue;
        }
        days.insert(entry.entry_time.date(), ());
        agg.total_minutes += sanitize(entry.duration_min);
        agg.total_calories += sanitize(entry.calories_burned);
        if let Some(steps) = entry.steps {
            agg.has_step_data = true;
            agg.total_steps += sanitize(steps as f64);
        }
    }
    agg.day_count = days.len() as u32;
    agg
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;
    use uuid::Uuid;

    const NOW: OffsetDateTime = datetime!(2025-03-14 12:00:00 UTC);

    fn diet(days_ago: i64, calories: f64, protein: f64, carbs: f64, fats: f64) -> DietEntry {
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

    fn exercise(days_ago: i64, minutes: f64, calories: f64, steps: Option<i64>) -> ExerciseEntry {
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
    fn empty_window_yields_zero_aggregate() {
        let agg = aggregate_diet(&[], 7, NOW);
        assert_eq!(agg, DietAggregate::default());
        assert_eq!(agg.day_count, 0);
    }

    #[test]
    fn sums_within_a_day_and_averages_across_days() {
        let entries = vec![
            diet(0, 600.0, 30.0, 60.0, 20.0),
            diet(0, 400.0, 20.0, 40.0, 10.0),
            diet(1, 2000.0, 100.0, 200.0, 70.0),
        ];
        let agg = aggregate_diet(&entries, 7, NOW);
        assert_eq!(agg.day_count, 2);
        assert!((agg.avg_calories - 1500.0).abs() < 1e-9);
        assert!((agg.avg_protein_g - 75.0).abs() < 1e-9);
        assert!((agg.avg_carbs_g - 150.0).abs() < 1e-9);
        assert!((agg.avg_fats_g - 50.0).abs() < 1e-9);
    }

    #[test]
    fn excludes_entries_outside_the_window() {
        let entries = vec![diet(0, 1000.0, 0.0, 0.0, 0.0), diet(8, 9000.0, 0.0, 0.0, 0.0)];
        let agg = aggregate_diet(&entries, 7, NOW);
        assert_eq!(agg.day_count, 1);
        assert!((agg.avg_calories - 1000.0).abs() < 1e-9);
    }

    #[test]
    fn window_bounds_are_inclusive() {
        let boundary = DietEntry {
            entry_time: NOW - Duration::days(7),
            ..diet(0, 500.0, 0.0, 0.0, 0.0)
        };
        let at_now = DietEntry {
            entry_time: NOW,
            ..diet(0, 700.0, 0.0, 0.0, 0.0)
        };
        let agg = aggregate_diet(&[boundary, at_now], 7, NOW);
        assert_eq!(agg.day_count, 2);
    }

    #[test]
    fn negative_and_non_finite_values_count_as_zero() {
        let entries = vec![diet(0, -500.0, f64::NAN, f64::INFINITY, 10.0)];
        let agg = aggregate_diet(&entries, 7, NOW);
        assert_eq!(agg.day_count, 1);
        assert_eq!(agg.avg_calories, 0.0);
        assert_eq!(agg.avg_protein_g, 0.0);
        assert_eq!(agg.avg_carbs_g, 0.0);
        assert!((agg.avg_fats_g - 10.0).abs() < 1e-9);
    }

    #[test]
    fn exercise_totals_are_summed_not_averaged() {
        let entries = vec![
            exercise(0, 30.0, 300.0, Some(4000)),
            exercise(2, 45.0, 450.0, None),
        ];
        let agg = aggregate_exercise(&entries, 7, NOW);
        assert_eq!(agg.day_count, 2);
        assert!((agg.total_minutes - 75.0).abs() < 1e-9);
        assert!((agg.total_calories - 750.0).abs() < 1e-9);
        assert!((agg.total_steps - 4000.0).abs() < 1e-9);
        assert!(agg.has_step_data);
    }

    #[test]
    fn step_data_flag_is_false_when_no_entry_has_steps() {
        let entries = vec![exercise(0, 30.0, 300.0, None), exercise(1, 20.0, 200.0, None)];
        let agg = aggregate_exercise(&entries, 7, NOW);
        assert!(!agg.has_step_data);
        assert_eq!(agg.total_steps, 0.0);
    }
}
