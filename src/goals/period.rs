use time::{Date, Duration};

use crate::goals::repo::GoalType;

/// Canonical start date of the completion period a goal belongs to.
///
/// Daily goals bucket on the calendar date; weekly goals bucket on the ISO week
/// start (Monday). Always computed server-side from "today" so clients cannot
/// back-date completions.
pub fn period_start(goal_type: GoalType, today: Date) -> Date {
    match goal_type {
        GoalType::Daily => today,
        GoalType::Weekly => today - Duration::days(i64::from(today.weekday().number_days_from_monday())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn daily_period_is_the_date_itself() {
        assert_eq!(period_start(GoalType::Daily, date!(2025 - 03 - 14)), date!(2025 - 03 - 14));
    }

    #[test]
    fn weekly_period_is_the_iso_monday() {
        // 2025-03-14 is a Friday; the ISO week starts Monday 2025-03-10.
        assert_eq!(period_start(GoalType::Weekly, date!(2025 - 03 - 14)), date!(2025 - 03 - 10));
        // A Monday maps to itself.
        assert_eq!(period_start(GoalType::Weekly, date!(2025 - 03 - 10)), date!(2025 - 03 - 10));
        // A Sunday maps back to the preceding Monday.
        assert_eq!(period_start(GoalType::Weekly, date!(2025 - 03 - 16)), date!(2025 - 03 - 10));
    }

    #[test]
    fn weekly_period_handles_month_boundary() {
        // 2025-04-02 is a Wednesday; its week starts Monday 2025-03-31.
        assert_eq!(period_start(GoalType::Weekly, date!(2025 - 04 - 02)), date!(2025 - 03 - 31));
    }
}
