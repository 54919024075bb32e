use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::Date;
use uuid::Uuid;

/// Cadence of a system goal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum GoalType {
    Daily,
    Weekly,
}

impl GoalType {
    pub fn as_str(&self) -> &'static str {
        match self {
            GoalType::Daily => "daily",
            GoalType::Weekly => "weekly",
        }
    }

    pub fn from_label(label: &str) -> Option<GoalType> {
        match label {
            "daily" => Some(GoalType::Daily),
            "weekly" => Some(GoalType::Weekly),
            _ => None,
        }
    }
}

/// Catalog entry; static reference data seeded by migration.
#[derive(Debug, Clone)]
pub struct SystemGoal {
    pub goal_key: String,
    pub goal_text: String,
    pub goal_type: GoalType,
}

#[derive(Debug, FromRow)]
struct SystemGoalRow {
    goal_key: String,
    goal_text: String,
    goal_type: String,
}

impl From<SystemGoalRow> for SystemGoal {
    fn from(r: SystemGoalRow) -> Self {
        Self {
            goal_key: r.goal_key,
            goal_text: r.goal_text,
            // Seed data only ever writes daily/weekly; treat anything else as daily.
            goal_type: GoalType::from_label(&r.goal_type).unwrap_or(GoalType::Daily),
        }
    }
}

impl SystemGoal {
    pub async fn list(db: &PgPool) -> anyhow::Result<Vec<SystemGoal>> {
        let rows = sqlx::query_as::<_, SystemGoalRow>(
            r#"
            SELECT goal_key, goal_text, goal_type
            FROM system_goals
            ORDER BY goal_type, goal_key
            "#,
        )
        .fetch_all(db)
        .await?;
        Ok(rows.into_iter().map(SystemGoal::from).collect())
    }

    pub async fn find(db: &PgPool, goal_key: &str) -> anyhow::Result<Option<SystemGoal>> {
        let row = sqlx::query_as::<_, SystemGoalRow>(
            r#"
            SELECT goal_key, goal_text, goal_type
            FROM system_goals
            WHERE goal_key = $1
            "#,
        )
        .bind(goal_key)
        .fetch_optional(db)
        .await?;
        Ok(row.map(SystemGoal::from))
    }

    /// Catalog size per cadence, used for the goal-bonus denominator.
    pub async fn counts(db: &PgPool) -> anyhow::Result<(i64, i64)> {
        let rows = sqlx::query_as::<_, (String, i64)>(
            r#"
            SELECT goal_type, COUNT(*)
            FROM system_goals
            GROUP BY goal_type
            "#,
        )
        .fetch_all(db)
        .await?;
        let mut daily = 0;
        let mut weekly = 0;
        for (goal_type, count) in rows {
            match goal_type.as_str() {
                "daily" => daily = count,
                "weekly" => weekly = count,
                _ => {}
            }
        }
        Ok((daily, weekly))
    }
}

/// Per-user goal targets. One row per user, created with defaults on first read.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserGoals {
    pub user_id: Uuid,
    pub target_daily_steps: i64,
    pub target_weekly_workout_minutes: i64,
    pub target_calorie_intake: i64,
    pub target_water_intake: f64,
    pub target_sleep_hours: f64,
}

impl UserGoals {
    /// Fetch the user's targets, inserting the default row on first read.
    pub async fn get_or_create(db: &PgPool, user_id: Uuid) -> anyhow::Result<UserGoals> {
        let row = sqlx::query_as::<_, UserGoals>(
            r#"
            INSERT INTO user_goals (user_id)
            VALUES ($1)
            ON CONFLICT (user_id) DO UPDATE SET user_id = EXCLUDED.user_id
            RETURNING user_id, target_daily_steps, target_weekly_workout_minutes,
                      target_calorie_intake, target_water_intake, target_sleep_hours
            "#,
        )
        .bind(user_id)
        .fetch_one(db)
        .await?;
        Ok(row)
    }

    /// Partial update; absent fields keep their stored value.
    pub async fn update(
        db: &PgPool,
        user_id: Uuid,
        target_daily_steps: Option<i64>,
        target_weekly_workout_minutes: Option<i64>,
        target_calorie_intake: Option<i64>,
        target_water_intake: Option<f64>,
        target_sleep_hours: Option<f64>,
    ) -> anyhow::Result<UserGoals> {
        // Ensure the row exists before the partial update.
        Self::get_or_create(db, user_id).await?;

        let row = sqlx::query_as::<_, UserGoals>(
            r#"
            UPDATE user_goals SET
                target_daily_steps = COALESCE($2, target_daily_steps),
                target_weekly_workout_minutes = COALESCE($3, target_weekly_workout_minutes),
                target_calorie_intake = COALESCE($4, target_calorie_intake),
                target_water_intake = COALESCE($5, target_water_intake),
                target_sleep_hours = COALESCE($6, target_sleep_hours)
            WHERE user_id = $1
            RETURNING user_id, target_daily_steps, target_weekly_workout_minutes,
                      target_calorie_intake, target_water_intake, target_sleep_hours
            "#,
        )
        .bind(user_id)
        .bind(target_daily_steps)
        .bind(target_weekly_workout_minutes)
        .bind(target_calorie_intake)
        .bind(target_water_intake)
        .bind(target_sleep_hours)
        .fetch_one(db)
        .await?;
        Ok(row)
    }
}

pub struct GoalCompletion;

impl GoalCompletion {
    /// Completion keys for the user across the given period starts.
    ///
    /// Returns (goal_key, period_start) pairs so a daily completion from an
    /// earlier date never shadows this week's weekly bucket.
    pub async fn completed_keys(
        db: &PgPool,
        user_id: Uuid,
        periods: &[Date],
    ) -> anyhow::Result<Vec<(String, Date)>> {
        let rows = sqlx::query_as::<_, (String, Date)>(
            r#"
            SELECT goal_key, completion_period_start
            FROM goal_completions
            WHERE user_id = $1 AND completion_period_start = ANY($2)
            "#,
        )
        .bind(user_id)
        .bind(periods)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    /// Flip the completion state for (user, goal, period) and return the new
    /// state. Runs in a transaction with the key row locked so concurrent
    /// toggles cannot leave duplicate rows; the unique index backs this up.
    pub async fn toggle(
        db: &PgPool,
        user_id: Uuid,
        goal_key: &str,
        period_start: Date,
    ) -> anyhow::Result<bool> {
        let mut tx = db.begin().await?;

        let existing = sqlx::query_scalar::<_, Uuid>(
            r#"
            SELECT user_id
            FROM goal_completions
            WHERE user_id = $1 AND goal_key = $2 AND completion_period_start = $3
            FOR UPDATE
            "#,
        )
        .bind(user_id)
        .bind(goal_key)
        .bind(period_start)
        .fetch_optional(&mut *tx)
        .await?;

        let completed = if existing.is_some() {
            sqlx::query(
                r#"
                DELETE FROM goal_completions
                WHERE user_id = $1 AND goal_key = $2 AND completion_period_start = $3
                "#,
            )
            .bind(user_id)
            .bind(goal_key)
            .bind(period_start)
            .execute(&mut *tx)
            .await?;
            false
        } else {
            sqlx::query(
                r#"
                INSERT INTO goal_completions (user_id, goal_key, completion_period_start, completed_at)
                VALUES ($1, $2, $3, now())
                ON CONFLICT (user_id, goal_key, completion_period_start) DO NOTHING
                "#,
            )
            .bind(user_id)
            .bind(goal_key)
            .bind(period_start)
            .execute(&mut *tx)
            .await?;
            true
        };

        tx.commit().await?;
        Ok(completed)
    }

    /// Daily completions within the trailing window [since, today] plus weekly
    /// completions for the current ISO week.
    pub async fn counts_for_bonus(
        db: &PgPool,
        user_id: Uuid,
        daily_since: Date,
        week_start: Date,
    ) -> anyhow::Result<(i64, i64)> {
        let daily = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM goal_completions c
            JOIN system_goals g ON g.goal_key = c.goal_key
            WHERE c.user_id = $1 AND g.goal_type = 'daily' AND c.completion_period_start >= $2
            "#,
        )
        .bind(user_id)
        .bind(daily_since)
        .fetch_one(db)
        .await?;

        let weekly = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM goal_completions c
            JOIN system_goals g ON g.goal_key = c.goal_key
            WHERE c.user_id = $1 AND g.goal_type = 'weekly' AND c.completion_period_start = $2
            "#,
        )
        .bind(user_id)
        .bind(week_start)
        .fetch_one(db)
        .await?;

        Ok((daily, weekly))
    }
}
