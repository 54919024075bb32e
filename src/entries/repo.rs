use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

/// A logged meal. Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DietEntry {
    pub id: Uuid,
    pub user_id: Uuid,
    pub meal_type: String,
    pub calories: f64,
    pub protein_g: f64,
    pub carbs_g: f64,
    pub fats_g: f64,
    #[serde(with = "time::serde::rfc3339")]
    pub entry_time: OffsetDateTime,
}

/// A logged workout. Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ExerciseEntry {
    pub id: Uuid,
    pub user_id: Uuid,
    pub exercise_type: String,
    pub duration_min: f64,
    pub calories_burned: f64,
    pub steps: Option<i64>,
    #[serde(with = "time::serde::rfc3339")]
    pub entry_time: OffsetDateTime,
}

impl DietEntry {
    pub async fn list_by_user(db: &PgPool, user_id: Uuid) -> anyhow::Result<Vec<DietEntry>> {
        let rows = sqlx::query_as::<_, DietEntry>(
            r#"
            SELECT id, user_id, meal_type, calories, protein_g, carbs_g, fats_g, entry_time
            FROM diet_entries
            WHERE user_id = $1
            ORDER BY entry_time DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn create(
        db: &PgPool,
        user_id: Uuid,
        meal_type: &str,
        calories: f64,
        protein_g: f64,
        carbs_g: f64,
        fats_g: f64,
        entry_time: OffsetDateTime,
    ) -> anyhow::Result<DietEntry> {
        let row = sqlx::query_as::<_, DietEntry>(
            r#"
            INSERT INTO diet_entries (user_id, meal_type, calories, protein_g, carbs_g, fats_g, entry_time)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, user_id, meal_type, calories, protein_g, carbs_g, fats_g, entry_time
            "#,
        )
        .bind(user_id)
        .bind(meal_type)
        .bind(calories)
        .bind(protein_g)
        .bind(carbs_g)
        .bind(fats_g)
        .bind(entry_time)
        .fetch_one(db)
        .await?;
        Ok(row)
    }

    /// Delete an entry owned by the user. Returns false if nothing matched.
    pub async fn delete_by_user(db: &PgPool, user_id: Uuid, id: Uuid) -> anyhow::Result<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM diet_entries
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .execute(db)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}

impl ExerciseEntry {
    pub async fn list_by_user(db: &PgPool, user_id: Uuid) -> anyhow::Result<Vec<ExerciseEntry>> {
        let rows = sqlx::query_as::<_, ExerciseEntry>(
            r#"
            SELECT id, user_id, exercise_type, duration_min, calories_burned, steps, entry_time
            FROM exercise_entries
            WHERE user_id = $1
            ORDER BY entry_time DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn create(
        db: &PgPool,
        user_id: Uuid,
        exercise_type: &str,
        duration_min: f64,
        calories_burned: f64,
        steps: Option<i64>,
        entry_time: OffsetDateTime,
    ) -> anyhow::Result<ExerciseEntry> {
        let row = sqlx::query_as::<_, ExerciseEntry>(
            r#"
            INSERT INTO exercise_entries (user_id, exercise_type, duration_min, calories_burned, steps, entry_time)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, user_id, exercise_type, duration_min, calories_burned, steps, entry_time
            "#,
        )
        .bind(user_id)
        .bind(exercise_type)
        .bind(duration_min)
        .bind(calories_burned)
        .bind(steps)
        .bind(entry_time)
        .fetch_one(db)
        .await?;
        Ok(row)
    }

    /// Delete an entry owned by the user. Returns false if nothing matched.
    pub async fn delete_by_user(db: &PgPool, user_id: Uuid, id: Uuid) -> anyhow::Result<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM exercise_entries
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .execute(db)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
