use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

/// Self-reported activity level used to derive exercise targets.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ActivityLevel {
    Sedentary,
    Moderate,
    Intermediate,
    Challenging,
    Advanced,
}

impl ActivityLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityLevel::Sedentary => "sedentary",
            ActivityLevel::Moderate => "moderate",
            ActivityLevel::Intermediate => "intermediate",
            ActivityLevel::Challenging => "challenging",
            ActivityLevel::Advanced => "advanced",
        }
    }

    /// Parse a stored label. Unknown labels map to None; callers fall back to
    /// the Moderate targets.
    pub fn from_label(label: &str) -> Option<ActivityLevel> {
        match label.to_lowercase().as_str() {
            "sedentary" => Some(ActivityLevel::Sedentary),
            "moderate" => Some(ActivityLevel::Moderate),
            "intermediate" => Some(ActivityLevel::Intermediate),
            "challenging" => Some(ActivityLevel::Challenging),
            "advanced" => Some(ActivityLevel::Advanced),
            _ => None,
        }
    }
}

/// Raw profile row; activity_level is stored as text.
#[derive(Debug, FromRow)]
pub struct ProfileRow {
    pub user_id: Uuid,
    pub age: Option<i32>,
    pub weight_kg: Option<f64>,
    pub height_cm: Option<f64>,
    pub gender: Option<String>,
    pub activity_level: Option<String>,
    pub updated_at: OffsetDateTime,
}

/// One profile per user, created lazily on first write.
#[derive(Debug, Clone, Serialize)]
pub struct UserProfile {
    pub user_id: Uuid,
    pub age: Option<i32>,
    pub weight_kg: Option<f64>,
    pub height_cm: Option<f64>,
    pub gender: Option<String>,
    pub activity_level: Option<ActivityLevel>,
}

impl From<ProfileRow> for UserProfile {
    fn from(r: ProfileRow) -> Self {
        Self {
            user_id: r.user_id,
            age: r.age,
            weight_kg: r.weight_kg,
            height_cm: r.height_cm,
            gender: r.gender,
            activity_level: r.activity_level.as_deref().and_then(ActivityLevel::from_label),
        }
    }
}

impl UserProfile {
    pub async fn find(db: &PgPool, user_id: Uuid) -> anyhow::Result<Option<UserProfile>> {
        let row = sqlx::query_as::<_, ProfileRow>(
            r#"
            SELECT user_id, age, weight_kg, height_cm, gender, activity_level, updated_at
            FROM user_profiles
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(db)
        .await?;
        Ok(row.map(UserProfile::from))
    }

    pub async fn upsert(
        db: &PgPool,
        user_id: Uuid,
        age: Option<i32>,
        weight_kg: Option<f64>,
        height_cm: Option<f64>,
        gender: Option<&str>,
        activity_level: Option<ActivityLevel>,
    ) -> anyhow::Result<UserProfile> {
        let row = sqlx::query_as::<_, ProfileRow>(
            r#"
            INSERT INTO user_profiles (user_id, age, weight_kg, height_cm, gender, activity_level, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, now())
            ON CONFLICT (user_id) DO UPDATE SET
                age = COALESCE($2, user_profiles.age),
                weight_kg = COALESCE($3, user_profiles.weight_kg),
                height_cm = COALESCE($4, user_profiles.height_cm),
                gender = COALESCE($5, user_profiles.gender),
                activity_level = COALESCE($6, user_profiles.activity_level),
                updated_at = now()
            RETURNING user_id, age, weight_kg, height_cm, gender, activity_level, updated_at
            "#,
        )
        .bind(user_id)
        .bind(age)
        .bind(weight_kg)
        .bind(height_cm)
        .bind(gender)
        .bind(activity_level.map(|a| a.as_str()))
        .fetch_one(db)
        .await?;
        Ok(UserProfile::from(row))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn activity_level_labels_roundtrip() {
        for level in [
            ActivityLevel::Sedentary,
            ActivityLevel::Moderate,
            ActivityLevel::Intermediate,
            ActivityLevel::Challenging,
            ActivityLevel::Advanced,
        ] {
            assert_eq!(ActivityLevel::from_label(level.as_str()), Some(level));
        }
    }

    #[test]
    fn unknown_label_maps_to_none() {
        assert_eq!(ActivityLevel::from_label("couch-potato"), None);
        assert_eq!(ActivityLevel::from_label(""), None);
    }
}
