//! Per-metric scorers. Each maps a raw aggregated value to a 0-100 score plus
//! a short message. Scorers never fail: zero or absent input always scores 0
//! with a "no data" message, and every result is rounded and clamped to the
//! 0-100 range.

use serde::Serialize;
use tracing::warn;

/// A single metric's normalized contribution before weighting.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ComponentScore {
    pub score: u8,
    pub message: String,
}

impl ComponentScore {
    fn new(raw: f64, message: impl Into<String>) -> Self {
        Self {
            score: raw.round().clamp(0.0, 100.0) as u8,
            message: message.into(),
        }
    }

    fn no_data(message: impl Into<String>) -> Self {
        Self {
            score: 0,
            message: message.into(),
        }
    }
}

/// Daily calorie target range. Scoring peaks at the midpoint of the range:
/// closeness to the center is rewarded, not just "within range".
pub const CALORIE_MIN: f64 = 1800.0;
pub const CALORIE_MAX: f64 = 2500.0;

/// Macro bands as a share of total calories, in percent.
#[derive(Debug, Clone, Copy)]
pub struct PctBand {
    pub min: f64,
    pub ideal: f64,
    pub max: f64,
}

pub const PROTEIN_BAND: PctBand = PctBand { min: 10.0, ideal: 20.0, max: 35.0 };
pub const CARBS_BAND: PctBand = PctBand { min: 45.0, ideal: 55.0, max: 65.0 };
pub const FATS_BAND: PctBand = PctBand { min: 20.0, ideal: 30.0, max: 35.0 };

/// kcal per gram of each macro, used to turn gram averages into calorie shares.
pub const PROTEIN_KCAL_PER_G: f64 = 4.0;
pub const CARBS_KCAL_PER_G: f64 = 4.0;
pub const FATS_KCAL_PER_G: f64 = 9.0;

/// Score average daily calories against [CALORIE_MIN, CALORIE_MAX].
///
/// Piecewise:
/// - 0 at min/2 or below, ramping linearly to 60 at min
/// - symmetric 90-100 peak across the range, 100 at the exact midpoint
/// - linear decay from 60 at max to a floor of 20 at 1.5 x max
pub fn calorie_score(avg_calories: f64) -> ComponentScore {
    if avg_calories <= 0.0 || !avg_calories.is_finite() {
        return ComponentScore::no_data("No calorie data logged");
    }
    let mid = (CALORIE_MIN + CALORIE_MAX) / 2.0;
    if avg_calories < CALORIE_MIN {
        let raw = (avg_calories - CALORIE_MIN * 0.5) / (CALORIE_MIN * 0.5) * 60.0;
        ComponentScore::new(raw.max(0.0), "Calorie intake is below your target range")
    } else if avg_calories <= CALORIE_MAX {
        let raw = 100.0 - (avg_calories - mid).abs() / (mid - CALORIE_MIN) * 10.0;
        ComponentScore::new(raw, "Calorie intake is within your target range")
    } else {
        let raw = 60.0 - (avg_calories - CALORIE_MAX) / (CALORIE_MAX * 0.5) * 40.0;
        ComponentScore::new(raw.max(20.0), "Calorie intake is above your target range")
    }
}

/// Score a macro's share of total calories against its percent band.
///
/// 0 to 60 below min, 60 to 100 from min to ideal, pinned at 100 through max,
/// then decaying to a floor of 50 at twice the max.
pub fn macro_score(share_pct: f64, band: PctBand, label: &str) -> ComponentScore {
    if share_pct <= 0.0 || !share_pct.is_finite() {
        return ComponentScore::no_data(format!("No {} data logged", label.to_lowercase()));
    }
    if share_pct < band.min {
        let raw = share_pct / band.min * 60.0;
        ComponentScore::new(
            raw,
            format!("{label} share of calories is below the recommended range"),
        )
    } else if share_pct < band.ideal {
        let raw = 60.0 + (share_pct - band.min) / (band.ideal - band.min) * 40.0;
        ComponentScore::new(
            raw,
            format!("{label} share of calories is slightly below ideal"),
        )
    } else if share_pct <= band.max {
        ComponentScore::new(100.0, format!("{label} share of calories is on target"))
    } else {
        let raw = 100.0 - (share_pct - band.max) / band.max * 50.0;
        ComponentScore::new(
            raw.max(50.0),
            format!("{label} share of calories is above the recommended range"),
        )
    }
}

/// Share of total calories contributed by a macro, in percent.
pub fn macro_share_pct(avg_grams: f64, kcal_per_g: f64, avg_calories: f64) -> f64 {
    if avg_calories <= 0.0 || !avg_calories.is_finite() || !avg_grams.is_finite() {
        return 0.0;
    }
    (avg_grams.max(0.0) * kcal_per_g) / avg_calories * 100.0
}

/// Step function of the number of distinct days with data in the window.
pub fn consistency_score(day_count: u32) -> ComponentScore {
    match day_count {
        0 => ComponentScore::no_data("No entries logged this week"),
        1 => ComponentScore::no_data("Logged only one day this week"),
        2..=3 => ComponentScore::new(
            25.0 * f64::from(day_count),
            format!("Logged {day_count} days this week; aim for daily logging"),
        ),
        4..=6 => ComponentScore::new(
            75.0 + f64::from(day_count - 3) * 8.33,
            format!("Logged {day_count} days this week; almost there"),
        ),
        _ => ComponentScore::new(100.0, "Logged every day this week"),
    }
}

/// Exercise component scorer: actual vs target, capped at a 1.1 ratio.
pub fn target_ratio_score(actual: f64, target: f64, label: &str, zero_message: &str) -> ComponentScore {
    if actual <= 0.0 || !actual.is_finite() {
        return ComponentScore::no_data(zero_message);
    }
    if target <= 0.0 || !target.is_finite() {
        // Resolver targets are always positive; guard the division anyway.
        warn!(%label, target, "non-positive target in ratio score");
        return ComponentScore::no_data(format!("No {label} target available"));
    }
    let ratio = (actual / target).min(1.1);
    let raw = (ratio * 100.0).min(100.0);
    let message = if actual >= target {
        format!("Hit your weekly {label} target")
    } else {
        format!(
            "At {}% of your weekly {label} target",
            (actual / target * 100.0).round() as i64
        )
    };
    ComponentScore::new(raw, message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_scorers_stay_within_bounds() {
        for value in [-1000.0, -1.0, 0.0, 0.1, 500.0, 1800.0, 2150.0, 2500.0, 10_000.0, 1e12] {
            assert!(calorie_score(value).score <= 100);
            assert!(macro_score(value, PROTEIN_BAND, "Protein").score <= 100);
            assert!(target_ratio_score(value, 150.0, "minutes", "none").score <= 100);
        }
        for days in 0..20 {
            assert!(consistency_score(days).score <= 100);
        }
    }

    #[test]
    fn calorie_score_peaks_at_midpoint() {
        // Midpoint of [1800, 2500] scores exactly 100.
        assert_eq!(calorie_score(2150.0).score, 100);
        // Both range boundaries sit at the 90 shoulder.
        assert_eq!(calorie_score(1800.0).score, 90);
        assert_eq!(calorie_score(2500.0).score, 90);
    }

    #[test]
    fn calorie_score_is_unimodal_within_range() {
        let mut last = calorie_score(1800.0).score;
        for cal in (1850..=2150).step_by(50) {
            let s = calorie_score(f64::from(cal)).score;
            assert!(s >= last, "rising flank dipped at {cal}");
            last = s;
        }
        let mut last = calorie_score(2150.0).score;
        for cal in (2200..=2500).step_by(50) {
            let s = calorie_score(f64::from(cal)).score;
            assert!(s <= last, "falling flank rose at {cal}");
            last = s;
        }
    }

    #[test]
    fn calorie_score_below_min_ramps_from_half_min() {
        assert_eq!(calorie_score(900.0).score, 0);
        assert_eq!(calorie_score(1799.0).score, 60);
        let mid_low = calorie_score(1350.0).score;
        assert!(mid_low > 0 && mid_low < 60);
    }

    #[test]
    fn calorie_score_decays_to_floor_above_max() {
        // 1.5 x max hits the floor of 20 and stays there.
        assert_eq!(calorie_score(3750.0).score, 20);
        assert_eq!(calorie_score(8000.0).score, 20);
        let just_over = calorie_score(2501.0).score;
        assert!(just_over <= 60);
    }

    #[test]
    fn zero_input_always_scores_zero_with_message() {
        let s = calorie_score(0.0);
        assert_eq!(s.score, 0);
        assert!(s.message.contains("No calorie data"));

        let s = macro_score(0.0, CARBS_BAND, "Carbs");
        assert_eq!(s.score, 0);

        let s = target_ratio_score(0.0, 100.0, "minutes", "No minutes logged this week");
        assert_eq!(s.score, 0);
        assert_eq!(s.message, "No minutes logged this week");
    }

    #[test]
    fn macro_score_band_shape() {
        // Below min ramps toward 60.
        assert_eq!(macro_score(5.0, PROTEIN_BAND, "Protein").score, 30);
        // Ideal through max pins at 100.
        assert_eq!(macro_score(20.0, PROTEIN_BAND, "Protein").score, 100);
        assert_eq!(macro_score(35.0, PROTEIN_BAND, "Protein").score, 100);
        // Twice the max floors at 50.
        assert_eq!(macro_score(70.0, PROTEIN_BAND, "Protein").score, 50);
        assert_eq!(macro_score(500.0, PROTEIN_BAND, "Protein").score, 50);
    }

    #[test]
    fn macro_share_handles_zero_calories() {
        assert_eq!(macro_share_pct(100.0, PROTEIN_KCAL_PER_G, 0.0), 0.0);
        let pct = macro_share_pct(100.0, PROTEIN_KCAL_PER_G, 2000.0);
        assert!((pct - 20.0).abs() < 1e-9);
    }

    #[test]
    fn consistency_score_table() {
        assert_eq!(consistency_score(0).score, 0);
        assert_eq!(consistency_score(1).score, 0);
        assert_eq!(consistency_score(2).score, 50);
        assert_eq!(consistency_score(3).score, 75);
        // 75 + (4 - 3) * 8.33 rounds to 83.
        assert_eq!(consistency_score(4).score, 83);
        assert_eq!(consistency_score(5).score, 92);
        assert_eq!(consistency_score(6).score, 100);
        assert_eq!(consistency_score(7).score, 100);
        assert_eq!(consistency_score(30).score, 100);
    }

    #[test]
    fn consistency_score_is_monotone() {
        let mut last = 0;
        for days in 0..=10 {
            let s = consistency_score(days).score;
            assert!(s >= last, "consistency dipped at {days}");
            last = s;
        }
    }

    #[test]
    fn target_ratio_score_caps_at_100() {
        assert_eq!(target_ratio_score(150.0, 150.0, "minutes", "none").score, 100);
        assert_eq!(target_ratio_score(450.0, 150.0, "minutes", "none").score, 100);
        assert_eq!(target_ratio_score(75.0, 150.0, "minutes", "none").score, 50);
    }

    #[test]
    fn target_ratio_score_guards_zero_target() {
        let s = target_ratio_score(100.0, 0.0, "minutes", "none");
        assert_eq!(s.score, 0);
    }
}
