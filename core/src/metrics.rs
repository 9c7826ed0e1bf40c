//! BMI, BMI category, health score, and mood derived from the latest log entry.

use crate::models::{BmiCategory, EmotionalState, HealthLogEntry, MetricsSnapshot};

pub const NORMAL_BMI_MIN: f64 = 18.5;
pub const NORMAL_BMI_MAX: f64 = 25.0;
pub const OBESE_BMI_MIN: f64 = 30.0;

/// Score for a Normal-BMI entry with a neutral mood.
const BASE_SCORE: f64 = 85.0;
const OFF_RANGE_PENALTY: f64 = 10.0;
const PENALTY_PER_BMI_POINT: f64 = 5.0;
const MAX_BMI_PENALTY: f64 = 45.0;
const MOOD_ADJUSTMENT: f64 = 10.0;

/// Body mass index rounded to one decimal, or `None` when either input is unusable.
#[must_use]
pub fn bmi(weight_kg: f64, height_m: f64) -> Option<f64> {
    if !weight_kg.is_finite() || weight_kg <= 0.0 || !height_m.is_finite() || height_m <= 0.0 {
        return None;
    }
    Some(round1(weight_kg / (height_m * height_m)))
}

#[must_use]
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Classify an already-rounded BMI. Both ends of the Normal band are inclusive.
#[must_use]
pub fn bmi_category(bmi: f64) -> BmiCategory {
    if bmi < NORMAL_BMI_MIN {
        BmiCategory::Underweight
    } else if bmi <= NORMAL_BMI_MAX {
        BmiCategory::Normal
    } else if bmi < OBESE_BMI_MIN {
        BmiCategory::Overweight
    } else {
        BmiCategory::Obese
    }
}

/// Heuristic 0-100 score.
///
/// Starts at 85 for a Normal BMI. Outside the Normal band it loses
/// `10 + 5 * distance` points (capped at 45), where `distance` is how far the
/// BMI sits from the nearest Normal bound. Mood then adds 10 (happy),
/// nothing (neutral) or subtracts 10 (sad, stressed, anxious).
#[must_use]
#[allow(clippy::cast_sign_loss)]
pub fn health_score(bmi: f64, mood: EmotionalState) -> u8 {
    let mut score = BASE_SCORE;

    if bmi_category(bmi) != BmiCategory::Normal {
        let distance = if bmi < NORMAL_BMI_MIN {
            NORMAL_BMI_MIN - bmi
        } else {
            bmi - NORMAL_BMI_MAX
        };
        score -= (OFF_RANGE_PENALTY + PENALTY_PER_BMI_POINT * distance).min(MAX_BMI_PENALTY);
    }

    if mood.is_distressed() {
        score -= MOOD_ADJUSTMENT;
    } else if mood == EmotionalState::Happy {
        score += MOOD_ADJUSTMENT;
    }

    score.clamp(0.0, 100.0).round() as u8
}

/// Derive the dashboard metrics from the newest entry (if any).
#[must_use]
pub fn compute_metrics(latest: Option<&HealthLogEntry>, height_m: f64) -> MetricsSnapshot {
    let Some(entry) = latest else {
        return MetricsSnapshot::no_data();
    };
    let Some(bmi) = bmi(entry.weight_kg, height_m) else {
        return MetricsSnapshot::no_data();
    };

    MetricsSnapshot {
        bmi: Some(bmi),
        bmi_category: bmi_category(bmi),
        health_score: health_score(bmi, entry.emotional_state),
        mood: entry.emotional_state,
    }
}
