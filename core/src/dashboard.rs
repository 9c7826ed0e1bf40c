//! Composition of metrics, series and recommendations into one snapshot.

use chrono::{DateTime, Duration, Utc};

use crate::error::{Result, validation};
use crate::metrics::compute_metrics;
use crate::models::{
    DashboardSnapshot, HealthLogEntry, MetricsSnapshot, RecentSignals, RecommendationCategory,
};
use crate::recommend::recommend;
use crate::series::{DEFAULT_WINDOW, build_series};
use crate::store::HealthStore;

/// Symptoms fed to the recommendation rules.
pub const SIGNAL_SYMPTOM_LIMIT: usize = 10;
/// How far back the dashboard looks for symptoms.
pub const RECENT_SYMPTOM_DAYS: i64 = 7;

/// Metrics for the newest entry in `entries` (newest-first).
///
/// No entries is the NoData snapshot whether or not a profile exists. Entries
/// without a profile height are a validation error.
pub fn metrics_for<S: HealthStore + ?Sized>(
    store: &S,
    entries: &[HealthLogEntry],
) -> Result<MetricsSnapshot> {
    let Some(latest) = entries.first() else {
        return Ok(MetricsSnapshot::no_data());
    };
    let profile = store
        .get_profile()?
        .ok_or_else(|| validation("profile height is not set"))?;
    Ok(compute_metrics(Some(latest), profile.height_m))
}

pub fn recent_signals<S: HealthStore + ?Sized>(store: &S) -> Result<RecentSignals> {
    Ok(RecentSignals {
        symptoms: store.list_symptoms(Some(SIGNAL_SYMPTOM_LIMIT))?,
        activity_level: store.get_profile()?.and_then(|p| p.activity_level),
    })
}

/// Build the dashboard as of `now`. Read-only; store errors propagate as-is.
pub fn assemble_dashboard<S: HealthStore + ?Sized>(
    store: &S,
    now: DateTime<Utc>,
) -> Result<DashboardSnapshot> {
    let entries = store.list_logs(None)?;
    let metrics = metrics_for(store, &entries)?;
    let series = build_series(&entries, DEFAULT_WINDOW);

    let recommendations = if metrics.is_available() {
        recommend(RecommendationCategory::Food, &metrics, &recent_signals(store)?)
    } else {
        Vec::new()
    };

    let cutoff = now - Duration::days(RECENT_SYMPTOM_DAYS);
    let recent_symptoms = store
        .list_symptoms(None)?
        .into_iter()
        .take_while(|s| s.logged_at >= cutoff)
        .collect();

    let snapshot = DashboardSnapshot {
        metrics,
        series,
        recommendations,
        total_records: entries.len(),
        recent_symptoms,
    };
    tracing::debug!(
        total_records = snapshot.total_records,
        category = ?snapshot.metrics.bmi_category,
        "assembled dashboard"
    );
    Ok(snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use crate::db::Database;
    use crate::models::{
        BmiCategory, EmotionalState, NewHealthLog, NewSymptom, Profile, SymptomKind,
    };
    use crate::store::{LogStore, ProfileStore, SymptomStore};

    fn db_with_height(height_m: f64) -> Database {
        let db = Database::open_in_memory().unwrap();
        db.set_profile(&Profile {
            height_m,
            activity_level: None,
        })
        .unwrap();
        db
    }

    fn log(db: &Database, weight_kg: f64, mood: EmotionalState) {
        db.append_log(&NewHealthLog {
            weight_kg,
            emotional_state: mood,
            recorded_at: None,
        })
        .unwrap();
    }

    #[test]
    fn test_empty_store_is_no_data() {
        let db = Database::open_in_memory().unwrap();
        let dash = assemble_dashboard(&db, Utc::now()).unwrap();
        assert_eq!(dash.metrics, MetricsSnapshot::no_data());
        assert!(dash.series.is_empty());
        assert!(dash.recommendations.is_empty());
        assert_eq!(dash.total_records, 0);
    }

    #[test]
    fn test_seventy_kg_happy_scenario() {
        let db = db_with_height(1.70);
        log(&db, 70.0, EmotionalState::Happy);

        let dash = assemble_dashboard(&db, Utc::now()).unwrap();
        assert_eq!(dash.metrics.bmi, Some(24.2));
        assert_eq!(dash.metrics.bmi_category, BmiCategory::Normal);
        assert_eq!(dash.series.len(), 1);
        assert!((dash.series[0].weight_kg - 70.0).abs() < f64::EPSILON);
        assert_eq!(dash.total_records, 1);
        assert!(
            dash.recommendations
                .iter()
                .all(|r| r.category == RecommendationCategory::Food)
        );
        assert_eq!(dash.recommendations[0].topic, "maintenance");
    }

    #[test]
    fn test_assemble_twice_is_identical() {
        let db = db_with_height(1.80);
        for w in [82.0, 81.5, 81.0] {
            log(&db, w, EmotionalState::Stressed);
        }
        let now = Utc::now();
        let first = assemble_dashboard(&db, now).unwrap();
        let second = assemble_dashboard(&db, now).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_entries_without_profile_fail_validation() {
        let db = Database::open_in_memory().unwrap();
        log(&db, 70.0, EmotionalState::Neutral);
        let err = assemble_dashboard(&db, Utc::now()).unwrap_err();
        assert!(matches!(err, Error::Validation(ref m) if m.contains("height")));
    }

    #[test]
    fn test_recent_symptoms_window() {
        let db = db_with_height(1.70);
        let now = Utc::now();
        for (name, days_ago) in [("old cough", 10), ("fatigue", 2)] {
            db.log_symptom(&NewSymptom {
                name: name.to_string(),
                kind: SymptomKind::Physical,
                logged_at: Some(now - Duration::days(days_ago)),
            })
            .unwrap();
        }
        log(&db, 70.0, EmotionalState::Neutral);

        let dash = assemble_dashboard(&db, now).unwrap();
        assert_eq!(dash.recent_symptoms.len(), 1);
        assert_eq!(dash.recent_symptoms[0].name, "fatigue");
        // fatigue triggers the energy food rule
        assert!(dash.recommendations.iter().any(|r| r.topic == "energy"));
    }
}
