use chrono::{DateTime, Utc};

use crate::dashboard::{assemble_dashboard, metrics_for, recent_signals};
use crate::error::{Error, Result};
use crate::models::{
    DashboardSnapshot, EmotionalState, HealthLogEntry, MetricsSnapshot, NewHealthLog, NewSymptom,
    Profile, RecentSignals, Recommendation, RecommendationCategory, Reminder, SeriesPoint, Symptom,
    SymptomKind, validate_height, validate_symptom_name, validate_weight,
};
use crate::recommend::recommend;
use crate::series::build_series;
use crate::store::HealthStore;

/// Entry point for every health operation.
///
/// Generic over the store so callers choose the backend: the CLI and server
/// hand it a [`crate::db::Database`], tests hand it mocks. Each call runs to
/// completion synchronously and holds nothing between calls.
pub struct HealthEngine<S> {
    store: S,
}

impl<S: HealthStore> HealthEngine<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    // --- Logs ---

    pub fn add_log(
        &self,
        weight_kg: f64,
        emotional_state: EmotionalState,
    ) -> Result<HealthLogEntry> {
        self.add_log_at(weight_kg, emotional_state, None)
    }

    pub fn add_log_at(
        &self,
        weight_kg: f64,
        emotional_state: EmotionalState,
        recorded_at: Option<DateTime<Utc>>,
    ) -> Result<HealthLogEntry> {
        let weight_kg = validate_weight(weight_kg).inspect_err(|_| {
            tracing::warn!(weight_kg, "rejected health log");
        })?;
        let entry = self.store.append_log(&NewHealthLog {
            weight_kg,
            emotional_state,
            recorded_at,
        })?;
        tracing::info!(id = entry.id, weight_kg, mood = %emotional_state, "logged health entry");
        Ok(entry)
    }

    pub fn list_logs(&self, limit: Option<usize>) -> Result<Vec<HealthLogEntry>> {
        self.store.list_logs(limit)
    }

    pub fn latest_log(&self) -> Result<Option<HealthLogEntry>> {
        Ok(self.store.list_logs(Some(1))?.into_iter().next())
    }

    // --- Derived views ---

    pub fn metrics(&self) -> Result<MetricsSnapshot> {
        let latest = self.store.list_logs(Some(1))?;
        metrics_for(&self.store, &latest)
    }

    pub fn series(&self, window: usize) -> Result<Vec<SeriesPoint>> {
        let entries = self.store.list_logs(Some(window))?;
        Ok(build_series(&entries, window))
    }

    /// Dashboard as of now. Repeated calls without writes agree, except that a
    /// symptom crossing the 7-day mark between calls drops out of
    /// `recent_symptoms`; use [`assemble_dashboard`] with a fixed time to pin it.
    pub fn dashboard(&self) -> Result<DashboardSnapshot> {
        assemble_dashboard(&self.store, Utc::now())
    }

    /// Recommendations for a category name such as `"food"`.
    pub fn recommendations(&self, category: &str) -> Result<Vec<Recommendation>> {
        let category = category.parse::<RecommendationCategory>().inspect_err(|_| {
            tracing::warn!(category, "rejected recommendation category");
        })?;
        self.recommendations_for(category)
    }

    pub fn recommendations_for(
        &self,
        category: RecommendationCategory,
    ) -> Result<Vec<Recommendation>> {
        let metrics = self.metrics()?;
        if !metrics.is_available() {
            return Ok(Vec::new());
        }
        Ok(recommend(category, &metrics, &self.recent_signals()?))
    }

    pub fn recent_signals(&self) -> Result<RecentSignals> {
        recent_signals(&self.store)
    }

    // --- Reminders ---

    pub fn list_reminders(&self) -> Result<Vec<Reminder>> {
        self.store.list_reminders()
    }

    /// Flip `is_active` on one reminder and return its new state.
    pub fn toggle_reminder(&self, id: i64) -> Result<Reminder> {
        let current = self
            .store
            .list_reminders()?
            .into_iter()
            .find(|r| r.id == id)
            .ok_or_else(|| Error::NotFound(format!("Reminder {id}")))?;

        let updated = Reminder {
            is_active: !current.is_active,
            ..current
        };
        self.store.set_reminder_active(id, updated.is_active)?;
        tracing::info!(id, active = updated.is_active, "toggled reminder");
        Ok(updated)
    }

    // --- Profile ---

    pub fn get_profile(&self) -> Result<Option<Profile>> {
        self.store.get_profile()
    }

    pub fn set_profile(&self, profile: Profile) -> Result<Profile> {
        validate_height(profile.height_m).inspect_err(|_| {
            tracing::warn!(height_m = profile.height_m, "rejected profile");
        })?;
        self.store.set_profile(&profile)?;
        tracing::info!(height_m = profile.height_m, "updated profile");
        Ok(profile)
    }

    // --- Symptoms ---

    pub fn log_symptom(&self, name: &str, kind: SymptomKind) -> Result<Symptom> {
        let name = validate_symptom_name(name)?;
        let symptom = self.store.log_symptom(&NewSymptom {
            name,
            kind,
            logged_at: None,
        })?;
        tracing::info!(id = symptom.id, name = %symptom.name, "logged symptom");
        Ok(symptom)
    }

    pub fn list_symptoms(&self, limit: Option<usize>) -> Result<Vec<Symptom>> {
        self.store.list_symptoms(limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use crate::models::{ActivityLevel, BmiCategory, Intensity, RecommendationDetails};
    use crate::store::{LogStore, ProfileStore, ReminderStore, SymptomStore};

    fn engine() -> HealthEngine<Database> {
        HealthEngine::new(Database::open_in_memory().unwrap())
    }

    fn engine_with_height(height_m: f64) -> HealthEngine<Database> {
        let engine = engine();
        engine
            .set_profile(Profile {
                height_m,
                activity_level: None,
            })
            .unwrap();
        engine
    }

    /// Store whose every call fails, as if the database went away.
    struct FailingStore;

    fn down<T>() -> Result<T> {
        Err(Error::StoreUnavailable(anyhow::anyhow!("disk I/O error")))
    }

    impl LogStore for FailingStore {
        fn append_log(&self, _entry: &NewHealthLog) -> Result<HealthLogEntry> {
            down()
        }
        fn list_logs(&self, _limit: Option<usize>) -> Result<Vec<HealthLogEntry>> {
            down()
        }
    }

    impl ReminderStore for FailingStore {
        fn list_reminders(&self) -> Result<Vec<Reminder>> {
            down()
        }
        fn set_reminder_active(&self, _id: i64, _active: bool) -> Result<()> {
            down()
        }
    }

    impl ProfileStore for FailingStore {
        fn get_profile(&self) -> Result<Option<Profile>> {
            down()
        }
        fn set_profile(&self, _profile: &Profile) -> Result<()> {
            down()
        }
    }

    impl SymptomStore for FailingStore {
        fn log_symptom(&self, _symptom: &NewSymptom) -> Result<Symptom> {
            down()
        }
        fn list_symptoms(&self, _limit: Option<usize>) -> Result<Vec<Symptom>> {
            down()
        }
    }

    #[test]
    fn test_add_log_rejects_non_positive_weight() {
        let engine = engine();
        for w in [0.0, -1.0] {
            let err = engine.add_log(w, EmotionalState::Happy).unwrap_err();
            assert!(matches!(err, Error::Validation(_)));
        }
        assert!(engine.list_logs(None).unwrap().is_empty());
    }

    #[test]
    fn test_append_visible_to_next_read() {
        let engine = engine();
        let entry = engine.add_log(70.0, EmotionalState::Happy).unwrap();
        assert_eq!(engine.latest_log().unwrap(), Some(entry));
    }

    #[test]
    fn test_metrics_scenario() {
        let engine = engine_with_height(1.70);
        assert_eq!(engine.metrics().unwrap(), MetricsSnapshot::no_data());

        engine.add_log(70.0, EmotionalState::Happy).unwrap();
        let metrics = engine.metrics().unwrap();
        assert_eq!(metrics.bmi, Some(24.2));
        assert_eq!(metrics.bmi_category, BmiCategory::Normal);
        assert_eq!(metrics.mood, EmotionalState::Happy);
    }

    #[test]
    fn test_series_uses_window() {
        let engine = engine_with_height(1.70);
        for w in [71.0, 70.5, 70.0, 69.5] {
            engine.add_log(w, EmotionalState::Neutral).unwrap();
        }
        let series = engine.series(3).unwrap();
        assert_eq!(series.len(), 3);
        assert!((series[2].weight_kg - 69.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_recommendations_unknown_category() {
        let engine = engine_with_height(1.70);
        engine.add_log(70.0, EmotionalState::Neutral).unwrap();
        let err = engine.recommendations("sleep").unwrap_err();
        assert!(matches!(err, Error::InvalidCategory(_)));
    }

    #[test]
    fn test_recommendations_without_logs_are_empty() {
        let engine = engine();
        assert!(engine.recommendations("exercise").unwrap().is_empty());
    }

    #[test]
    fn test_recommendations_use_profile_activity_level() {
        let engine = engine();
        engine
            .set_profile(Profile {
                height_m: 1.70,
                activity_level: Some(ActivityLevel::Active),
            })
            .unwrap();
        engine.add_log(70.0, EmotionalState::Happy).unwrap();

        let recs = engine.recommendations("exercise").unwrap();
        let performance = recs.iter().find(|r| r.topic == "performance").unwrap();
        assert!(matches!(
            performance.details,
            RecommendationDetails::Exercise {
                intensity: Intensity::High,
                ..
            }
        ));
    }

    #[test]
    fn test_recommendations_see_logged_symptoms() {
        let engine = engine_with_height(1.70);
        engine.add_log(70.0, EmotionalState::Neutral).unwrap();
        engine.log_symptom("Insomnia", SymptomKind::Mental).unwrap();

        let recs = engine.recommendations("emotional").unwrap();
        assert!(recs.iter().any(|r| r.topic == "sleep"));
    }

    #[test]
    fn test_emotional_rules_need_mental_symptoms() {
        let engine = engine_with_height(1.70);
        engine.add_log(70.0, EmotionalState::Neutral).unwrap();

        engine.log_symptom("Insomnia", SymptomKind::Physical).unwrap();
        let recs = engine.recommendations("emotional").unwrap();
        assert!(recs.iter().all(|r| r.topic != "sleep"));

        engine.log_symptom("Insomnia", SymptomKind::Mental).unwrap();
        let recs = engine.recommendations("emotional").unwrap();
        assert!(recs.iter().any(|r| r.topic == "sleep"));
    }

    #[test]
    fn test_toggle_reminder_flips_only_active() {
        let engine = engine();
        let before = engine.list_reminders().unwrap();
        let target = before[2].clone();

        let toggled = engine.toggle_reminder(target.id).unwrap();
        assert_eq!(toggled.is_active, !target.is_active);
        assert_eq!(toggled.label, target.label);
        assert_eq!(toggled.scheduled_time, target.scheduled_time);

        let after = engine.list_reminders().unwrap();
        assert_eq!(after[2], toggled);
        assert_eq!(after[0], before[0]);

        let back = engine.toggle_reminder(target.id).unwrap();
        assert_eq!(back, target);
    }

    #[test]
    fn test_toggle_unknown_reminder_leaves_store_unchanged() {
        let engine = engine();
        let before = engine.list_reminders().unwrap();
        let err = engine.toggle_reminder(999).unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
        assert_eq!(engine.list_reminders().unwrap(), before);
    }

    #[test]
    fn test_set_profile_validates_height() {
        let engine = engine();
        for height_m in [0.0, -1.7, 3.2] {
            let err = engine
                .set_profile(Profile {
                    height_m,
                    activity_level: None,
                })
                .unwrap_err();
            assert!(matches!(err, Error::Validation(_)));
        }
        assert!(engine.get_profile().unwrap().is_none());
    }

    #[test]
    fn test_log_symptom_rejects_blank_name() {
        let engine = engine();
        let err = engine.log_symptom("  ", SymptomKind::Physical).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert!(engine.list_symptoms(None).unwrap().is_empty());
    }

    #[test]
    fn test_recent_signals_limited_to_ten() {
        let engine = engine();
        for i in 0..12 {
            engine
                .log_symptom(&format!("symptom {i}"), SymptomKind::Physical)
                .unwrap();
        }
        let signals = engine.recent_signals().unwrap();
        assert_eq!(signals.symptoms.len(), 10);
        assert_eq!(signals.symptoms[0].name, "symptom 11");
    }

    #[test]
    fn test_store_failure_propagates_unchanged() {
        let engine = HealthEngine::new(FailingStore);
        assert!(matches!(
            engine.add_log(70.0, EmotionalState::Happy),
            Err(Error::StoreUnavailable(_))
        ));
        assert!(matches!(engine.dashboard(), Err(Error::StoreUnavailable(_))));
        assert!(matches!(
            engine.toggle_reminder(1),
            Err(Error::StoreUnavailable(_))
        ));
        assert!(matches!(
            engine.recommendations("food"),
            Err(Error::StoreUnavailable(_))
        ));
    }
}
