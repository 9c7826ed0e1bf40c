use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result, validation};

// --- Health log ---

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmotionalState {
    Happy,
    #[default]
    Neutral,
    Sad,
    Stressed,
    Anxious,
}

impl EmotionalState {
    pub const ALL: [EmotionalState; 5] = [
        Self::Happy,
        Self::Neutral,
        Self::Sad,
        Self::Stressed,
        Self::Anxious,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Happy => "happy",
            Self::Neutral => "neutral",
            Self::Sad => "sad",
            Self::Stressed => "stressed",
            Self::Anxious => "anxious",
        }
    }

    /// Moods that pull the health score down.
    #[must_use]
    pub fn is_distressed(self) -> bool {
        matches!(self, Self::Sad | Self::Stressed | Self::Anxious)
    }
}

impl fmt::Display for EmotionalState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EmotionalState {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let lower = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|m| m.as_str() == lower)
            .ok_or_else(|| {
                validation(format!(
                    "Invalid emotional state '{s}'. Must be one of: happy, neutral, sad, stressed, anxious"
                ))
            })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthLogEntry {
    pub id: i64,
    pub uuid: String,
    pub recorded_at: DateTime<Utc>,
    pub weight_kg: f64,
    pub emotional_state: EmotionalState,
}

#[derive(Debug, Clone)]
pub struct NewHealthLog {
    pub weight_kg: f64,
    pub emotional_state: EmotionalState,
    /// Stamped with the current time by the store when absent.
    pub recorded_at: Option<DateTime<Utc>>,
}

// --- Reminders ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReminderType {
    Water,
    Meal,
    Exercise,
    Other,
}

impl ReminderType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Water => "water",
            Self::Meal => "meal",
            Self::Exercise => "exercise",
            Self::Other => "other",
        }
    }
}

impl FromStr for ReminderType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "water" => Ok(Self::Water),
            "meal" => Ok(Self::Meal),
            "exercise" => Ok(Self::Exercise),
            "other" => Ok(Self::Other),
            _ => Err(validation(format!(
                "Invalid reminder type '{s}'. Must be one of: water, meal, exercise, other"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reminder {
    pub id: i64,
    #[serde(rename = "type")]
    pub reminder_type: ReminderType,
    pub label: String,
    /// Local wall-clock time, `HH:MM`.
    pub scheduled_time: String,
    pub is_active: bool,
}

#[derive(Debug, Clone)]
pub struct NewReminder {
    pub reminder_type: ReminderType,
    pub label: String,
    pub scheduled_time: String,
    pub is_active: bool,
}

/// Reminders seeded into an empty store on first listing.
#[must_use]
pub fn default_reminders() -> Vec<NewReminder> {
    vec![
        NewReminder {
            reminder_type: ReminderType::Water,
            label: "Morning glass of water".to_string(),
            scheduled_time: "07:00".to_string(),
            is_active: true,
        },
        NewReminder {
            reminder_type: ReminderType::Meal,
            label: "Healthy breakfast".to_string(),
            scheduled_time: "08:00".to_string(),
            is_active: true,
        },
        NewReminder {
            reminder_type: ReminderType::Exercise,
            label: "Evening run".to_string(),
            scheduled_time: "17:00".to_string(),
            is_active: false,
        },
    ]
}

// --- Profile & symptoms ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityLevel {
    Sedentary,
    Light,
    Moderate,
    Active,
}

impl ActivityLevel {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Sedentary => "sedentary",
            Self::Light => "light",
            Self::Moderate => "moderate",
            Self::Active => "active",
        }
    }
}

impl FromStr for ActivityLevel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "sedentary" => Ok(Self::Sedentary),
            "light" => Ok(Self::Light),
            "moderate" => Ok(Self::Moderate),
            "active" => Ok(Self::Active),
            _ => Err(validation(format!(
                "Invalid activity level '{s}'. Must be one of: sedentary, light, moderate, active"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub height_m: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activity_level: Option<ActivityLevel>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SymptomKind {
    Physical,
    Mental,
}

impl SymptomKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Physical => "physical",
            Self::Mental => "mental",
        }
    }
}

impl FromStr for SymptomKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "physical" => Ok(Self::Physical),
            "mental" => Ok(Self::Mental),
            _ => Err(validation(format!(
                "Invalid symptom kind '{s}'. Must be one of: physical, mental"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Symptom {
    pub id: i64,
    pub name: String,
    pub kind: SymptomKind,
    pub logged_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewSymptom {
    pub name: String,
    pub kind: SymptomKind,
    pub logged_at: Option<DateTime<Utc>>,
}

/// Mental symptoms the emotional rules consider, newest first.
pub const MENTAL_SIGNAL_LIMIT: usize = 5;

/// Recent context the recommendation rules look at besides the metrics.
#[derive(Debug, Clone, Default)]
pub struct RecentSignals {
    pub symptoms: Vec<Symptom>,
    pub activity_level: Option<ActivityLevel>,
}

impl RecentSignals {
    /// True when any recent symptom matches one of `names` (case-insensitive).
    #[must_use]
    pub fn has_symptom(&self, names: &[&str]) -> bool {
        self.symptoms.iter().any(|s| symptom_matches(s, names))
    }

    /// Like [`Self::has_symptom`], restricted to the newest
    /// [`MENTAL_SIGNAL_LIMIT`] symptoms logged as mental.
    #[must_use]
    pub fn has_mental_symptom(&self, names: &[&str]) -> bool {
        self.symptoms
            .iter()
            .filter(|s| s.kind == SymptomKind::Mental)
            .take(MENTAL_SIGNAL_LIMIT)
            .any(|s| symptom_matches(s, names))
    }
}

fn symptom_matches(symptom: &Symptom, names: &[&str]) -> bool {
    let lower = symptom.name.trim().to_lowercase();
    names.contains(&lower.as_str())
}

// --- Derived views ---

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum BmiCategory {
    #[default]
    NoData,
    Underweight,
    Normal,
    Overweight,
    Obese,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MetricsSnapshot {
    /// One-decimal BMI; `None` when there is no usable entry.
    pub bmi: Option<f64>,
    pub bmi_category: BmiCategory,
    pub health_score: u8,
    pub mood: EmotionalState,
}

impl MetricsSnapshot {
    #[must_use]
    pub fn no_data() -> Self {
        Self {
            bmi: None,
            bmi_category: BmiCategory::NoData,
            health_score: 0,
            mood: EmotionalState::Neutral,
        }
    }

    #[must_use]
    pub fn is_available(&self) -> bool {
        self.bmi_category != BmiCategory::NoData
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesPoint {
    pub date: NaiveDate,
    pub weight_kg: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecommendationCategory {
    Food,
    Exercise,
    Emotional,
}

impl RecommendationCategory {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Food => "food",
            Self::Exercise => "exercise",
            Self::Emotional => "emotional",
        }
    }
}

impl FromStr for RecommendationCategory {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "food" => Ok(Self::Food),
            "exercise" => Ok(Self::Exercise),
            "emotional" => Ok(Self::Emotional),
            _ => Err(Error::InvalidCategory(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Intensity {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub category: RecommendationCategory,
    /// Machine-readable rule key, e.g. `weight_loss` or `stress_relief`.
    pub topic: &'static str,
    pub title: String,
    pub description: String,
    pub reason: String,
    pub priority: Priority,
    #[serde(flatten)]
    pub details: RecommendationDetails,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RecommendationDetails {
    Food {
        foods: Vec<String>,
        #[serde(skip_serializing_if = "Vec::is_empty")]
        avoid: Vec<String>,
    },
    Exercise {
        exercises: Vec<String>,
        duration: String,
        frequency: String,
        intensity: Intensity,
    },
    Emotional {
        activities: Vec<String>,
        tips: Vec<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSnapshot {
    pub metrics: MetricsSnapshot,
    pub series: Vec<SeriesPoint>,
    pub recommendations: Vec<Recommendation>,
    pub total_records: usize,
    pub recent_symptoms: Vec<Symptom>,
}

// --- Validation ---

/// Reject weights that cannot feed a BMI computation.
pub fn validate_weight(weight_kg: f64) -> Result<f64> {
    if !weight_kg.is_finite() || weight_kg <= 0.0 {
        return Err(validation("weight_kg must be greater than 0"));
    }
    Ok(weight_kg)
}

pub const MAX_HEIGHT_M: f64 = 3.0;

pub fn validate_height(height_m: f64) -> Result<f64> {
    if !height_m.is_finite() || height_m <= 0.0 || height_m > MAX_HEIGHT_M {
        return Err(validation(format!(
            "height_m must be greater than 0 and at most {MAX_HEIGHT_M}"
        )));
    }
    Ok(height_m)
}

pub fn validate_symptom_name(name: &str) -> Result<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(validation("Symptom name must not be empty"));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emotional_state_parse_case_insensitive() {
        assert_eq!("Happy".parse::<EmotionalState>().unwrap(), EmotionalState::Happy);
        assert_eq!(
            " STRESSED ".parse::<EmotionalState>().unwrap(),
            EmotionalState::Stressed
        );
        assert!("grumpy".parse::<EmotionalState>().is_err());
    }

    #[test]
    fn test_emotional_state_distressed() {
        assert!(EmotionalState::Sad.is_distressed());
        assert!(EmotionalState::Anxious.is_distressed());
        assert!(!EmotionalState::Happy.is_distressed());
        assert!(!EmotionalState::Neutral.is_distressed());
    }

    #[test]
    fn test_category_parse_rejects_unknown() {
        assert_eq!(
            "Exercise".parse::<RecommendationCategory>().unwrap(),
            RecommendationCategory::Exercise
        );
        let err = "sleep".parse::<RecommendationCategory>().unwrap_err();
        assert!(matches!(err, Error::InvalidCategory(ref c) if c == "sleep"));
    }

    #[test]
    fn test_validate_weight() {
        assert!(validate_weight(70.0).is_ok());
        assert!(validate_weight(0.0).is_err());
        assert!(validate_weight(-5.0).is_err());
        assert!(validate_weight(f64::NAN).is_err());
    }

    #[test]
    fn test_validate_height() {
        assert!(validate_height(1.70).is_ok());
        assert!(validate_height(0.0).is_err());
        assert!(validate_height(3.5).is_err());
        assert!(validate_height(f64::INFINITY).is_err());
    }

    #[test]
    fn test_validate_symptom_name_trims() {
        assert_eq!(validate_symptom_name("  Insomnia ").unwrap(), "Insomnia");
        assert!(validate_symptom_name("   ").is_err());
    }

    #[test]
    fn test_default_reminders_seed() {
        let seeds = default_reminders();
        assert_eq!(seeds.len(), 3);
        assert!(seeds[0].is_active);
        assert!(!seeds[2].is_active);
        assert_eq!(seeds[2].reminder_type, ReminderType::Exercise);
    }

    #[test]
    fn test_recent_signals_has_symptom() {
        let signals = RecentSignals {
            symptoms: vec![Symptom {
                id: 1,
                name: "Joint Pain".to_string(),
                kind: SymptomKind::Physical,
                logged_at: Utc::now(),
            }],
            activity_level: None,
        };
        assert!(signals.has_symptom(&["joint pain", "muscle pain"]));
        assert!(!signals.has_symptom(&["insomnia"]));
        assert!(!signals.has_mental_symptom(&["joint pain"]));
    }

    #[test]
    fn test_mental_symptom_window() {
        let symptom = |id: i64, name: &str, kind| Symptom {
            id,
            name: name.to_string(),
            kind,
            logged_at: Utc::now(),
        };
        let mut symptoms: Vec<Symptom> = (1..=5)
            .map(|id| symptom(id, "anxiety", SymptomKind::Mental))
            .collect();
        symptoms.insert(2, symptom(10, "headache", SymptomKind::Physical));
        symptoms.push(symptom(6, "Loneliness", SymptomKind::Mental));
        let signals = RecentSignals {
            symptoms,
            activity_level: None,
        };

        assert!(signals.has_mental_symptom(&["anxiety"]));
        // sixth mental symptom falls outside the window
        assert!(!signals.has_mental_symptom(&["loneliness"]));
        assert!(signals.has_symptom(&["loneliness"]));
    }

    #[test]
    fn test_food_details_omit_empty_avoid() {
        let rec = Recommendation {
            category: RecommendationCategory::Food,
            topic: "weight_gain",
            title: "t".to_string(),
            description: "d".to_string(),
            reason: "r".to_string(),
            priority: Priority::Medium,
            details: RecommendationDetails::Food {
                foods: vec!["Avocado".to_string()],
                avoid: vec![],
            },
        };
        let json = serde_json::to_value(&rec).unwrap();
        assert_eq!(json["category"], "food");
        assert_eq!(json["priority"], "medium");
        assert_eq!(json["foods"][0], "Avocado");
        assert!(json.get("avoid").is_none());
    }

    #[test]
    fn test_metrics_no_data_serializes_null_bmi() {
        let json = serde_json::to_value(MetricsSnapshot::no_data()).unwrap();
        assert!(json["bmi"].is_null());
        assert_eq!(json["bmi_category"], "NoData");
        assert_eq!(json["health_score"], 0);
        assert_eq!(json["mood"], "neutral");
    }

    #[test]
    fn test_reminder_type_serializes_as_type() {
        let reminder = Reminder {
            id: 1,
            reminder_type: ReminderType::Water,
            label: "Drink".to_string(),
            scheduled_time: "07:00".to_string(),
            is_active: true,
        };
        let json = serde_json::to_value(&reminder).unwrap();
        assert_eq!(json["type"], "water");
        assert_eq!(json["is_active"], true);
    }
}
