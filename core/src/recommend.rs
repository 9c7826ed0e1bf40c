//! Rule table turning metrics and recent signals into lifestyle suggestions.
//!
//! The rules are heuristics, not medical advice. Every category starts from
//! one primary rule keyed on BMI category (food, exercise) or mood
//! (emotional), then adds extra rules for matching symptoms or the profile's
//! activity level. Output is ordered by priority, highest first; rules of the
//! same priority keep table order.

use crate::models::{
    ActivityLevel, BmiCategory, EmotionalState, Intensity, MetricsSnapshot, Priority,
    RecentSignals, Recommendation, RecommendationCategory, RecommendationDetails,
};

/// Below this score, exercise intensity is capped at Low.
const LOW_SCORE: u8 = 50;
/// Below this score, exercise intensity is capped at Medium.
const MODERATE_SCORE: u8 = 70;

const BLOOD_PRESSURE_SYMPTOMS: &[&str] = &["high blood pressure", "hypertension"];
const DIGESTIVE_SYMPTOMS: &[&str] = &["indigestion", "heartburn", "gastritis", "digestive issues"];
const CHOLESTEROL_SYMPTOMS: &[&str] = &["high cholesterol"];
const FATIGUE_SYMPTOMS: &[&str] = &["fatigue", "physical fatigue", "burnout"];
const PAIN_SYMPTOMS: &[&str] = &["joint pain", "muscle pain"];
const SLEEP_SYMPTOMS: &[&str] = &["insomnia", "sleep problems", "trouble sleeping"];
const BURNOUT_SYMPTOMS: &[&str] = &["burnout"];
const LONELINESS_SYMPTOMS: &[&str] = &["loneliness", "social isolation"];

/// Suggestions for `category`. Empty when the metrics carry no data.
#[must_use]
pub fn recommend(
    category: RecommendationCategory,
    metrics: &MetricsSnapshot,
    signals: &RecentSignals,
) -> Vec<Recommendation> {
    if !metrics.is_available() {
        return Vec::new();
    }

    let mut recs = match category {
        RecommendationCategory::Food => food(metrics, signals),
        RecommendationCategory::Exercise => exercise(metrics, signals),
        RecommendationCategory::Emotional => emotional(metrics, signals),
    };
    recs.sort_by(|a, b| b.priority.cmp(&a.priority));
    recs
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

// --- Food ---

fn food_rec(
    topic: &'static str,
    title: &str,
    description: &str,
    reason: &str,
    priority: Priority,
    foods: &[&str],
    avoid: &[&str],
) -> Recommendation {
    Recommendation {
        category: RecommendationCategory::Food,
        topic,
        title: title.to_string(),
        description: description.to_string(),
        reason: reason.to_string(),
        priority,
        details: RecommendationDetails::Food {
            foods: strings(foods),
            avoid: strings(avoid),
        },
    }
}

fn food(metrics: &MetricsSnapshot, signals: &RecentSignals) -> Vec<Recommendation> {
    let mut recs = Vec::new();

    match metrics.bmi_category {
        BmiCategory::Underweight => recs.push(food_rec(
            "weight_gain",
            "Foods to gain weight",
            "Raise calorie intake with nutrient-dense foods",
            "Your BMI is below the normal range",
            Priority::Medium,
            &[
                "Avocado",
                "Nuts and seeds",
                "Whole milk",
                "Brown rice",
                "Lean meat",
                "Eggs",
                "Cheese",
                "Greek yogurt",
            ],
            &[],
        )),
        BmiCategory::Overweight | BmiCategory::Obese => {
            let priority = if metrics.bmi_category == BmiCategory::Obese {
                Priority::High
            } else {
                Priority::Medium
            };
            recs.push(food_rec(
                "weight_loss",
                "Foods to lose weight",
                "Favor low-calorie, high-fiber meals",
                "Your BMI is above the normal range",
                priority,
                &[
                    "Leafy greens",
                    "Fresh fruit",
                    "Fish",
                    "Chicken breast",
                    "Oatmeal",
                    "Quinoa",
                    "Almonds",
                ],
                &[
                    "Fried food",
                    "Sugary snacks",
                    "Sweetened drinks",
                    "Fast food",
                    "Processed food",
                ],
            ));
        }
        BmiCategory::Normal => recs.push(food_rec(
            "maintenance",
            "Keep eating well",
            "Stay with a balanced, varied diet",
            "Your BMI is in the normal range",
            Priority::Low,
            &[
                "Colorful vegetables",
                "Balanced protein",
                "Complex carbohydrates",
                "Fresh fruit",
                "Plenty of water",
            ],
            &["Ultra-processed food", "Excess added sugar"],
        )),
        BmiCategory::NoData => {}
    }

    if signals.has_symptom(BLOOD_PRESSURE_SYMPTOMS) {
        recs.push(food_rec(
            "blood_pressure",
            "Foods for blood pressure",
            "A DASH-style diet helps keep blood pressure in check",
            "You reported high blood pressure",
            Priority::High,
            &["Bananas", "Spinach", "Broccoli", "Salmon", "Potatoes", "Kidney beans", "Watermelon"],
            &["Excess salt", "Canned food", "Chips", "Salty snacks"],
        ));
    }

    if signals.has_symptom(DIGESTIVE_SYMPTOMS) {
        recs.push(food_rec(
            "digestive",
            "Foods for digestion",
            "Gentle foods that are easy on the stomach",
            "You reported digestive trouble",
            Priority::Medium,
            &["Bananas", "White rice", "Toast", "Boiled chicken", "Ginger", "Papaya", "Yogurt"],
            &["Spicy food", "Coffee", "Alcohol", "Greasy food", "Citrus"],
        ));
    }

    if signals.has_symptom(CHOLESTEROL_SYMPTOMS) {
        recs.push(food_rec(
            "cholesterol",
            "Foods for cholesterol",
            "Foods that help lower cholesterol",
            "You reported high cholesterol",
            Priority::High,
            &["Oatmeal", "Salmon", "Walnuts", "Avocado", "Olive oil", "Apples", "Spinach"],
            &["Fatty red meat", "Butter", "Fried food", "Too many egg yolks"],
        ));
    }

    if signals.has_symptom(FATIGUE_SYMPTOMS) {
        recs.push(food_rec(
            "energy",
            "Energy-boosting foods",
            "Nutrition that helps fight tiredness",
            "You reported fatigue",
            Priority::Medium,
            &["Spinach", "Bananas", "Almonds", "Eggs", "Salmon", "Sweet potatoes", "Dark chocolate"],
            &["Excess sugar", "Excess caffeine", "Alcohol"],
        ));
    }

    recs
}

// --- Exercise ---

struct ExercisePlan {
    topic: &'static str,
    title: &'static str,
    description: &'static str,
    reason: &'static str,
    priority: Priority,
    exercises: &'static [&'static str],
    duration: &'static str,
    frequency: &'static str,
    intensity: Intensity,
}

impl ExercisePlan {
    fn into_rec(self, cap: Intensity) -> Recommendation {
        Recommendation {
            category: RecommendationCategory::Exercise,
            topic: self.topic,
            title: self.title.to_string(),
            description: self.description.to_string(),
            reason: self.reason.to_string(),
            priority: self.priority,
            details: RecommendationDetails::Exercise {
                exercises: strings(self.exercises),
                duration: self.duration.to_string(),
                frequency: self.frequency.to_string(),
                intensity: self.intensity.min(cap),
            },
        }
    }
}

/// Highest intensity a given health score allows.
fn intensity_cap(health_score: u8) -> Intensity {
    if health_score < LOW_SCORE {
        Intensity::Low
    } else if health_score < MODERATE_SCORE {
        Intensity::Medium
    } else {
        Intensity::High
    }
}

fn bmi_exercise_plan(category: BmiCategory) -> Option<ExercisePlan> {
    let plan = match category {
        BmiCategory::Underweight => ExercisePlan {
            topic: "strength_building",
            title: "Build strength gradually",
            description: "Light resistance work to add muscle without burning too much energy",
            reason: "Your BMI is below the normal range",
            priority: Priority::Medium,
            exercises: &["Bodyweight squats", "Resistance bands", "Push-ups", "Gentle yoga"],
            duration: "20-30 minutes",
            frequency: "3 times/week",
            intensity: Intensity::Low,
        },
        BmiCategory::Normal => ExercisePlan {
            topic: "balanced_fitness",
            title: "Keep a balanced routine",
            description: "Mix cardio and strength work to stay fit",
            reason: "Your BMI is in the normal range",
            priority: Priority::Low,
            exercises: &["Jogging", "Cycling", "Strength training", "Swimming", "Badminton"],
            duration: "30-45 minutes",
            frequency: "4-5 times/week",
            intensity: Intensity::High,
        },
        BmiCategory::Overweight => ExercisePlan {
            topic: "weight_loss",
            title: "Cardio for weight loss",
            description: "Steady cardio to burn calories",
            reason: "Your BMI is above the normal range",
            priority: Priority::High,
            exercises: &["Brisk walking", "Swimming", "Stationary bike", "Elliptical trainer", "Zumba"],
            duration: "45-60 minutes",
            frequency: "5 times/week",
            intensity: Intensity::Medium,
        },
        BmiCategory::Obese => ExercisePlan {
            topic: "gentle_weight_loss",
            title: "Low-impact cardio",
            description: "Joint-friendly movement to start burning calories safely",
            reason: "Your BMI is in the obese range",
            priority: Priority::High,
            exercises: &["Walking", "Water aerobics", "Stationary bike", "Chair exercises"],
            duration: "20-30 minutes",
            frequency: "5-6 times/week",
            intensity: Intensity::Low,
        },
        BmiCategory::NoData => return None,
    };
    Some(plan)
}

fn activity_exercise_plan(level: ActivityLevel) -> ExercisePlan {
    match level {
        ActivityLevel::Sedentary => ExercisePlan {
            topic: "beginner",
            title: "Start with light activity",
            description: "Build the exercise habit step by step",
            reason: "Your activity level is low, start slowly",
            priority: Priority::Medium,
            exercises: &["Walking 15-30 minutes", "Morning stretching", "Beginner yoga", "Easy swimming"],
            duration: "15-30 minutes",
            frequency: "3-4 times/week",
            intensity: Intensity::Low,
        },
        ActivityLevel::Light => ExercisePlan {
            topic: "step_up",
            title: "Raise the intensity",
            description: "Add variety and duration to your workouts",
            reason: "You are lightly active, time to push a little",
            priority: Priority::Low,
            exercises: &["Light jogging", "Leisure cycling", "Aerobics", "Pilates"],
            duration: "30-45 minutes",
            frequency: "4-5 times/week",
            intensity: Intensity::Medium,
        },
        ActivityLevel::Moderate => ExercisePlan {
            topic: "variety",
            title: "Vary your training",
            description: "Combine cardio with strength training",
            reason: "You are moderately active, add variety",
            priority: Priority::Low,
            exercises: &["5K run", "HIIT workout", "Weight lifting", "Lap swimming", "Badminton"],
            duration: "45-60 minutes",
            frequency: "5 times/week",
            intensity: Intensity::Medium,
        },
        ActivityLevel::Active => ExercisePlan {
            topic: "performance",
            title: "Maintain performance",
            description: "Stay consistent and avoid overtraining",
            reason: "You are very active, keep the balance",
            priority: Priority::Low,
            exercises: &["Long-distance running", "CrossFit", "Interval training", "Competitive sports"],
            duration: "60+ minutes",
            frequency: "5-6 times/week with one rest day",
            intensity: Intensity::High,
        },
    }
}

fn exercise(metrics: &MetricsSnapshot, signals: &RecentSignals) -> Vec<Recommendation> {
    let cap = intensity_cap(metrics.health_score);
    let mut recs = Vec::new();

    if let Some(plan) = bmi_exercise_plan(metrics.bmi_category) {
        recs.push(plan.into_rec(cap));
    }

    if let Some(level) = signals.activity_level {
        recs.push(activity_exercise_plan(level).into_rec(cap));
    }

    if signals.has_symptom(PAIN_SYMPTOMS) {
        recs.push(
            ExercisePlan {
                topic: "low_impact",
                title: "Low-impact exercise",
                description: "Activities that do not strain the joints",
                reason: "You reported pain, choose gentle movement",
                priority: Priority::High,
                exercises: &["Swimming", "Yoga", "Tai chi", "Stationary bike", "Water aerobics"],
                duration: "20-30 minutes",
                frequency: "3-4 times/week",
                intensity: Intensity::Low,
            }
            .into_rec(cap),
        );
    }

    recs
}

// --- Emotional ---

fn emotional_rec(
    topic: &'static str,
    title: &str,
    description: &str,
    reason: &str,
    priority: Priority,
    activities: &[&str],
    tips: &[&str],
) -> Recommendation {
    Recommendation {
        category: RecommendationCategory::Emotional,
        topic,
        title: title.to_string(),
        description: description.to_string(),
        reason: reason.to_string(),
        priority,
        details: RecommendationDetails::Emotional {
            activities: strings(activities),
            tips: strings(tips),
        },
    }
}

fn mood_rec(mood: EmotionalState) -> Recommendation {
    match mood {
        EmotionalState::Stressed => emotional_rec(
            "stress_relief",
            "Manage your stress",
            "Relaxation techniques to bring stress down",
            "You are feeling stressed",
            Priority::High,
            &[
                "10-minute meditation",
                "4-7-8 breathing",
                "Slow walk outdoors",
                "Calming music",
                "Journaling",
            ],
            &[
                "Sleep 7-8 hours",
                "Limit screen time",
                "Set aside time for yourself",
                "Talk to someone close to you",
            ],
        ),
        EmotionalState::Anxious => emotional_rec(
            "anxiety_relief",
            "Ease your anxiety",
            "Activities that calm an anxious mind",
            "You are feeling anxious",
            Priority::High,
            &[
                "5-4-3-2-1 grounding",
                "Progressive muscle relaxation",
                "Restorative yoga",
                "Coloring",
                "Knitting or crafts",
            ],
            &[
                "Cut back on caffeine",
                "Limit negative news",
                "Stay connected with loved ones",
                "Focus on what you can control",
            ],
        ),
        EmotionalState::Sad => emotional_rec(
            "mood_boost",
            "Lift your mood",
            "Activities that raise your spirits",
            "You are feeling sad",
            Priority::Medium,
            &[
                "Light exercise",
                "Meet a friend",
                "Watch a favorite film",
                "Cook a favorite meal",
                "Gardening",
            ],
            &[
                "Avoid isolating yourself",
                "Keep your routine",
                "Get morning sunlight",
                "If it persists, consider counseling",
            ],
        ),
        EmotionalState::Happy => emotional_rec(
            "keep_positive",
            "Keep the good mood going",
            "Activities that sustain a positive mood",
            "Your mood is good, keep it up",
            Priority::Low,
            &[
                "Share the joy",
                "Gratitude journal",
                "Enjoy a hobby",
                "Quality time with family",
                "Fun exercise",
            ],
            &[
                "Celebrate small wins",
                "Help someone else",
                "Save happy moments",
                "Stay grateful",
            ],
        ),
        EmotionalState::Neutral => emotional_rec(
            "emotional_balance",
            "Keep your emotional balance",
            "Everyday habits for mental well-being",
            "Keep your emotions in balance",
            Priority::Low,
            &[
                "Daily mindfulness",
                "Regular exercise",
                "Creative hobby",
                "Healthy socializing",
                "Learn something new",
            ],
            &[
                "Keep healthy routines",
                "Check in with your feelings regularly",
                "Get enough rest",
            ],
        ),
    }
}

fn emotional(metrics: &MetricsSnapshot, signals: &RecentSignals) -> Vec<Recommendation> {
    let mut recs = vec![mood_rec(metrics.mood)];

    if signals.has_mental_symptom(SLEEP_SYMPTOMS) {
        recs.push(emotional_rec(
            "sleep",
            "Improve your sleep",
            "Habits for better rest",
            "You reported trouble sleeping",
            Priority::Medium,
            &[
                "Fixed bedtime routine",
                "No screens an hour before bed",
                "Warm shower",
                "Lavender aromatherapy",
                "Read a book",
            ],
            &[
                "Keep the bedroom dark and cool",
                "Avoid caffeine in the afternoon",
                "Exercise in the morning, not at night",
            ],
        ));
    }

    if signals.has_mental_symptom(BURNOUT_SYMPTOMS) {
        recs.push(emotional_rec(
            "burnout_recovery",
            "Recover from burnout",
            "Steps to recover from emotional exhaustion",
            "You reported burnout",
            Priority::High,
            &[
                "Take time off",
                "Delegate tasks",
                "Reconnect with what you enjoy",
                "Digital detox",
                "Self-care day",
            ],
            &[
                "Set clear boundaries",
                "Learn to say no",
                "Put your health first",
                "Consider professional counseling",
            ],
        ));
    }

    if signals.has_mental_symptom(LONELINESS_SYMPTOMS) {
        recs.push(emotional_rec(
            "social_connection",
            "Build social connection",
            "Activities that ease loneliness",
            "You reported feeling lonely",
            Priority::Medium,
            &[
                "Call an old friend",
                "Join a hobby group",
                "Volunteer",
                "Take a class or workshop",
            ],
            &[
                "Quality over quantity",
                "Don't be afraid to start a conversation",
                "Online communities count too",
            ],
        ));
    }

    recs
}
