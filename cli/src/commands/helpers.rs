use anyhow::{Result, bail};
use chrono::{DateTime, Local, Utc};
use tabled::{
    Table, Tabled,
    settings::{Alignment, Modify, Style, object::Columns},
};

use vitalog_core::models::{Priority, Recommendation, RecommendationDetails};

pub(crate) const LBS_PER_KG: f64 = 2.20462;
pub(crate) const KG_PER_LB: f64 = 0.453_592;

/// Convert a weight in `unit` (kg or lbs) to kilograms.
pub(crate) fn to_kg(value: f64, unit: &str) -> Result<f64> {
    if value <= 0.0 || !value.is_finite() {
        bail!("Weight must be greater than 0");
    }

    match unit.to_lowercase().as_str() {
        "kg" => Ok(value),
        "lbs" | "lb" => {
            let kg = no_neg_zero(value * KG_PER_LB);
            eprintln!("Converting {value:.1} lbs → {kg:.2} kg");
            Ok(kg)
        }
        _ => bail!("Invalid unit '{unit}'. Use 'kg' or 'lbs'"),
    }
}

pub(crate) fn format_weight(kg: f64) -> String {
    format!("{kg:.1} kg ({:.1} lbs)", kg * LBS_PER_KG)
}

pub(crate) fn format_local(ts: DateTime<Utc>) -> String {
    ts.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string()
}

pub(crate) fn priority_label(priority: Priority) -> &'static str {
    match priority {
        Priority::High => "high",
        Priority::Medium => "medium",
        Priority::Low => "low",
    }
}

/// Summary line under a recommendation's title.
fn details_line(details: &RecommendationDetails) -> String {
    match details {
        RecommendationDetails::Food { foods, avoid } => {
            let mut line = format!("Eat: {}", foods.join(", "));
            if !avoid.is_empty() {
                line.push_str(&format!("\n      Avoid: {}", avoid.join(", ")));
            }
            line
        }
        RecommendationDetails::Exercise {
            exercises,
            duration,
            frequency,
            intensity,
        } => format!(
            "Try: {}\n      {duration}, {frequency}, {intensity:?} intensity",
            exercises.join(", ")
        ),
        RecommendationDetails::Emotional { activities, tips } => format!(
            "Try: {}\n      Tips: {}",
            activities.join(", "),
            tips.join("; ")
        ),
    }
}

pub(crate) fn print_recommendations(recs: &[Recommendation]) {
    for rec in recs {
        println!("[{}] {}", priority_label(rec.priority), rec.title);
        println!("      {} ({})", rec.description, rec.reason);
        println!("      {}", details_line(&rec.details));
    }
}

/// Render rows with the shared table style, right-aligning `numeric` columns.
pub(crate) fn print_table<T: Tabled>(rows: &[T], numeric: std::ops::Range<usize>) {
    let table = Table::new(rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::new(numeric)).with(Alignment::right()))
        .to_string();
    println!("{table}");
}

pub(crate) fn no_neg_zero(v: f64) -> f64 {
    if v == 0.0 { 0.0 } else { v }
}

pub(crate) fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let end = s.char_indices().nth(max - 3).map_or(s.len(), |(i, _)| i);
        format!("{}...", &s[..end])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vitalog_core::models::{Intensity, RecommendationCategory};

    #[test]
    fn test_to_kg_passthrough() {
        assert!((to_kg(70.0, "kg").unwrap() - 70.0).abs() < f64::EPSILON);
        assert!((to_kg(70.0, "KG").unwrap() - 70.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_to_kg_converts_pounds() {
        let kg = to_kg(154.0, "lbs").unwrap();
        assert!((kg - 69.853).abs() < 0.001);
        assert!((to_kg(10.0, "lb").unwrap() - 4.53592).abs() < 1e-9);
    }

    #[test]
    fn test_to_kg_rejects_bad_input() {
        assert!(to_kg(0.0, "kg").is_err());
        assert!(to_kg(-5.0, "lbs").is_err());
        assert!(to_kg(70.0, "stone").is_err());
    }

    #[test]
    fn test_format_weight() {
        assert_eq!(format_weight(70.0), "70.0 kg (154.3 lbs)");
    }

    #[test]
    fn test_details_line_food_without_avoid() {
        let line = details_line(&RecommendationDetails::Food {
            foods: vec!["Avocado".to_string(), "Eggs".to_string()],
            avoid: vec![],
        });
        assert_eq!(line, "Eat: Avocado, Eggs");
    }

    #[test]
    fn test_details_line_exercise() {
        let rec = Recommendation {
            category: RecommendationCategory::Exercise,
            topic: "beginner",
            title: "t".to_string(),
            description: "d".to_string(),
            reason: "r".to_string(),
            priority: Priority::Medium,
            details: RecommendationDetails::Exercise {
                exercises: vec!["Walking".to_string()],
                duration: "15-30 minutes".to_string(),
                frequency: "3-4 times/week".to_string(),
                intensity: Intensity::Low,
            },
        };
        let line = details_line(&rec.details);
        assert!(line.starts_with("Try: Walking"));
        assert!(line.contains("15-30 minutes, 3-4 times/week, Low intensity"));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("hello", 10), "hello");
        assert_eq!(truncate("hello world this is long", 10), "hello w...");
    }

    #[test]
    fn test_truncate_utf8() {
        assert_eq!(truncate("Crème fraîche", 10), "Crème f...");
        assert_eq!(truncate("Müsli", 10), "Müsli");
    }

    #[test]
    fn test_no_neg_zero() {
        assert_eq!(no_neg_zero(-0.0).to_bits(), 0.0_f64.to_bits());
        assert_eq!(no_neg_zero(5.0), 5.0);
    }
}
