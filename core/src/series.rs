use crate::models::{HealthLogEntry, SeriesPoint};

/// Number of points charted on the dashboard.
pub const DEFAULT_WINDOW: usize = 7;

/// Project newest-first entries into an oldest-first weight series of at most
/// `window` points.
#[must_use]
pub fn build_series(entries: &[HealthLogEntry], window: usize) -> Vec<SeriesPoint> {
    entries
        .iter()
        .take(window)
        .rev()
        .map(|e| SeriesPoint {
            date: e.recorded_at.date_naive(),
            weight_kg: e.weight_kg,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EmotionalState;
    use chrono::{NaiveDate, TimeZone, Utc};

    /// Ten entries for June 1-10, returned newest-first like the store does.
    fn ten_days() -> Vec<HealthLogEntry> {
        (1..=10u32)
            .rev()
            .map(|day| HealthLogEntry {
                id: i64::from(day),
                uuid: format!("uuid-{day}"),
                recorded_at: Utc.with_ymd_and_hms(2024, 6, day, 7, 30, 0).unwrap(),
                weight_kg: 80.0 - f64::from(day) * 0.5,
                emotional_state: EmotionalState::Neutral,
            })
            .collect()
    }

    #[test]
    fn test_empty_store_gives_empty_series() {
        assert!(build_series(&[], DEFAULT_WINDOW).is_empty());
    }

    #[test]
    fn test_ten_entries_give_seven_ascending_points() {
        let entries = ten_days();
        let series = build_series(&entries, DEFAULT_WINDOW);

        assert_eq!(series.len(), 7);
        assert_eq!(series[0].date, NaiveDate::from_ymd_opt(2024, 6, 4).unwrap());
        assert_eq!(series[6].date, NaiveDate::from_ymd_opt(2024, 6, 10).unwrap());
        assert!(series.windows(2).all(|w| w[0].date < w[1].date));
        assert!((series[6].weight_kg - 75.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_input_order_untouched() {
        let entries = ten_days();
        let before: Vec<i64> = entries.iter().map(|e| e.id).collect();
        let _ = build_series(&entries, DEFAULT_WINDOW);
        let after: Vec<i64> = entries.iter().map(|e| e.id).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_fewer_entries_than_window() {
        let entries = ten_days();
        let series = build_series(&entries[..3], DEFAULT_WINDOW);
        assert_eq!(series.len(), 3);
        assert_eq!(series[2].date, NaiveDate::from_ymd_opt(2024, 6, 10).unwrap());
    }

    #[test]
    fn test_custom_window() {
        let series = build_series(&ten_days(), 2);
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].date, NaiveDate::from_ymd_opt(2024, 6, 9).unwrap());
    }
}
