use anyhow::Result;
use tabled::Tabled;

use vitalog_core::db::Database;
use vitalog_core::engine::HealthEngine;
use vitalog_core::models::{MetricsSnapshot, SeriesPoint};

use super::helpers::{LBS_PER_KG, format_local, print_recommendations, print_table, truncate};

fn print_metrics(metrics: &MetricsSnapshot) {
    match metrics.bmi {
        Some(bmi) => {
            println!("BMI:          {bmi:.1} ({:?})", metrics.bmi_category);
            println!("Health score: {}/100", metrics.health_score);
            println!("Mood:         {}", metrics.mood);
        }
        None => println!("No data yet. Log your weight with `vitalog log <weight>`."),
    }
}

fn print_series(series: &[SeriesPoint]) {
    #[derive(Tabled)]
    struct SeriesRow {
        #[tabled(rename = "Date")]
        date: String,
        #[tabled(rename = "Weight (kg)")]
        kg: String,
        #[tabled(rename = "Weight (lbs)")]
        lbs: String,
    }

    let rows: Vec<SeriesRow> = series
        .iter()
        .map(|p| SeriesRow {
            date: p.date.format("%Y-%m-%d").to_string(),
            kg: format!("{:.1}", p.weight_kg),
            lbs: format!("{:.1}", p.weight_kg * LBS_PER_KG),
        })
        .collect();

    print_table(&rows, 1..3);
}

pub(crate) fn cmd_dashboard(engine: &HealthEngine<Database>, json: bool) -> Result<()> {
    let dash = engine.dashboard()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&dash)?);
        return Ok(());
    }

    print_metrics(&dash.metrics);
    println!("Records:      {}", dash.total_records);

    if !dash.series.is_empty() {
        println!("\nRecent weight");
        print_series(&dash.series);
    }

    if !dash.recent_symptoms.is_empty() {
        println!("\nSymptoms this week");
        for s in &dash.recent_symptoms {
            println!(
                "  {} ({}, {})",
                truncate(&s.name, 40),
                s.kind.as_str(),
                format_local(s.logged_at)
            );
        }
    }

    if !dash.recommendations.is_empty() {
        println!("\nFood suggestions");
        print_recommendations(&dash.recommendations);
    }

    Ok(())
}

pub(crate) fn cmd_series(engine: &HealthEngine<Database>, window: usize, json: bool) -> Result<()> {
    let series = engine.series(window)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&series)?);
    } else if series.is_empty() {
        eprintln!("No health logs yet. Use `vitalog log <weight>` to record one.");
    } else {
        print_series(&series);
    }

    Ok(())
}
