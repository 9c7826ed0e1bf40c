use anyhow::Result;
use tabled::Tabled;

use vitalog_core::db::Database;
use vitalog_core::engine::HealthEngine;
use vitalog_core::models::EmotionalState;

use super::helpers::{LBS_PER_KG, format_local, format_weight, print_table, to_kg};

pub(crate) fn cmd_log(
    engine: &HealthEngine<Database>,
    value: f64,
    unit: &str,
    mood: &str,
    json: bool,
) -> Result<()> {
    let weight_kg = to_kg(value, unit)?;
    let mood: EmotionalState = mood.parse()?;
    let entry = engine.add_log(weight_kg, mood)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&entry)?);
    } else {
        println!(
            "Logged {} feeling {} at {}",
            format_weight(entry.weight_kg),
            entry.emotional_state,
            format_local(entry.recorded_at)
        );
    }

    Ok(())
}

pub(crate) fn cmd_history(
    engine: &HealthEngine<Database>,
    limit: Option<usize>,
    json: bool,
) -> Result<()> {
    let entries = engine.list_logs(limit)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
    } else if entries.is_empty() {
        eprintln!("No health logs yet. Use `vitalog log <weight>` to record one.");
    } else {
        #[derive(Tabled)]
        struct LogRow {
            #[tabled(rename = "ID")]
            id: i64,
            #[tabled(rename = "Recorded")]
            recorded: String,
            #[tabled(rename = "Weight (kg)")]
            kg: String,
            #[tabled(rename = "Weight (lbs)")]
            lbs: String,
            #[tabled(rename = "Mood")]
            mood: String,
        }

        let rows: Vec<LogRow> = entries
            .iter()
            .map(|e| LogRow {
                id: e.id,
                recorded: format_local(e.recorded_at),
                kg: format!("{:.1}", e.weight_kg),
                lbs: format!("{:.1}", e.weight_kg * LBS_PER_KG),
                mood: e.emotional_state.to_string(),
            })
            .collect();

        print_table(&rows, 2..4);
    }

    Ok(())
}
