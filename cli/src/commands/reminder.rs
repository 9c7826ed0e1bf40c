use anyhow::Result;
use tabled::Tabled;

use vitalog_core::db::Database;
use vitalog_core::engine::HealthEngine;

use super::helpers::print_table;

pub(crate) fn cmd_reminder_list(engine: &HealthEngine<Database>, json: bool) -> Result<()> {
    let reminders = engine.list_reminders()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&reminders)?);
    } else {
        #[derive(Tabled)]
        struct ReminderRow {
            #[tabled(rename = "ID")]
            id: i64,
            #[tabled(rename = "Time")]
            time: String,
            #[tabled(rename = "Type")]
            kind: &'static str,
            #[tabled(rename = "Label")]
            label: String,
            #[tabled(rename = "Active")]
            active: &'static str,
        }

        let rows: Vec<ReminderRow> = reminders
            .iter()
            .map(|r| ReminderRow {
                id: r.id,
                time: r.scheduled_time.clone(),
                kind: r.reminder_type.as_str(),
                label: r.label.clone(),
                active: if r.is_active { "yes" } else { "no" },
            })
            .collect();

        print_table(&rows, 0..1);
    }

    Ok(())
}

pub(crate) fn cmd_reminder_toggle(engine: &HealthEngine<Database>, id: i64, json: bool) -> Result<()> {
    let reminder = engine.toggle_reminder(id)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&reminder)?);
    } else {
        let state = if reminder.is_active { "on" } else { "off" };
        println!(
            "Reminder '{}' at {} is now {state}",
            reminder.label, reminder.scheduled_time
        );
    }

    Ok(())
}
