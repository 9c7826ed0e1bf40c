use anyhow::Result;
use tabled::Tabled;

use vitalog_core::db::Database;
use vitalog_core::engine::HealthEngine;
use vitalog_core::models::SymptomKind;

use super::helpers::{format_local, print_table, truncate};

pub(crate) fn cmd_symptom_log(
    engine: &HealthEngine<Database>,
    name: &str,
    kind: &str,
    json: bool,
) -> Result<()> {
    let kind: SymptomKind = kind.parse()?;
    let symptom = engine.log_symptom(name, kind)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&symptom)?);
    } else {
        println!(
            "Logged {} symptom '{}' (ID: {})",
            symptom.kind.as_str(),
            symptom.name,
            symptom.id
        );
    }

    Ok(())
}

pub(crate) fn cmd_symptom_list(
    engine: &HealthEngine<Database>,
    limit: Option<usize>,
    json: bool,
) -> Result<()> {
    let symptoms = engine.list_symptoms(limit)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&symptoms)?);
    } else if symptoms.is_empty() {
        eprintln!("No symptoms logged. Use `vitalog symptom log <name>` to add one.");
    } else {
        #[derive(Tabled)]
        struct SymptomRow {
            #[tabled(rename = "ID")]
            id: i64,
            #[tabled(rename = "Logged")]
            logged: String,
            #[tabled(rename = "Symptom")]
            name: String,
            #[tabled(rename = "Kind")]
            kind: &'static str,
        }

        let rows: Vec<SymptomRow> = symptoms
            .iter()
            .map(|s| SymptomRow {
                id: s.id,
                logged: format_local(s.logged_at),
                name: truncate(&s.name, 35),
                kind: s.kind.as_str(),
            })
            .collect();

        print_table(&rows, 0..1);
    }

    Ok(())
}
