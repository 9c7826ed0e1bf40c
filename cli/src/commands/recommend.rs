use anyhow::Result;

use vitalog_core::db::Database;
use vitalog_core::engine::HealthEngine;

use super::helpers::print_recommendations;

pub(crate) fn cmd_recommend(
    engine: &HealthEngine<Database>,
    category: &str,
    json: bool,
) -> Result<()> {
    let recs = engine.recommendations(category)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&recs)?);
    } else if recs.is_empty() {
        eprintln!("No recommendations yet. Log your weight with `vitalog log <weight>` first.");
    } else {
        print_recommendations(&recs);
    }

    Ok(())
}
