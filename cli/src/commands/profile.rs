use anyhow::Result;

use vitalog_core::db::Database;
use vitalog_core::engine::HealthEngine;
use vitalog_core::models::{ActivityLevel, Profile};

fn print_profile(profile: &Profile) {
    println!("Height:   {:.2} m", profile.height_m);
    println!(
        "Activity: {}",
        profile.activity_level.map_or("not set", ActivityLevel::as_str)
    );
}

pub(crate) fn cmd_profile_set(
    engine: &HealthEngine<Database>,
    height_m: f64,
    activity: Option<&str>,
    json: bool,
) -> Result<()> {
    let activity_level = activity.map(str::parse::<ActivityLevel>).transpose()?;
    let profile = engine.set_profile(Profile {
        height_m,
        activity_level,
    })?;

    if json {
        println!("{}", serde_json::to_string_pretty(&profile)?);
    } else {
        println!("Profile updated");
        print_profile(&profile);
    }

    Ok(())
}

pub(crate) fn cmd_profile_show(engine: &HealthEngine<Database>, json: bool) -> Result<()> {
    let profile = engine.get_profile()?;

    match (profile, json) {
        (Some(p), true) => println!("{}", serde_json::to_string_pretty(&p)?),
        (Some(p), false) => print_profile(&p),
        (None, true) => println!("{}", serde_json::json!({ "error": "Profile not set" })),
        (None, false) => {
            eprintln!("No profile yet. Use `vitalog profile set --height <meters>`.");
        }
    }

    Ok(())
}
