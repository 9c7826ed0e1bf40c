mod dashboard;
mod helpers;
mod log;
mod profile;
mod recommend;
mod reminder;
mod symptom;

pub(crate) use dashboard::{cmd_dashboard, cmd_series};
pub(crate) use log::{cmd_history, cmd_log};
pub(crate) use profile::{cmd_profile_set, cmd_profile_show};
pub(crate) use recommend::cmd_recommend;
pub(crate) use reminder::{cmd_reminder_list, cmd_reminder_toggle};
pub(crate) use symptom::{cmd_symptom_list, cmd_symptom_log};
