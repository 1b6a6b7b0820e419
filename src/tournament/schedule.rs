//! When recurring tournaments get created.

use chrono::{DateTime, Datelike, NaiveDate, Timelike, Utc};

use crate::combat::Difficulty;
use crate::config::EngineConfig;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct TournamentTemplate {
    pub name: &'static str,
    pub difficulty: Difficulty,
    pub entry_fee: u64,
}

pub const DAILY_CHAMPIONSHIP: TournamentTemplate = TournamentTemplate {
    name: "Daily Championship",
    difficulty: Difficulty::Medium,
    entry_fee: 100,
};

pub const WEEKLY_GRAND_TOURNAMENT: TournamentTemplate = TournamentTemplate {
    name: "Weekly Grand Tournament",
    difficulty: Difficulty::Hard,
    entry_fee: 500,
};

/// Templates that should be created at `now`. `existing` lists the name and
/// creation date of every tracked tournament; a template is skipped when one
/// with the same name was already created today.
pub fn due_creations(
    now: DateTime<Utc>,
    config: &EngineConfig,
    existing: &[(String, NaiveDate)],
) -> Vec<TournamentTemplate> {
    let today = now.date_naive();
    let exists_today = |name: &str| {
        existing
            .iter()
            .any(|(existing_name, date)| existing_name == name && *date == today)
    };

    let mut due = Vec::new();
    if now.hour() == config.daily_hour && !exists_today(DAILY_CHAMPIONSHIP.name) {
        due.push(DAILY_CHAMPIONSHIP);
    }
    if now.weekday() == config.weekly_weekday
        && now.hour() == config.weekly_hour
        && !exists_today(WEEKLY_GRAND_TOURNAMENT.name)
    {
        due.push(WEEKLY_GRAND_TOURNAMENT);
    }
    due
}
