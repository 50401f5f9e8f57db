use clap::Subcommand;
use serde_json::json;

use super::open_repository;

#[derive(Subcommand)]
pub enum StatsAction {
    /// Study minutes logged today
    Today,
    /// Study minutes per day for the last 7 days
    Week,
    /// Consecutive study days
    Streak,
    /// Progress toward the daily goal
    Goal,
}

pub fn run(action: StatsAction) -> Result<(), Box<dyn std::error::Error>> {
    let repo = open_repository()?;

    let output = match action {
        StatsAction::Today => json!({ "today_minutes": repo.get_today_study_time() }),
        StatsAction::Week => {
            let week = repo.get_weekly_study_time();
            json!({
                "days": week.as_map(),
                "total_minutes": week.total_minutes(),
                "daily_average_minutes": week.daily_average_minutes(),
            })
        }
        StatsAction::Streak => json!({
            "current_streak": repo.get_current_streak(),
            "last_study_date": repo.get_last_study_date(),
        }),
        StatsAction::Goal => serde_json::to_value(repo.get_daily_goal_progress())?,
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
