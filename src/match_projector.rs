use crate::error::EtlError;
use crate::match_filter::ID_COLUMN;
use crate::table::Table;

pub const MATCH_COLUMNS: [&str; 36] = [
    "tournament",
    "date",
    "year",
    "home_team",
    "away_team",
    "score",
    "local_ball_position",
    "away_ball_position",
    "local_goals",
    "away_goals",
    "local_kicks_to_goals",
    "away_kicks_to_goals",
    "local_outside_kicks",
    "away_outside_kicks",
    "local_total_kicks",
    "away_total_kicks",
    "local_shortcuts",
    "away_shortcuts",
    "local_corner_kicks",
    "away_corner_kicks",
    "local_offside",
    "away_offside",
    "local_red_cards.1",
    "away_red_cards.1",
    "local_substitutions",
    "away_substitutions",
    "local_faults",
    "away_faults",
    "local_assists",
    "away_assists",
    "local_crossbar_kicks",
    "away_crossbar_kicks",
    "local_lesions",
    "away_lesions",
    "local_commited_penalties",
    "away_commited_penalties",
];

// Numeric red-card counts; the list-valued columns of the same base name feed events.
pub const DROPPED_COLUMNS: [&str; 2] = ["local_red_cards.1", "away_red_cards.1"];

pub fn match_column_name(source: &str) -> Option<String> {
    match source {
        "tournament" => Some("tournament_ID".to_string()),
        "home_team" => Some("home_team_ID".to_string()),
        "away_team" => Some("away_team_ID".to_string()),
        other => other.strip_prefix("local_").map(|rest| format!("home_{rest}")),
    }
}

/// Normalized match table: one row per whitelisted match, same order, `id` first.
pub fn project_matches(filtered: &Table) -> Result<Table, EtlError> {
    let mut matches = filtered.select(&MATCH_COLUMNS, "whitelisted matches")?;
    matches.drop_columns(&DROPPED_COLUMNS);
    matches.rename_columns(match_column_name);
    Ok(matches.with_row_ids(ID_COLUMN, true))
}
