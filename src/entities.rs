use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use anyhow::anyhow;

use crate::error::EtlError;
use crate::match_filter::{ID_COLUMN, TOURNAMENT_COLUMN};
use crate::table::Table;

pub const HOME_TEAM_COLUMN: &str = "home_team";
pub const AWAY_TEAM_COLUMN: &str = "away_team";

const LIST_SEPARATOR: &str = ", ";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListColumn {
    LocalScorers,
    AwayScorers,
    LocalYellowCards,
    AwayYellowCards,
    LocalRedCards,
    AwayRedCards,
}

impl ListColumn {
    pub const ALL: [ListColumn; 6] = [
        ListColumn::LocalScorers,
        ListColumn::AwayScorers,
        ListColumn::LocalYellowCards,
        ListColumn::AwayYellowCards,
        ListColumn::LocalRedCards,
        ListColumn::AwayRedCards,
    ];

    pub fn column_name(self) -> &'static str {
        match self {
            ListColumn::LocalScorers => "local_scorers",
            ListColumn::AwayScorers => "away_scorers",
            ListColumn::LocalYellowCards => "local_yellow_cards",
            ListColumn::AwayYellowCards => "away_yellow_cards",
            ListColumn::LocalRedCards => "local_red_cards",
            ListColumn::AwayRedCards => "away_red_cards",
        }
    }

    pub fn event_kind(self) -> EventKind {
        match self {
            ListColumn::LocalScorers => EventKind::GoalLocal,
            ListColumn::AwayScorers => EventKind::GoalAway,
            ListColumn::LocalYellowCards => EventKind::YellowCardLocal,
            ListColumn::AwayYellowCards => EventKind::YellowCardAway,
            ListColumn::LocalRedCards => EventKind::RedCardLocal,
            ListColumn::AwayRedCards => EventKind::RedCardAway,
        }
    }

    pub fn side(self) -> Side {
        if self.column_name().contains("local") {
            Side::Home
        } else {
            Side::Away
        }
    }

    fn index(self) -> usize {
        match self {
            ListColumn::LocalScorers => 0,
            ListColumn::AwayScorers => 1,
            ListColumn::LocalYellowCards => 2,
            ListColumn::AwayYellowCards => 3,
            ListColumn::LocalRedCards => 4,
            ListColumn::AwayRedCards => 5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Home,
    Away,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    GoalLocal,
    GoalAway,
    YellowCardLocal,
    YellowCardAway,
    RedCardLocal,
    RedCardAway,
}

impl EventKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EventKind::GoalLocal => "goal_local",
            EventKind::GoalAway => "goal_away",
            EventKind::YellowCardLocal => "yellow_card_local",
            EventKind::YellowCardAway => "yellow_card_away",
            EventKind::RedCardLocal => "red_card_local",
            EventKind::RedCardAway => "red_card_away",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How player candidates collapse into the players table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlayerIdentity {
    // A player seen for two teams keeps only the first team.
    #[default]
    ByName,
    ByNameAndTeam,
}

impl FromStr for PlayerIdentity {
    type Err = anyhow::Error;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "name" => Ok(PlayerIdentity::ByName),
            "name_team" => Ok(PlayerIdentity::ByNameAndTeam),
            other => Err(anyhow!(
                "unknown player identity '{other}' (expected name|name_team)"
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TeamScope {
    #[default]
    HomeOnly,
    HomeAndAway,
}

impl FromStr for TeamScope {
    type Err = anyhow::Error;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "home" => Ok(TeamScope::HomeOnly),
            "home_away" => Ok(TeamScope::HomeAndAway),
            other => Err(anyhow!("unknown team scope '{other}' (expected home|home_away)")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractOptions {
    pub roster_sources: Vec<ListColumn>,
    pub player_identity: PlayerIdentity,
    pub team_scope: TeamScope,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            roster_sources: ListColumn::ALL.to_vec(),
            player_identity: PlayerIdentity::default(),
            team_scope: TeamScope::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchEntry {
    pub id: u32,
    pub tournament: String,
    pub home_team: String,
    pub away_team: String,
    lists: [Vec<String>; 6],
}

impl MatchEntry {
    pub fn names(&self, column: ListColumn) -> &[String] {
        &self.lists[column.index()]
    }

    pub fn team(&self, side: Side) -> &str {
        match side {
            Side::Home => &self.home_team,
            Side::Away => &self.away_team,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    pub name: String,
    pub team: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Team {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tournament {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub kind: EventKind,
    pub match_id: u32,
    pub team: String,
    pub player: String,
}

pub fn split_names(cell: &str) -> Vec<String> {
    if cell.is_empty() {
        return Vec::new();
    }
    cell.split(LIST_SEPARATOR).map(str::to_string).collect()
}

/// Reads the whitelisted table into typed entries; list cells are split here.
pub fn match_entries(filtered: &Table) -> Result<Vec<MatchEntry>, EtlError> {
    const TABLE: &str = "whitelisted matches";
    let id = filtered.require_column(ID_COLUMN, TABLE)?;
    let tournament = filtered.require_column(TOURNAMENT_COLUMN, TABLE)?;
    let home = filtered.require_column(HOME_TEAM_COLUMN, TABLE)?;
    let away = filtered.require_column(AWAY_TEAM_COLUMN, TABLE)?;
    let mut list_cols = [0usize; 6];
    for column in ListColumn::ALL {
        list_cols[column.index()] = filtered.require_column(column.column_name(), TABLE)?;
    }

    let mut out = Vec::with_capacity(filtered.len());
    for row in 0..filtered.len() {
        let position = u32::try_from(row + 1).unwrap_or(u32::MAX);
        out.push(MatchEntry {
            id: filtered.cell(row, id).parse().unwrap_or(position),
            tournament: filtered.cell(row, tournament).to_string(),
            home_team: filtered.cell(row, home).to_string(),
            away_team: filtered.cell(row, away).to_string(),
            lists: list_cols.map(|col| split_names(filtered.cell(row, col))),
        });
    }
    Ok(out)
}

/// Column-major: every match for the first source, then the next source.
pub fn extract_players(
    entries: &[MatchEntry],
    sources: &[ListColumn],
    identity: PlayerIdentity,
) -> Vec<Player> {
    let mut seen: HashSet<(String, Option<String>)> = HashSet::new();
    let mut out = Vec::new();
    for source in sources {
        for entry in entries {
            let team = entry.team(source.side());
            for name in entry.names(*source) {
                let key = match identity {
                    PlayerIdentity::ByName => (name.clone(), None),
                    PlayerIdentity::ByNameAndTeam => (name.clone(), Some(team.to_string())),
                };
                if seen.insert(key) {
                    out.push(Player {
                        name: name.clone(),
                        team: team.to_string(),
                    });
                }
            }
        }
    }
    out
}

pub fn extract_events(entries: &[MatchEntry]) -> Vec<Event> {
    let mut out = Vec::new();
    for entry in entries {
        for column in ListColumn::ALL {
            let team = entry.team(column.side());
            out.extend(entry.names(column).iter().map(|player| Event {
                kind: column.event_kind(),
                match_id: entry.id,
                team: team.to_string(),
                player: player.clone(),
            }));
        }
    }
    out
}

pub fn extract_teams(entries: &[MatchEntry], scope: TeamScope) -> Vec<Team> {
    let names = entries.iter().flat_map(|entry| {
        let away = match scope {
            TeamScope::HomeOnly => None,
            TeamScope::HomeAndAway => Some(entry.away_team.as_str()),
        };
        std::iter::once(entry.home_team.as_str()).chain(away)
    });
    distinct(names)
        .into_iter()
        .map(|name| Team { name })
        .collect()
}

pub fn extract_tournaments(entries: &[MatchEntry]) -> Vec<Tournament> {
    distinct(entries.iter().map(|entry| entry.tournament.as_str()))
        .into_iter()
        .map(|name| Tournament { name })
        .collect()
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for value in values {
        if seen.insert(value) {
            out.push(value.to_string());
        }
    }
    out
}

pub fn players_table(players: &[Player]) -> Table {
    let mut table = Table::new(["name", "team_ID"]);
    for p in players {
        table.push_row(vec![p.name.clone(), p.team.clone()]);
    }
    table.with_row_ids(ID_COLUMN, true)
}

pub fn teams_table(teams: &[Team]) -> Table {
    let mut table = Table::new(["name"]);
    for t in teams {
        table.push_row(vec![t.name.clone()]);
    }
    table.with_row_ids(ID_COLUMN, true)
}

pub fn tournaments_table(tournaments: &[Tournament]) -> Table {
    let mut table = Table::new(["name"]);
    for t in tournaments {
        table.push_row(vec![t.name.clone()]);
    }
    table.with_row_ids(ID_COLUMN, true)
}

pub fn events_table(events: &[Event]) -> Table {
    let mut table = Table::new(["type", "match_ID", "team_ID", "player_ID"]);
    for e in events {
        table.push_row(vec![
            e.kind.to_string(),
            e.match_id.to_string(),
            e.team.clone(),
            e.player.clone(),
        ]);
    }
    table.with_row_ids(ID_COLUMN, true)
}
