use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use crate::config::Config;
use crate::entities::{self, Event, ExtractOptions, Player, Team, Tournament};
use crate::error::EtlError;
use crate::match_date::SPANISH_MONTHS;
use crate::match_filter::{self, TOURNAMENT_WHITELIST};
use crate::match_projector;
use crate::sink::{self, OutputLayout, Sheet};
use crate::source_loader;
use crate::sql_sink::{self, SqlTable};
use crate::table::Table;

#[derive(Debug, Clone)]
pub struct TableSet {
    pub source_files: Vec<String>,
    pub combined: Table,
    pub finalized: Table,
    pub whitelisted: Table,
    pub matches: Table,
    pub players: Vec<Player>,
    pub teams: Vec<Team>,
    pub tournaments: Vec<Tournament>,
    pub events: Vec<Event>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct RowCounts {
    pub combined: usize,
    pub finalized: usize,
    pub whitelisted: usize,
    pub matches: usize,
    pub players: usize,
    pub teams: usize,
    pub tournaments: usize,
    pub events: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub source_files: Vec<String>,
    pub counts: RowCounts,
    pub outputs: Vec<PathBuf>,
}

impl RunSummary {
    /// Single-line JSON report of the run.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).context("serialize run summary")
    }
}

impl TableSet {
    pub fn counts(&self) -> RowCounts {
        RowCounts {
            combined: self.combined.len(),
            finalized: self.finalized.len(),
            whitelisted: self.whitelisted.len(),
            matches: self.matches.len(),
            players: self.players.len(),
            teams: self.teams.len(),
            tournaments: self.tournaments.len(),
            events: self.events.len(),
        }
    }
}

/// Runs every transformation stage in memory; nothing is written.
pub fn build_tables(
    files: &[String],
    source_dir: &Path,
    options: &ExtractOptions,
) -> Result<TableSet, EtlError> {
    let loaded = source_loader::load_sources(files, source_dir, &SPANISH_MONTHS)?;
    let finalized = match_filter::filter_finalized(&loaded.table)?;
    let whitelisted = match_filter::filter_whitelisted(&finalized, &TOURNAMENT_WHITELIST)?;

    let entries = entities::match_entries(&whitelisted)?;
    let players = entities::extract_players(
        &entries,
        &options.roster_sources,
        options.player_identity,
    );
    let teams = entities::extract_teams(&entries, options.team_scope);
    let tournaments = entities::extract_tournaments(&entries);
    let events = entities::extract_events(&entries);
    let matches = match_projector::project_matches(&whitelisted)?;

    Ok(TableSet {
        source_files: loaded.files,
        combined: loaded.table,
        finalized,
        whitelisted,
        matches,
        players,
        teams,
        tournaments,
        events,
    })
}

/// Finalized CSV, whitelisted CSV, then the workbook. A failure part way
/// leaves the earlier files in place.
pub fn write_outputs(tables: &TableSet, layout: &OutputLayout) -> Result<Vec<PathBuf>> {
    let finalized_csv = layout.finalized_csv();
    sink::write_csv(&finalized_csv, &tables.finalized)?;
    let whitelisted_csv = layout.whitelisted_csv();
    sink::write_csv(&whitelisted_csv, &tables.whitelisted)?;

    let players = entities::players_table(&tables.players);
    let teams = entities::teams_table(&tables.teams);
    let tournaments = entities::tournaments_table(&tables.tournaments);
    let events = entities::events_table(&tables.events);
    let workbook = layout.workbook();
    sink::write_workbook(
        &workbook,
        &[
            Sheet {
                name: "Sheet1",
                table: &tables.finalized,
            },
            Sheet {
                name: "Sheet2",
                table: &tables.whitelisted,
            },
            Sheet {
                name: "Matchs",
                table: &tables.matches,
            },
            Sheet {
                name: "Players",
                table: &players,
            },
            Sheet {
                name: "Teams",
                table: &teams,
            },
            Sheet {
                name: "Tournaments",
                table: &tournaments,
            },
            Sheet {
                name: "Events",
                table: &events,
            },
        ],
    )?;

    Ok(vec![finalized_csv, whitelisted_csv, workbook])
}

pub fn export_sqlite(tables: &TableSet, db_path: &Path, source_dir: &Path) -> Result<()> {
    let players = entities::players_table(&tables.players);
    let teams = entities::teams_table(&tables.teams);
    let tournaments = entities::tournaments_table(&tables.tournaments);
    let events = entities::events_table(&tables.events);

    let mut conn = sql_sink::open_db(db_path)?;
    sql_sink::export_tables(
        &mut conn,
        &source_dir.display().to_string(),
        &[
            SqlTable {
                name: "matchs_data",
                table: &tables.finalized,
            },
            SqlTable {
                name: "matchs_data_arg",
                table: &tables.whitelisted,
            },
            SqlTable {
                name: "matchs",
                table: &tables.matches,
            },
            SqlTable {
                name: "players",
                table: &players,
            },
            SqlTable {
                name: "teams",
                table: &teams,
            },
            SqlTable {
                name: "tournaments",
                table: &tournaments,
            },
            SqlTable {
                name: "events",
                table: &events,
            },
        ],
    )
    .with_context(|| format!("export to sqlite {}", db_path.display()))
}

pub fn run(config: &Config) -> Result<RunSummary> {
    let files = source_loader::list_source_files(&config.source_dir)?;
    let tables = build_tables(&files, &config.source_dir, &config.extract)
        .with_context(|| format!("transform season files in {}", config.source_dir.display()))?;

    let mut outputs = write_outputs(&tables, &OutputLayout::new(&config.output_dir))?;
    if let Some(db_path) = config.db_path.as_deref() {
        export_sqlite(&tables, db_path, &config.source_dir)?;
        outputs.push(db_path.to_path_buf());
    }

    let counts = tables.counts();
    info!(?counts, "etl run complete");
    Ok(RunSummary {
        source_files: tables.source_files,
        counts,
        outputs,
    })
}
