use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::error::EtlError;
use crate::match_date::{MonthTable, normalize_date_with};
use crate::table::Table;

pub const SEASON_TOKENS: [&str; 6] = ["2020", "2021", "2022", "2023", "2024", "2025"];

pub const DATE_COLUMN: &str = "date";

#[derive(Debug, Clone, Default)]
pub struct LoadedSources {
    pub table: Table,
    pub files: Vec<String>,
}

pub fn is_season_file(name: &str) -> bool {
    SEASON_TOKENS.iter().any(|token| name.contains(token))
}

/// `*.csv` files directly under `dir`, sorted by name.
pub fn list_source_files(dir: &Path) -> Result<Vec<String>> {
    let entries =
        fs::read_dir(dir).with_context(|| format!("list source dir {}", dir.display()))?;
    let mut out = Vec::new();
    for entry in entries {
        let entry = entry.with_context(|| format!("read entry in {}", dir.display()))?;
        if !entry.file_type().map(|t| t.is_file()).unwrap_or(false) {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.contains(".csv") {
            out.push(name);
        }
    }
    out.sort();
    Ok(out)
}

/// Loads every season file in `files` (in the given order), normalizes its
/// date column and concatenates the results by column name.
pub fn load_sources(
    files: &[String],
    dir: &Path,
    months: &MonthTable,
) -> Result<LoadedSources, EtlError> {
    let mut combined = Table::default();
    let mut loaded = Vec::new();

    for name in files {
        if !is_season_file(name) {
            debug!(file = %name, "skipping file without a season token");
            continue;
        }
        let path = dir.join(name);
        let mut table = Table::read_csv(&path)?;
        let date_col = table.require_column(DATE_COLUMN, name)?;
        table.try_map_column(date_col, |row, raw| {
            normalize_date_with(raw, months).map_err(|source| EtlError::Date {
                path: path.clone(),
                row: row + 1,
                source,
            })
        })?;
        info!(file = %path.display(), rows = table.len(), "loaded season file");
        combined.append(table);
        loaded.push(name.clone());
    }

    info!(
        files = loaded.len(),
        rows = combined.len(),
        columns = combined.columns().len(),
        "combined season files"
    );
    Ok(LoadedSources {
        table: combined,
        files: loaded,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn season_tokens_match_anywhere_in_the_name() {
        assert!(is_season_file("partidos_2023.csv"));
        assert!(is_season_file("2025-clausura.csv"));
        assert!(!is_season_file("partidos_2019.csv"));
        assert!(!is_season_file("matchs_data.csv"));
    }
}
