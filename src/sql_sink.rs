use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use rusqlite::{Connection, Transaction, params, params_from_iter};
use tracing::info;

use crate::table::Table;

pub struct SqlTable<'a> {
    pub name: &'static str,
    pub table: &'a Table,
}

pub fn open_db(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).ok();
    }
    let conn =
        Connection::open(path).with_context(|| format!("open sqlite db {}", path.display()))?;
    init_schema(&conn)?;
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS etl_runs (
            run_id INTEGER PRIMARY KEY AUTOINCREMENT,
            started_at TEXT NOT NULL,
            finished_at TEXT NULL,
            source_dir TEXT NOT NULL,
            row_counts_json TEXT NOT NULL
        );
        "#,
    )
    .context("create sqlite schema")?;
    Ok(())
}

/// Replaces every table in `tables` and records the run in `etl_runs`.
pub fn export_tables(
    conn: &mut Connection,
    source_dir: &str,
    tables: &[SqlTable<'_>],
) -> Result<()> {
    let started_at = Utc::now().to_rfc3339();
    let tx = conn.transaction().context("begin export transaction")?;

    let mut counts = BTreeMap::new();
    for item in tables {
        replace_table(&tx, item.name, item.table)
            .with_context(|| format!("replace table {}", item.name))?;
        counts.insert(item.name, item.table.len());
    }

    let counts_json = serde_json::to_string(&counts).context("serialize row counts")?;
    tx.execute(
        "INSERT INTO etl_runs(started_at, finished_at, source_dir, row_counts_json)
         VALUES (?1, ?2, ?3, ?4)",
        params![started_at, Utc::now().to_rfc3339(), source_dir, counts_json],
    )
    .context("insert etl run")?;
    tx.commit().context("commit export transaction")?;
    info!(tables = tables.len(), "exported tables to sqlite");
    Ok(())
}

fn replace_table(tx: &Transaction<'_>, name: &str, table: &Table) -> Result<()> {
    let table_name = quote_ident(name);
    tx.execute(&format!("DROP TABLE IF EXISTS {table_name}"), [])
        .context("drop table")?;

    let column_defs = table
        .columns()
        .iter()
        .map(|c| format!("{} TEXT", quote_ident(c)))
        .collect::<Vec<_>>()
        .join(", ");
    tx.execute(&format!("CREATE TABLE {table_name} ({column_defs})"), [])
        .context("create table")?;

    let column_list = table
        .columns()
        .iter()
        .map(|c| quote_ident(c))
        .collect::<Vec<_>>()
        .join(", ");
    let placeholders = (1..=table.columns().len())
        .map(|idx| format!("?{idx}"))
        .collect::<Vec<_>>()
        .join(", ");
    let mut stmt = tx
        .prepare(&format!(
            "INSERT INTO {table_name} ({column_list}) VALUES ({placeholders})"
        ))
        .context("prepare insert")?;
    for row in table.rows() {
        stmt.execute(params_from_iter(row.iter()))
            .context("insert row")?;
    }
    Ok(())
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn export_replaces_tables_and_logs_runs() {
        let mut conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();

        let mut teams = Table::new(["id", "name"]);
        teams.push_row(vec!["1".to_string(), "Boca".to_string()]);
        teams.push_row(vec!["2".to_string(), "River".to_string()]);
        let mut odd = Table::new(["local_red_cards.1"]);
        odd.push_row(vec!["0".to_string()]);

        let tables = [
            SqlTable {
                name: "teams",
                table: &teams,
            },
            SqlTable {
                name: "odd",
                table: &odd,
            },
        ];
        export_tables(&mut conn, "CSV", &tables).unwrap();
        export_tables(&mut conn, "CSV", &tables).unwrap();

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM teams", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 2);
        let red: String = conn
            .query_row("SELECT \"local_red_cards.1\" FROM odd", [], |row| row.get(0))
            .unwrap();
        assert_eq!(red, "0");

        let (runs, counts): (i64, String) = conn
            .query_row(
                "SELECT COUNT(*), MAX(row_counts_json) FROM etl_runs",
                [],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .unwrap();
        assert_eq!(runs, 2);
        assert_eq!(counts, r#"{"odd":1,"teams":2}"#);
    }
}
