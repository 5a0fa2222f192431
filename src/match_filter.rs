use tracing::info;

use crate::error::EtlError;
use crate::table::Table;

pub const FINALIZED_STATUS: &str = "FINALIZADO";

pub const TOURNAMENT_WHITELIST: [&str; 6] = [
    "copa argentina",
    "copa libertadores",
    "copa sudamericana",
    "primera division argentina",
    "torneos verano argentina",
    "torneo inicial",
];

pub const STATUS_COLUMN: &str = "status";
pub const TOURNAMENT_COLUMN: &str = "tournament";
pub const ID_COLUMN: &str = "id";

pub fn filter_finalized(combined: &Table) -> Result<Table, EtlError> {
    let status = combined.require_column(STATUS_COLUMN, "combined matches")?;
    let out = combined.filter_rows(|row| row[status] == FINALIZED_STATUS);
    info!(kept = out.len(), of = combined.len(), "finalized matches");
    Ok(out)
}

/// Keeps whitelisted tournaments and numbers them with a 1-based `id` column.
/// A source `id` column is overwritten.
pub fn filter_whitelisted(finalized: &Table, whitelist: &[&str]) -> Result<Table, EtlError> {
    let tournament = finalized.require_column(TOURNAMENT_COLUMN, "finalized matches")?;
    let out = finalized
        .filter_rows(|row| whitelist.contains(&row[tournament].as_str()))
        .with_row_ids(ID_COLUMN, false);
    info!(kept = out.len(), of = finalized.len(), "whitelisted tournaments");
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Table {
        Table::from_csv_reader(
            "tournament,status,home_team\n\
             copa argentina,FINALIZADO,Boca\n\
             copa argentina,SUSPENDIDO,River\n\
             liga amateur,FINALIZADO,Tigre\n\
             Copa Argentina,FINALIZADO,Lanus\n\
             torneo inicial,FINALIZADO,Velez\n"
                .as_bytes(),
        )
        .unwrap()
    }

    #[test]
    fn finalized_keeps_any_tournament() {
        let out = filter_finalized(&sample()).unwrap();
        assert_eq!(out.len(), 4);
        assert_eq!(out.columns(), sample().columns());
    }

    #[test]
    fn whitelist_is_exact_and_ids_follow_row_order() {
        let finalized = filter_finalized(&sample()).unwrap();
        let out = filter_whitelisted(&finalized, &TOURNAMENT_WHITELIST).unwrap();
        assert_eq!(out.columns().last().map(String::as_str), Some("id"));
        let teams = out.column_values(2).collect::<Vec<_>>();
        assert_eq!(teams, ["Boca", "Velez"]);
        let ids = out.column_values(3).collect::<Vec<_>>();
        assert_eq!(ids, ["1", "2"]);
    }

    #[test]
    fn missing_status_column_is_reported() {
        let table = Table::from_csv_reader("tournament\nx\n".as_bytes()).unwrap();
        let err = filter_finalized(&table).unwrap_err();
        assert!(matches!(err, EtlError::MissingColumn { ref column, .. } if column == "status"));
    }
}
