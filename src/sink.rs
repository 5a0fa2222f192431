use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rust_xlsxwriter::{DocProperties, ExcelDateTime, Workbook, Worksheet};
use tracing::info;

use crate::table::Table;

pub const FINALIZED_CSV: &str = "CSV/matchs_data.csv";
pub const WHITELISTED_CSV: &str = "CSV/matchs_data_arg.csv";
pub const WORKBOOK: &str = "XLSX/matchs_data.xlsx";

// Fixed document creation time: same input, same workbook bytes.
const WORKBOOK_CREATED: (u16, u8, u8) = (2020, 1, 1);

#[derive(Debug, Clone)]
pub struct OutputLayout {
    root: PathBuf,
}

impl OutputLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn finalized_csv(&self) -> PathBuf {
        self.root.join(FINALIZED_CSV)
    }

    pub fn whitelisted_csv(&self) -> PathBuf {
        self.root.join(WHITELISTED_CSV)
    }

    pub fn workbook(&self) -> PathBuf {
        self.root.join(WORKBOOK)
    }
}

pub struct Sheet<'a> {
    pub name: &'static str,
    pub table: &'a Table,
}

pub fn write_csv(path: &Path, table: &Table) -> Result<()> {
    ensure_parent(path)?;
    let file =
        File::create(path).with_context(|| format!("failed creating {}", path.display()))?;
    table
        .write_csv(BufWriter::new(file))
        .with_context(|| format!("failed writing csv to {}", path.display()))?;
    info!(path = %path.display(), rows = table.len(), "wrote csv");
    Ok(())
}

pub fn write_workbook(path: &Path, sheets: &[Sheet<'_>]) -> Result<()> {
    ensure_parent(path)?;
    let (year, month, day) = WORKBOOK_CREATED;
    let created = ExcelDateTime::from_ymd(year, month, day).context("workbook creation date")?;
    let mut workbook = Workbook::new();
    workbook.set_properties(&DocProperties::new().set_creation_datetime(&created));
    for sheet in sheets {
        let worksheet = workbook.add_worksheet();
        worksheet
            .set_name(sheet.name)
            .with_context(|| format!("invalid sheet name {}", sheet.name))?;
        write_table(worksheet, sheet.table)
            .with_context(|| format!("failed filling sheet {}", sheet.name))?;
    }

    workbook
        .save(path)
        .with_context(|| format!("failed writing workbook to {}", path.display()))?;
    info!(path = %path.display(), sheets = sheets.len(), "wrote workbook");
    Ok(())
}

fn write_table(worksheet: &mut Worksheet, table: &Table) -> Result<()> {
    for (col_idx, name) in table.columns().iter().enumerate() {
        worksheet
            .write_string(0, sheet_column(col_idx)?, name)
            .with_context(|| format!("write header ({col_idx})"))?;
    }
    for (row_idx, row) in table.rows().iter().enumerate() {
        let sheet_row = u32::try_from(row_idx + 1)
            .with_context(|| format!("row {row_idx} exceeds the sheet row range"))?;
        for (col_idx, value) in row.iter().enumerate() {
            if value.is_empty() {
                continue;
            }
            let col = sheet_column(col_idx)?;
            let written = match numeric_cell(value) {
                Some(number) => worksheet.write_number(sheet_row, col, number),
                None => worksheet.write_string(sheet_row, col, value),
            };
            written.with_context(|| format!("write cell ({sheet_row},{col_idx})"))?;
        }
    }
    Ok(())
}

fn sheet_column(col_idx: usize) -> Result<u16> {
    u16::try_from(col_idx)
        .with_context(|| format!("column {col_idx} exceeds the sheet column range"))
}

// Plain decimals only; "NaN", "inf" and "1e3" stay text.
fn numeric_cell(value: &str) -> Option<f64> {
    let digits = value.strip_prefix('-').unwrap_or(value);
    if digits.is_empty()
        || digits.starts_with('.')
        || digits.ends_with('.')
        || !digits.chars().all(|c| c.is_ascii_digit() || c == '.')
        || digits.chars().filter(|c| *c == '.').count() > 1
    {
        return None;
    }
    // Leading zeros ("007") would be lost as numbers.
    if digits.len() > 1 && digits.starts_with('0') && !digits.starts_with("0.") {
        return None;
    }
    value.parse::<f64>().ok()
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed creating {}", parent.display()))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_cells() {
        assert_eq!(numeric_cell("3"), Some(3.0));
        assert_eq!(numeric_cell("-2"), Some(-2.0));
        assert_eq!(numeric_cell("55.5"), Some(55.5));
        assert_eq!(numeric_cell("0"), Some(0.0));
        assert_eq!(numeric_cell("0.5"), Some(0.5));
        assert_eq!(numeric_cell("2023-01-05"), None);
        assert_eq!(numeric_cell("2-1"), None);
        assert_eq!(numeric_cell("NaN"), None);
        assert_eq!(numeric_cell("1e3"), None);
        assert_eq!(numeric_cell("007"), None);
        assert_eq!(numeric_cell("55%"), None);
        assert_eq!(numeric_cell("."), None);
    }

    #[test]
    fn layout_paths_are_fixed() {
        let layout = OutputLayout::new("/out");
        assert_eq!(layout.finalized_csv(), Path::new("/out/CSV/matchs_data.csv"));
        assert_eq!(layout.whitelisted_csv(), Path::new("/out/CSV/matchs_data_arg.csv"));
        assert_eq!(layout.workbook(), Path::new("/out/XLSX/matchs_data.xlsx"));
    }

    #[test]
    fn csv_is_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/out.csv");
        let mut table = Table::new(["a"]);
        table.push_row(vec!["1".to_string()]);
        table.push_row(vec!["2".to_string()]);
        write_csv(&path, &table).unwrap();

        let mut smaller = Table::new(["a"]);
        smaller.push_row(vec!["9".to_string()]);
        write_csv(&path, &smaller).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "a\n9\n");
    }

    #[test]
    fn workbook_is_written() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("XLSX/book.xlsx");
        let mut table = Table::new(["id", "name"]);
        table.push_row(vec!["1".to_string(), "Boca".to_string()]);
        write_workbook(
            &path,
            &[
                Sheet {
                    name: "Teams",
                    table: &table,
                },
                Sheet {
                    name: "Empty",
                    table: &Table::new(["id"]),
                },
            ],
        )
        .unwrap();
        let first = fs::read(&path).unwrap();
        assert!(!first.is_empty());

        write_workbook(
            &path,
            &[Sheet {
                name: "Teams",
                table: &table,
            }],
        )
        .unwrap();
        write_workbook(
            &dir.path().join("XLSX/again.xlsx"),
            &[Sheet {
                name: "Teams",
                table: &table,
            }],
        )
        .unwrap();
        assert_eq!(
            fs::read(&path).unwrap(),
            fs::read(dir.path().join("XLSX/again.xlsx")).unwrap()
        );
    }

    #[test]
    fn sheet_columns_past_u16_are_rejected() {
        assert_eq!(sheet_column(3).unwrap(), 3);
        assert_eq!(sheet_column(65_535).unwrap(), u16::MAX);
        let err = sheet_column(70_000).unwrap_err();
        assert!(err.to_string().contains("column 70000"));
    }
}
