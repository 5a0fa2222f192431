use std::collections::HashMap;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use crate::error::EtlError;

/// Ordered, string-celled table. Missing values are empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new<S: Into<String>>(columns: impl IntoIterator<Item = S>) -> Self {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn require_column(&self, name: &str, table: &str) -> Result<usize, EtlError> {
        self.column_index(name)
            .ok_or_else(|| EtlError::missing_column(name, table))
    }

    pub fn cell(&self, row: usize, col: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Short rows are padded with empty cells, long rows truncated.
    pub fn push_row(&mut self, mut row: Vec<String>) {
        row.resize(self.columns.len(), String::new());
        self.rows.push(row);
    }

    pub fn read_csv(path: &Path) -> Result<Self, EtlError> {
        let file = File::open(path).map_err(|err| EtlError::FileRead {
            path: path.to_path_buf(),
            reason: err.to_string(),
        })?;
        Self::from_csv_reader(file).map_err(|reason| EtlError::FileRead {
            path: path.to_path_buf(),
            reason,
        })
    }

    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self, String> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let headers = rdr.headers().map_err(|err| err.to_string())?.clone();
        if headers.is_empty() {
            return Err("missing header row".to_string());
        }
        let mut table = Table::new(dedupe_headers(headers.iter()));

        for (idx, record) in rdr.records().enumerate() {
            let record = record.map_err(|err| err.to_string())?;
            if record.len() > table.columns.len() {
                return Err(format!(
                    "row {} has {} fields, header has {}",
                    idx + 1,
                    record.len(),
                    table.columns.len()
                ));
            }
            table.push_row(record.iter().map(str::to_string).collect());
        }
        Ok(table)
    }

    pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), csv::Error> {
        let mut wtr = csv::Writer::from_writer(writer);
        wtr.write_record(&self.columns)?;
        for row in &self.rows {
            wtr.write_record(row)?;
        }
        wtr.flush()?;
        Ok(())
    }

    /// Appends `other`, aligning columns by name. Columns only `other` has are
    /// added at the end and left empty for the rows already present.
    pub fn append(&mut self, other: Table) {
        let mapping = other
            .columns
            .iter()
            .map(|name| match self.column_index(name) {
                Some(idx) => idx,
                None => {
                    self.columns.push(name.clone());
                    self.columns.len() - 1
                }
            })
            .collect::<Vec<_>>();

        let width = self.columns.len();
        for row in &mut self.rows {
            row.resize(width, String::new());
        }
        for row in other.rows {
            let mut aligned = vec![String::new(); width];
            for (value, &idx) in row.into_iter().zip(&mapping) {
                aligned[idx] = value;
            }
            self.rows.push(aligned);
        }
    }

    pub fn filter_rows(&self, mut keep: impl FnMut(&[String]) -> bool) -> Table {
        Table {
            columns: self.columns.clone(),
            rows: self
                .rows
                .iter()
                .filter(|r| keep(r.as_slice()))
                .cloned()
                .collect(),
        }
    }

    pub fn try_map_column<E>(
        &mut self,
        col: usize,
        mut f: impl FnMut(usize, &str) -> Result<String, E>,
    ) -> Result<(), E> {
        for (idx, row) in self.rows.iter_mut().enumerate() {
            if let Some(cell) = row.get_mut(col) {
                let next = f(idx, cell.as_str())?;
                *cell = next;
            }
        }
        Ok(())
    }

    pub fn column_values(&self, col: usize) -> impl Iterator<Item = &str> {
        self.rows
            .iter()
            .map(move |r| r.get(col).map(String::as_str).unwrap_or(""))
    }

    /// 1-based row identity, in current row order. An existing column called
    /// `name` is overwritten in place (later duplicates of it are dropped);
    /// otherwise the column is added first or last depending on `leading`.
    pub fn with_row_ids(&self, name: &str, leading: bool) -> Table {
        let mut table = self.clone();
        let existing = table.column_index(name);
        if let Some(col) = existing {
            let keep = table
                .columns
                .iter()
                .enumerate()
                .map(|(idx, c)| idx == col || c != name)
                .collect::<Vec<_>>();
            table.columns = retain_flagged(std::mem::take(&mut table.columns), &keep);
            for row in &mut table.rows {
                *row = retain_flagged(std::mem::take(row), &keep);
            }
        } else if leading {
            table.columns.insert(0, name.to_string());
        } else {
            table.columns.push(name.to_string());
        }

        for (idx, row) in table.rows.iter_mut().enumerate() {
            let id = (idx + 1).to_string();
            match existing {
                Some(col) => row[col] = id,
                None if leading => row.insert(0, id),
                None => row.push(id),
            }
        }
        table
    }

    pub fn select(&self, names: &[&str], table: &str) -> Result<Table, EtlError> {
        let indices = names
            .iter()
            .map(|name| self.require_column(name, table))
            .collect::<Result<Vec<_>, _>>()?;
        let rows = self
            .rows
            .iter()
            .map(|row| indices.iter().map(|&idx| row[idx].clone()).collect())
            .collect();
        Ok(Table {
            columns: names.iter().map(|n| n.to_string()).collect(),
            rows,
        })
    }

    pub fn rename_columns(&mut self, mut rename: impl FnMut(&str) -> Option<String>) {
        for column in &mut self.columns {
            if let Some(new_name) = rename(column.as_str()) {
                *column = new_name;
            }
        }
    }

    pub fn drop_columns(&mut self, names: &[&str]) {
        let keep = self
            .columns
            .iter()
            .map(|c| !names.contains(&c.as_str()))
            .collect::<Vec<_>>();
        self.columns = retain_flagged(std::mem::take(&mut self.columns), &keep);
        for row in &mut self.rows {
            *row = retain_flagged(std::mem::take(row), &keep);
        }
    }
}

fn retain_flagged(values: Vec<String>, keep: &[bool]) -> Vec<String> {
    values
        .into_iter()
        .zip(keep)
        .filter(|(_, keep)| **keep)
        .map(|(value, _)| value)
        .collect()
}

// Later duplicates become `name.1`, `name.2`, ...
fn dedupe_headers<'a>(headers: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut out: Vec<String> = Vec::new();
    for header in headers {
        let count = seen.entry(header.to_string()).or_insert(0);
        let mut name = if *count == 0 {
            header.to_string()
        } else {
            format!("{header}.{count}")
        };
        *count += 1;
        while out.contains(&name) {
            let count = seen.entry(header.to_string()).or_insert(0);
            name = format!("{header}.{count}");
            *count += 1;
        }
        out.push(name);
    }
    out
}
