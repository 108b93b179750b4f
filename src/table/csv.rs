// src/table/csv.rs
use anyhow::{Context, Result};
use csv::{ReaderBuilder, WriterBuilder};
use std::fs::File;
use std::path::Path;

use crate::table::Table;

/// Write a table as a headerless CSV file. Ragged rows are allowed so the
/// file mirrors exactly what came off the page.
pub fn write_table(path: impl AsRef<Path>, table: &Table) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating output directory {:?}", parent))?;
    }
    let file = File::create(path).with_context(|| format!("creating {:?}", path))?;
    let mut wtr = WriterBuilder::new().flexible(true).from_writer(file);
    for row in &table.rows {
        wtr.write_record(row)
            .with_context(|| format!("writing row to {:?}", path))?;
    }
    wtr.flush().with_context(|| format!("flushing {:?}", path))?;
    Ok(())
}

/// Read a headerless CSV file back into a table.
pub fn read_table(path: impl AsRef<Path>) -> Result<Table> {
    let path = path.as_ref();
    let file = File::open(path).with_context(|| format!("opening {:?}", path))?;
    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(file);

    let mut rows = Vec::new();
    for (idx, result) in rdr.records().enumerate() {
        let record =
            result.with_context(|| format!("CSV parse error in {:?} at record {}", path, idx))?;
        rows.push(record.iter().map(|s| s.to_string()).collect());
    }
    Ok(Table::new(rows))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_and_reads_ragged_rows() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("out").join("table.csv");

        let table = Table::new(vec![
            vec!["Month".into(), "Rice".into(), "Corn".into()],
            vec!["Jan".into(), "41.2".into(), "23.0".into()],
            vec!["Source: USDA FAS".into()],
        ]);
        write_table(&path, &table)?;
        let back = read_table(&path)?;
        assert_eq!(back, table);
        Ok(())
    }
}
