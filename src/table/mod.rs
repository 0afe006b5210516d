// src/table/mod.rs

use anyhow::{anyhow, Context, Result};
use arrow::array::Array;
use arrow::record_batch::RecordBatch;
use arrow::util::display::{ArrayFormatter, FormatOptions};
use glob::glob;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use std::{
    fs::File,
    path::{Path, PathBuf},
};
use tracing::{debug, info};

pub mod render;

pub use render::RenderOptions;

/// A fully materialised table of display strings. `None` is a null cell.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
}

impl Table {
    /// A table with named columns and no rows yet.
    pub fn empty(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    /// Format every cell of `batches` with Arrow's display formatter.
    ///
    /// Column names come from the first batch; all batches must share its width.
    pub fn from_batches(batches: &[RecordBatch]) -> Result<Self> {
        let mut table = Table::empty(
            batches
                .first()
                .map(|b| b.schema().fields().iter().map(|f| f.name().clone()).collect())
                .unwrap_or_default(),
        );

        let options = FormatOptions::default();
        for batch in batches {
            table.append_batch(batch, &options)?;
        }
        Ok(table)
    }

    pub fn append_batch(&mut self, batch: &RecordBatch, options: &FormatOptions) -> Result<()> {
        if batch.num_columns() != self.columns.len() {
            return Err(anyhow!(
                "batch has {} columns, table has {}",
                batch.num_columns(),
                self.columns.len()
            ));
        }

        let formatters = batch
            .columns()
            .iter()
            .map(|col| ArrayFormatter::try_new(col.as_ref(), options))
            .collect::<Result<Vec<_>, _>>()
            .context("building cell formatters")?;

        for row in 0..batch.num_rows() {
            let cells = batch
                .columns()
                .iter()
                .zip(&formatters)
                .map(|(col, fmt)| {
                    if col.is_null(row) {
                        None
                    } else {
                        Some(fmt.value(row).to_string())
                    }
                })
                .collect();
            self.rows.push(cells);
        }
        Ok(())
    }
}

/// The Parquet files that make up `path`: the file itself, or every
/// `*.parquet` directly inside a directory, sorted by path.
pub fn parquet_parts(path: &Path) -> Result<Vec<PathBuf>> {
    if !path.is_dir() {
        return Ok(vec![path.to_path_buf()]);
    }

    let pattern = path.join("*.parquet");
    let pattern = pattern.to_string_lossy();
    let mut parts: Vec<PathBuf> = glob(&pattern)
        .with_context(|| format!("Failed to read glob pattern '{}'", pattern))?
        .filter_map(|entry| entry.ok())
        .collect();
    parts.sort();

    if parts.is_empty() {
        return Err(anyhow!("No Parquet files found under '{}'", path.display()));
    }
    Ok(parts)
}

/// Load a Parquet file, or a directory of Parquet parts, into a [`Table`].
#[tracing::instrument(level = "info", skip(path), fields(path = %path.as_ref().display()))]
pub fn read_parquet_table<P: AsRef<Path>>(path: P) -> Result<Table> {
    let options = FormatOptions::default();
    let mut table: Option<Table> = None;

    for part in parquet_parts(path.as_ref())? {
        let file =
            File::open(&part).with_context(|| format!("Failed to open Parquet '{}'", part.display()))?;
        let builder = ParquetRecordBatchReaderBuilder::try_new(file)
            .with_context(|| format!("Failed to read Parquet '{}'", part.display()))?;

        // column names come from the file schema so that empty files keep them
        let table = table.get_or_insert_with(|| {
            Table::empty(
                builder
                    .schema()
                    .fields()
                    .iter()
                    .map(|f| f.name().clone())
                    .collect(),
            )
        });

        let reader = builder
            .build()
            .with_context(|| format!("Failed to build reader for '{}'", part.display()))?;
        for batch in reader {
            let batch = batch.with_context(|| format!("decoding '{}'", part.display()))?;
            table
                .append_batch(&batch, &options)
                .with_context(|| format!("appending '{}'", part.display()))?;
        }
        debug!(part = %part.display(), rows = table.num_rows(), "read part");
    }

    let table = table.unwrap_or_default();
    info!(rows = table.num_rows(), columns = table.columns.len(), "loaded table");
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{build_arrow_schema, ColumnSpec, ColumnType};
    use crate::write::{write_parquet, WriteOptions};
    use anyhow::Result;
    use tempfile::tempdir;

    #[test]
    fn reads_back_written_rows_with_nulls() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("t.parquet");
        let schema = build_arrow_schema(&[
            ColumnSpec::utf8("name"),
            ColumnSpec {
                name: "n".into(),
                ty: ColumnType::Int64,
            },
        ]);
        write_parquet(
            File::create(&path)?,
            vec![vec!["a", "1"], vec!["", "2"]],
            schema,
            &WriteOptions::default(),
        )?;

        let table = read_parquet_table(&path)?;
        assert_eq!(table.columns, vec!["name", "n"]);
        assert_eq!(
            table.rows,
            vec![
                vec![Some("a".to_string()), Some("1".to_string())],
                vec![None, Some("2".to_string())],
            ]
        );
        Ok(())
    }

    #[test]
    fn directory_parts_are_concatenated_in_path_order() -> Result<()> {
        let dir = tempdir()?;
        let schema = build_arrow_schema(&[ColumnSpec::utf8("v")]);
        for (name, value) in [("part-1.parquet", "second"), ("part-0.parquet", "first")] {
            write_parquet(
                File::create(dir.path().join(name))?,
                vec![vec![value]],
                schema.clone(),
                &WriteOptions::default(),
            )?;
        }
        std::fs::write(dir.path().join("notes.txt"), "ignored")?;

        let table = read_parquet_table(dir.path())?;
        let values: Vec<Option<String>> = table.rows.into_iter().map(|mut r| r.remove(0)).collect();
        assert_eq!(values, vec![Some("first".into()), Some("second".into())]);
        Ok(())
    }

    #[test]
    fn from_batches_formats_floats_and_rejects_width_changes() -> Result<()> {
        use arrow::array::{ArrayRef, Float64Array, StringArray};
        use std::sync::Arc;

        let schema = build_arrow_schema(&[ColumnSpec {
            name: "x".into(),
            ty: ColumnType::Float64,
        }]);
        let batch = RecordBatch::try_new(
            schema,
            vec![Arc::new(Float64Array::from(vec![Some(1.5), None])) as ArrayRef],
        )?;
        let table = Table::from_batches(&[batch.clone()])?;
        assert_eq!(table.rows, vec![vec![Some("1.5".to_string())], vec![None]]);

        let wide = RecordBatch::try_from_iter(vec![
            ("a", Arc::new(StringArray::from(vec!["p"])) as ArrayRef),
            ("b", Arc::new(StringArray::from(vec!["q"])) as ArrayRef),
        ])?;
        assert!(Table::from_batches(&[batch, wide]).is_err());
        Ok(())
    }

    #[test]
    fn empty_directory_is_an_error() -> Result<()> {
        let dir = tempdir()?;
        assert!(read_parquet_table(dir.path()).is_err());
        Ok(())
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(read_parquet_table("/no/such/file.parquet").is_err());
    }
}
