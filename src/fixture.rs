// src/fixture.rs

use anyhow::{Context, Result};
use parquet::basic::Compression;
use std::{fs::File, path::Path};
use tracing::info;

use crate::records::Record;
use crate::schema::{build_arrow_schema, default_column_names, ColumnSpec};
use crate::write::{write_parquet, WriteOptions, WriteSummary};

/// Default location of the regression fixture.
pub const FIXTURE_PATH: &str = "test.snappy.parquet";

/// The three rows stored in the fixture, in file order.
pub fn fixture_records() -> Vec<Record> {
    [
        ["asdf1", "news1", "good3"],
        ["asdf2", "news2", "good2"],
        ["asdf3", "news3", "good1"],
    ]
    .iter()
    .map(|row| row.iter().map(|s| s.to_string()).collect())
    .collect()
}

/// Write the fixture rows as three utf8 columns, snappy compressed.
pub fn write_fixture<P: AsRef<Path>>(path: P) -> Result<WriteSummary> {
    let path = path.as_ref();
    let cols: Vec<ColumnSpec> = default_column_names(3)
        .into_iter()
        .map(ColumnSpec::utf8)
        .collect();
    let opts = WriteOptions {
        compression: Compression::SNAPPY,
        ..WriteOptions::default()
    };

    let file = File::create(path).with_context(|| format!("creating {:?}", path))?;
    let summary = write_parquet(file, fixture_records(), build_arrow_schema(&cols), &opts)?;
    info!(path = %path.display(), rows = summary.rows, "wrote fixture");
    Ok(summary)
}
