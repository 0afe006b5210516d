use anyhow::Result;
use csv2parquet::{fixture::{write_fixture, FIXTURE_PATH}, init_logging};
use std::env;
use tracing::info;

fn main() -> Result<()> {
    init_logging("info");

    let path = env::args().nth(1).unwrap_or_else(|| FIXTURE_PATH.to_string());
    let summary = write_fixture(&path)?;
    info!(path = %path, rows = summary.rows, "fixture written");
    Ok(())
}
