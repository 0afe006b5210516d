use anyhow::{anyhow, Result};
use csv2parquet::{
    init_logging,
    records::{count_lines, read_records, stream_records, RecordOptions},
};
use futures::StreamExt;
use std::{env, time::Instant};
use tracing::info;

/// Times three ways of reading the same tab-separated file.
#[tokio::main]
async fn main() -> Result<()> {
    init_logging("info");

    let input = env::args()
        .nth(1)
        .ok_or_else(|| anyhow!("Usage: read_bench <INPUT>"))?;
    let opts = RecordOptions::default();

    {
        let now = Instant::now();
        let lines = count_lines(&input).await?;
        println!("Read raw: {}", lines);
        println!("{}", now.elapsed().as_millis());
    }
    {
        let now = Instant::now();
        let mut stream = stream_records(&input, &opts).await?.records;
        let mut records = 0usize;
        let mut fields = 0usize;
        while let Some(record) = stream.next().await {
            fields += record?.len();
            records += 1;
        }
        println!("Read raw then split: {} ({} fields)", records, fields);
        println!("{}", now.elapsed().as_millis());
    }
    {
        let now = Instant::now();
        let mut records = 0usize;
        let mut bytes = 0usize;
        for record in read_records(&input, &opts)?.records {
            bytes += record?.iter().map(String::len).sum::<usize>();
            records += 1;
        }
        println!("Sync read: {} ({} bytes)", records, bytes);
        println!("{}", now.elapsed().as_millis());
    }

    info!(input = %input, "benchmark done");
    Ok(())
}
