use anyhow::{Context, Result};
use csv2parquet::{convert_file_async, init_logging, ConvertConfig};
use std::{env, path::PathBuf, process::exit};
use tokio::time::Instant;
use tracing::{error, info};

fn usage(program: &str) -> ! {
    eprintln!("Usage: {} <INPUT> <OUTPUT> [CONFIG]", program);
    exit(1);
}

#[tokio::main]
async fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    init_logging("info");

    std::panic::set_hook(Box::new(|info| {
        eprintln!("panic: {:?}", info);
    }));

    // ─── 2) arguments & config ───────────────────────────────────────
    let args: Vec<String> = env::args().collect();
    if args.len() < 3 || args.len() > 4 {
        usage(args.first().map_or("csv2parquet", String::as_str));
    }
    let input = PathBuf::from(&args[1]);
    let output = PathBuf::from(&args[2]);
    let config = match args.get(3) {
        Some(path) => ConvertConfig::load(path).with_context(|| format!("loading config {}", path))?,
        None => ConvertConfig::default(),
    };
    info!(input = %input.display(), output = %output.display(), ?config, "startup");

    // ─── 3) convert ──────────────────────────────────────────────────
    let start = Instant::now();
    match convert_file_async(&input, &output, &config).await {
        Ok(summary) => {
            info!(
                rows = summary.rows,
                batches = summary.batches,
                bytes = summary.bytes,
                elapsed = ?start.elapsed(),
                "all done"
            );
            Ok(())
        }
        Err(e) => {
            error!("conversion of {} failed: {:#}", input.display(), e);
            Err(e)
        }
    }
}
