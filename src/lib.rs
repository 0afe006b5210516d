pub mod config;
pub mod convert;
pub mod diff;
pub mod fixture;
pub mod records;
pub mod schema;
pub mod table;
pub mod verify;
pub mod write;

pub use config::{CompressionKind, ConvertConfig};
pub use convert::{convert_file, convert_file_async};
pub use verify::{verify_parquet, verify_table, EXPECTED_FIXTURE_TABLE};
pub use write::{write_parquet, write_parquet_stream, ParquetSink, WriteOptions, WriteSummary};

use tracing_subscriber::{fmt, EnvFilter};

/// Install the global `fmt` subscriber, honouring `RUST_LOG` and falling back to `default_filter`.
pub fn init_logging(default_filter: &str) {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_span_events(fmt::format::FmtSpan::CLOSE)
        .with_writer(std::io::stderr)
        .init();
}
