// src/convert.rs

use anyhow::{anyhow, Context, Result};
use futures::{stream, StreamExt};
use std::{
    fs::{self, File},
    io::BufWriter,
    path::{Path, PathBuf},
};
use tracing::{debug, error, info};

use crate::config::ConvertConfig;
use crate::records::{read_records, stream_records};
use crate::schema::resolve_schema;
use crate::write::{write_parquet, write_parquet_stream, WriteSummary};

fn temp_path_for(output: &Path) -> PathBuf {
    let mut name = output.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}

/// Move the finished temp file into place and fill in the output size,
/// or clean the temp file up if the write failed.
fn finalize(result: Result<WriteSummary>, temp: &Path, output: &Path) -> Result<WriteSummary> {
    let mut summary = match result {
        Ok(s) => s,
        Err(e) => {
            if let Err(rm) = fs::remove_file(temp) {
                debug!(temp = %temp.display(), "could not remove temp file: {}", rm);
            }
            error!(output = %output.display(), "conversion failed: {:#}", e);
            return Err(e);
        }
    };

    fs::rename(temp, output)
        .with_context(|| format!("renaming {:?} -> {:?}", temp, output))?;
    summary.bytes = fs::metadata(output)
        .with_context(|| format!("reading size of {:?}", output))?
        .len();
    info!(
        output = %output.display(),
        rows = summary.rows,
        bytes = summary.bytes,
        "wrote parquet"
    );
    Ok(summary)
}

fn create_temp(temp: &Path) -> Result<BufWriter<File>> {
    let file = File::create(temp).with_context(|| format!("creating {:?}", temp))?;
    Ok(BufWriter::new(file))
}

/// Convert the delimited file `input` into Parquet at `output`, synchronously.
///
/// The file is written next to `output` with a `.tmp` suffix and renamed once complete.
#[tracing::instrument(level = "info", skip(input, output, config), fields(input = %input.as_ref().display()))]
pub fn convert_file<P: AsRef<Path>, Q: AsRef<Path>>(
    input: P,
    output: Q,
    config: &ConvertConfig,
) -> Result<WriteSummary> {
    config.validate()?;
    let output = output.as_ref();
    let temp = temp_path_for(output);

    let file = read_records(input.as_ref(), &config.record_options()?)?;
    let mut records = file.records.peekable();

    let width = match records.peek() {
        Some(Ok(first)) => first.len(),
        Some(Err(_)) => {
            // the first record is unreadable; report it instead of a schema error
            let err = match records.next() {
                Some(Err(e)) => e,
                _ => anyhow!("reading first record of {:?}", input.as_ref()),
            };
            return finalize(Err(err), &temp, output);
        }
        None => file.header.as_ref().map_or(0, Vec::len),
    };

    let result = resolve_schema(config.schema.as_ref(), file.header.as_deref(), width)
        .and_then(|schema| {
            let sink = create_temp(&temp)?;
            // stop at the first read error so it is reported rather than skipped
            let mut read_error = None;
            let rows = records.map_while(|r| match r {
                Ok(record) => Some(record),
                Err(e) => {
                    read_error = Some(e);
                    None
                }
            });
            let summary = write_parquet(sink, rows, schema, &config.write_options())?;
            match read_error {
                Some(e) => Err(e),
                None => Ok(summary),
            }
        });

    finalize(result, &temp, output)
}

/// Async counterpart of [`convert_file`], reading the input through a tokio stream.
#[tracing::instrument(level = "info", skip(input, output, config), fields(input = %input.as_ref().display()))]
pub async fn convert_file_async<P: AsRef<Path>, Q: AsRef<Path>>(
    input: P,
    output: Q,
    config: &ConvertConfig,
) -> Result<WriteSummary> {
    config.validate()?;
    let output = output.as_ref();
    let temp = temp_path_for(output);

    let source = stream_records(input.as_ref(), &config.record_options()?).await?;
    let header = source.header;
    let mut records = source.records;

    // pull the first record to learn the width, then put it back in front
    let first = match records.next().await {
        Some(Err(e)) => return finalize(Err(e), &temp, output),
        first => first,
    };
    let width = match &first {
        Some(Ok(record)) => record.len(),
        _ => header.as_ref().map_or(0, Vec::len),
    };
    let records = stream::iter(first).chain(records);

    let result = match resolve_schema(config.schema.as_ref(), header.as_deref(), width) {
        Ok(schema) => match create_temp(&temp) {
            Ok(sink) => {
                write_parquet_stream(sink, records, schema, &config.write_options()).await
            }
            Err(e) => Err(e),
        },
        Err(e) => Err(e),
    };

    finalize(result, &temp, output)
}
