// src/records/stream.rs

use anyhow::{anyhow, Context, Result};
use futures::stream::{BoxStream, StreamExt};
use std::path::Path;
use tokio::{
    fs::File,
    io::{AsyncBufReadExt, BufReader},
};
use tokio_stream::wrappers::SplitStream;
use tracing::debug;

use super::{Record, RecordOptions, READ_BUFFER_SIZE};

/// An asynchronously read delimited file: the optional header plus a stream of the remaining records.
pub struct RecordStream {
    pub header: Option<Record>,
    pub records: BoxStream<'static, Result<Record>>,
}

/// Split one raw line into fields. A trailing `\r` is dropped, no quote handling.
fn split_line(line: &[u8], delimiter: u8, line_no: usize) -> Result<Record> {
    let line = line.strip_suffix(b"\r").unwrap_or(line);
    line.split(|b| *b == delimiter)
        .map(|field| {
            std::str::from_utf8(field)
                .map(str::to_string)
                .map_err(|e| anyhow!("invalid UTF-8 on line {}: {}", line_no, e))
        })
        .collect()
}

async fn open_lines(path: &Path) -> Result<SplitStream<BufReader<File>>> {
    let file = File::open(path)
        .await
        .with_context(|| format!("Failed to open input {:?}", path))?;
    let reader = BufReader::with_capacity(READ_BUFFER_SIZE, file);
    Ok(SplitStream::new(reader.split(b'\n')))
}

/// Stream the records of `path`, splitting each `\n`-terminated line on `opts.delimiter`.
///
/// Blank lines are skipped. Line numbers in errors are 1-based.
pub async fn stream_records<P: AsRef<Path>>(path: P, opts: &RecordOptions) -> Result<RecordStream> {
    let path = path.as_ref();
    let delimiter = opts.delimiter;
    let display = path.display().to_string();

    let mut records = open_lines(path)
        .await?
        .enumerate()
        .filter_map(move |(idx, line)| {
            let item = match line {
                Ok(bytes) if bytes.is_empty() || bytes == b"\r" => None,
                Ok(bytes) => Some(split_line(&bytes, delimiter, idx + 1)),
                Err(e) => Some(Err(e).with_context(|| {
                    format!("read error in {} at line {}", display, idx + 1)
                })),
            };
            futures::future::ready(item)
        })
        .boxed();

    let header = if opts.has_header {
        match records.next().await {
            Some(first) => Some(first?),
            None => None,
        }
    } else {
        None
    };
    debug!(path = %path.display(), header = ?header, "opened record stream");

    Ok(RecordStream { header, records })
}

/// Count raw `\n`-separated lines without splitting them into fields.
pub async fn count_lines<P: AsRef<Path>>(path: P) -> Result<usize> {
    let mut lines = open_lines(path.as_ref()).await?;
    let mut count = 0usize;
    while let Some(line) = lines.next().await {
        line.context("reading line")?;
        count += 1;
    }
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::TryStreamExt;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[tokio::test]
    async fn streams_rows_and_skips_blank_lines() -> Result<()> {
        let mut tmp = NamedTempFile::new()?;
        write!(tmp, "asdf1\tnews1\tgood3\r\n\nasdf2\tnews2\t\n")?;

        let stream = stream_records(tmp.path(), &RecordOptions::default()).await?;
        assert!(stream.header.is_none());
        let rows: Vec<Record> = stream.records.try_collect().await?;
        assert_eq!(
            rows,
            vec![vec!["asdf1", "news1", "good3"], vec!["asdf2", "news2", ""]]
        );
        Ok(())
    }

    #[tokio::test]
    async fn header_is_split_off() -> Result<()> {
        let mut tmp = NamedTempFile::new()?;
        write!(tmp, "a|b\n1|2\n")?;

        let opts = RecordOptions {
            delimiter: b'|',
            has_header: true,
            quoting: false,
        };
        let stream = stream_records(tmp.path(), &opts).await?;
        assert_eq!(stream.header, Some(vec!["a".to_string(), "b".to_string()]));
        let rows: Vec<Record> = stream.records.try_collect().await?;
        assert_eq!(rows, vec![vec!["1", "2"]]);
        Ok(())
    }

    #[tokio::test]
    async fn invalid_utf8_reports_line_number() -> Result<()> {
        let mut tmp = NamedTempFile::new()?;
        tmp.write_all(b"ok\tfine\nbad\t\xff\xfe\n")?;

        let stream = stream_records(tmp.path(), &RecordOptions::default()).await?;
        let err = stream
            .records
            .try_collect::<Vec<Record>>()
            .await
            .expect_err("line 2 is not UTF-8");
        assert!(err.to_string().contains("line 2"), "{}", err);
        Ok(())
    }

    #[tokio::test]
    async fn counts_raw_lines() -> Result<()> {
        let mut tmp = NamedTempFile::new()?;
        write!(tmp, "a\nb\nc\n")?;
        assert_eq!(count_lines(tmp.path()).await?, 3);
        Ok(())
    }
}
