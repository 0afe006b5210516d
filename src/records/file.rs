// src/records/file.rs

use anyhow::{Context, Result};
use csv::ReaderBuilder;
use std::path::Path;
use tracing::debug;

use super::{Record, RecordOptions};

/// A synchronously read delimited file: the optional header plus the remaining records.
pub struct RecordFile {
    pub header: Option<Record>,
    pub records: Box<dyn Iterator<Item = Result<Record>> + Send>,
}

/// Open `path` with the `csv` reader configured from `opts`.
///
/// Records may have differing widths; the writer rejects mismatches with the row number.
#[tracing::instrument(level = "debug", skip(path, opts), fields(path = %path.as_ref().display()))]
pub fn read_records<P: AsRef<Path>>(path: P, opts: &RecordOptions) -> Result<RecordFile> {
    let path = path.as_ref();
    let rdr = ReaderBuilder::new()
        .delimiter(opts.delimiter)
        .has_headers(false)
        .quoting(opts.quoting)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Failed to open input {:?}", path))?;

    let display = path.display().to_string();
    let mut records = rdr.into_records().enumerate().map(move |(idx, result)| {
        let record = result.map_err(|e| {
            // quoted fields can span lines, so prefer the reader's own position
            let line = e.position().map_or(idx as u64 + 1, |p| p.line());
            anyhow::Error::new(e).context(format!("parse error in {} at line {}", display, line))
        })?;
        Ok(record.iter().map(str::to_string).collect::<Record>())
    });

    let header = if opts.has_header {
        match records.next() {
            Some(first) => Some(first?),
            None => None,
        }
    } else {
        None
    };
    debug!(header = ?header, "opened record file");

    Ok(RecordFile {
        header,
        records: Box::new(records),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn reads_tab_separated_rows_without_header() -> Result<()> {
        let mut tmp = NamedTempFile::new()?;
        write!(tmp, "asdf1\tnews1\tgood3\nasdf2\tnews2\tgood2\n")?;

        let file = read_records(tmp.path(), &RecordOptions::default())?;
        assert!(file.header.is_none());
        let rows = file.records.collect::<Result<Vec<_>>>()?;
        assert_eq!(
            rows,
            vec![
                vec!["asdf1", "news1", "good3"],
                vec!["asdf2", "news2", "good2"],
            ]
        );
        Ok(())
    }

    #[test]
    fn takes_header_and_honours_quotes() -> Result<()> {
        let mut tmp = NamedTempFile::new()?;
        write!(tmp, "id,label\n1,\"a,b\"\n2,\n")?;

        let opts = RecordOptions {
            delimiter: b',',
            has_header: true,
            quoting: true,
        };
        let file = read_records(tmp.path(), &opts)?;
        assert_eq!(file.header, Some(vec!["id".to_string(), "label".to_string()]));
        let rows = file.records.collect::<Result<Vec<_>>>()?;
        assert_eq!(rows, vec![vec!["1", "a,b"], vec!["2", ""]]);
        Ok(())
    }

    #[test]
    fn quotes_are_literal_when_quoting_disabled() -> Result<()> {
        let mut tmp = NamedTempFile::new()?;
        write!(tmp, "\"x\"\ty\n")?;

        let file = read_records(tmp.path(), &RecordOptions::default())?;
        let rows = file.records.collect::<Result<Vec<_>>>()?;
        assert_eq!(rows, vec![vec!["\"x\"", "y"]]);
        Ok(())
    }

    #[test]
    fn invalid_utf8_names_the_line() -> Result<()> {
        let mut tmp = NamedTempFile::new()?;
        tmp.write_all(b"ok\tfine\nbad\t\xff\xfe\n")?;

        let file = read_records(tmp.path(), &RecordOptions::default())?;
        let err = file
            .records
            .collect::<Result<Vec<_>>>()
            .expect_err("line 2 is not UTF-8");
        assert!(format!("{:#}", err).contains("line 2"), "{:#}", err);
        Ok(())
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(read_records("/definitely/not/here.tsv", &RecordOptions::default()).is_err());
    }
}
