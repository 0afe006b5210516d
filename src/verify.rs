// src/verify.rs

use anyhow::{Context, Result};
use std::{fs, io::Write, path::Path};
use tracing::{info, warn};

use crate::diff::{diff_text, TextDiff};
use crate::table::{read_parquet_table, RenderOptions};

/// How the fixture written by [`crate::fixture::write_fixture`] must render.
pub const EXPECTED_FIXTURE_TABLE: &str = "-  -----  -----  -----
0  asdf1  news1  good3
1  asdf2  news2  good2
2  asdf3  news3  good1
-  -----  -----  -----";

/// Load `path`, render it with `opts` and diff the rendering against `expected`.
///
/// An empty diff means the file matches.
pub fn verify_parquet<P: AsRef<Path>>(
    path: P,
    expected: &str,
    opts: &RenderOptions,
) -> Result<TextDiff> {
    let path = path.as_ref();
    let table = read_parquet_table(path)?;
    let rendered = table.render(opts);
    let diff = diff_text(expected, &rendered);

    if diff.is_empty() {
        info!(path = %path.display(), rows = table.num_rows(), "table matches");
    } else {
        warn!(path = %path.display(), changed_lines = diff.len(), "table differs");
    }
    Ok(diff)
}

/// Verify `path` against the table in `expected_file`, or against
/// [`EXPECTED_FIXTURE_TABLE`] when none is given, writing each differing line
/// to `out`. `Ok(false)` on mismatch; load errors are returned.
pub fn verify_table<W: Write>(
    path: &Path,
    expected_file: Option<&Path>,
    out: &mut W,
) -> Result<bool> {
    let expected = match expected_file {
        Some(f) => {
            let text = fs::read_to_string(f).with_context(|| format!("reading {:?}", f))?;
            // editors like to end files with a newline; the rendering never does
            text.trim_end_matches(['\r', '\n']).to_string()
        }
        None => EXPECTED_FIXTURE_TABLE.to_string(),
    };

    let diff = verify_parquet(path, &expected, &RenderOptions::default())?;
    for line in diff.changes() {
        writeln!(out, "{}", line).context("writing diff")?;
    }
    Ok(diff.is_empty())
}
