// src/table/render.rs
//! Plain-text rendering in the "simple" layout: columns padded to their widest
//! cell, two spaces between columns and dash rules made of one run per column.

use unicode_width::UnicodeWidthStr;

use super::Table;

const COLUMN_SEPARATOR: &str = "  ";
/// Extra width a column gets over its header when headers are shown.
const MIN_HEADER_PADDING: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Prepend the 0-based row position as the first column.
    pub show_index: bool,
    pub show_headers: bool,
    /// Text for null cells.
    pub missing: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            show_index: true,
            show_headers: false,
            missing: String::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Align {
    Left,
    /// Right-aligned with decimal points lined up.
    Decimal,
}

struct Column {
    header: String,
    cells: Vec<Option<String>>,
}

fn is_number(s: &str) -> bool {
    s.trim().parse::<f64>().is_ok()
}

/// Characters after the decimal point, or after the exponent marker of a
/// value like `1e-7`. `None` when there is neither.
fn after_point(s: &str) -> Option<usize> {
    s.rfind('.')
        .or_else(|| s.rfind(['e', 'E']))
        .map(|pos| s.len() - pos - 1)
}

fn pad_left(s: &str, width: usize) -> String {
    let fill = width.saturating_sub(s.width());
    format!("{}{}", " ".repeat(fill), s)
}

fn pad_right(s: &str, width: usize) -> String {
    let fill = width.saturating_sub(s.width());
    format!("{}{}", s, " ".repeat(fill))
}

impl Column {
    fn align(&self) -> Align {
        let mut present = self.cells.iter().flatten().peekable();
        if present.peek().is_some() && present.all(|c| is_number(c)) {
            Align::Decimal
        } else {
            Align::Left
        }
    }

    /// Cell texts before width padding; decimal columns get trailing spaces so points line up.
    fn texts(&self, align: Align, missing: &str) -> Vec<String> {
        match align {
            Align::Left => self
                .cells
                .iter()
                .map(|c| c.as_deref().unwrap_or(missing).to_string())
                .collect(),
            Align::Decimal => {
                // a value without a point needs one extra space to stand in for it
                let span = |s: &str| after_point(s).map_or(0, |d| d + 1);
                let widest = self.cells.iter().flatten().map(|c| span(c.as_str())).max().unwrap_or(0);
                self.cells
                    .iter()
                    .map(|c| match c {
                        Some(v) => format!("{}{}", v, " ".repeat(widest - span(v.as_str()))),
                        None => missing.to_string(),
                    })
                    .collect()
            }
        }
    }
}

impl Table {
    /// Render the table as text. No trailing newline; an empty table renders as `""`.
    pub fn render(&self, opts: &RenderOptions) -> String {
        let mut columns: Vec<Column> = Vec::with_capacity(self.columns.len() + 1);
        if opts.show_index {
            columns.push(Column {
                header: String::new(),
                cells: (0..self.rows.len()).map(|i| Some(i.to_string())).collect(),
            });
        }
        for (idx, name) in self.columns.iter().enumerate() {
            columns.push(Column {
                header: name.clone(),
                cells: self
                    .rows
                    .iter()
                    .map(|row| row.get(idx).cloned().flatten())
                    .collect(),
            });
        }

        if columns.is_empty() || (self.rows.is_empty() && !opts.show_headers) {
            return String::new();
        }

        let mut headers = Vec::with_capacity(columns.len());
        let mut rule = Vec::with_capacity(columns.len());
        let mut body: Vec<Vec<String>> = vec![Vec::with_capacity(columns.len()); self.rows.len()];

        for column in &columns {
            let align = column.align();
            let texts = column.texts(align, &opts.missing);

            let mut width = texts.iter().map(|t| t.width()).max().unwrap_or(0);
            if opts.show_headers {
                width = width.max(column.header.width() + MIN_HEADER_PADDING);
            }

            let pad = match align {
                Align::Left => pad_right,
                Align::Decimal => pad_left,
            };
            headers.push(pad(&column.header, width));
            rule.push("-".repeat(width));
            for (line, text) in body.iter_mut().zip(&texts) {
                line.push(pad(text, width));
            }
        }

        let rule = rule.join(COLUMN_SEPARATOR);
        let mut lines = Vec::with_capacity(self.rows.len() + 2);
        if opts.show_headers {
            lines.push(headers.join(COLUMN_SEPARATOR));
            lines.push(rule);
            lines.extend(body.iter().map(|cells| cells.join(COLUMN_SEPARATOR)));
        } else {
            lines.push(rule.clone());
            lines.extend(body.iter().map(|cells| cells.join(COLUMN_SEPARATOR)));
            lines.push(rule);
        }
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(columns: &[&str], rows: &[&[Option<&str>]]) -> Table {
        Table {
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows: rows
                .iter()
                .map(|r| r.iter().map(|c| c.map(str::to_string)).collect())
                .collect(),
        }
    }

    #[test]
    fn index_column_and_rules_without_headers() {
        let t = table(
            &["a", "b"],
            &[&[Some("x"), Some("long")], &[Some("yy"), Some("z")]],
        );
        assert_eq!(
            t.render(&RenderOptions::default()),
            "-  --  ----\n0  x   long\n1  yy  z   \n-  --  ----"
        );
    }

    #[test]
    fn headers_widen_columns_and_drop_outer_rules() {
        let t = table(&["name"], &[&[Some("x")]]);
        let opts = RenderOptions {
            show_index: false,
            show_headers: true,
            ..RenderOptions::default()
        };
        assert_eq!(t.render(&opts), "name  \n------\nx     ");
    }

    #[test]
    fn numeric_columns_align_on_the_decimal_point() {
        let t = table(&["v"], &[&[Some("1")], &[Some("22.5")], &[Some("3.25")]]);
        let opts = RenderOptions {
            show_index: false,
            ..RenderOptions::default()
        };
        assert_eq!(t.render(&opts), "-----\n 1   \n22.5 \n 3.25\n-----");
    }

    #[test]
    fn exponent_values_align_on_the_exponent_marker() {
        let t = table(&["v"], &[&[Some("1e-7")], &[Some("2.5")]]);
        let opts = RenderOptions {
            show_index: false,
            ..RenderOptions::default()
        };
        assert_eq!(t.render(&opts), "----\n1e-7\n2.5 \n----");
        assert_eq!(after_point("1E5"), Some(1));
        assert_eq!(after_point("12"), None);
    }

    #[test]
    fn integer_columns_right_align() {
        let t = table(&["n"], &[&[Some("7")], &[Some("100")]]);
        let opts = RenderOptions {
            show_index: false,
            ..RenderOptions::default()
        };
        assert_eq!(t.render(&opts), "---\n  7\n100\n---");
    }

    #[test]
    fn nulls_use_the_missing_text() {
        let t = table(&["a"], &[&[None], &[Some("b")]]);
        let opts = RenderOptions {
            show_index: false,
            missing: "?".into(),
            ..RenderOptions::default()
        };
        assert_eq!(t.render(&opts), "-\n?\nb\n-");
    }

    #[test]
    fn empty_table_renders_empty_string() {
        assert_eq!(Table::default().render(&RenderOptions::default()), "");
        let t = table(&["a"], &[]);
        assert_eq!(t.render(&RenderOptions::default()), "");
    }

    #[test]
    fn rendering_is_idempotent() {
        let t = table(&["a"], &[&[Some("1.5")], &[Some("x")]]);
        let opts = RenderOptions::default();
        assert_eq!(t.render(&opts), t.render(&opts));
    }
}
