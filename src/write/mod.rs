// src/write/mod.rs

use anyhow::{bail, Context, Result};
use arrow::datatypes::SchemaRef;
use arrow::record_batch::RecordBatch;
use futures::{Stream, StreamExt};
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::{WriterProperties, WriterVersion};
use std::io::Write;
use tracing::{debug, info};

pub mod columns;

pub use columns::ColumnBuilder;

/// Default maximum rows per Parquet row group.
pub const ROW_GROUP_SIZE: usize = 1 << 20;

#[derive(Debug, Clone)]
pub struct WriteOptions {
    pub compression: Compression,
    /// Rows buffered before they are handed to the Parquet writer as one batch.
    pub batch_size: usize,
    pub row_group_size: usize,
    pub created_by: String,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            compression: Compression::SNAPPY,
            batch_size: 8192,
            row_group_size: ROW_GROUP_SIZE,
            created_by: format!("{} version {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")),
        }
    }
}

impl WriteOptions {
    pub fn writer_properties(&self) -> WriterProperties {
        WriterProperties::builder()
            .set_writer_version(WriterVersion::PARQUET_2_0)
            .set_compression(self.compression)
            .set_max_row_group_size(self.row_group_size)
            .set_created_by(self.created_by.clone())
            .build()
    }
}

/// What a finished write produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WriteSummary {
    pub rows: u64,
    pub batches: u64,
    /// Size of the output file; only filled in by the file-level converters.
    pub bytes: u64,
}

/// Row-at-a-time Parquet writer over string records.
///
/// Cells are parsed into the schema's column types and buffered; every
/// `batch_size` rows become one `RecordBatch` for the underlying `ArrowWriter`.
pub struct ParquetSink<W: Write + Send> {
    writer: ArrowWriter<W>,
    schema: SchemaRef,
    builders: Vec<ColumnBuilder>,
    batch_size: usize,
    buffered: usize,
    summary: WriteSummary,
}

impl<W: Write + Send> ParquetSink<W> {
    pub fn try_new(sink: W, schema: SchemaRef, opts: &WriteOptions) -> Result<Self> {
        if opts.batch_size == 0 || opts.row_group_size == 0 {
            bail!("batch_size and row_group_size must be greater than zero");
        }
        let builders = schema
            .fields()
            .iter()
            .map(|f| {
                ColumnBuilder::new(f.data_type(), opts.batch_size)
                    .with_context(|| format!("column {}", f.name()))
            })
            .collect::<Result<Vec<_>>>()?;

        let writer = ArrowWriter::try_new(sink, schema.clone(), Some(opts.writer_properties()))
            .context("opening parquet writer")?;

        Ok(Self {
            writer,
            schema,
            builders,
            batch_size: opts.batch_size,
            buffered: 0,
            summary: WriteSummary::default(),
        })
    }

    pub fn schema(&self) -> &SchemaRef {
        &self.schema
    }

    /// Rows accepted so far, flushed or not.
    pub fn rows(&self) -> u64 {
        self.summary.rows + self.buffered as u64
    }

    /// Append one record. Any error leaves the current batch partially filled,
    /// so the sink should be dropped rather than written to again.
    pub fn push_record<S: AsRef<str>>(&mut self, record: &[S]) -> Result<()> {
        let row = self.rows();
        if record.len() != self.builders.len() {
            bail!(
                "row {} has {} fields but schema declares {}",
                row,
                record.len(),
                self.builders.len()
            );
        }

        let mut failure = None;
        for (idx, (builder, cell)) in self.builders.iter_mut().zip(record).enumerate() {
            if let Err(e) = builder.append(cell.as_ref()) {
                failure = Some((idx, e));
                break;
            }
        }
        if let Some((idx, e)) = failure {
            let name = self.schema.field(idx).name();
            return Err(e).with_context(|| format!("row {} column {}", row, name));
        }

        self.buffered += 1;
        if self.buffered >= self.batch_size {
            self.flush_batch()?;
        }
        Ok(())
    }

    /// Hand any buffered rows to the Parquet writer.
    pub fn flush_batch(&mut self) -> Result<()> {
        if self.buffered == 0 {
            return Ok(());
        }
        let columns = self.builders.iter_mut().map(|b| b.finish()).collect();
        let batch = RecordBatch::try_new(self.schema.clone(), columns)
            .context("building record batch")?;
        self.writer.write(&batch).context("writing record batch")?;

        debug!(
            batch = self.summary.batches,
            rows = batch.num_rows(),
            "wrote batch"
        );
        self.summary.rows += batch.num_rows() as u64;
        self.summary.batches += 1;
        self.buffered = 0;
        Ok(())
    }

    /// Flush the remainder and write the Parquet footer.
    pub fn finish(mut self) -> Result<WriteSummary> {
        self.flush_batch()?;
        self.writer.close().context("closing parquet writer")?;
        info!(rows = self.summary.rows, batches = self.summary.batches, "finished parquet");
        Ok(self.summary)
    }
}

/// Write every record of `records` to `sink` as Parquet.
pub fn write_parquet<W, I, R, S>(
    sink: W,
    records: I,
    schema: SchemaRef,
    opts: &WriteOptions,
) -> Result<WriteSummary>
where
    W: Write + Send,
    I: IntoIterator<Item = R>,
    R: AsRef<[S]>,
    S: AsRef<str>,
{
    let mut writer = ParquetSink::try_new(sink, schema, opts)?;
    for record in records {
        writer.push_record(record.as_ref())?;
    }
    writer.finish()
}

/// Async counterpart of [`write_parquet`]: drains a stream of fallible records.
/// The first stream error aborts the write.
pub async fn write_parquet_stream<W, St, R, S>(
    sink: W,
    mut records: St,
    schema: SchemaRef,
    opts: &WriteOptions,
) -> Result<WriteSummary>
where
    W: Write + Send,
    St: Stream<Item = Result<R>> + Unpin,
    R: AsRef<[S]>,
    S: AsRef<str>,
{
    let mut writer = ParquetSink::try_new(sink, schema, opts)?;
    while let Some(record) = records.next().await {
        writer.push_record(record?.as_ref())?;
    }
    writer.finish()
}
