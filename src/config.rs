// src/config.rs

use anyhow::{anyhow, bail, Context, Result};
use parquet::basic::{BrotliLevel, Compression, GzipLevel, ZstdLevel};
use serde::{Deserialize, Serialize};
use std::{fs::File, path::Path};

use crate::records::RecordOptions;
use crate::schema::SchemaSpec;
use crate::write::{WriteOptions, ROW_GROUP_SIZE};

/// Parquet page compression, with each codec at its default level.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy, Default)]
#[serde(rename_all = "lowercase")]
pub enum CompressionKind {
    #[serde(alias = "uncompressed")]
    None,
    #[default]
    Snappy,
    Gzip,
    Brotli,
    Zstd,
    Lz4,
}

impl CompressionKind {
    pub fn to_parquet(self) -> Compression {
        match self {
            CompressionKind::None => Compression::UNCOMPRESSED,
            CompressionKind::Snappy => Compression::SNAPPY,
            CompressionKind::Gzip => Compression::GZIP(GzipLevel::default()),
            CompressionKind::Brotli => Compression::BROTLI(BrotliLevel::default()),
            CompressionKind::Zstd => Compression::ZSTD(ZstdLevel::default()),
            CompressionKind::Lz4 => Compression::LZ4,
        }
    }
}

/// Settings for one delimited-text → Parquet conversion.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
#[serde(default)]
pub struct ConvertConfig {
    pub delimiter: char,
    pub has_header: bool,
    pub quoting: bool,
    pub compression: CompressionKind,
    pub batch_size: usize,
    pub row_group_size: usize,
    /// Written as `schema: {columns: [...]}` or `schema: {message: "..."}` in either format.
    #[serde(with = "serde_yaml::with::singleton_map")]
    pub schema: Option<SchemaSpec>,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            delimiter: '\t',
            has_header: false,
            quoting: false,
            compression: CompressionKind::Snappy,
            batch_size: 8192,
            row_group_size: ROW_GROUP_SIZE,
            schema: None,
        }
    }
}

impl ConvertConfig {
    /// Load from a `.json`, `.yaml` or `.yml` file and validate.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        let file = File::open(path).with_context(|| format!("opening config {:?}", path))?;

        let config: ConvertConfig = match ext.as_deref() {
            Some("json") => serde_json::from_reader(file)
                .with_context(|| format!("parsing JSON config {:?}", path))?,
            Some("yaml") | Some("yml") => serde_yaml::from_reader(file)
                .with_context(|| format!("parsing YAML config {:?}", path))?,
            _ => bail!("unsupported config extension for {:?}", path),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.delimiter_byte()?;
        if self.batch_size == 0 {
            bail!("batch_size must be greater than zero");
        }
        if self.row_group_size == 0 {
            bail!("row_group_size must be greater than zero");
        }
        Ok(())
    }

    pub fn delimiter_byte(&self) -> Result<u8> {
        if self.delimiter.is_ascii() {
            Ok(self.delimiter as u8)
        } else {
            Err(anyhow!(
                "delimiter {:?} is not a single ASCII byte",
                self.delimiter
            ))
        }
    }

    pub fn record_options(&self) -> Result<RecordOptions> {
        Ok(RecordOptions {
            delimiter: self.delimiter_byte()?,
            has_header: self.has_header,
            quoting: self.quoting,
        })
    }

    pub fn write_options(&self) -> WriteOptions {
        WriteOptions {
            compression: self.compression.to_parquet(),
            batch_size: self.batch_size,
            row_group_size: self.row_group_size,
            ..WriteOptions::default()
        }
    }
}
