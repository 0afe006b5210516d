// src/schema/types.rs

use arrow::datatypes::DataType;
use serde::{Deserialize, Serialize};

/// Value type of a single output column.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Copy, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    #[default]
    #[serde(alias = "string", alias = "utf-8")]
    Utf8,
    Int32,
    Int64,
    Float32,
    #[serde(alias = "double")]
    Float64,
    #[serde(alias = "bool")]
    Boolean,
}

impl ColumnType {
    pub fn to_arrow(self) -> DataType {
        match self {
            ColumnType::Utf8 => DataType::Utf8,
            ColumnType::Int32 => DataType::Int32,
            ColumnType::Int64 => DataType::Int64,
            ColumnType::Float32 => DataType::Float32,
            ColumnType::Float64 => DataType::Float64,
            ColumnType::Boolean => DataType::Boolean,
        }
    }

    /// Inverse of [`ColumnType::to_arrow`]; `None` for anything the writer can't build.
    pub fn from_arrow(dt: &DataType) -> Option<Self> {
        match dt {
            DataType::Utf8 => Some(ColumnType::Utf8),
            DataType::Int32 => Some(ColumnType::Int32),
            DataType::Int64 => Some(ColumnType::Int64),
            DataType::Float32 => Some(ColumnType::Float32),
            DataType::Float64 => Some(ColumnType::Float64),
            DataType::Boolean => Some(ColumnType::Boolean),
            _ => None,
        }
    }
}

/// A single column definition as given in a config file.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Eq, Hash)]
pub struct ColumnSpec {
    pub name: String,
    #[serde(rename = "type", default)]
    pub ty: ColumnType,
}

impl ColumnSpec {
    pub fn utf8(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: ColumnType::Utf8,
        }
    }
}

/// How the output schema is declared.
///
/// Either an explicit column list or a Parquet message type, e.g.
/// `message schema { OPTIONAL BYTE_ARRAY name (UTF8); }`.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
#[serde(rename_all = "lowercase")]
pub enum SchemaSpec {
    Columns(Vec<ColumnSpec>),
    Message(String),
}
