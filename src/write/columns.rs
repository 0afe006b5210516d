// src/write/columns.rs

use anyhow::{anyhow, bail, Result};
use arrow::array::{
    ArrayRef, BooleanBuilder, Float32Builder, Float64Builder, Int32Builder, Int64Builder,
    StringBuilder,
};
use arrow::datatypes::DataType;
use std::{str::FromStr, sync::Arc};

use crate::schema::ColumnType;

/// Accumulates text cells for one output column, parsed into the column's type.
pub enum ColumnBuilder {
    Utf8(StringBuilder),
    Int32(Int32Builder),
    Int64(Int64Builder),
    Float32(Float32Builder),
    Float64(Float64Builder),
    Boolean(BooleanBuilder),
}

fn parse_cell<T: FromStr>(cell: &str) -> Option<T> {
    cell.trim().parse::<T>().ok()
}

fn parse_bool(cell: &str) -> Option<bool> {
    match cell.trim().to_ascii_lowercase().as_str() {
        "true" | "t" | "1" | "yes" | "y" => Some(true),
        "false" | "f" | "0" | "no" | "n" => Some(false),
        _ => None,
    }
}

impl ColumnBuilder {
    pub fn new(data_type: &DataType, capacity: usize) -> Result<Self> {
        let ty = ColumnType::from_arrow(data_type)
            .ok_or_else(|| anyhow!("unsupported column type {:?}", data_type))?;
        Ok(match ty {
            ColumnType::Utf8 => ColumnBuilder::Utf8(StringBuilder::with_capacity(capacity, capacity * 16)),
            ColumnType::Int32 => ColumnBuilder::Int32(Int32Builder::with_capacity(capacity)),
            ColumnType::Int64 => ColumnBuilder::Int64(Int64Builder::with_capacity(capacity)),
            ColumnType::Float32 => ColumnBuilder::Float32(Float32Builder::with_capacity(capacity)),
            ColumnType::Float64 => ColumnBuilder::Float64(Float64Builder::with_capacity(capacity)),
            ColumnType::Boolean => ColumnBuilder::Boolean(BooleanBuilder::with_capacity(capacity)),
        })
    }

    /// Append one cell. An empty cell is null for every type.
    pub fn append(&mut self, cell: &str) -> Result<()> {
        if cell.is_empty() {
            self.append_null();
            return Ok(());
        }

        let parsed = match self {
            ColumnBuilder::Utf8(b) => {
                b.append_value(cell);
                true
            }
            ColumnBuilder::Int32(b) => parse_cell(cell).map(|v| b.append_value(v)).is_some(),
            ColumnBuilder::Int64(b) => parse_cell(cell).map(|v| b.append_value(v)).is_some(),
            ColumnBuilder::Float32(b) => parse_cell(cell).map(|v| b.append_value(v)).is_some(),
            ColumnBuilder::Float64(b) => parse_cell(cell).map(|v| b.append_value(v)).is_some(),
            ColumnBuilder::Boolean(b) => parse_bool(cell).map(|v| b.append_value(v)).is_some(),
        };

        if !parsed {
            bail!("cannot parse {:?} as {}", cell, self.type_name());
        }
        Ok(())
    }

    pub fn append_null(&mut self) {
        match self {
            ColumnBuilder::Utf8(b) => b.append_null(),
            ColumnBuilder::Int32(b) => b.append_null(),
            ColumnBuilder::Int64(b) => b.append_null(),
            ColumnBuilder::Float32(b) => b.append_null(),
            ColumnBuilder::Float64(b) => b.append_null(),
            ColumnBuilder::Boolean(b) => b.append_null(),
        }
    }

    /// Drain the buffered cells into an array, leaving the builder empty.
    pub fn finish(&mut self) -> ArrayRef {
        match self {
            ColumnBuilder::Utf8(b) => Arc::new(b.finish()),
            ColumnBuilder::Int32(b) => Arc::new(b.finish()),
            ColumnBuilder::Int64(b) => Arc::new(b.finish()),
            ColumnBuilder::Float32(b) => Arc::new(b.finish()),
            ColumnBuilder::Float64(b) => Arc::new(b.finish()),
            ColumnBuilder::Boolean(b) => Arc::new(b.finish()),
        }
    }

    fn type_name(&self) -> &'static str {
        match self {
            ColumnBuilder::Utf8(_) => "utf8",
            ColumnBuilder::Int32(_) => "int32",
            ColumnBuilder::Int64(_) => "int64",
            ColumnBuilder::Float32(_) => "float32",
            ColumnBuilder::Float64(_) => "float64",
            ColumnBuilder::Boolean(_) => "boolean",
        }
    }
}
