// src/schema/arrow.rs

use anyhow::{anyhow, bail, Context, Result};
use arrow::datatypes::{Field as ArrowField, Schema as ArrowSchema, SchemaRef};
use parquet::arrow::parquet_to_arrow_schema;
use parquet::schema::{parser::parse_message_type, types::SchemaDescriptor};
use std::sync::Arc;

use super::types::{ColumnSpec, ColumnType, SchemaSpec};

/// Build an ArrowSchema (inside an Arc) from a slice of `ColumnSpec`s.
/// Every field is nullable: an empty input cell is written as null.
pub fn build_arrow_schema(cols: &[ColumnSpec]) -> SchemaRef {
    let fields: Vec<ArrowField> = cols
        .iter()
        .map(|col| ArrowField::new(&col.name, col.ty.to_arrow(), /* nullable = */ true))
        .collect();

    Arc::new(ArrowSchema::new(fields))
}

/// Parse a Parquet message type and convert it to an Arrow schema.
///
/// Only flat schemas whose leaves map onto a [`ColumnType`] are accepted.
pub fn parse_message_schema(message: &str) -> Result<SchemaRef> {
    let parsed = parse_message_type(message).context("parsing parquet message type")?;
    let descr = SchemaDescriptor::new(Arc::new(parsed));
    let schema = parquet_to_arrow_schema(&descr, None)
        .context("converting parquet message type to arrow schema")?;

    let cols = schema
        .fields()
        .iter()
        .map(|f| {
            ColumnType::from_arrow(f.data_type())
                .map(|ty| ColumnSpec {
                    name: f.name().clone(),
                    ty,
                })
                .ok_or_else(|| {
                    anyhow!(
                        "column {} has unsupported type {:?}",
                        f.name(),
                        f.data_type()
                    )
                })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(build_arrow_schema(&cols))
}

/// `string_field_0 .. string_field_{width-1}`
pub fn default_column_names(width: usize) -> Vec<String> {
    (0..width).map(|i| format!("string_field_{}", i)).collect()
}

/// Decide the output schema.
///
/// An explicit `spec` wins, then the header row, then generated names.
/// Header and generated columns are all utf8.
pub fn resolve_schema(
    spec: Option<&SchemaSpec>,
    header: Option<&[String]>,
    width: usize,
) -> Result<SchemaRef> {
    let schema = match spec {
        Some(SchemaSpec::Columns(cols)) => {
            if cols.is_empty() {
                bail!("schema declares no columns");
            }
            build_arrow_schema(cols)
        }
        Some(SchemaSpec::Message(message)) => parse_message_schema(message)?,
        None => {
            let names = match header {
                Some(h) => h.to_vec(),
                None => default_column_names(width),
            };
            if names.is_empty() {
                bail!("cannot infer a schema from input without records or header");
            }
            let cols: Vec<ColumnSpec> = names.into_iter().map(ColumnSpec::utf8).collect();
            build_arrow_schema(&cols)
        }
    };

    if let Some(h) = header {
        if h.len() != schema.fields().len() {
            bail!(
                "header has {} columns but schema declares {}",
                h.len(),
                schema.fields().len()
            );
        }
    }

    Ok(schema)
}
