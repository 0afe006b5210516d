pub mod arrow;
pub mod types;

pub use self::arrow::{build_arrow_schema, default_column_names, parse_message_schema, resolve_schema};
pub use types::{ColumnSpec, ColumnType, SchemaSpec};
