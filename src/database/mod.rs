pub mod manager;
pub mod models;
pub mod sql;

pub use manager::DatabaseError;
pub use sql::{sql_for_partial_update, ColumnMapping, FieldMap, PartialUpdate, SqlBuildError, SqlValue};
