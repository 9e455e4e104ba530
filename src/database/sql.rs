//! Partial-update SQL builder and positional binding helpers.
//!
//! Keys reaching [`sql_for_partial_update`] must come from a typed, allow-listed
//! payload: an unmapped key is used verbatim as the column name.

use chrono::{NaiveDate, NaiveTime};
use sqlx::{
    postgres::{PgArguments, PgRow},
    query::QueryAs,
    FromRow, Postgres,
};
use thiserror::Error;

/// Scalar that can be bound to a positional placeholder.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    /// Binds as a text-typed null, so it may only target TEXT/VARCHAR columns.
    /// Every nullable column a payload can clear (`bio`, `profile_pic`,
    /// `description`) is text.
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Date(NaiveDate),
    Time(NaiveTime),
}

impl From<&str> for SqlValue {
    fn from(v: &str) -> Self {
        SqlValue::Text(v.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(v: String) -> Self {
        SqlValue::Text(v)
    }
}

impl From<i64> for SqlValue {
    fn from(v: i64) -> Self {
        SqlValue::Int(v)
    }
}

impl From<i32> for SqlValue {
    fn from(v: i32) -> Self {
        SqlValue::Int(v.into())
    }
}

impl From<bool> for SqlValue {
    fn from(v: bool) -> Self {
        SqlValue::Bool(v)
    }
}

impl From<NaiveDate> for SqlValue {
    fn from(v: NaiveDate) -> Self {
        SqlValue::Date(v)
    }
}

impl From<NaiveTime> for SqlValue {
    fn from(v: NaiveTime) -> Self {
        SqlValue::Time(v)
    }
}

impl<T: Into<SqlValue>> From<Option<T>> for SqlValue {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(SqlValue::Null)
    }
}

/// Logical field name -> new value. Iterates in insertion order; re-inserting a
/// key replaces its value in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldMap {
    entries: Vec<(String, SqlValue)>,
}

impl FieldMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<SqlValue>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Insert only when the payload actually carried the field.
    pub fn insert_some<T: Into<SqlValue>>(&mut self, key: &str, value: Option<T>) {
        if let Some(value) = value {
            self.insert(key, value);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SqlValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// Static logical-field -> storage-column declarations.
pub type ColumnMapping = [(&'static str, &'static str)];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SqlBuildError {
    #[error("No data.")]
    EmptyUpdate,
}

/// Compiled `SET` clause plus the values for its placeholders, in order.
#[derive(Debug, Clone, PartialEq)]
pub struct PartialUpdate {
    pub set_cols: String,
    pub values: Vec<SqlValue>,
}

impl PartialUpdate {
    /// Index of the first placeholder the caller may append (e.g. the record id).
    pub fn next_placeholder(&self) -> usize {
        self.values.len() + 1
    }
}

pub fn sql_for_partial_update(
    data: &FieldMap,
    columns: &ColumnMapping,
) -> Result<PartialUpdate, SqlBuildError> {
    if data.is_empty() {
        return Err(SqlBuildError::EmptyUpdate);
    }

    let mut cols = Vec::with_capacity(data.len());
    let mut values = Vec::with_capacity(data.len());

    for (idx, (key, value)) in data.iter().enumerate() {
        let column = columns
            .iter()
            .find(|(field, _)| *field == key)
            .map(|(_, column)| *column)
            .unwrap_or(key);

        cols.push(format!("{} = ${}", quote_identifier(column), idx + 1));
        values.push(value.clone());
    }

    Ok(PartialUpdate {
        set_cols: cols.join(", "),
        values,
    })
}

/// Quote SQL identifier, doubling embedded quotes.
pub fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Bind a value to the next positional placeholder.
pub fn bind_value<'q, O>(
    q: QueryAs<'q, Postgres, O, PgArguments>,
    v: &'q SqlValue,
) -> QueryAs<'q, Postgres, O, PgArguments>
where
    O: for<'r> FromRow<'r, PgRow>,
{
    match v {
        SqlValue::Null => {
            // Postgres rejects a text null for DATE, TIME or INTEGER columns.
            let none: Option<String> = None;
            q.bind(none)
        }
        SqlValue::Bool(b) => q.bind(*b),
        SqlValue::Int(i) => q.bind(*i),
        SqlValue::Float(f) => q.bind(*f),
        SqlValue::Text(s) => q.bind(s.as_str()),
        SqlValue::Date(d) => q.bind(*d),
        SqlValue::Time(t) => q.bind(*t),
    }
}
