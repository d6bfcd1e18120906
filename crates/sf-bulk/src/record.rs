//! Row values uploaded as CSV batches.

use serde::Serialize;

use crate::error::{Error, ErrorKind, Result};

/// A single field value in a batch row.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Empty cell; clears the field on update
    Null,
    Text(String),
    Bool(bool),
    Integer(i64),
    Float(f64),
}

impl FieldValue {
    /// Render the value as a CSV cell.
    pub fn to_csv_field(&self) -> String {
        match self {
            FieldValue::Null => String::new(),
            FieldValue::Text(s) => s.clone(),
            FieldValue::Bool(b) => b.to_string(),
            FieldValue::Integer(n) => n.to_string(),
            FieldValue::Float(n) => n.to_string(),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        FieldValue::Integer(value.into())
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Integer(value)
    }
}

impl From<u32> for FieldValue {
    fn from(value: u32) -> Self {
        FieldValue::Integer(value.into())
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Float(value)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(FieldValue::Null, Into::into)
    }
}

/// An ordered row of field values.
///
/// Field order matters: the first row of a batch decides the CSV header.
///
/// # Example
///
/// ```rust,ignore
/// let row = Record::new()
///     .field("Id__c", 12345)
///     .field("Title__c", "This is a test video")
///     .null("IsPreview__c");
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    fields: Vec<(String, FieldValue)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field, replacing any existing value with the same name.
    pub fn field(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.set(name, value);
        self
    }

    /// Add an empty field.
    pub fn null(self, name: impl Into<String>) -> Self {
        self.field(name, FieldValue::Null)
    }

    /// Set a field in place. Existing fields keep their position.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<FieldValue>) {
        let name = name.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = value,
            None => self.fields.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    /// Field names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(n, _)| n.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>, V: Into<FieldValue>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = Record::new();
        for (name, value) in iter {
            record.set(name, value);
        }
        record
    }
}

fn csv_writer() -> csv::Writer<Vec<u8>> {
    csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .quote_style(csv::QuoteStyle::Necessary)
        .from_writer(Vec::new())
}

fn finish(writer: csv::Writer<Vec<u8>>) -> Result<String> {
    let bytes = writer
        .into_inner()
        .map_err(|e| Error::new(ErrorKind::Csv(e.to_string())))?;
    String::from_utf8(bytes).map_err(|e| Error::new(ErrorKind::Csv(e.to_string())))
}

/// Serialize rows as a CSV batch body.
///
/// The header is the first row's field names. Later rows are looked up by
/// name: missing fields become empty cells and extra fields are dropped.
pub fn records_to_csv(records: &[Record]) -> Result<String> {
    let Some(first) = records.first() else {
        return Err(Error::new(ErrorKind::InvalidInput(
            "a batch needs at least one record".to_string(),
        )));
    };
    let header: Vec<&str> = first.names().collect();
    if header.is_empty() {
        return Err(Error::new(ErrorKind::InvalidInput(
            "the first record has no fields".to_string(),
        )));
    }

    let mut writer = csv_writer();
    writer.write_record(&header)?;
    for record in records {
        let row = header
            .iter()
            .map(|name| record.get(name).map(FieldValue::to_csv_field).unwrap_or_default());
        writer.write_record(row)?;
    }
    finish(writer)
}

/// Serialize typed rows as a CSV batch body using their serde field names.
pub fn rows_to_csv<T: Serialize>(rows: &[T]) -> Result<String> {
    if rows.is_empty() {
        return Err(Error::new(ErrorKind::InvalidInput(
            "a batch needs at least one record".to_string(),
        )));
    }

    let mut writer = csv_writer();
    for row in rows {
        writer.serialize(row)?;
    }
    finish(writer)
}
