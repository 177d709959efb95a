//! # Payload Reader
//!
//! Typed field access over a slot's JSON object. Every read either returns a
//! value of the requested type or a [`SlotError::MissingField`] naming the
//! slot, the tag, and the dotted path of the field.
//!
//! Fields the tag does not ask for are never looked at, which is how extra
//! input keys get dropped on ingest.

use serde_json::{Map, Value};

use crate::error::SlotError;

/// Reads required fields out of a slot payload on behalf of one tag.
#[derive(Debug, Clone)]
pub struct PayloadReader<'a> {
    slot: &'static str,
    tag: &'a str,
    prefix: String,
    fields: &'a Map<String, Value>,
}

impl<'a> PayloadReader<'a> {
    /// Create a reader for `tag` within `slot` over `fields`.
    pub fn new(slot: &'static str, tag: &'a str, fields: &'a Map<String, Value>) -> Self {
        Self {
            slot,
            tag,
            prefix: String::new(),
            fields,
        }
    }

    /// Read a required number. Integers are accepted and widened to `f64`.
    pub fn float(&self, field: &str) -> Result<f64, SlotError> {
        self.fields
            .get(field)
            .and_then(Value::as_f64)
            .ok_or_else(|| self.missing(field, "number"))
    }

    /// Read a required string.
    pub fn string(&self, field: &str) -> Result<String, SlotError> {
        self.fields
            .get(field)
            .and_then(Value::as_str)
            .map(str::to_owned)
            .ok_or_else(|| self.missing(field, "string"))
    }

    /// Read a required array of strings, preserving order and duplicates.
    pub fn strings(&self, field: &str) -> Result<Vec<String>, SlotError> {
        let items = self
            .fields
            .get(field)
            .and_then(Value::as_array)
            .ok_or_else(|| self.missing(field, "array of strings"))?;
        items
            .iter()
            .map(|item| item.as_str().map(str::to_owned))
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| self.missing(field, "array of strings"))
    }

    /// Descend into a required nested object.
    ///
    /// Errors raised by the returned reader carry the nested path, e.g.
    /// `details.amount`.
    pub fn object(&self, field: &str) -> Result<PayloadReader<'a>, SlotError> {
        let nested = self
            .fields
            .get(field)
            .and_then(Value::as_object)
            .ok_or_else(|| self.missing(field, "object"))?;
        Ok(PayloadReader {
            slot: self.slot,
            tag: self.tag,
            prefix: self.path(field),
            fields: nested,
        })
    }

    fn path(&self, field: &str) -> String {
        if self.prefix.is_empty() {
            field.to_string()
        } else {
            format!("{}.{field}", self.prefix)
        }
    }

    fn missing(&self, field: &str, expected: &'static str) -> SlotError {
        SlotError::MissingField {
            slot: self.slot,
            tag: self.tag.to_string(),
            field: self.path(field),
            expected,
        }
    }
}
