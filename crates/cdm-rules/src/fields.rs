//! Per-field reading of JSON records.
//!
//! A field of the wrong JSON type becomes a structural violation for that
//! field alone and reads as absent. Every other field is still read, so one
//! bad value never hides the rest of a record from the rules.

use cdm_core::Violation;
use serde_json::{Map, Value};

pub(crate) struct FieldReader<'a> {
    fields: Option<&'a Map<String, Value>>,
    violations: Vec<Violation>,
}

impl<'a> FieldReader<'a> {
    /// `noun` names the record in the violation raised for a non-object.
    pub(crate) fn new(record: &'a Value, noun: &str) -> Self {
        let fields = record.as_object();
        let mut violations = Vec::new();
        if fields.is_none() {
            violations.push(Violation::structural(format!(
                "{noun} record must be a JSON object, found {}",
                type_name(record)
            )));
        }
        Self { fields, violations }
    }

    /// The raw value of `key`. `null` reads as absent.
    pub(crate) fn raw(&self, key: &str) -> Option<&'a Value> {
        self.fields?.get(key).filter(|v| !v.is_null())
    }

    pub(crate) fn string(&mut self, key: &str) -> Option<String> {
        match self.raw(key)? {
            Value::String(s) => Some(s.clone()),
            other => {
                self.mismatch(key, "a string", other);
                None
            }
        }
    }

    /// An array of strings. Non-string elements are reported and skipped.
    pub(crate) fn strings(&mut self, key: &str) -> Vec<String> {
        let items = match self.raw(key) {
            None => return Vec::new(),
            Some(Value::Array(items)) => items,
            Some(other) => {
                self.mismatch(key, "an array of strings", other);
                return Vec::new();
            }
        };
        let mut out = Vec::with_capacity(items.len());
        for (i, item) in items.iter().enumerate() {
            match item {
                Value::String(s) => out.push(s.clone()),
                other => self.mismatch(&format!("{key}[{i}]"), "a string", other),
            }
        }
        out
    }

    fn mismatch(&mut self, key: &str, expected: &str, found: &Value) {
        self.violations.push(Violation::structural(format!(
            "{key} must be {expected}, found {}",
            type_name(found)
        )));
    }

    /// Type violations collected so far, in read order.
    pub(crate) fn finish(self) -> Vec<Violation> {
        self.violations
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
