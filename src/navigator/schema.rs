//! Declarative field checks
//!
//! A `Schema` maps field names to validators and runs them against one
//! response object, one check per rule.

use serde_json::Value;

use crate::recorder::Recorder;

/// Validator applied to one field
#[derive(Clone, Debug, PartialEq)]
pub enum FieldRule {
    Present,
    NotEmpty,
    Uuid,
    Equals(Value),
}

#[derive(Clone, Debug, Default)]
pub struct Schema {
    rules: Vec<(String, FieldRule)>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Require every field in `fields` to be present
    pub fn present(mut self, fields: &[&str]) -> Self {
        self.rules.extend(
            fields
                .iter()
                .map(|field| (field.to_string(), FieldRule::Present)),
        );
        self
    }

    pub fn not_empty(mut self, field: &str) -> Self {
        self.rules.push((field.to_string(), FieldRule::NotEmpty));
        self
    }

    pub fn uuid(mut self, field: &str) -> Self {
        self.rules.push((field.to_string(), FieldRule::Uuid));
        self
    }

    pub fn equals(mut self, field: &str, expected: impl Into<Value>) -> Self {
        self.rules
            .push((field.to_string(), FieldRule::Equals(expected.into())));
        self
    }

    /// Run every rule against `object`; true when all passed
    pub fn check(&self, recorder: &mut Recorder, object: &Value, label: &str) -> bool {
        let mut all_passed = true;
        for (field, rule) in &self.rules {
            let value = object.get(field.as_str()).unwrap_or(&Value::Null);
            let passed = match rule {
                FieldRule::Present => {
                    recorder.assert_has_field(object, field, format!("{label}.{field} present"))
                }
                FieldRule::NotEmpty => {
                    recorder.assert_not_empty(value, format!("{label}.{field} not empty"))
                }
                FieldRule::Uuid => recorder.assert_uuid(value, format!("{label}.{field} is UUID")),
                FieldRule::Equals(expected) => {
                    recorder.assert_equal(value, expected, format!("{label}.{field} = {expected}"))
                }
            };
            all_passed &= passed;
        }
        all_passed
    }
}
