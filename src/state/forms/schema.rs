//! Declarative form schemas and the rule evaluator

use super::field::{FieldKind, FieldSpec, FieldValue, Rule};
use super::form_state::{ErrorState, FormValues};
use crate::error::FormError;
use chrono::NaiveDate;
use serde_json::{Map, Value};
use std::collections::HashSet;

/// Date format accepted by date fields
pub const DATE_FORMAT: &str = "%Y-%m-%d";

const DATE_FORMAT_MESSAGE: &str = "Enter the date as YYYY-MM-DD";

/// Ordered field descriptors plus everything needed to submit them
#[derive(Debug, Clone)]
pub struct FormSchema {
    pub title: String,
    /// Path appended to the registration base URL
    pub endpoint: String,
    /// Fixed message shown after the endpoint accepts a submission
    pub success_message: String,
    /// Merged into every payload; wins over form values on key collision
    pub constants: Map<String, Value>,
    fields: Vec<FieldSpec>,
}

impl FormSchema {
    /// Build a schema, rejecting duplicate keys
    pub fn new(
        title: &str,
        endpoint: &str,
        success_message: &str,
        fields: Vec<FieldSpec>,
    ) -> Result<Self, FormError> {
        let mut seen = HashSet::new();
        for field in &fields {
            if !seen.insert(field.key.as_str()) {
                return Err(FormError::DuplicateField(field.key.clone()));
            }
        }

        Ok(Self {
            title: title.to_string(),
            endpoint: endpoint.to_string(),
            success_message: success_message.to_string(),
            constants: Map::new(),
            fields,
        })
    }

    pub fn with_constants(mut self, constants: Map<String, Value>) -> Self {
        self.constants = constants;
        self
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn field(&self, key: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.key == key)
    }

    pub fn index_of(&self, key: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.key == key)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// One entry per field, each at its default
    pub fn default_values(&self) -> FormValues {
        FormValues::from_pairs(
            self.fields
                .iter()
                .map(|f| (f.key.clone(), f.default_value())),
        )
    }

    /// Run every rule against `values` and collect the failures.
    ///
    /// Rules of a field run in declaration order and the first failure wins.
    /// Rules other than `Required` are skipped when the value is blank.
    pub fn evaluate(&self, values: &FormValues) -> ErrorState {
        let mut errors = ErrorState::default();

        for field in &self.fields {
            let Some(value) = values.get(&field.key) else {
                continue;
            };

            if let Some(message) = self.check_field(field, value, values) {
                errors.insert(&field.key, message);
            }
        }

        errors
    }

    fn check_field(
        &self,
        field: &FieldSpec,
        value: &FieldValue,
        values: &FormValues,
    ) -> Option<String> {
        let blank = value.is_blank();

        if field.kind == FieldKind::Date && !blank && parse_date(value.as_text()).is_none() {
            return Some(DATE_FORMAT_MESSAGE.to_string());
        }

        for rule in &field.rules {
            let failed = match rule {
                Rule::Required { .. } => blank,
                _ if blank => false,
                Rule::Pattern { regex, .. } => !regex.is_match(value.as_text().trim()),
                Rule::AllowedDomains { suffixes, .. } => {
                    let candidate = value.as_text().trim().to_lowercase();
                    !suffixes.iter().any(|s| candidate.contains(s.as_str()))
                }
                Rule::NotBefore { from, .. } => {
                    let from = values.get(from).and_then(|v| parse_date(v.as_text()));
                    let to = parse_date(value.as_text());
                    matches!((from, to), (Some(from), Some(to)) if to < from)
                }
            };
            if failed {
                return Some(rule.message().to_string());
            }
        }

        None
    }
}

/// Parse a trimmed `YYYY-MM-DD` string
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(raw, DATE_FORMAT).ok()
}
