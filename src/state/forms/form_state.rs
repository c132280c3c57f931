//! Form values, per-field errors and submission status

use super::field::FieldValue;
use std::collections::HashMap;

/// Current value of every field, keyed by field key
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormValues {
    values: HashMap<String, FieldValue>,
}

impl FormValues {
    pub(crate) fn from_pairs(pairs: impl IntoIterator<Item = (String, FieldValue)>) -> Self {
        Self {
            values: pairs.into_iter().collect(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.values.get(key)
    }

    pub(crate) fn get_mut(&mut self, key: &str) -> Option<&mut FieldValue> {
        self.values.get_mut(key)
    }

    /// Overwrite the value of an existing key; unknown keys are ignored
    pub(crate) fn set(&mut self, key: &str, value: FieldValue) {
        if let Some(slot) = self.values.get_mut(key) {
            *slot = value;
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &FieldValue)> {
        self.values.iter()
    }
}

/// Validation failures of the most recent pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorState {
    errors: HashMap<String, String>,
}

impl ErrorState {
    pub(crate) fn insert(&mut self, key: &str, message: String) {
        self.errors.insert(key.to_string(), message);
    }

    /// Drop the entry for one field; returns true if there was one
    pub(crate) fn clear_field(&mut self, key: &str) -> bool {
        self.errors.remove(key).is_some()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.errors.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.errors.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &String)> {
        self.errors.iter()
    }
}

/// Lifecycle of a submit attempt
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SubmissionStatus {
    #[default]
    Idle,
    Submitting,
    Succeeded(String),
    Failed(String),
}

impl SubmissionStatus {
    pub fn is_submitting(&self) -> bool {
        matches!(self, SubmissionStatus::Submitting)
    }

    /// Succeeded or Failed
    pub fn is_settled(&self) -> bool {
        matches!(
            self,
            SubmissionStatus::Succeeded(_) | SubmissionStatus::Failed(_)
        )
    }

    /// Message to show under the form, if any
    pub fn message(&self) -> Option<&str> {
        match self {
            SubmissionStatus::Succeeded(m) | SubmissionStatus::Failed(m) => Some(m),
            SubmissionStatus::Submitting => Some("Submitting..."),
            SubmissionStatus::Idle => None,
        }
    }
}

/// What a call to `submit` ended up doing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The endpoint accepted the registration and the form was reset
    Succeeded,
    /// The endpoint (or the network) refused it
    Failed,
    /// Local validation failed; nothing was sent
    Invalid,
    /// Another submission is still running; nothing was sent
    AlreadyInFlight,
}
